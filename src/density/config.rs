//! Density controller configuration.

use std::time::Duration;

use crate::greedy::MultiStartConfig;

/// How the ratio objective is reduced to linear oracle calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    /// Dinkelbach parametric iteration: repeatedly maximize
    /// `units − q·aisles` and move `q` to the ratio achieved.
    ///
    /// Reference: Dinkelbach (1967), "On Nonlinear Fractional Programming"
    #[default]
    Dinkelbach,

    /// One-shot Charnes–Cooper linearization with a scaling variable `t`
    /// and McCormick envelopes for `y·t` and `x·t`.
    ///
    /// Reference: Charnes & Cooper (1962), "Programming with linear
    /// fractional functionals"
    CharnesCooper,
}

/// Configuration for [`DensityOptimizer`](super::DensityOptimizer).
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use u_wavepick::density::{DensityConfig, Strategy};
///
/// let config = DensityConfig::default()
///     .with_strategy(Strategy::Dinkelbach)
///     .with_max_iterations(20)
///     .with_time_limit(Duration::from_secs(30));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct DensityConfig {
    /// Reduction strategy.
    pub strategy: Strategy,

    /// Maximum Dinkelbach iterations (oracle calls). Ignored by
    /// Charnes–Cooper, which makes a single call.
    pub max_iterations: usize,

    /// Convergence threshold on `|F(q)| = |units − q·aisles|`.
    pub epsilon: f64,

    /// Total wall-clock budget, heuristics included.
    pub time_limit: Duration,

    /// The oracle is not called unless more than this is left.
    pub min_oracle_budget: Duration,

    /// Pass the incumbent to the oracle as a warm start.
    pub warm_start: bool,

    /// Run [`GreedyConstructor`](crate::greedy::GreedyConstructor) first.
    pub use_greedy: bool,

    /// Run [`MultiStartGreedyConstructor`](crate::greedy::MultiStartGreedyConstructor) first.
    pub use_multi_start: bool,

    /// Settings for the multi-start constructor.
    pub multi_start: MultiStartConfig,

    /// Slack on the Charnes–Cooper normalization `Σ w = 1`.
    pub normalization_tolerance: f64,
}

impl Default for DensityConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::default(),
            max_iterations: 15,
            epsilon: 1e-4,
            time_limit: Duration::from_secs(600),
            min_oracle_budget: Duration::from_secs(1),
            warm_start: true,
            use_greedy: true,
            use_multi_start: true,
            multi_start: MultiStartConfig::default(),
            normalization_tolerance: 1e-6,
        }
    }
}

impl DensityConfig {
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = limit;
        self
    }

    pub fn with_min_oracle_budget(mut self, budget: Duration) -> Self {
        self.min_oracle_budget = budget;
        self
    }

    pub fn with_warm_start(mut self, enabled: bool) -> Self {
        self.warm_start = enabled;
        self
    }

    pub fn with_greedy(mut self, enabled: bool) -> Self {
        self.use_greedy = enabled;
        self
    }

    pub fn with_multi_start(mut self, enabled: bool) -> Self {
        self.use_multi_start = enabled;
        self
    }

    pub fn with_multi_start_config(mut self, config: MultiStartConfig) -> Self {
        self.multi_start = config;
        self
    }

    pub fn with_normalization_tolerance(mut self, tolerance: f64) -> Self {
        self.normalization_tolerance = tolerance;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_iterations == 0 {
            return Err("max_iterations must be at least 1".into());
        }
        if !(self.epsilon.is_finite() && self.epsilon > 0.0) {
            return Err(format!("epsilon must be positive, got {}", self.epsilon));
        }
        if !(self.normalization_tolerance.is_finite() && self.normalization_tolerance >= 0.0) {
            return Err(format!(
                "normalization_tolerance must be non-negative, got {}",
                self.normalization_tolerance
            ));
        }
        self.multi_start
            .validate()
            .map_err(|e| format!("multi_start: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DensityConfig::default();
        assert_eq!(config.strategy, Strategy::Dinkelbach);
        assert_eq!(config.max_iterations, 15);
        assert_eq!(config.epsilon, 1e-4);
        assert_eq!(config.time_limit, Duration::from_secs(600));
        assert_eq!(config.min_oracle_budget, Duration::from_secs(1));
        assert!(config.warm_start && config.use_greedy && config.use_multi_start);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builders() {
        let config = DensityConfig::default()
            .with_strategy(Strategy::CharnesCooper)
            .with_epsilon(1e-6)
            .with_min_oracle_budget(Duration::ZERO)
            .with_warm_start(false)
            .with_greedy(false)
            .with_multi_start(false)
            .with_normalization_tolerance(0.0);
        assert_eq!(config.strategy, Strategy::CharnesCooper);
        assert!(!config.warm_start);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid() {
        assert!(DensityConfig::default().with_max_iterations(0).validate().is_err());
        assert!(DensityConfig::default().with_epsilon(0.0).validate().is_err());
        assert!(DensityConfig::default().with_epsilon(f64::NAN).validate().is_err());
        assert!(DensityConfig::default()
            .with_normalization_tolerance(-1.0)
            .validate()
            .is_err());
        let bad = MultiStartConfig::default().with_min_aisles(0);
        assert!(DensityConfig::default()
            .with_multi_start_config(bad)
            .validate()
            .is_err());
    }
}
