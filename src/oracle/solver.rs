//! Oracle interface.

use std::time::Duration;

use super::model::LinearModel;

/// Status of the oracle after execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OracleStatus {
    /// Proven optimal assignment found.
    Optimal,
    /// Time limit reached with a feasible (possibly suboptimal) assignment.
    Feasible,
    /// No feasible assignment exists.
    Infeasible,
    /// Time limit reached without any feasible assignment.
    Timeout,
    /// Model is invalid or malformed.
    ModelInvalid,
    /// No assignment found for other reasons.
    Unknown,
}

/// Result of an oracle call.
#[derive(Debug, Clone)]
pub struct OracleSolution {
    /// Oracle status.
    pub status: OracleStatus,
    /// Objective value of the assignment (if any).
    pub objective_value: Option<f64>,
    /// Variable values indexed by [`VarId`](super::VarId); empty unless a
    /// solution was found.
    pub values: Vec<f64>,
    /// Solve time.
    pub solve_time: Duration,
}

impl OracleSolution {
    /// Creates an empty result with the given status.
    pub fn empty(status: OracleStatus) -> Self {
        Self {
            status,
            objective_value: None,
            values: Vec::new(),
            solve_time: Duration::ZERO,
        }
    }

    /// Creates a result carrying an assignment.
    pub fn found(status: OracleStatus, values: Vec<f64>, objective_value: f64) -> Self {
        Self {
            status,
            objective_value: Some(objective_value),
            values,
            solve_time: Duration::ZERO,
        }
    }

    pub fn with_solve_time(mut self, solve_time: Duration) -> Self {
        self.solve_time = solve_time;
        self
    }

    /// Whether an assignment was found.
    pub fn is_solution_found(&self) -> bool {
        matches!(self.status, OracleStatus::Optimal | OracleStatus::Feasible)
            && !self.values.is_empty()
    }
}

/// Per-call oracle configuration.
#[derive(Debug, Clone)]
pub struct OracleConfig {
    /// Wall-clock budget for this call. Respected cooperatively.
    pub time_limit: Duration,
    /// Optional starting assignment, indexed like the model's variables.
    pub warm_start: Option<Vec<f64>>,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            time_limit: Duration::from_secs(60),
            warm_start: None,
        }
    }
}

impl OracleConfig {
    pub fn new(time_limit: Duration) -> Self {
        Self {
            time_limit,
            warm_start: None,
        }
    }

    pub fn with_time_limit(mut self, time_limit: Duration) -> Self {
        self.time_limit = time_limit;
        self
    }

    pub fn with_warm_start(mut self, values: Vec<f64>) -> Self {
        self.warm_start = Some(values);
        self
    }
}

/// An exact or near-exact solver for [`LinearModel`]s.
///
/// This is the only place where exact solving capability enters the crate.
/// Implementors may wrap an external MILP solver or provide a custom
/// search. Any `Fn(&LinearModel, &OracleConfig) -> OracleSolution` is an
/// oracle, so tests and callers can plug in closures.
///
/// Implementations must not report an assignment they did not find; the
/// caller re-validates the decoded selection regardless.
pub trait Oracle {
    /// Solves the model and returns the outcome.
    fn solve(&self, model: &LinearModel, config: &OracleConfig) -> OracleSolution;
}

impl<F> Oracle for F
where
    F: Fn(&LinearModel, &OracleConfig) -> OracleSolution,
{
    fn solve(&self, model: &LinearModel, config: &OracleConfig) -> OracleSolution {
        self(model, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::Variable;

    #[test]
    fn test_empty_solution() {
        let solution = OracleSolution::empty(OracleStatus::Infeasible);
        assert!(!solution.is_solution_found());
        assert!(solution.objective_value.is_none());
    }

    #[test]
    fn test_found_solution() {
        let solution = OracleSolution::found(OracleStatus::Feasible, vec![1.0, 0.0], 3.0)
            .with_solve_time(Duration::from_millis(5));
        assert!(solution.is_solution_found());
        assert_eq!(solution.objective_value, Some(3.0));
        assert_eq!(solution.solve_time, Duration::from_millis(5));
    }

    #[test]
    fn test_closure_is_oracle() {
        let oracle = |model: &LinearModel, _config: &OracleConfig| {
            OracleSolution::found(OracleStatus::Optimal, vec![1.0; model.variable_count()], 1.0)
        };
        let mut model = LinearModel::new("test");
        model.add_variable(Variable::binary("x"));

        let solution = oracle.solve(&model, &OracleConfig::default());
        assert_eq!(solution.status, OracleStatus::Optimal);
        assert_eq!(solution.values, vec![1.0]);
    }

    #[test]
    fn test_config_builders() {
        let config = OracleConfig::new(Duration::from_secs(3)).with_warm_start(vec![0.0, 1.0]);
        assert_eq!(config.time_limit, Duration::from_secs(3));
        assert_eq!(config.warm_start.as_deref(), Some(&[0.0, 1.0][..]));

        let config = OracleConfig::default();
        assert_eq!(config.time_limit, Duration::from_secs(60));
        assert!(config.warm_start.is_none());
    }
}
