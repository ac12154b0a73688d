//! Multi-start constructor configuration.

/// Configuration for [`MultiStartGreedyConstructor`](super::MultiStartGreedyConstructor).
///
/// # Examples
///
/// ```
/// use u_wavepick::greedy::MultiStartConfig;
///
/// let config = MultiStartConfig::default()
///     .with_min_aisles(2)
///     .with_max_aisles(10)
///     .with_parallel(false);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct MultiStartConfig {
    /// Smallest aisle-set size tried.
    pub min_aisles: usize,

    /// Largest aisle-set size tried. 0 = all aisles.
    pub max_aisles: usize,

    /// Whether to sweep candidate sizes in parallel using rayon.
    ///
    /// Only effective with the `parallel` feature. The selected
    /// solution is the same either way.
    pub parallel: bool,
}

impl Default for MultiStartConfig {
    fn default() -> Self {
        Self {
            min_aisles: 1,
            max_aisles: 0,
            parallel: false,
        }
    }
}

impl MultiStartConfig {
    pub fn with_min_aisles(mut self, n: usize) -> Self {
        self.min_aisles = n;
        self
    }

    pub fn with_max_aisles(mut self, n: usize) -> Self {
        self.max_aisles = n;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.min_aisles == 0 {
            return Err("min_aisles must be at least 1".into());
        }
        if self.max_aisles != 0 && self.max_aisles < self.min_aisles {
            return Err(format!(
                "max_aisles ({}) must be 0 or at least min_aisles ({})",
                self.max_aisles, self.min_aisles
            ));
        }
        Ok(())
    }

    /// Candidate sizes for an instance with `n_aisles` aisles, largest first.
    pub(crate) fn sizes(&self, n_aisles: usize) -> Vec<usize> {
        let upper = if self.max_aisles == 0 {
            n_aisles
        } else {
            self.max_aisles.min(n_aisles)
        };
        (self.min_aisles..=upper).rev().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MultiStartConfig::default();
        assert_eq!(config.min_aisles, 1);
        assert_eq!(config.max_aisles, 0);
        assert!(!config.parallel);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_bad_bounds() {
        assert!(MultiStartConfig::default()
            .with_min_aisles(0)
            .validate()
            .is_err());
        assert!(MultiStartConfig::default()
            .with_min_aisles(5)
            .with_max_aisles(3)
            .validate()
            .is_err());
    }

    #[test]
    fn test_sizes() {
        assert_eq!(MultiStartConfig::default().sizes(4), vec![4, 3, 2, 1]);
        assert_eq!(
            MultiStartConfig::default().with_max_aisles(2).sizes(4),
            vec![2, 1]
        );
        assert_eq!(
            MultiStartConfig::default().with_min_aisles(3).sizes(4),
            vec![4, 3]
        );
        assert!(MultiStartConfig::default().sizes(0).is_empty());
    }
}
