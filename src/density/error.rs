use thiserror::Error;

/// Errors that abort a density solve.
///
/// Infeasibility and budget exhaustion are not errors: they end the solve
/// with the best verified selection found so far (possibly none).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DensityError {
    /// The controller configuration is inconsistent.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The instance is inconsistent.
    #[error("invalid instance: {0}")]
    InvalidInstance(String),

    /// The oracle rejected a sub-problem formulation.
    #[error("oracle rejected formulation `{model}` at iteration {iteration}")]
    Formulation { model: String, iteration: usize },
}
