//! Constructor capability.

use crate::wave::{ProblemInstance, Solution};

/// Builds a selection from scratch.
///
/// Results are candidates only: callers re-check them with
/// [`SolutionEvaluator`](crate::wave::SolutionEvaluator) before use.
pub trait WaveConstructor: Send + Sync {
    /// Returns a human-readable name for this constructor.
    fn name(&self) -> &str;

    /// Builds a candidate selection, or `None` when nothing was found.
    fn construct(&self, instance: &ProblemInstance) -> Option<Solution>;
}
