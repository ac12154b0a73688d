//! Wave-picking data model.
//!
//! - [`ProblemInstance`]: orders (item demand), aisles (item supply) and the
//!   wave-size window.
//! - [`Solution`]: a selection of orders and the aisles visited to pick them.
//! - [`SolutionEvaluator`]: the single source of truth for feasibility and
//!   density (units picked per aisle visited).
//! - [`GeneratorConfig`]: seeded synthetic instances.

mod evaluator;
mod generator;
mod instance;
mod solution;

pub use evaluator::{compare_density, SolutionEvaluator, Violation};
pub use generator::GeneratorConfig;
pub use instance::{Aisle, ItemUnits, Order, ProblemInstance, Units};
pub use solution::Solution;
