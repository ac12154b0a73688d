//! Maximum-density order/aisle selection for warehouse wave picking.
//!
//! Selects a wave of orders and the aisles to pick them from so that units
//! picked per aisle visited is as high as possible, subject to a wave-size
//! window and per-item supply.
//!
//! - **Wave**: instance data model, feasibility/density evaluation and a
//!   seeded instance generator.
//! - **Greedy**: single-pass and multi-start construction heuristics.
//! - **Oracle**: linear 0/1-continuous model and the exact-solver
//!   capability, with an exhaustive oracle and a `good_lp`/`microlp` MILP
//!   oracle.
//! - **Density**: the fractional-optimization controller (Dinkelbach or
//!   Charnes–Cooper) under a wall-clock budget.
//!
//! # Architecture
//!
//! The controller depends on the oracle only through the
//! [`Oracle`](oracle::Oracle) trait. Heuristic and oracle outputs are
//! re-validated by [`SolutionEvaluator`](wave::SolutionEvaluator) before they
//! are kept. The library installs no logger; it logs through the `log`
//! facade.

pub mod density;
pub mod greedy;
pub mod oracle;
pub mod wave;
