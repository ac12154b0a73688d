//! Exact sub-solver boundary.
//!
//! The density controller cannot optimize a ratio directly; it formulates
//! linear sub-problems and hands them to an [`Oracle`]. This module defines
//! what crosses that boundary and ships two oracles.
//!
//! # Key Components
//!
//! - **Variables**: [`Variable`] with a [`Domain`] (binary or bounded
//!   continuous), referenced through [`VarId`]
//! - **Model**: [`LinearModel`] with [`LinearConstraint`]s and one
//!   [`Objective`]
//! - **Oracle**: [`Oracle`] trait; any closure with the right signature
//!   implements it
//! - **Bundled oracles**: [`EnumerationOracle`] (exhaustive, tiny pure-binary
//!   models) and, with the `microlp` feature, [`MicroLpOracle`] (MILP via
//!   `good_lp`)
//!
//! # Design
//!
//! The oracle is a capability, not a class hierarchy. Time limits are
//! cooperative: an oracle is asked to respect [`OracleConfig::time_limit`]
//! and is never preempted.

mod enumeration;
#[cfg(feature = "microlp")]
mod microlp;
mod model;
mod solver;
mod variables;

pub use enumeration::EnumerationOracle;
#[cfg(feature = "microlp")]
pub use microlp::MicroLpOracle;
pub use model::{LinearConstraint, LinearModel, Objective, Relation, Sense};
pub use solver::{Oracle, OracleConfig, OracleSolution, OracleStatus};
pub use variables::{Domain, VarId, Variable};
