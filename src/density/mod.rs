//! Maximum-density wave selection.
//!
//! Density (units picked per aisle visited) is a ratio of two linear
//! functions of the 0/1 selection, which a linear [`Oracle`](crate::oracle::Oracle)
//! cannot maximize directly. [`DensityOptimizer`] reduces it to linear
//! sub-problems with one of two strategies:
//!
//! - [`Strategy::Dinkelbach`]: repeated surrogate solves
//!   `max Σ d_o·y_o − q·Σ x_a`, moving `q` to the achieved ratio until
//!   `|F(q)| < ε`.
//! - [`Strategy::CharnesCooper`]: a single solve of the `t`-scaled
//!   linearization whose objective is the density itself.
//!
//! Greedy constructors seed `q`, the incumbent and the warm start. Every
//! oracle call is charged against one wall-clock [`Deadline`].
//!
//! # References
//!
//! - Dinkelbach (1967), "On Nonlinear Fractional Programming"
//! - Charnes & Cooper (1962), "Programming with linear fractional functionals"
//! - McCormick (1976), "Computability of global solutions to factorable
//!   nonconvex programs"

mod budget;
mod config;
mod error;
mod formulation;
mod runner;

pub use budget::Deadline;
pub use config::{DensityConfig, Strategy};
pub use error::DensityError;
pub use formulation::{CharnesCooperFormulation, Formulation, ParametricFormulation};
pub use runner::{DensityOptimizer, DensityResult, SolutionSource, Termination};
