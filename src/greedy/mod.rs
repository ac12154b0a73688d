//! Greedy construction heuristics.
//!
//! Fast, deterministic sources of feasible selections. Their densities
//! seed the fractional controller's ratio and their selections serve as
//! oracle warm starts.
//!
//! - [`GreedyConstructor`]: one pass, each order bound to the first aisle
//!   that can serve it alone.
//! - [`MultiStartGreedyConstructor`]: one sweep per aisle-set size over the
//!   pooled supply of the largest aisles; keeps the densest.
//!
//! Neither dominates the other on every instance: the multi-start sweep
//! always takes a prefix of the size ranking, while the single pass may
//! skip a large aisle that serves nothing.

mod config;
mod multi_start;
mod ranking;
mod single_pass;
mod types;

pub use config::MultiStartConfig;
pub use multi_start::MultiStartGreedyConstructor;
pub use ranking::rank_descending;
pub use single_pass::GreedyConstructor;
pub use types::WaveConstructor;
