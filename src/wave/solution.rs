//! Order/aisle selection.

use std::collections::BTreeSet;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A selection of orders and the aisles they are picked from.
///
/// Indices refer to positions in [`ProblemInstance::orders`] and
/// [`ProblemInstance::aisles`]. Ordering carries no meaning; sets keep
/// iteration deterministic.
///
/// [`ProblemInstance::orders`]: super::ProblemInstance::orders
/// [`ProblemInstance::aisles`]: super::ProblemInstance::aisles
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Solution {
    /// Selected order indices.
    pub orders: BTreeSet<usize>,
    /// Selected aisle indices.
    pub aisles: BTreeSet<usize>,
}

impl Solution {
    pub fn new(orders: BTreeSet<usize>, aisles: BTreeSet<usize>) -> Self {
        Self { orders, aisles }
    }

    /// Creates an empty selection.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates a selection from index iterators.
    pub fn from_indices(
        orders: impl IntoIterator<Item = usize>,
        aisles: impl IntoIterator<Item = usize>,
    ) -> Self {
        Self {
            orders: orders.into_iter().collect(),
            aisles: aisles.into_iter().collect(),
        }
    }

    /// Whether either side of the selection is empty.
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty() || self.aisles.is_empty()
    }

    pub fn order_count(&self) -> usize {
        self.orders.len()
    }

    pub fn aisle_count(&self) -> usize {
        self.aisles.len()
    }
}
