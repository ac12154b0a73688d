//! Orders, aisles and the wave-picking problem instance.

use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Units of a single item (demanded or available).
pub type Units = u64;

/// A sparse item → units mapping with a cached total.
///
/// Zero-unit entries are dropped on construction so that "has item" and
/// "has a positive amount of item" mean the same thing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ItemUnits {
    units: BTreeMap<usize, Units>,
    total: Units,
}

impl ItemUnits {
    /// Builds the mapping from `(item, units)` pairs.
    ///
    /// Repeated items are accumulated.
    pub fn new(pairs: impl IntoIterator<Item = (usize, Units)>) -> Self {
        let mut units: BTreeMap<usize, Units> = BTreeMap::new();
        for (item, amount) in pairs {
            if amount > 0 {
                *units.entry(item).or_insert(0) += amount;
            }
        }
        let total = units.values().sum();
        Self { units, total }
    }

    /// Units of `item`, zero when absent.
    pub fn get(&self, item: usize) -> Units {
        self.units.get(&item).copied().unwrap_or(0)
    }

    /// Sum of all units.
    pub fn total(&self) -> Units {
        self.total
    }

    /// Iterates `(item, units)` in ascending item order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, Units)> + '_ {
        self.units.iter().map(|(&item, &amount)| (item, amount))
    }

    /// Number of distinct items.
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Whether no item has a positive amount.
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Largest item index present, if any.
    pub fn max_item(&self) -> Option<usize> {
        self.units.keys().next_back().copied()
    }
}

/// A customer order: the units it requires of each item.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Order {
    /// Required units per item.
    pub demand: ItemUnits,
}

impl Order {
    /// Creates an order from `(item, units)` pairs.
    pub fn new(pairs: impl IntoIterator<Item = (usize, Units)>) -> Self {
        Self {
            demand: ItemUnits::new(pairs),
        }
    }

    /// Total units demanded.
    pub fn total(&self) -> Units {
        self.demand.total()
    }
}

/// A storage aisle: the units it holds of each item.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Aisle {
    /// Available units per item.
    pub supply: ItemUnits,
}

impl Aisle {
    /// Creates an aisle from `(item, units)` pairs.
    pub fn new(pairs: impl IntoIterator<Item = (usize, Units)>) -> Self {
        Self {
            supply: ItemUnits::new(pairs),
        }
    }

    /// Total units stored.
    pub fn total(&self) -> Units {
        self.supply.total()
    }
}

/// A wave-picking problem instance.
///
/// Read-only for the duration of a solve.
///
/// # Examples
///
/// ```
/// use u_wavepick::wave::{Aisle, Order, ProblemInstance};
///
/// let instance = ProblemInstance::new(
///     vec![Order::new([(0, 3), (1, 2)]), Order::new([(0, 1)])],
///     vec![Aisle::new([(0, 4), (1, 2)]), Aisle::new([(0, 1)])],
///     2,
///     1,
///     10,
/// );
/// assert!(instance.validate().is_ok());
/// assert_eq!(instance.order_count(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ProblemInstance {
    /// Orders, indexed by position.
    pub orders: Vec<Order>,
    /// Aisles, indexed by position.
    pub aisles: Vec<Aisle>,
    /// Number of distinct items; item indices are `0..n_items`.
    pub n_items: usize,
    /// Minimum total units of a wave.
    pub wave_size_lb: Units,
    /// Maximum total units of a wave.
    pub wave_size_ub: Units,
}

impl ProblemInstance {
    pub fn new(
        orders: Vec<Order>,
        aisles: Vec<Aisle>,
        n_items: usize,
        wave_size_lb: Units,
        wave_size_ub: Units,
    ) -> Self {
        Self {
            orders,
            aisles,
            n_items,
            wave_size_lb,
            wave_size_ub,
        }
    }

    pub fn order_count(&self) -> usize {
        self.orders.len()
    }

    pub fn aisle_count(&self) -> usize {
        self.aisles.len()
    }

    /// Items that at least one order demands, ascending.
    pub fn demanded_items(&self) -> Vec<usize> {
        let mut seen = vec![false; self.n_items];
        for order in &self.orders {
            for (item, _) in order.demand.iter() {
                if item < seen.len() {
                    seen[item] = true;
                }
            }
        }
        seen.iter()
            .enumerate()
            .filter_map(|(item, &hit)| hit.then_some(item))
            .collect()
    }

    /// Validates the instance for consistency.
    pub fn validate(&self) -> Result<(), String> {
        if self.wave_size_lb > self.wave_size_ub {
            return Err(format!(
                "wave_size_lb ({}) exceeds wave_size_ub ({})",
                self.wave_size_lb, self.wave_size_ub
            ));
        }
        for (o, order) in self.orders.iter().enumerate() {
            if let Some(item) = order.demand.max_item() {
                if item >= self.n_items {
                    return Err(format!(
                        "order {o} references item {item} but n_items is {}",
                        self.n_items
                    ));
                }
            }
        }
        for (a, aisle) in self.aisles.iter().enumerate() {
            if let Some(item) = aisle.supply.max_item() {
                if item >= self.n_items {
                    return Err(format!(
                        "aisle {a} references item {item} but n_items is {}",
                        self.n_items
                    ));
                }
            }
        }
        Ok(())
    }
}
