//! Feasibility and density of a selection.
//!
//! Every other component treats this module as ground truth: heuristic and
//! oracle outputs are re-checked here before they are kept.

use std::cmp::Ordering;
use std::fmt;

use super::instance::{ProblemInstance, Units};
use super::solution::Solution;

/// The first invariant a selection violates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    /// No order selected.
    EmptyOrders,
    /// No aisle selected.
    EmptyAisles,
    /// An order index outside the instance.
    OrderOutOfRange(usize),
    /// An aisle index outside the instance.
    AisleOutOfRange(usize),
    /// A selected order or aisle references an item `>= n_items`.
    ItemOutOfRange(usize),
    /// Total units below the wave lower bound.
    BelowWaveLowerBound { total: Units, lower: Units },
    /// Total units above the wave upper bound.
    AboveWaveUpperBound { total: Units, upper: Units },
    /// Selected orders need more of an item than the selected aisles hold.
    ItemShortage {
        item: usize,
        picked: Units,
        available: Units,
    },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::EmptyOrders => write!(f, "no order selected"),
            Violation::EmptyAisles => write!(f, "no aisle selected"),
            Violation::OrderOutOfRange(o) => write!(f, "order index {o} out of range"),
            Violation::AisleOutOfRange(a) => write!(f, "aisle index {a} out of range"),
            Violation::ItemOutOfRange(i) => write!(f, "item index {i} out of range"),
            Violation::BelowWaveLowerBound { total, lower } => {
                write!(f, "wave of {total} units is below lower bound {lower}")
            }
            Violation::AboveWaveUpperBound { total, upper } => {
                write!(f, "wave of {total} units is above upper bound {upper}")
            }
            Violation::ItemShortage {
                item,
                picked,
                available,
            } => write!(f, "item {item}: {picked} units picked, {available} available"),
        }
    }
}

/// Pure feasibility and objective checks for [`Solution`]s.
///
/// # Examples
///
/// ```
/// use u_wavepick::wave::{Aisle, Order, ProblemInstance, Solution, SolutionEvaluator};
///
/// let instance = ProblemInstance::new(
///     vec![Order::new([(0, 3), (1, 2)]), Order::new([(0, 1)])],
///     vec![Aisle::new([(0, 4), (1, 2)]), Aisle::new([(0, 1)])],
///     2,
///     1,
///     10,
/// );
/// let solution = Solution::from_indices([0], [0]);
/// assert!(SolutionEvaluator::is_feasible(&solution, &instance));
/// assert_eq!(SolutionEvaluator::density(&solution, &instance), 5.0);
/// ```
pub struct SolutionEvaluator;

impl SolutionEvaluator {
    /// Checks all invariants and reports the first violation.
    pub fn check(solution: &Solution, instance: &ProblemInstance) -> Result<(), Violation> {
        if solution.orders.is_empty() {
            return Err(Violation::EmptyOrders);
        }
        if solution.aisles.is_empty() {
            return Err(Violation::EmptyAisles);
        }

        let mut picked = vec![0 as Units; instance.n_items];
        let mut available = vec![0 as Units; instance.n_items];

        for &o in &solution.orders {
            let order = instance
                .orders
                .get(o)
                .ok_or(Violation::OrderOutOfRange(o))?;
            for (item, units) in order.demand.iter() {
                *picked
                    .get_mut(item)
                    .ok_or(Violation::ItemOutOfRange(item))? += units;
            }
        }
        for &a in &solution.aisles {
            let aisle = instance
                .aisles
                .get(a)
                .ok_or(Violation::AisleOutOfRange(a))?;
            for (item, units) in aisle.supply.iter() {
                *available
                    .get_mut(item)
                    .ok_or(Violation::ItemOutOfRange(item))? += units;
            }
        }

        let total: Units = picked.iter().sum();
        if total < instance.wave_size_lb {
            return Err(Violation::BelowWaveLowerBound {
                total,
                lower: instance.wave_size_lb,
            });
        }
        if total > instance.wave_size_ub {
            return Err(Violation::AboveWaveUpperBound {
                total,
                upper: instance.wave_size_ub,
            });
        }

        for (item, (&need, &have)) in picked.iter().zip(available.iter()).enumerate() {
            if need > have {
                return Err(Violation::ItemShortage {
                    item,
                    picked: need,
                    available: have,
                });
            }
        }

        Ok(())
    }

    /// Whether the selection satisfies every invariant.
    pub fn is_feasible(solution: &Solution, instance: &ProblemInstance) -> bool {
        Self::check(solution, instance).is_ok()
    }

    /// Total units demanded by the selected orders.
    ///
    /// Out-of-range order indices contribute nothing.
    pub fn total_units(solution: &Solution, instance: &ProblemInstance) -> Units {
        solution
            .orders
            .iter()
            .filter_map(|&o| instance.orders.get(o))
            .map(|order| order.total())
            .sum()
    }

    /// Units picked per aisle visited; zero without aisles.
    pub fn density(solution: &Solution, instance: &ProblemInstance) -> f64 {
        if solution.aisles.is_empty() {
            return 0.0;
        }
        Self::total_units(solution, instance) as f64 / solution.aisles.len() as f64
    }
}

/// Compares the exact densities `units_a / aisles_a` and `units_b / aisles_b`.
///
/// An empty aisle count has density zero.
pub fn compare_density(units_a: Units, aisles_a: usize, units_b: Units, aisles_b: usize) -> Ordering {
    match (aisles_a, aisles_b) {
        (0, 0) => Ordering::Equal,
        (0, _) => 0.cmp(&units_b),
        (_, 0) => units_a.cmp(&0),
        _ => {
            let lhs = units_a as u128 * aisles_b as u128;
            let rhs = units_b as u128 * aisles_a as u128;
            lhs.cmp(&rhs)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wave::{Aisle, Order};

    fn example() -> ProblemInstance {
        ProblemInstance::new(
            vec![Order::new([(0, 3), (1, 2)]), Order::new([(0, 1)])],
            vec![Aisle::new([(0, 4), (1, 2)]), Aisle::new([(0, 1)])],
            2,
            1,
            10,
        )
    }

    #[test]
    fn test_feasible_selections() {
        let instance = example();
        let single = Solution::from_indices([0], [0]);
        let both = Solution::from_indices([0, 1], [0, 1]);

        assert!(SolutionEvaluator::is_feasible(&single, &instance));
        assert!(SolutionEvaluator::is_feasible(&both, &instance));
        assert!((SolutionEvaluator::density(&single, &instance) - 5.0).abs() < 1e-12);
        assert!((SolutionEvaluator::density(&both, &instance) - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_sides() {
        let instance = example();
        assert_eq!(
            SolutionEvaluator::check(&Solution::from_indices([], [0]), &instance),
            Err(Violation::EmptyOrders)
        );
        assert_eq!(
            SolutionEvaluator::check(&Solution::from_indices([0], []), &instance),
            Err(Violation::EmptyAisles)
        );
        assert_eq!(
            SolutionEvaluator::density(&Solution::from_indices([0], []), &instance),
            0.0
        );
    }

    #[test]
    fn test_item_shortage() {
        let instance = example();
        // Aisle 1 only holds one unit of item 0 and nothing of item 1.
        let solution = Solution::from_indices([0], [1]);
        assert_eq!(
            SolutionEvaluator::check(&solution, &instance),
            Err(Violation::ItemShortage {
                item: 0,
                picked: 3,
                available: 1
            })
        );
    }

    #[test]
    fn test_wave_bounds() {
        let mut instance = example();
        instance.wave_size_lb = 6;
        let solution = Solution::from_indices([0], [0]);
        assert_eq!(
            SolutionEvaluator::check(&solution, &instance),
            Err(Violation::BelowWaveLowerBound { total: 5, lower: 6 })
        );

        instance.wave_size_lb = 1;
        instance.wave_size_ub = 4;
        assert_eq!(
            SolutionEvaluator::check(&solution, &instance),
            Err(Violation::AboveWaveUpperBound { total: 5, upper: 4 })
        );
    }

    #[test]
    fn test_out_of_range() {
        let instance = example();
        assert_eq!(
            SolutionEvaluator::check(&Solution::from_indices([7], [0]), &instance),
            Err(Violation::OrderOutOfRange(7))
        );
        assert_eq!(
            SolutionEvaluator::check(&Solution::from_indices([0], [9]), &instance),
            Err(Violation::AisleOutOfRange(9))
        );
    }

    #[test]
    fn test_item_out_of_range_on_unvalidated_instance() {
        // order demands item 5 with n_items = 2; no aisle stocks it
        let instance = ProblemInstance::new(
            vec![Order::new([(5, 2)])],
            vec![Aisle::new([(0, 4)])],
            2,
            0,
            10,
        );
        assert!(instance.validate().is_err());
        assert_eq!(
            SolutionEvaluator::check(&Solution::from_indices([0], [0]), &instance),
            Err(Violation::ItemOutOfRange(5))
        );

        let instance = ProblemInstance::new(
            vec![Order::new([(0, 2)])],
            vec![Aisle::new([(0, 4), (3, 1)])],
            2,
            0,
            10,
        );
        assert_eq!(
            SolutionEvaluator::check(&Solution::from_indices([0], [0]), &instance),
            Err(Violation::ItemOutOfRange(3))
        );
    }

    #[test]
    fn test_compare_density() {
        assert_eq!(compare_density(6, 1, 5, 1), Ordering::Greater);
        assert_eq!(compare_density(6, 2, 3, 1), Ordering::Equal);
        assert_eq!(compare_density(5, 2, 3, 1), Ordering::Less);
        assert_eq!(compare_density(0, 0, 1, 3), Ordering::Less);
        assert_eq!(compare_density(0, 0, 0, 0), Ordering::Equal);
    }
}
