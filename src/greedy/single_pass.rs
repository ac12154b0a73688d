//! Single-pass greedy packing.
//!
//! # Algorithm
//!
//! 1. Rank aisles by descending total supply and orders by descending
//!    total demand.
//! 2. For each aisle in rank order, scan the still-unassigned orders in
//!    rank order. An order is admitted when it keeps the running total
//!    within the wave upper bound and the aisle's residual supply covers
//!    every item it demands.
//! 3. An admitted order is bound to that aisle for good: the residual
//!    supply is decremented, the order leaves the pool and the aisle is
//!    selected.
//! 4. Stop as soon as the running total reaches the upper bound.
//!
//! Runs in `O(n_aisles * n_orders * items_per_order)`. The result may miss
//! the wave lower bound; callers check feasibility.

use super::ranking::rank_descending;
use super::types::WaveConstructor;
use crate::wave::{ProblemInstance, Solution, Units};

/// Single-pass, no-backtracking order-to-aisle packing.
///
/// Deterministic: the same instance always yields the same selection.
///
/// # Examples
///
/// ```
/// use u_wavepick::greedy::GreedyConstructor;
/// use u_wavepick::wave::{Aisle, Order, ProblemInstance};
///
/// let instance = ProblemInstance::new(
///     vec![Order::new([(0, 3), (1, 2)]), Order::new([(0, 1)])],
///     vec![Aisle::new([(0, 4), (1, 2)]), Aisle::new([(0, 1)])],
///     2,
///     1,
///     10,
/// );
/// let solution = GreedyConstructor::new().solve(&instance);
/// assert_eq!(solution.aisle_count(), 1);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyConstructor;

impl GreedyConstructor {
    pub fn new() -> Self {
        Self
    }

    /// Packs orders into aisles. Never fails; the selection may be empty
    /// or below the wave lower bound.
    pub fn solve(&self, instance: &ProblemInstance) -> Solution {
        let mut solution = Solution::empty();
        let upper = instance.wave_size_ub;

        let order_sizes: Vec<Units> = instance.orders.iter().map(|o| o.total()).collect();
        let aisle_sizes: Vec<Units> = instance.aisles.iter().map(|a| a.total()).collect();
        let mut pending = rank_descending(&order_sizes);
        let aisle_rank = rank_descending(&aisle_sizes);

        let mut residual: Vec<Units> = vec![0; instance.n_items];
        let mut total: Units = 0;

        for a in aisle_rank {
            let aisle = &instance.aisles[a];
            for (item, units) in aisle.supply.iter() {
                if let Some(slot) = residual.get_mut(item) {
                    *slot = units;
                }
            }

            pending.retain(|&o| {
                if total >= upper {
                    return true;
                }
                let size = order_sizes[o];
                if total + size > upper {
                    return true;
                }
                let order = &instance.orders[o];
                let covered = order
                    .demand
                    .iter()
                    .all(|(item, need)| residual.get(item).is_some_and(|&have| have >= need));
                if !covered {
                    return true;
                }

                for (item, need) in order.demand.iter() {
                    residual[item] -= need;
                }
                total += size;
                solution.orders.insert(o);
                solution.aisles.insert(a);
                false
            });

            // Only this aisle's items can be non-zero.
            for (item, _) in aisle.supply.iter() {
                if let Some(slot) = residual.get_mut(item) {
                    *slot = 0;
                }
            }

            if total >= upper {
                break;
            }
        }

        solution
    }
}

impl WaveConstructor for GreedyConstructor {
    fn name(&self) -> &str {
        "greedy"
    }

    fn construct(&self, instance: &ProblemInstance) -> Option<Solution> {
        Some(self.solve(instance))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wave::{Aisle, GeneratorConfig, Order, SolutionEvaluator};

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
    fn test_example_packs_first_aisle() {
        let instance = example();
        let solution = GreedyConstructor::new().solve(&instance);

        // Both orders fit in aisle 0: {0:3,1:2} + {0:1} <= {0:4,1:2}.
        assert_eq!(solution, Solution::from_indices([0, 1], [0]));
        assert!(SolutionEvaluator::is_feasible(&solution, &instance));
        assert!((SolutionEvaluator::density(&solution, &instance) - 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_order_bound_to_first_covering_aisle() {
        // Aisle 0 (largest) cannot serve the order; aisle 1 can.
        let instance = ProblemInstance::new(
            vec![Order::new([(1, 9)])],
            vec![Aisle::new([(0, 10)]), Aisle::new([(1, 9)])],
            2,
            1,
            9,
        );
        let solution = GreedyConstructor::new().solve(&instance);
        assert_eq!(solution, Solution::from_indices([0], [1]));
    }

    #[test]
    fn test_upper_bound_respected() {
        let instance = ProblemInstance::new(
            vec![
                Order::new([(0, 4)]),
                Order::new([(0, 4)]),
                Order::new([(0, 2)]),
            ],
            vec![Aisle::new([(0, 20)])],
            1,
            1,
            6,
        );
        let solution = GreedyConstructor::new().solve(&instance);
        assert_eq!(solution, Solution::from_indices([0, 2], [0]));
        assert_eq!(SolutionEvaluator::total_units(&solution, &instance), 6);
    }

    #[test]
    fn test_all_orders_too_large() {
        let instance = ProblemInstance::new(
            vec![Order::new([(0, 8)]), Order::new([(0, 9)])],
            vec![Aisle::new([(0, 20)])],
            1,
            1,
            5,
        );
        let solution = GreedyConstructor::new().solve(&instance);
        assert!(solution.is_empty());
        assert!(!SolutionEvaluator::is_feasible(&solution, &instance));
    }

    #[test]
    fn test_no_aisles() {
        let instance = ProblemInstance::new(vec![Order::new([(0, 1)])], vec![], 1, 0, 5);
        assert!(GreedyConstructor::new().solve(&instance).is_empty());
    }

    #[test]
    fn test_deterministic() {
        let instance = GeneratorConfig::default().with_seed(3).generate();
        let first = GreedyConstructor::new().solve(&instance);
        for _ in 0..5 {
            assert_eq!(GreedyConstructor::new().solve(&instance), first);
        }
    }

    #[test]
    fn test_never_exceeds_upper_bound_or_supply() {
        for seed in 0..20 {
            let instance = GeneratorConfig::default().with_seed(seed).generate();
            let solution = GreedyConstructor::new().solve(&instance);
            assert!(SolutionEvaluator::total_units(&solution, &instance) <= instance.wave_size_ub);
            if !solution.is_empty() {
                // Single-aisle attribution never overdraws supply, so only
                // the lower bound can be violated.
                match SolutionEvaluator::check(&solution, &instance) {
                    Ok(()) => {}
                    Err(crate::wave::Violation::BelowWaveLowerBound { .. }) => {}
                    Err(other) => panic!("seed {seed}: unexpected violation {other}"),
                }
            }
        }
    }
}
