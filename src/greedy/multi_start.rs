//! Multi-start greedy packing over aisle-set sizes.
//!
//! # Algorithm
//!
//! For every candidate size `v` (largest first):
//!
//! 1. Select the `v` aisles with the largest total supply and pool their
//!    supply into one availability vector.
//! 2. Sweep orders by descending demand, admitting an order when every
//!    item it demands fits the remaining availability and the running
//!    total stays within the wave upper bound.
//! 3. Keep the sweep as a candidate when it selected at least one order
//!    and reached the wave lower bound.
//!
//! The best candidate maximizes `total / v`. Ties prefer more orders, then
//! fewer aisles. The comparison is exact, so the choice does not depend on
//! the order in which sizes are evaluated.

use std::cmp::Ordering;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::config::MultiStartConfig;
use super::ranking::rank_descending;
use super::types::WaveConstructor;
use crate::wave::{compare_density, ProblemInstance, Solution, Units};

/// A feasible sweep for one aisle-set size.
#[derive(Debug, Clone)]
struct Candidate {
    size: usize,
    orders: Vec<usize>,
    total: Units,
}

impl Candidate {
    /// Whether `self` should replace `other` as the best candidate.
    fn beats(&self, other: &Candidate) -> bool {
        match compare_density(self.total, self.size, other.total, other.size) {
            Ordering::Greater => true,
            Ordering::Less => false,
            Ordering::Equal => match self.orders.len().cmp(&other.orders.len()) {
                Ordering::Greater => true,
                Ordering::Less => false,
                Ordering::Equal => self.size < other.size,
            },
        }
    }
}

/// Rankings computed once per solve.
struct Sweep<'a> {
    instance: &'a ProblemInstance,
    order_sizes: Vec<Units>,
    order_rank: Vec<usize>,
    aisle_rank: Vec<usize>,
}

impl<'a> Sweep<'a> {
    fn new(instance: &'a ProblemInstance) -> Self {
        let order_sizes: Vec<Units> = instance.orders.iter().map(|o| o.total()).collect();
        let aisle_sizes: Vec<Units> = instance.aisles.iter().map(|a| a.total()).collect();
        Self {
            instance,
            order_rank: rank_descending(&order_sizes),
            aisle_rank: rank_descending(&aisle_sizes),
            order_sizes,
        }
    }

    fn run(&self, size: usize) -> Option<Candidate> {
        let instance = self.instance;
        let mut available: Vec<Units> = vec![0; instance.n_items];
        for &a in &self.aisle_rank[..size] {
            for (item, units) in instance.aisles[a].supply.iter() {
                if let Some(slot) = available.get_mut(item) {
                    *slot += units;
                }
            }
        }

        let mut orders = Vec::new();
        let mut total: Units = 0;
        for &o in &self.order_rank {
            let order = &instance.orders[o];
            let fits = order
                .demand
                .iter()
                .all(|(item, need)| available.get(item).is_some_and(|&have| have >= need));
            if !fits {
                continue;
            }
            let units = self.order_sizes[o];
            if total + units > instance.wave_size_ub {
                continue;
            }
            for (item, need) in order.demand.iter() {
                available[item] -= need;
            }
            orders.push(o);
            total += units;
        }

        if orders.is_empty() || total < instance.wave_size_lb {
            return None;
        }
        Some(Candidate {
            size,
            orders,
            total,
        })
    }

    fn into_solution(self, best: Candidate) -> Solution {
        Solution::from_indices(best.orders, self.aisle_rank[..best.size].iter().copied())
    }
}

/// Greedy packing restarted for every aisle-set size; keeps the densest.
///
/// Slower than [`GreedyConstructor`](super::GreedyConstructor) by a factor of
/// `n_aisles`, and not bound to single-aisle attribution.
///
/// # Examples
///
/// ```
/// use u_wavepick::greedy::MultiStartGreedyConstructor;
/// use u_wavepick::wave::{Aisle, Order, ProblemInstance, SolutionEvaluator};
///
/// let instance = ProblemInstance::new(
///     vec![Order::new([(0, 3), (1, 2)]), Order::new([(0, 1)])],
///     vec![Aisle::new([(0, 4), (1, 2)]), Aisle::new([(0, 1)])],
///     2,
///     1,
///     10,
/// );
/// let solution = MultiStartGreedyConstructor::new().solve(&instance).unwrap();
/// assert_eq!(SolutionEvaluator::density(&solution, &instance), 6.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MultiStartGreedyConstructor {
    config: MultiStartConfig,
}

impl MultiStartGreedyConstructor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: MultiStartConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MultiStartConfig {
        &self.config
    }

    /// Returns the densest feasible sweep, or `None` if no size reaches the
    /// wave lower bound.
    ///
    /// # Panics
    ///
    /// Panics if the configuration is invalid.
    pub fn solve(&self, instance: &ProblemInstance) -> Option<Solution> {
        self.config.validate().expect("invalid MultiStartConfig");

        let sweep = Sweep::new(instance);
        let sizes = self.config.sizes(instance.aisle_count());
        let candidates = collect_candidates(&sweep, &sizes, self.config.parallel);

        let best = candidates.into_iter().fold(None::<Candidate>, |best, c| match best {
            Some(b) if !c.beats(&b) => Some(b),
            _ => Some(c),
        })?;

        Some(sweep.into_solution(best))
    }
}

#[cfg(feature = "parallel")]
fn collect_candidates(sweep: &Sweep<'_>, sizes: &[usize], parallel: bool) -> Vec<Candidate> {
    if parallel {
        sizes.par_iter().filter_map(|&v| sweep.run(v)).collect()
    } else {
        sizes.iter().filter_map(|&v| sweep.run(v)).collect()
    }
}

#[cfg(not(feature = "parallel"))]
fn collect_candidates(sweep: &Sweep<'_>, sizes: &[usize], _parallel: bool) -> Vec<Candidate> {
    sizes.iter().filter_map(|&v| sweep.run(v)).collect()
}

impl WaveConstructor for MultiStartGreedyConstructor {
    fn name(&self) -> &str {
        "multi-start greedy"
    }

    fn construct(&self, instance: &ProblemInstance) -> Option<Solution> {
        self.solve(instance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::greedy::GreedyConstructor;
    use crate::wave::{Aisle, GeneratorConfig, Order, SolutionEvaluator};
    use proptest::prelude::*;

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
    fn test_example_prefers_single_aisle() {
        let instance = example();
        let solution = MultiStartGreedyConstructor::new().solve(&instance).unwrap();
        assert_eq!(solution, Solution::from_indices([0, 1], [0]));
    }

    #[test]
    fn test_at_least_as_dense_as_single_pass_on_example() {
        let instance = example();
        let single = GreedyConstructor::new().solve(&instance);
        let multi = MultiStartGreedyConstructor::new().solve(&instance).unwrap();
        assert!(
            SolutionEvaluator::density(&multi, &instance)
                >= SolutionEvaluator::density(&single, &instance)
        );
    }

    #[test]
    fn test_pooled_supply_serves_split_order() {
        // No single aisle holds the whole order, two aisles together do.
        let instance = ProblemInstance::new(
            vec![Order::new([(0, 2), (1, 2)])],
            vec![Aisle::new([(0, 2)]), Aisle::new([(1, 2)])],
            2,
            1,
            10,
        );
        assert!(GreedyConstructor::new().solve(&instance).is_empty());

        let solution = MultiStartGreedyConstructor::new().solve(&instance).unwrap();
        assert_eq!(solution, Solution::from_indices([0], [0, 1]));
        assert!(SolutionEvaluator::is_feasible(&solution, &instance));
    }

    #[test]
    fn test_none_when_lower_bound_unreachable() {
        let instance = ProblemInstance::new(
            vec![Order::new([(0, 2)])],
            vec![Aisle::new([(0, 5)])],
            1,
            3,
            10,
        );
        assert!(MultiStartGreedyConstructor::new().solve(&instance).is_none());
    }

    #[test]
    fn test_none_without_aisles() {
        let instance = ProblemInstance::new(vec![Order::new([(0, 2)])], vec![], 1, 0, 10);
        assert!(MultiStartGreedyConstructor::new().solve(&instance).is_none());
    }

    #[test]
    fn test_tie_prefers_more_orders_then_fewer_aisles() {
        let a = Candidate {
            size: 2,
            orders: vec![0, 1],
            total: 8,
        };
        let b = Candidate {
            size: 1,
            orders: vec![2],
            total: 4,
        };
        assert!(a.beats(&b));
        assert!(!b.beats(&a));

        let c = Candidate {
            size: 1,
            orders: vec![0, 1],
            total: 4,
        };
        assert!(c.beats(&a));
        assert!(!a.beats(&c));
    }

    #[test]
    fn test_size_window() {
        let instance = GeneratorConfig::default().with_seed(5).generate();
        let config = MultiStartConfig::default().with_max_aisles(2);
        if let Some(solution) = MultiStartGreedyConstructor::with_config(config).solve(&instance) {
            assert!(solution.aisle_count() <= 2);
        }
    }

    #[test]
    fn test_parallel_flag_same_result() {
        for seed in 0..10 {
            let instance = GeneratorConfig::default().with_seed(seed).generate();
            let sequential = MultiStartGreedyConstructor::new().solve(&instance);
            let parallel = MultiStartGreedyConstructor::with_config(
                MultiStartConfig::default().with_parallel(true),
            )
            .solve(&instance);
            assert_eq!(sequential, parallel, "seed {seed}");
        }
    }

    proptest! {
        #[test]
        fn prop_result_is_feasible(seed in 0u64..500, orders in 1usize..25, aisles in 1usize..10) {
            let instance = GeneratorConfig::default()
                .with_orders(orders)
                .with_aisles(aisles)
                .with_seed(seed)
                .generate();
            if let Some(solution) = MultiStartGreedyConstructor::new().solve(&instance) {
                prop_assert!(SolutionEvaluator::is_feasible(&solution, &instance));
                let total = SolutionEvaluator::total_units(&solution, &instance);
                prop_assert!(total >= instance.wave_size_lb && total <= instance.wave_size_ub);
            }
        }
    }
}
