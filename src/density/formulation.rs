//! Linear sub-problems handed to the oracle.
//!
//! Both formulations share the selection core: a binary `y_o` per order, a
//! binary `x_a` per aisle, and the feasibility constraints
//!
//! ```text
//! LB ≤ Σ d_o·y_o ≤ UB
//! Σ_o d_oi·y_o ≤ Σ_a s_ai·x_a      for every demanded item i
//! Σ y_o ≥ 1,  Σ x_a ≥ 1
//! ```
//!
//! [`ParametricFormulation`] keeps those constraints and re-weights the
//! objective `Σ d_o·y_o − q·Σ x_a` between calls. [`CharnesCooperFormulation`]
//! adds the scaling variable `t` with `z_o = y_o·t`, `w_a = x_a·t` enforced by
//! McCormick envelopes, scales the wave and item constraints by `t`, and
//! normalizes `Σ w_a = 1`, so that `Σ d_o·z_o` equals the density.

use crate::oracle::{LinearModel, Objective, Relation, VarId, Variable};
use crate::wave::{ProblemInstance, Solution};

/// A sub-problem the controller can send to an oracle.
pub trait Formulation {
    /// The model to solve.
    fn model(&self) -> &LinearModel;

    /// Assignment encoding `solution`, indexed like the model's variables.
    fn warm_start(&self, solution: &Solution) -> Vec<f64>;

    /// Selection read back from an assignment (`value > 0.5` is selected).
    fn decode(&self, values: &[f64]) -> Solution;
}

/// The binary selection variables and their feasibility constraints.
#[derive(Debug, Clone)]
struct Selection {
    model: LinearModel,
    orders: Vec<VarId>,
    aisles: Vec<VarId>,
    /// Order totals as coefficients.
    demand: Vec<f64>,
}

impl Selection {
    fn new(name: &str, instance: &ProblemInstance) -> Self {
        let mut model = LinearModel::new(name);
        let orders: Vec<VarId> = (0..instance.order_count())
            .map(|o| model.add_variable(Variable::binary(format!("y_{o}"))))
            .collect();
        let aisles: Vec<VarId> = (0..instance.aisle_count())
            .map(|a| model.add_variable(Variable::binary(format!("x_{a}"))))
            .collect();
        let demand = instance.orders.iter().map(|o| o.total() as f64).collect();

        model.add_constraint(
            "min_one_order",
            orders.iter().map(|&y| (y, 1.0)).collect(),
            Relation::GreaterEq,
            1.0,
        );
        model.add_constraint(
            "min_one_aisle",
            aisles.iter().map(|&x| (x, 1.0)).collect(),
            Relation::GreaterEq,
            1.0,
        );

        Self {
            model,
            orders,
            aisles,
            demand,
        }
    }

    /// Adds the wave and item constraints over `order_vars` and
    /// `aisle_vars`, with the wave bounds multiplied by `scale`
    /// (`None` keeps them constant).
    fn add_feasibility(
        &mut self,
        instance: &ProblemInstance,
        order_vars: &[VarId],
        aisle_vars: &[VarId],
        scale: Option<VarId>,
    ) {
        let wave: Vec<(VarId, f64)> = order_vars
            .iter()
            .zip(&self.demand)
            .map(|(&v, &d)| (v, d))
            .collect();
        let bound = |mut terms: Vec<(VarId, f64)>, units: u64| match scale {
            Some(t) => {
                terms.push((t, -(units as f64)));
                (terms, 0.0)
            }
            None => (terms, units as f64),
        };
        let (terms, rhs) = bound(wave.clone(), instance.wave_size_lb);
        self.model
            .add_constraint("wave_lb", terms, Relation::GreaterEq, rhs);
        let (terms, rhs) = bound(wave, instance.wave_size_ub);
        self.model
            .add_constraint("wave_ub", terms, Relation::LessEq, rhs);

        let mut item_terms: Vec<Vec<(VarId, f64)>> = vec![Vec::new(); instance.n_items];
        for (o, order) in instance.orders.iter().enumerate() {
            for (item, units) in order.demand.iter() {
                item_terms[item].push((order_vars[o], units as f64));
            }
        }
        for item in instance.demanded_items() {
            let terms = &mut item_terms[item];
            for (a, aisle) in instance.aisles.iter().enumerate() {
                let units = aisle.supply.get(item);
                if units > 0 {
                    terms.push((aisle_vars[a], -(units as f64)));
                }
            }
            self.model.add_constraint(
                format!("item_{item}"),
                std::mem::take(terms),
                Relation::LessEq,
                0.0,
            );
        }
    }

    fn encode(&self, solution: &Solution, values: &mut [f64]) {
        for &o in &solution.orders {
            if let Some(y) = self.orders.get(o) {
                values[y.index()] = 1.0;
            }
        }
        for &a in &solution.aisles {
            if let Some(x) = self.aisles.get(a) {
                values[x.index()] = 1.0;
            }
        }
    }

    fn decode(&self, values: &[f64]) -> Solution {
        let selected = |vars: &[VarId]| -> Vec<usize> {
            vars.iter()
                .enumerate()
                .filter(|(_, v)| values.get(v.index()).is_some_and(|&x| x > 0.5))
                .map(|(i, _)| i)
                .collect()
        };
        Solution::from_indices(selected(&self.orders), selected(&self.aisles))
    }
}

/// Dinkelbach surrogate: feasibility constraints with objective
/// `Σ d_o·y_o − q·Σ x_a`.
///
/// The model is built once; [`set_ratio`](Self::set_ratio) only swaps the
/// objective.
#[derive(Debug, Clone)]
pub struct ParametricFormulation {
    selection: Selection,
    ratio: f64,
}

impl ParametricFormulation {
    /// Builds the model with `q = 0`.
    pub fn new(instance: &ProblemInstance) -> Self {
        let mut selection = Selection::new("dinkelbach", instance);
        let orders = selection.orders.clone();
        let aisles = selection.aisles.clone();
        selection.add_feasibility(instance, &orders, &aisles, None);

        let mut formulation = Self {
            selection,
            ratio: 0.0,
        };
        formulation.set_ratio(0.0);
        formulation
    }

    /// Current `q`.
    pub fn ratio(&self) -> f64 {
        self.ratio
    }

    /// Re-weights the objective for parameter `q`.
    pub fn set_ratio(&mut self, q: f64) {
        self.ratio = q;
        let s = &mut self.selection;
        let terms = s
            .orders
            .iter()
            .zip(&s.demand)
            .map(|(&y, &d)| (y, d))
            .chain(s.aisles.iter().map(|&x| (x, -q)))
            .collect();
        s.model.set_objective(Objective::maximize(terms));
    }
}

impl Formulation for ParametricFormulation {
    fn model(&self) -> &LinearModel {
        &self.selection.model
    }

    fn warm_start(&self, solution: &Solution) -> Vec<f64> {
        let mut values = vec![0.0; self.selection.model.variable_count()];
        self.selection.encode(solution, &mut values);
        values
    }

    fn decode(&self, values: &[f64]) -> Solution {
        self.selection.decode(values)
    }
}

/// Charnes–Cooper linearization: maximizes `Σ d_o·z_o` where `z_o = y_o·t`,
/// `w_a = x_a·t` and `Σ w_a = 1`, so `t = 1/|aisles|` at any feasible point.
#[derive(Debug, Clone)]
pub struct CharnesCooperFormulation {
    selection: Selection,
    scale: VarId,
    scaled_orders: Vec<VarId>,
    scaled_aisles: Vec<VarId>,
}

impl CharnesCooperFormulation {
    /// Builds the model; `tolerance` is the slack on `Σ w_a = 1`.
    pub fn new(instance: &ProblemInstance, tolerance: f64) -> Self {
        let mut selection = Selection::new("charnes_cooper", instance);
        let model = &mut selection.model;

        let scale = model.add_variable(Variable::continuous("t", 0.0, 1.0));
        let scaled_orders: Vec<VarId> = (0..instance.order_count())
            .map(|o| model.add_variable(Variable::continuous(format!("z_{o}"), 0.0, 1.0)))
            .collect();
        let scaled_aisles: Vec<VarId> = (0..instance.aisle_count())
            .map(|a| model.add_variable(Variable::continuous(format!("w_{a}"), 0.0, 1.0)))
            .collect();

        let pairs = selection
            .orders
            .iter()
            .zip(&scaled_orders)
            .chain(selection.aisles.iter().zip(&scaled_aisles));
        for (&binary, &product) in pairs {
            let name = &model.variables[product.index()].name;
            let (le_t, le_bin, ge) = (
                format!("{name}_le_t"),
                format!("{name}_le_bin"),
                format!("{name}_ge"),
            );
            // product ≤ t, product ≤ binary, product ≥ t − (1 − binary)
            model.add_constraint(le_t, vec![(product, 1.0), (scale, -1.0)], Relation::LessEq, 0.0);
            model.add_constraint(
                le_bin,
                vec![(product, 1.0), (binary, -1.0)],
                Relation::LessEq,
                0.0,
            );
            model.add_constraint(
                ge,
                vec![(product, 1.0), (scale, -1.0), (binary, -1.0)],
                Relation::GreaterEq,
                -1.0,
            );
        }

        let norm: Vec<(VarId, f64)> = scaled_aisles.iter().map(|&w| (w, 1.0)).collect();
        model.add_constraint(
            "normalize_lb",
            norm.clone(),
            Relation::GreaterEq,
            1.0 - tolerance,
        );
        model.add_constraint("normalize_ub", norm, Relation::LessEq, 1.0 + tolerance);

        selection.add_feasibility(instance, &scaled_orders, &scaled_aisles, Some(scale));

        let objective = scaled_orders
            .iter()
            .zip(&selection.demand)
            .map(|(&z, &d)| (z, d))
            .collect();
        selection.model.set_objective(Objective::maximize(objective));

        Self {
            selection,
            scale,
            scaled_orders,
            scaled_aisles,
        }
    }

    /// The scaling variable `t`.
    pub fn scale(&self) -> VarId {
        self.scale
    }
}

impl Formulation for CharnesCooperFormulation {
    fn model(&self) -> &LinearModel {
        &self.selection.model
    }

    fn warm_start(&self, solution: &Solution) -> Vec<f64> {
        let mut values = vec![0.0; self.selection.model.variable_count()];
        self.selection.encode(solution, &mut values);

        let aisles = solution
            .aisles
            .iter()
            .filter(|&&a| a < self.scaled_aisles.len())
            .count();
        let t = if aisles == 0 { 0.0 } else { 1.0 / aisles as f64 };
        values[self.scale.index()] = t;
        for (binary, product) in self
            .selection
            .orders
            .iter()
            .zip(&self.scaled_orders)
            .chain(self.selection.aisles.iter().zip(&self.scaled_aisles))
        {
            values[product.index()] = values[binary.index()] * t;
        }
        values
    }

    fn decode(&self, values: &[f64]) -> Solution {
        self.selection.decode(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wave::{Aisle, Order, SolutionEvaluator};

    fn example() -> ProblemInstance {
        ProblemInstance::new(
            vec![Order::new([(0, 3), (1, 2)]), Order::new([(0, 1)])],
            vec![Aisle::new([(0, 4), (1, 2)]), Aisle::new([(0, 1)])],
            2,
            1,
            10,
        )
    }

    fn all_selections(n_orders: usize, n_aisles: usize) -> Vec<Solution> {
        let mut out = Vec::new();
        for om in 0..(1usize << n_orders) {
            for am in 0..(1usize << n_aisles) {
                out.push(Solution::from_indices(
                    (0..n_orders).filter(|o| (om >> o) & 1 == 1),
                    (0..n_aisles).filter(|a| (am >> a) & 1 == 1),
                ));
            }
        }
        out
    }

    #[test]
    fn test_parametric_shape() {
        let f = ParametricFormulation::new(&example());
        // 2 selection + 2 wave + 2 items
        assert_eq!(f.model().variable_count(), 4);
        assert_eq!(f.model().constraint_count(), 6);
        assert!(f.model().is_pure_binary());
        assert!(f.model().validate().is_ok());
    }

    #[test]
    fn test_set_ratio_rewrites_objective() {
        let mut f = ParametricFormulation::new(&example());
        let values = f.warm_start(&Solution::from_indices([0, 1], [0, 1]));
        assert_eq!(f.model().objective_value(&values), 6.0);

        f.set_ratio(2.5);
        assert_eq!(f.ratio(), 2.5);
        assert_eq!(f.model().objective_value(&values), 6.0 - 5.0);
    }

    #[test]
    fn test_parametric_encodes_feasibility() {
        let instance = example();
        let f = ParametricFormulation::new(&instance);
        for solution in all_selections(2, 2) {
            let values = f.warm_start(&solution);
            assert_eq!(
                f.model().is_satisfied_by(&values, 1e-9),
                SolutionEvaluator::is_feasible(&solution, &instance),
                "{solution:?}"
            );
            assert_eq!(f.decode(&values), solution);
        }
    }

    #[test]
    fn test_charnes_cooper_shape() {
        let f = CharnesCooperFormulation::new(&example(), 1e-6);
        // 4 binaries + t + 4 products
        assert_eq!(f.model().variable_count(), 9);
        // 2 selection + 12 McCormick + 2 normalization + 2 wave + 2 items
        assert_eq!(f.model().constraint_count(), 20);
        assert!(!f.model().is_pure_binary());
        assert!(f.model().validate().is_ok());
    }

    #[test]
    fn test_charnes_cooper_warm_start() {
        let instance = example();
        let f = CharnesCooperFormulation::new(&instance, 1e-6);
        let solution = Solution::from_indices([0, 1], [0]);
        let values = f.warm_start(&solution);

        assert!(f.model().is_satisfied_by(&values, 1e-9));
        assert_eq!(values[f.scale().index()], 1.0);
        assert!((f.model().objective_value(&values) - 6.0).abs() < 1e-12);
        assert_eq!(f.decode(&values), solution);
    }

    #[test]
    fn test_charnes_cooper_encodes_feasibility() {
        let instance = example();
        let f = CharnesCooperFormulation::new(&instance, 1e-6);
        for solution in all_selections(2, 2) {
            let values = f.warm_start(&solution);
            let feasible = SolutionEvaluator::is_feasible(&solution, &instance);
            assert_eq!(
                f.model().is_satisfied_by(&values, 1e-9),
                feasible,
                "{solution:?}"
            );
            if feasible {
                let density = SolutionEvaluator::density(&solution, &instance);
                assert!((f.model().objective_value(&values) - density).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_unsupplied_item_blocks_orders() {
        let instance = ProblemInstance::new(
            vec![Order::new([(1, 2)])],
            vec![Aisle::new([(0, 5)])],
            2,
            0,
            10,
        );
        let f = ParametricFormulation::new(&instance);
        let values = f.warm_start(&Solution::from_indices([0], [0]));
        assert!(!f.model().is_satisfied_by(&values, 1e-9));
    }
}
