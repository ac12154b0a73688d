//! Exhaustive oracle for small pure-binary models.

use std::time::Instant;

use super::model::{LinearModel, Objective};
use super::solver::{Oracle, OracleConfig, OracleSolution, OracleStatus};

/// Exact oracle that enumerates every 0/1 assignment.
///
/// Suitable for small models (a few dozen binaries at most) such as unit
/// tests and tiny instances. Models with continuous variables, or more
/// binaries than `max_variables`, are reported as [`OracleStatus::Unknown`].
///
/// A feasible warm start seeds the incumbent, so a call interrupted by its
/// time limit still reports [`OracleStatus::Feasible`].
///
/// # Examples
///
/// ```
/// use u_wavepick::oracle::{
///     EnumerationOracle, LinearModel, Objective, Oracle, OracleConfig, OracleStatus, Relation,
///     Variable,
/// };
///
/// let mut model = LinearModel::new("knapsack");
/// let a = model.add_variable(Variable::binary("a"));
/// let b = model.add_variable(Variable::binary("b"));
/// model.add_constraint("cap", vec![(a, 3.0), (b, 4.0)], Relation::LessEq, 5.0);
/// model.set_objective(Objective::maximize(vec![(a, 4.0), (b, 5.0)]));
///
/// let solution = EnumerationOracle::new().solve(&model, &OracleConfig::default());
/// assert_eq!(solution.status, OracleStatus::Optimal);
/// assert_eq!(solution.values, vec![0.0, 1.0]);
/// ```
#[derive(Debug, Clone)]
pub struct EnumerationOracle {
    /// Largest number of binaries enumerated.
    pub max_variables: usize,
    /// Feasibility tolerance.
    pub tolerance: f64,
}

/// Assignments between two deadline checks.
const CHECK_INTERVAL: u64 = 1024;

impl EnumerationOracle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_variables(mut self, n: usize) -> Self {
        self.max_variables = n;
        self
    }

    fn rounded_warm_start(&self, model: &LinearModel, config: &OracleConfig) -> Option<Vec<f64>> {
        let warm = config.warm_start.as_ref()?;
        let rounded: Vec<f64> = warm
            .iter()
            .map(|&v| if v > 0.5 { 1.0 } else { 0.0 })
            .collect();
        model
            .is_satisfied_by(&rounded, self.tolerance)
            .then_some(rounded)
    }
}

impl Default for EnumerationOracle {
    fn default() -> Self {
        Self {
            max_variables: 24,
            tolerance: 1e-9,
        }
    }
}

impl Oracle for EnumerationOracle {
    fn solve(&self, model: &LinearModel, config: &OracleConfig) -> OracleSolution {
        if let Err(e) = model.validate() {
            log::warn!("enumeration oracle: invalid model {}: {e}", model.name);
            return OracleSolution::empty(OracleStatus::ModelInvalid);
        }
        let n = model.variable_count();
        if !model.is_pure_binary() || n > self.max_variables || n >= 64 {
            log::warn!(
                "enumeration oracle: model {} unsupported ({n} variables, pure binary: {})",
                model.name,
                model.is_pure_binary()
            );
            return OracleSolution::empty(OracleStatus::Unknown);
        }

        let start = Instant::now();
        // without an objective any feasible assignment is optimal
        let objective = model
            .objective
            .clone()
            .unwrap_or_else(|| Objective::maximize(Vec::new()));

        let mut best: Option<(Vec<f64>, f64)> = self
            .rounded_warm_start(model, config)
            .map(|values| {
                let value = model.objective_value(&values);
                (values, value)
            });

        let mut values = vec![0.0; n];
        for mask in 0..(1u64 << n) {
            if mask % CHECK_INTERVAL == 0 && start.elapsed() >= config.time_limit {
                let elapsed = start.elapsed();
                return match best {
                    Some((values, value)) => {
                        OracleSolution::found(OracleStatus::Feasible, values, value)
                    }
                    None => OracleSolution::empty(OracleStatus::Timeout),
                }
                .with_solve_time(elapsed);
            }

            for (bit, slot) in values.iter_mut().enumerate() {
                *slot = if (mask >> bit) & 1 == 1 { 1.0 } else { 0.0 };
            }
            if !model
                .constraints
                .iter()
                .all(|c| c.is_satisfied_by(&values, self.tolerance))
            {
                continue;
            }
            let value = model.objective_value(&values);
            if best.as_ref().is_none_or(|(_, b)| objective.improves(value, *b)) {
                best = Some((values.clone(), value));
            }
        }

        let elapsed = start.elapsed();
        match best {
            Some((values, value)) => OracleSolution::found(OracleStatus::Optimal, values, value),
            None => OracleSolution::empty(OracleStatus::Infeasible),
        }
        .with_solve_time(elapsed)
    }
}
