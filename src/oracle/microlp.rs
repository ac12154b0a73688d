//! MILP oracle backed by `good_lp` with the pure-Rust `microlp` solver.
//!
//! Translates a [`LinearModel`] variable by variable and constraint by
//! constraint; binaries map to `good_lp` binaries and continuous variables
//! keep their bounds.
//!
//! # Time limits
//!
//! The backend cannot be interrupted, so the time limit is only checked
//! before the solve starts and a started solve may overrun it. With no
//! budget left the oracle returns the warm start (if it satisfies the model)
//! as a [`OracleStatus::Feasible`] incumbent; otherwise the warm start is
//! unused.

use std::time::Instant;

use good_lp::{
    constraint, default_solver, variable, Expression, ProblemVariables, ResolutionError,
    Solution as _, SolverModel, Variable as LpVariable,
};

use super::model::{LinearModel, Relation, Sense};
use super::solver::{Oracle, OracleConfig, OracleSolution, OracleStatus};
use super::variables::{Domain, VarId};

/// Exact MILP oracle using `good_lp` + `microlp`.
///
/// # Examples
///
/// ```
/// use u_wavepick::oracle::{
///     LinearModel, MicroLpOracle, Objective, Oracle, OracleConfig, OracleStatus, Relation,
///     Variable,
/// };
///
/// let mut model = LinearModel::new("knapsack");
/// let a = model.add_variable(Variable::binary("a"));
/// let b = model.add_variable(Variable::binary("b"));
/// model.add_constraint("cap", vec![(a, 3.0), (b, 4.0)], Relation::LessEq, 5.0);
/// model.set_objective(Objective::maximize(vec![(a, 4.0), (b, 5.0)]));
///
/// let solution = MicroLpOracle::new().solve(&model, &OracleConfig::default());
/// assert_eq!(solution.status, OracleStatus::Optimal);
/// assert!(solution.values[1] > 0.5);
/// ```
#[derive(Debug, Clone)]
pub struct MicroLpOracle {
    /// Tolerance used when checking a warm start against the model.
    pub tolerance: f64,
}

impl MicroLpOracle {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Default for MicroLpOracle {
    fn default() -> Self {
        Self { tolerance: 1e-6 }
    }
}

fn expression(lp_vars: &[LpVariable], terms: &[(VarId, f64)]) -> Expression {
    terms
        .iter()
        .fold(Expression::from(0.0), |acc, &(var, coef)| {
            acc + coef * lp_vars[var.index()]
        })
}

impl Oracle for MicroLpOracle {
    fn solve(&self, model: &LinearModel, config: &OracleConfig) -> OracleSolution {
        if let Err(e) = model.validate() {
            log::warn!("microlp oracle: invalid model {}: {e}", model.name);
            return OracleSolution::empty(OracleStatus::ModelInvalid);
        }

        if config.time_limit.is_zero() {
            return match &config.warm_start {
                Some(values) if model.is_satisfied_by(values, self.tolerance) => {
                    OracleSolution::found(
                        OracleStatus::Feasible,
                        values.clone(),
                        model.objective_value(values),
                    )
                }
                _ => OracleSolution::empty(OracleStatus::Timeout),
            };
        }

        let start = Instant::now();

        let mut vars = ProblemVariables::new();
        let lp_vars: Vec<LpVariable> = model
            .variables
            .iter()
            .map(|v| match v.domain {
                Domain::Binary => vars.add(variable().binary().name(v.name.clone())),
                Domain::Continuous { lower, upper } => {
                    vars.add(variable().min(lower).max(upper).name(v.name.clone()))
                }
            })
            .collect();

        let (sense, terms) = match &model.objective {
            Some(objective) => (objective.sense, objective.terms.as_slice()),
            None => (Sense::Maximize, &[][..]),
        };
        let objective = expression(&lp_vars, terms);
        let unsolved = match sense {
            Sense::Maximize => vars.maximise(objective),
            Sense::Minimize => vars.minimise(objective),
        };
        let mut problem = unsolved.using(default_solver);

        for c in &model.constraints {
            let lhs = expression(&lp_vars, &c.terms);
            let rhs = c.rhs;
            let lp_constraint = match c.relation {
                Relation::LessEq => constraint!(lhs <= rhs),
                Relation::GreaterEq => constraint!(lhs >= rhs),
                Relation::Equal => constraint!(lhs == rhs),
            };
            problem.add_constraint(lp_constraint);
        }

        let outcome = match problem.solve() {
            Ok(solution) => {
                let values: Vec<f64> = lp_vars.iter().map(|&v| solution.value(v)).collect();
                let value = model.objective_value(&values);
                OracleSolution::found(OracleStatus::Optimal, values, value)
            }
            Err(ResolutionError::Infeasible) => OracleSolution::empty(OracleStatus::Infeasible),
            Err(e) => {
                log::warn!("microlp oracle: model {} not solved: {e}", model.name);
                OracleSolution::empty(OracleStatus::Unknown)
            }
        };
        outcome.with_solve_time(start.elapsed())
    }
}
