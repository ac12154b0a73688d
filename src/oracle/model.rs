//! Linear model definition.

use super::variables::{Domain, VarId, Variable};

/// Relation between a linear expression and its right-hand side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    /// `expr <= rhs`
    LessEq,
    /// `expr >= rhs`
    GreaterEq,
    /// `expr == rhs`
    Equal,
}

/// A linear constraint `Σ coef·var (relation) rhs`.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearConstraint {
    /// Constraint name (diagnostics only).
    pub name: String,
    /// (variable, coefficient) pairs.
    pub terms: Vec<(VarId, f64)>,
    pub relation: Relation,
    pub rhs: f64,
}

impl LinearConstraint {
    /// Left-hand side value under `values`.
    pub fn lhs(&self, values: &[f64]) -> f64 {
        self.terms
            .iter()
            .map(|&(var, coef)| coef * values.get(var.index()).copied().unwrap_or(0.0))
            .sum()
    }

    /// Whether `values` satisfy the constraint within `tolerance`.
    pub fn is_satisfied_by(&self, values: &[f64], tolerance: f64) -> bool {
        let lhs = self.lhs(values);
        match self.relation {
            Relation::LessEq => lhs <= self.rhs + tolerance,
            Relation::GreaterEq => lhs >= self.rhs - tolerance,
            Relation::Equal => (lhs - self.rhs).abs() <= tolerance,
        }
    }
}

/// Optimization direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sense {
    Maximize,
    Minimize,
}

/// A linear objective `Σ coef·var`.
#[derive(Debug, Clone, PartialEq)]
pub struct Objective {
    pub sense: Sense,
    /// (variable, coefficient) pairs.
    pub terms: Vec<(VarId, f64)>,
}

impl Objective {
    pub fn maximize(terms: Vec<(VarId, f64)>) -> Self {
        Self {
            sense: Sense::Maximize,
            terms,
        }
    }

    pub fn minimize(terms: Vec<(VarId, f64)>) -> Self {
        Self {
            sense: Sense::Minimize,
            terms,
        }
    }

    /// Objective value under `values`.
    pub fn value(&self, values: &[f64]) -> f64 {
        self.terms
            .iter()
            .map(|&(var, coef)| coef * values.get(var.index()).copied().unwrap_or(0.0))
            .sum()
    }

    /// Whether objective value `a` is strictly better than `b`.
    pub fn improves(&self, a: f64, b: f64) -> bool {
        match self.sense {
            Sense::Maximize => a > b,
            Sense::Minimize => a < b,
        }
    }
}

/// A mixed 0/1-continuous linear model: the oracle's input.
///
/// # Examples
///
/// ```
/// use u_wavepick::oracle::{LinearModel, Objective, Relation, Variable};
///
/// let mut model = LinearModel::new("example");
/// let x = model.add_variable(Variable::binary("x"));
/// let y = model.add_variable(Variable::binary("y"));
/// model.add_constraint("pick_one", vec![(x, 1.0), (y, 1.0)], Relation::LessEq, 1.0);
/// model.set_objective(Objective::maximize(vec![(x, 2.0), (y, 3.0)]));
/// assert!(model.validate().is_ok());
/// assert!(model.is_satisfied_by(&[0.0, 1.0], 1e-9));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LinearModel {
    /// Model name.
    pub name: String,
    /// Variables, indexed by [`VarId`].
    pub variables: Vec<Variable>,
    /// Constraints.
    pub constraints: Vec<LinearConstraint>,
    /// Objective function.
    pub objective: Option<Objective>,
}

impl LinearModel {
    /// Creates a new empty model.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            variables: Vec::new(),
            constraints: Vec::new(),
            objective: None,
        }
    }

    /// Adds a variable and returns its handle.
    pub fn add_variable(&mut self, var: Variable) -> VarId {
        self.variables.push(var);
        VarId(self.variables.len() - 1)
    }

    /// Adds a constraint.
    pub fn add_constraint(
        &mut self,
        name: impl Into<String>,
        terms: Vec<(VarId, f64)>,
        relation: Relation,
        rhs: f64,
    ) {
        self.constraints.push(LinearConstraint {
            name: name.into(),
            terms,
            relation,
            rhs,
        });
    }

    /// Sets the objective function, replacing any previous one.
    pub fn set_objective(&mut self, objective: Objective) {
        self.objective = Some(objective);
    }

    /// Validates the model for consistency.
    ///
    /// Checks variable references, finite coefficients and bounds.
    pub fn validate(&self) -> Result<(), String> {
        for var in &self.variables {
            if let Domain::Continuous { lower, upper } = var.domain {
                if !lower.is_finite() || !upper.is_finite() {
                    return Err(format!("variable {}: bounds must be finite", var.name));
                }
                if lower > upper {
                    return Err(format!(
                        "variable {}: lower bound {lower} exceeds upper bound {upper}",
                        var.name
                    ));
                }
            }
        }
        for constraint in &self.constraints {
            if !constraint.rhs.is_finite() {
                return Err(format!("constraint {}: non-finite rhs", constraint.name));
            }
            self.check_terms(&constraint.terms)
                .map_err(|e| format!("constraint {}: {e}", constraint.name))?;
        }
        if let Some(objective) = &self.objective {
            self.check_terms(&objective.terms)
                .map_err(|e| format!("objective: {e}"))?;
        }
        Ok(())
    }

    fn check_terms(&self, terms: &[(VarId, f64)]) -> Result<(), String> {
        for &(var, coef) in terms {
            if var.index() >= self.variables.len() {
                return Err(format!("undefined variable: {}", var.index()));
            }
            if !coef.is_finite() {
                return Err(format!(
                    "non-finite coefficient on {}",
                    self.variables[var.index()].name
                ));
            }
        }
        Ok(())
    }

    /// Whether `values` respect every domain and constraint within `tolerance`.
    pub fn is_satisfied_by(&self, values: &[f64], tolerance: f64) -> bool {
        values.len() == self.variables.len()
            && self
                .variables
                .iter()
                .zip(values)
                .all(|(var, &v)| var.domain.contains(v, tolerance))
            && self
                .constraints
                .iter()
                .all(|c| c.is_satisfied_by(values, tolerance))
    }

    /// Objective value under `values`; zero without an objective.
    pub fn objective_value(&self, values: &[f64]) -> f64 {
        self.objective.as_ref().map_or(0.0, |o| o.value(values))
    }

    /// Returns the number of variables.
    pub fn variable_count(&self) -> usize {
        self.variables.len()
    }

    /// Returns the number of constraints.
    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    /// Whether every variable is binary.
    pub fn is_pure_binary(&self) -> bool {
        self.variables.iter().all(Variable::is_binary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn knapsack() -> LinearModel {
        let mut model = LinearModel::new("knapsack");
        let a = model.add_variable(Variable::binary("a"));
        let b = model.add_variable(Variable::binary("b"));
        let c = model.add_variable(Variable::binary("c"));
        model.add_constraint(
            "capacity",
            vec![(a, 3.0), (b, 4.0), (c, 2.0)],
            Relation::LessEq,
            5.0,
        );
        model.set_objective(Objective::maximize(vec![(a, 4.0), (b, 5.0), (c, 3.0)]));
        model
    }

    #[test]
    fn test_model_creation() {
        let model = knapsack();
        assert_eq!(model.variable_count(), 3);
        assert_eq!(model.constraint_count(), 1);
        assert!(model.objective.is_some());
        assert!(model.is_pure_binary());
        assert!(model.validate().is_ok());
    }

    #[test]
    fn test_satisfaction_and_objective() {
        let model = knapsack();
        assert!(model.is_satisfied_by(&[1.0, 0.0, 1.0], 1e-9));
        assert!(!model.is_satisfied_by(&[1.0, 1.0, 0.0], 1e-9));
        assert!(!model.is_satisfied_by(&[1.0, 0.0], 1e-9));
        assert!((model.objective_value(&[1.0, 0.0, 1.0]) - 7.0).abs() < 1e-12);
    }

    #[test]
    fn test_undefined_variable() {
        let mut model = LinearModel::new("test");
        model.add_constraint("bad", vec![(VarId(3), 1.0)], Relation::LessEq, 1.0);
        assert!(model.validate().is_err());
    }

    #[test]
    fn test_non_finite_coefficient() {
        let mut model = LinearModel::new("test");
        let x = model.add_variable(Variable::binary("x"));
        model.set_objective(Objective::maximize(vec![(x, f64::NAN)]));
        assert!(model.validate().is_err());
    }

    #[test]
    fn test_bad_bounds() {
        let mut model = LinearModel::new("test");
        model.add_variable(Variable::continuous("t", 2.0, 1.0));
        assert!(model.validate().is_err());
    }

    #[test]
    fn test_equal_relation() {
        let mut model = LinearModel::new("test");
        let t = model.add_variable(Variable::continuous("t", 0.0, 1.0));
        let u = model.add_variable(Variable::continuous("u", 0.0, 1.0));
        model.add_constraint("norm", vec![(t, 1.0), (u, 1.0)], Relation::Equal, 1.0);
        assert!(!model.is_pure_binary());
        assert!(model.is_satisfied_by(&[0.25, 0.75], 1e-9));
        assert!(!model.is_satisfied_by(&[0.25, 0.5], 1e-9));
    }

    #[test]
    fn test_objective_direction() {
        let max = Objective::maximize(vec![]);
        let min = Objective::minimize(vec![]);
        assert!(max.improves(2.0, 1.0));
        assert!(min.improves(1.0, 2.0));
    }
}
