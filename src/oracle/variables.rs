//! Oracle variable types.

/// Handle to a variable in a [`LinearModel`](super::LinearModel).
///
/// The wrapped index is the variable's position in the model and in every
/// assignment vector produced for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarId(pub usize);

impl VarId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Domain of a decision variable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Domain {
    /// Takes the value 0 or 1.
    Binary,

    /// Takes any real value in `[lower, upper]`.
    Continuous {
        lower: f64,
        upper: f64,
    },
}

impl Domain {
    /// Whether `value` lies in the domain, within `tolerance`.
    pub fn contains(&self, value: f64, tolerance: f64) -> bool {
        match *self {
            Domain::Binary => value.abs() <= tolerance || (value - 1.0).abs() <= tolerance,
            Domain::Continuous { lower, upper } => {
                value >= lower - tolerance && value <= upper + tolerance
            }
        }
    }
}

/// A named decision variable.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    /// Variable name (diagnostics only).
    pub name: String,
    /// Value domain.
    pub domain: Domain,
}

impl Variable {
    /// Creates a 0/1 variable.
    pub fn binary(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            domain: Domain::Binary,
        }
    }

    /// Creates a bounded continuous variable.
    pub fn continuous(name: impl Into<String>, lower: f64, upper: f64) -> Self {
        Self {
            name: name.into(),
            domain: Domain::Continuous { lower, upper },
        }
    }

    pub fn is_binary(&self) -> bool {
        matches!(self.domain, Domain::Binary)
    }
}
