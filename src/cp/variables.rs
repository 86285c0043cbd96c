//! CP variable types.

use serde::{Deserialize, Serialize};

/// A boolean decision variable.
///
/// A lightweight handle: the index of the variable in its [`CpModel`].
/// Handles are only meaningful for the model that created them.
///
/// [`CpModel`]: super::CpModel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BoolVar(pub(crate) usize);

impl BoolVar {
    /// Position of the variable in its model.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }

    /// The literal "this variable is true".
    #[inline]
    pub fn is_true(self) -> Literal {
        Literal {
            var: self,
            negated: false,
        }
    }

    /// The literal "this variable is false".
    #[inline]
    pub fn is_false(self) -> Literal {
        Literal {
            var: self,
            negated: true,
        }
    }
}

/// A boolean variable or its negation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Literal {
    /// Underlying variable.
    pub var: BoolVar,
    /// Whether the literal is the variable's negation.
    pub negated: bool,
}

impl Literal {
    /// The opposite literal.
    #[inline]
    pub fn negate(self) -> Self {
        Self {
            var: self.var,
            negated: !self.negated,
        }
    }

    /// Truth value of the literal for a given variable value.
    #[inline]
    pub fn holds(self, value: bool) -> bool {
        value != self.negated
    }

    /// The variable value that makes this literal true.
    #[inline]
    pub fn satisfying_value(self) -> bool {
        !self.negated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_polarity() {
        let v = BoolVar(3);
        assert_eq!(v.index(), 3);
        assert!(v.is_true().holds(true));
        assert!(!v.is_true().holds(false));
        assert!(v.is_false().holds(false));
        assert_eq!(v.is_true().negate(), v.is_false());
        assert!(!v.is_false().satisfying_value());
    }
}
