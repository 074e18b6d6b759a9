use std::fmt::Display;
use std::ops::Not;

use super::DomainId;
use crate::containers::StorageKey;

/// A Boolean condition over a 0-1 variable: either the variable itself or its negation.
///
/// A positive literal is true when its variable takes the value 1, a negative literal is true when
/// its variable takes the value 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Literal {
    variable: DomainId,
    is_positive: bool,
}

impl Literal {
    /// Creates the positive literal of the provided [`DomainId`].
    ///
    /// Note: the provided `variable` should have a domain between 0 and 1.
    pub fn new(variable: DomainId) -> Literal {
        Literal {
            variable,
            is_positive: true,
        }
    }

    pub fn variable(&self) -> DomainId {
        self.variable
    }

    pub fn is_positive(&self) -> bool {
        self.is_positive
    }

    /// Whether the literal holds when its variable takes `value`.
    pub fn evaluate(&self, value: i64) -> bool {
        (value != 0) == self.is_positive
    }

    /// Whether the literal holds under the given solution.
    pub fn is_true_in(&self, solution: &[i64]) -> bool {
        self.evaluate(solution[self.variable.index()])
    }

    /// The literal as a 0-1 linear term `coefficient * variable + offset`.
    pub(crate) fn as_linear_term(&self) -> (i64, i64) {
        if self.is_positive {
            (1, 0)
        } else {
            (-1, 1)
        }
    }

    /// The change in the number of false literals when the variable goes from 0 to 1.
    pub(crate) fn falsified_on_increase(&self) -> i32 {
        if self.is_positive {
            -1
        } else {
            1
        }
    }
}

impl From<DomainId> for Literal {
    fn from(variable: DomainId) -> Self {
        Literal::new(variable)
    }
}

impl Not for Literal {
    type Output = Literal;

    fn not(self) -> Self::Output {
        Literal {
            variable: self.variable,
            is_positive: !self.is_positive,
        }
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_positive {
            write!(f, "{}", self.variable)
        } else {
            write!(f, "!{}", self.variable)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negation_flips_the_truth_value() {
        let literal = Literal::new(DomainId::new(0));

        assert!(literal.evaluate(1));
        assert!(!literal.evaluate(0));
        assert!((!literal).evaluate(0));
        assert!(!(!literal).evaluate(1));
        assert_eq!(literal, !!literal);
    }

    #[test]
    fn linear_term_matches_the_truth_value() {
        for literal in [Literal::new(DomainId::new(3)), !Literal::new(DomainId::new(3))] {
            let (coefficient, offset) = literal.as_linear_term();
            for value in [0, 1] {
                assert_eq!(
                    i64::from(literal.evaluate(value)),
                    coefficient * value + offset
                );
            }
        }
    }
}
