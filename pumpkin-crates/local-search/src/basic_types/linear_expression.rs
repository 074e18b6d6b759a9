use std::fmt::Display;

use itertools::Itertools;

use super::Domain;
use super::DomainId;
use super::Literal;
use crate::containers::KeyedVec;
use crate::containers::StorageKey;

/// An integer expression `offset + sum(coefficient * variable)`.
///
/// The terms are kept in the order they were added; a variable may occur more than once, in which
/// case the coefficients are summed wherever the expression is compiled.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct LinearExpression {
    terms: Vec<(DomainId, i64)>,
    offset: i64,
}

impl LinearExpression {
    pub fn new(terms: impl IntoIterator<Item = (DomainId, i64)>, offset: i64) -> Self {
        LinearExpression {
            terms: terms.into_iter().collect(),
            offset,
        }
    }

    pub fn constant(offset: i64) -> Self {
        LinearExpression {
            terms: vec![],
            offset,
        }
    }

    /// The 0-1 value of a literal: `x` for a positive literal and `1 - x` for a negative one.
    pub fn from_literal(literal: Literal) -> Self {
        let (coefficient, offset) = literal.as_linear_term();
        LinearExpression::new([(literal.variable(), coefficient)], offset)
    }

    pub fn terms(&self) -> &[(DomainId, i64)] {
        &self.terms
    }

    pub fn offset(&self) -> i64 {
        self.offset
    }

    pub fn variables(&self) -> impl Iterator<Item = DomainId> + '_ {
        self.terms.iter().map(|&(variable, _)| variable)
    }

    /// The value of the expression under `solution`. The result is computed in 128 bits; it
    /// saturates rather than wraps in the (pathological) case that this is insufficient.
    pub fn evaluate(&self, solution: &[i64]) -> i128 {
        self.terms
            .iter()
            .fold(i128::from(self.offset), |acc, &(variable, coefficient)| {
                let term = i128::from(coefficient) * i128::from(solution[variable.index()]);
                acc.saturating_add(term)
            })
    }

    /// The smallest and largest value the expression can take given the variable domains.
    pub fn range(&self, domains: &KeyedVec<DomainId, Domain>) -> (i128, i128) {
        self.terms.iter().fold(
            (i128::from(self.offset), i128::from(self.offset)),
            |(min, max), &(variable, coefficient)| {
                let domain = &domains[variable];
                let at_min = i128::from(coefficient) * i128::from(domain.min());
                let at_max = i128::from(coefficient) * i128::from(domain.max());
                (
                    min.saturating_add(at_min.min(at_max)),
                    max.saturating_add(at_min.max(at_max)),
                )
            },
        )
    }

    /// Whether some assignment of values from `domains` makes the expression evaluate to zero.
    ///
    /// Exact for expressions over at most one distinct variable, and otherwise a check on the
    /// range of the expression.
    pub fn can_be_zero(&self, domains: &KeyedVec<DomainId, Domain>) -> bool {
        let distinct_variables = self.variables().unique().count();
        if distinct_variables == 1 {
            let variable = self.terms[0].0;
            let coefficient: i128 = self
                .terms
                .iter()
                .map(|&(_, coefficient)| i128::from(coefficient))
                .sum();
            if coefficient == 0 {
                return self.offset == 0;
            }
            let offset = i128::from(self.offset);
            return offset % coefficient == 0
                && i64::try_from(-offset / coefficient)
                    .is_ok_and(|value| domains[variable].contains(value));
        }

        let (min, max) = self.range(domains);
        min <= 0 && 0 <= max
    }
}

impl From<DomainId> for LinearExpression {
    fn from(variable: DomainId) -> Self {
        LinearExpression::new([(variable, 1)], 0)
    }
}

impl From<i64> for LinearExpression {
    fn from(value: i64) -> Self {
        LinearExpression::constant(value)
    }
}

impl Display for LinearExpression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let terms = self
            .terms
            .iter()
            .format_with(" + ", |(variable, coefficient), f| {
                f(&format_args!("{coefficient}*{variable}"))
            });
        if self.terms.is_empty() {
            write!(f, "{}", self.offset)
        } else if self.offset == 0 {
            write!(f, "{terms}")
        } else {
            write!(f, "{terms} + {}", self.offset)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn domains(domains: impl IntoIterator<Item = Domain>) -> KeyedVec<DomainId, Domain> {
        KeyedVec::from(domains.into_iter().collect::<Vec<_>>())
    }

    #[test]
    fn repeated_variables_accumulate_when_evaluated() {
        let x = DomainId::new(0);
        let y = DomainId::new(1);
        let expression = LinearExpression::new([(x, 2), (y, 3), (x, -1)], 5);

        assert_eq!(5 + 8 + 9 - 4, expression.evaluate(&[4, 3]));
    }

    #[test]
    fn negated_literal_evaluates_to_its_truth_value() {
        let x = DomainId::new(0);
        let expression = LinearExpression::from_literal(!Literal::new(x));

        assert_eq!(1, expression.evaluate(&[0]));
        assert_eq!(0, expression.evaluate(&[1]));
    }

    #[test]
    fn range_follows_the_sign_of_the_coefficients() {
        let domains = domains([Domain::new(0, 4), Domain::new(-2, 3)]);
        let expression = LinearExpression::new([(DomainId::new(0), 2), (DomainId::new(1), -3)], 1);

        assert_eq!((1 - 9, 1 + 8 + 6), expression.range(&domains));
    }

    #[test]
    fn zero_check_is_exact_for_a_single_variable() {
        let domains = domains([Domain::from_values([-2, -1, 1, 2]), Domain::new(-5, 5)]);
        let x = DomainId::new(0);
        let y = DomainId::new(1);

        assert!(!LinearExpression::from(x).can_be_zero(&domains));
        assert!(LinearExpression::new([(x, 2)], 4).can_be_zero(&domains));
        assert!(!LinearExpression::new([(x, 2)], 3).can_be_zero(&domains));
        assert!(LinearExpression::new([(x, 1), (y, 1)], 0).can_be_zero(&domains));
        assert!(!LinearExpression::constant(7).can_be_zero(&domains));
    }
}
