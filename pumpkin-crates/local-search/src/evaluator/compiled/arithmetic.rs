use super::ViolationFunction;
use crate::math::absolute_difference;
use crate::DomainId;
use crate::LinearExpression;

/// `target = max(expressions)` or `target = min(expressions)`.
///
/// The violation is `|target - max(expressions)|` (respectively the minimum).
#[derive(Clone, Debug)]
pub struct LinearExtremum {
    target: LinearExpression,
    expressions: Box<[LinearExpression]>,
    is_maximum: bool,
}

impl LinearExtremum {
    pub(crate) fn maximum(target: LinearExpression, expressions: Box<[LinearExpression]>) -> Self {
        LinearExtremum {
            target,
            expressions,
            is_maximum: true,
        }
    }

    pub(crate) fn minimum(target: LinearExpression, expressions: Box<[LinearExpression]>) -> Self {
        LinearExtremum {
            target,
            expressions,
            is_maximum: false,
        }
    }
}

impl ViolationFunction for LinearExtremum {
    fn compute_violation(&self, solution: &[i64]) -> i64 {
        let values = self
            .expressions
            .iter()
            .map(|expression| expression.evaluate(solution));
        let extremum = if self.is_maximum {
            values.max()
        } else {
            values.min()
        };

        match extremum {
            Some(extremum) => absolute_difference(self.target.evaluate(solution), extremum),
            None => 0,
        }
    }

    fn collect_variables(&self, variables: &mut Vec<DomainId>) {
        variables.extend(self.target.variables());
        for expression in self.expressions.iter() {
            variables.extend(expression.variables());
        }
    }
}

/// `target = factors[0] * factors[1] * ...`; the violation is `|target - product|`.
#[derive(Clone, Debug)]
pub struct IntProd {
    target: LinearExpression,
    factors: Box<[LinearExpression]>,
}

impl IntProd {
    pub(crate) fn new(target: LinearExpression, factors: Box<[LinearExpression]>) -> Self {
        IntProd { target, factors }
    }
}

impl ViolationFunction for IntProd {
    fn compute_violation(&self, solution: &[i64]) -> i64 {
        let product = self.factors.iter().try_fold(1_i128, |product, factor| {
            product.checked_mul(factor.evaluate(solution))
        });

        match product {
            Some(product) => absolute_difference(self.target.evaluate(solution), product),
            None => i64::MAX,
        }
    }

    fn collect_variables(&self, variables: &mut Vec<DomainId>) {
        variables.extend(self.target.variables());
        for factor in self.factors.iter() {
            variables.extend(factor.variables());
        }
    }
}

/// `target = numerator / denominator`, rounding towards zero. The violation is
/// `|target - numerator / denominator|`.
#[derive(Clone, Debug)]
pub struct IntDiv {
    target: LinearExpression,
    numerator: LinearExpression,
    denominator: LinearExpression,
}

impl IntDiv {
    pub(crate) fn new(
        target: LinearExpression,
        numerator: LinearExpression,
        denominator: LinearExpression,
    ) -> Self {
        IntDiv {
            target,
            numerator,
            denominator,
        }
    }
}

impl ViolationFunction for IntDiv {
    fn compute_violation(&self, solution: &[i64]) -> i64 {
        let numerator = self.numerator.evaluate(solution);
        let denominator = self.denominator.evaluate(solution);

        match numerator.checked_div(denominator) {
            Some(quotient) => absolute_difference(self.target.evaluate(solution), quotient),
            None => i64::MAX,
        }
    }

    fn collect_variables(&self, variables: &mut Vec<DomainId>) {
        variables.extend(self.target.variables());
        variables.extend(self.numerator.variables());
        variables.extend(self.denominator.variables());
    }
}

/// `target = numerator % denominator`, where the remainder takes the sign of the numerator.
///
/// The violation estimates how far the values are from a solution: when the target and the
/// numerator have opposite signs, both have to move to zero; otherwise it is the cheapest of
/// moving the target onto the remainder, moving the numerator to a multiple offset by the target,
/// or changing the denominator.
#[derive(Clone, Debug)]
pub struct IntMod {
    target: LinearExpression,
    numerator: LinearExpression,
    denominator: LinearExpression,
}

impl IntMod {
    pub(crate) fn new(
        target: LinearExpression,
        numerator: LinearExpression,
        denominator: LinearExpression,
    ) -> Self {
        IntMod {
            target,
            numerator,
            denominator,
        }
    }
}

impl ViolationFunction for IntMod {
    fn compute_violation(&self, solution: &[i64]) -> i64 {
        let target = self.target.evaluate(solution);
        let numerator = self.numerator.evaluate(solution);
        let denominator = self.denominator.evaluate(solution);

        let Some(remainder) = numerator.checked_rem(denominator) else {
            return i64::MAX;
        };
        if target == remainder {
            return 0;
        }

        let to_violation = |value: u128| i64::try_from(value).unwrap_or(i64::MAX);
        if (target > 0 && numerator < 0) || (target < 0 && numerator > 0) {
            return to_violation(
                target
                    .unsigned_abs()
                    .saturating_add(numerator.unsigned_abs()),
            );
        }

        let target_magnitude = target.unsigned_abs();
        let remainder_magnitude = remainder.unsigned_abs();
        let denominator_magnitude = denominator.unsigned_abs();

        let move_target = absolute_difference(target, remainder);
        let move_numerator = to_violation(
            target_magnitude.saturating_add(denominator_magnitude - remainder_magnitude),
        );
        let move_denominator = to_violation(
            remainder_magnitude.saturating_add(denominator_magnitude.abs_diff(target_magnitude)),
        );

        move_target.min(move_numerator).min(move_denominator).max(1)
    }

    fn collect_variables(&self, variables: &mut Vec<DomainId>) {
        variables.extend(self.target.variables());
        variables.extend(self.numerator.variables());
        variables.extend(self.denominator.variables());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const T: DomainId = DomainId::new(0);
    const A: DomainId = DomainId::new(1);
    const B: DomainId = DomainId::new(2);

    #[test]
    fn maximum_violation_is_distance_to_the_largest_value() {
        let maximum =
            LinearExtremum::maximum(T.into(), Box::new([A, B].map(LinearExpression::from)));

        assert_eq!(0, maximum.compute_violation(&[5, 5, 2]));
        assert_eq!(3, maximum.compute_violation(&[2, 5, 2]));
        assert_eq!(4, maximum.compute_violation(&[9, 5, 2]));
    }

    #[test]
    fn minimum_violation_is_distance_to_the_smallest_value() {
        let minimum =
            LinearExtremum::minimum(T.into(), Box::new([A, B].map(LinearExpression::from)));

        assert_eq!(0, minimum.compute_violation(&[2, 5, 2]));
        assert_eq!(3, minimum.compute_violation(&[5, 5, 2]));
    }

    #[test]
    fn product_overflow_saturates() {
        let product = IntProd::new(T.into(), Box::new([A, B, B].map(LinearExpression::from)));

        assert_eq!(0, product.compute_violation(&[12, 3, 2]));
        assert_eq!(2, product.compute_violation(&[10, 3, 2]));
        assert_eq!(i64::MAX, product.compute_violation(&[0, i64::MAX, i64::MAX]));
    }

    #[test]
    fn division_rounds_towards_zero() {
        let division = IntDiv::new(T.into(), A.into(), B.into());

        assert_eq!(0, division.compute_violation(&[-2, -7, 3]));
        assert_eq!(1, division.compute_violation(&[-3, -7, 3]));
        assert_eq!(i64::MAX, division.compute_violation(&[0, 1, 0]));
    }

    #[test]
    fn modulo_violation() {
        let modulo = IntMod::new(T.into(), A.into(), B.into());

        assert_eq!(0, modulo.compute_violation(&[1, 7, 3]));
        assert_eq!(2, modulo.compute_violation(&[1, 5, 6]));
        assert_eq!(22, modulo.compute_violation(&[18, -4, 6]));
        assert_eq!(22, modulo.compute_violation(&[-18, 4, 6]));
        assert_eq!(0, modulo.compute_violation(&[-1, -7, 3]));
        assert_eq!(0, modulo.compute_violation(&[2, 2, 3]));
    }

    #[test]
    fn modulo_violation_is_zero_only_when_satisfied() {
        let modulo = IntMod::new(T.into(), A.into(), B.into());

        for target in -6..=6 {
            for numerator in -6..=6 {
                for denominator in [-4, -3, -1, 1, 2, 5] {
                    let violation = modulo.compute_violation(&[target, numerator, denominator]);
                    assert!(violation >= 0);
                    assert_eq!(violation == 0, numerator % denominator == target);
                }
            }
        }
    }
}
