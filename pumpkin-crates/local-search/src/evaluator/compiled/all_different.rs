use itertools::Itertools;

use super::ViolationFunction;
use crate::DomainId;
use crate::LinearExpression;

/// The expressions take pairwise distinct values.
///
/// The violation is the number of expressions which would have to change for the values to become
/// distinct: the sum over all values of (number of expressions taking it - 1).
#[derive(Clone, Debug)]
pub struct AllDifferent {
    expressions: Box<[LinearExpression]>,
}

impl AllDifferent {
    pub(crate) fn new(expressions: Box<[LinearExpression]>) -> Self {
        AllDifferent { expressions }
    }
}

impl ViolationFunction for AllDifferent {
    fn compute_violation(&self, solution: &[i64]) -> i64 {
        let num_distinct = self
            .expressions
            .iter()
            .map(|expression| expression.evaluate(solution))
            .unique()
            .count();

        (self.expressions.len() - num_distinct) as i64
    }

    fn collect_variables(&self, variables: &mut Vec<DomainId>) {
        for expression in self.expressions.iter() {
            variables.extend(expression.variables());
        }
    }
}
