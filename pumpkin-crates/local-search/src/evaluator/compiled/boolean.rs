use super::ViolationFunction;
use crate::DomainId;
use crate::Literal;

/// An odd number of the literals is true.
#[derive(Clone, Debug)]
pub struct BoolXor {
    literals: Box<[Literal]>,
}

impl BoolXor {
    pub(crate) fn new(literals: Box<[Literal]>) -> Self {
        BoolXor { literals }
    }
}

impl ViolationFunction for BoolXor {
    fn compute_violation(&self, solution: &[i64]) -> i64 {
        let num_true = self
            .literals
            .iter()
            .filter(|literal| literal.is_true_in(solution))
            .count();

        if num_true % 2 == 1 {
            0
        } else {
            1
        }
    }

    fn collect_variables(&self, variables: &mut Vec<DomainId>) {
        variables.extend(self.literals.iter().map(|literal| literal.variable()))
    }
}
