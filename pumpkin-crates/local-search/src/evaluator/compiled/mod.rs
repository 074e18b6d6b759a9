//! The structural constraints of a model, compiled into a form which computes a violation from a
//! complete solution.
//!
//! Every kind implements [`ViolationFunction`]; the violation is non-negative and zero exactly
//! when the constraint holds. Intermediate results are computed with 128 bits and checked
//! operations, and a violation which does not fit in an `i64` saturates at [`i64::MAX`].
mod all_different;
mod arithmetic;
mod boolean;
mod circuit;
mod cumulative;
mod no_overlap;

pub use all_different::AllDifferent;
pub use arithmetic::IntDiv;
pub use arithmetic::IntMod;
pub use arithmetic::IntProd;
pub use arithmetic::LinearExtremum;
pub use boolean::BoolXor;
pub use circuit::Circuit;
pub use circuit::Routes;
pub use cumulative::Cumulative;
use itertools::Itertools;
pub use no_overlap::NoOverlap;
pub use no_overlap::NoOverlap2D;

use crate::model::Constraint;
use crate::DomainId;
use crate::Literal;

/// A violation measure over a complete solution.
pub(crate) trait ViolationFunction {
    fn compute_violation(&self, solution: &[i64]) -> i64;

    /// Pushes every variable the violation depends on; repetitions are allowed.
    fn collect_variables(&self, variables: &mut Vec<DomainId>);
}

/// The structural (non-linear) constraint kinds.
#[derive(Clone, Debug)]
pub enum CompiledConstraint {
    BoolXor(BoolXor),
    LinMax(LinearExtremum),
    LinMin(LinearExtremum),
    IntProd(IntProd),
    IntDiv(IntDiv),
    IntMod(IntMod),
    AllDifferent(AllDifferent),
    NoOverlap(NoOverlap),
    NoOverlap2D(NoOverlap2D),
    Cumulative(Cumulative),
    Circuit(Circuit),
    Routes(Routes),
}

impl CompiledConstraint {
    /// Compiles a constraint of the model, or returns [`None`] if it is evaluated as a linear
    /// constraint.
    pub(crate) fn compile(constraint: &Constraint) -> Option<CompiledConstraint> {
        let compiled = match constraint {
            Constraint::Linear { .. }
            | Constraint::BoolOr(_)
            | Constraint::BoolAnd(_)
            | Constraint::AtMostOne(_)
            | Constraint::ExactlyOne(_) => return None,
            Constraint::BoolXor(literals) => {
                CompiledConstraint::BoolXor(BoolXor::new(literals.clone()))
            }
            Constraint::LinMax { target, exprs } => CompiledConstraint::LinMax(
                LinearExtremum::maximum(target.clone(), exprs.clone()),
            ),
            Constraint::LinMin { target, exprs } => CompiledConstraint::LinMin(
                LinearExtremum::minimum(target.clone(), exprs.clone()),
            ),
            Constraint::IntProd { target, factors } => {
                CompiledConstraint::IntProd(IntProd::new(target.clone(), factors.clone()))
            }
            Constraint::IntDiv {
                target,
                numerator,
                denominator,
            } => CompiledConstraint::IntDiv(IntDiv::new(
                target.clone(),
                numerator.clone(),
                denominator.clone(),
            )),
            Constraint::IntMod {
                target,
                numerator,
                denominator,
            } => CompiledConstraint::IntMod(IntMod::new(
                target.clone(),
                numerator.clone(),
                denominator.clone(),
            )),
            Constraint::AllDifferent(exprs) => {
                CompiledConstraint::AllDifferent(AllDifferent::new(exprs.clone()))
            }
            Constraint::NoOverlap(intervals) => {
                CompiledConstraint::NoOverlap(NoOverlap::new(intervals.clone()))
            }
            Constraint::NoOverlap2D {
                x_intervals,
                y_intervals,
            } => CompiledConstraint::NoOverlap2D(NoOverlap2D::new(
                x_intervals.clone(),
                y_intervals.clone(),
            )),
            Constraint::Cumulative { tasks, capacity } => {
                CompiledConstraint::Cumulative(Cumulative::new(tasks.clone(), capacity.clone()))
            }
            Constraint::Circuit(arcs) => CompiledConstraint::Circuit(Circuit::new(arcs.clone())),
            Constraint::Routes(arcs) => CompiledConstraint::Routes(Routes::new(arcs.clone())),
        };

        Some(compiled)
    }

    fn as_violation_function(&self) -> &dyn ViolationFunction {
        match self {
            CompiledConstraint::BoolXor(constraint) => constraint,
            CompiledConstraint::LinMax(constraint) | CompiledConstraint::LinMin(constraint) => {
                constraint
            }
            CompiledConstraint::IntProd(constraint) => constraint,
            CompiledConstraint::IntDiv(constraint) => constraint,
            CompiledConstraint::IntMod(constraint) => constraint,
            CompiledConstraint::AllDifferent(constraint) => constraint,
            CompiledConstraint::NoOverlap(constraint) => constraint,
            CompiledConstraint::NoOverlap2D(constraint) => constraint,
            CompiledConstraint::Cumulative(constraint) => constraint,
            CompiledConstraint::Circuit(constraint) => constraint,
            CompiledConstraint::Routes(constraint) => constraint,
        }
    }

    pub fn compute_violation(&self, solution: &[i64]) -> i64 {
        self.as_violation_function().compute_violation(solution)
    }

    /// The distinct variables the violation depends on, in increasing order.
    pub fn variables(&self) -> Vec<DomainId> {
        let mut variables = vec![];
        self.as_violation_function()
            .collect_variables(&mut variables);
        variables.into_iter().sorted_unstable().dedup().collect()
    }
}

/// A compiled structural constraint which only has to hold while all its enforcement literals
/// are true.
#[derive(Clone, Debug)]
pub struct NonLinearConstraint {
    constraint: CompiledConstraint,
    enforcement: Box<[Literal]>,
    /// The sorted variables of the constraint and its enforcement literals.
    variables: Box<[DomainId]>,
}

impl NonLinearConstraint {
    pub(crate) fn new(constraint: CompiledConstraint, enforcement: Box<[Literal]>) -> Self {
        let variables = constraint
            .variables()
            .into_iter()
            .chain(enforcement.iter().map(|literal| literal.variable()))
            .sorted_unstable()
            .dedup()
            .collect();

        NonLinearConstraint {
            constraint,
            enforcement,
            variables,
        }
    }

    pub fn constraint(&self) -> &CompiledConstraint {
        &self.constraint
    }

    pub fn enforcement(&self) -> &[Literal] {
        &self.enforcement
    }

    pub fn variables(&self) -> &[DomainId] {
        &self.variables
    }

    /// The violation of the constraint, which is 0 while it is not enforced.
    pub fn compute_violation(&self, solution: &[i64]) -> i64 {
        if self
            .enforcement
            .iter()
            .all(|literal| literal.is_true_in(solution))
        {
            self.constraint.compute_violation(solution)
        } else {
            0
        }
    }
}
