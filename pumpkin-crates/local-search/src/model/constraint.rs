use crate::DomainId;
use crate::LinearExpression;
use crate::Literal;

/// An interval `[start, start + size)` which is only considered when its presence literal holds.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct IntervalVariable {
    pub start: LinearExpression,
    pub size: LinearExpression,
    /// The interval is optional if this literal is given; it is then absent whenever the literal
    /// is false.
    pub presence: Option<Literal>,
}

impl IntervalVariable {
    /// An interval which is always present.
    pub fn new(start: impl Into<LinearExpression>, size: impl Into<LinearExpression>) -> Self {
        IntervalVariable {
            start: start.into(),
            size: size.into(),
            presence: None,
        }
    }

    pub fn optional(
        start: impl Into<LinearExpression>,
        size: impl Into<LinearExpression>,
        presence: Literal,
    ) -> Self {
        IntervalVariable {
            start: start.into(),
            size: size.into(),
            presence: Some(presence),
        }
    }

    /// The `[start, end)` of the interval under `solution`, or [`None`] if it is absent. A
    /// negative size is treated as an empty interval.
    pub fn evaluate(&self, solution: &[i64]) -> Option<(i128, i128)> {
        if self
            .presence
            .is_some_and(|presence| !presence.is_true_in(solution))
        {
            return None;
        }

        let start = self.start.evaluate(solution);
        let size = self.size.evaluate(solution).max(0);
        Some((start, start.saturating_add(size)))
    }

    pub(crate) fn variables(&self) -> impl Iterator<Item = DomainId> + '_ {
        self.start
            .variables()
            .chain(self.size.variables())
            .chain(self.presence.map(|presence| presence.variable()))
    }
}

/// An arc of a circuit or routes constraint; it is part of the solution when its literal is true.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CircuitArc {
    pub tail: u32,
    pub head: u32,
    pub literal: Literal,
}

/// A task of a cumulative constraint: an interval consuming `demand` of the resource while it
/// runs.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CumulativeTask {
    pub interval: IntervalVariable,
    pub demand: LinearExpression,
}

/// The constraints which can be part of a [`Model`].
///
/// The Boolean constraints over literals and the [`Constraint::Linear`] constraint are evaluated
/// incrementally as linear constraints; all others are evaluated as compiled structural
/// constraints.
///
/// [`Model`]: super::Model
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Constraint {
    /// `lower <= expression <= upper`; use [`i64::MIN`] or [`i64::MAX`] for a missing side.
    Linear {
        expression: LinearExpression,
        lower: i64,
        upper: i64,
    },
    /// At least one literal is true.
    BoolOr(Box<[Literal]>),
    /// All literals are true.
    BoolAnd(Box<[Literal]>),
    /// At most one literal is true.
    AtMostOne(Box<[Literal]>),
    /// Exactly one literal is true.
    ExactlyOne(Box<[Literal]>),
    /// An odd number of literals is true.
    BoolXor(Box<[Literal]>),
    /// `target = max(exprs)`.
    LinMax {
        target: LinearExpression,
        exprs: Box<[LinearExpression]>,
    },
    /// `target = min(exprs)`.
    LinMin {
        target: LinearExpression,
        exprs: Box<[LinearExpression]>,
    },
    /// `target = factors[0] * factors[1] * ...`.
    IntProd {
        target: LinearExpression,
        factors: Box<[LinearExpression]>,
    },
    /// `target = numerator / denominator`, rounding towards zero.
    IntDiv {
        target: LinearExpression,
        numerator: LinearExpression,
        denominator: LinearExpression,
    },
    /// `target = numerator % denominator`; the remainder has the sign of the numerator.
    IntMod {
        target: LinearExpression,
        numerator: LinearExpression,
        denominator: LinearExpression,
    },
    /// All expressions take pairwise distinct values.
    AllDifferent(Box<[LinearExpression]>),
    /// No two present intervals overlap.
    NoOverlap(Box<[IntervalVariable]>),
    /// No two present boxes `x_intervals[i] × y_intervals[i]` overlap.
    NoOverlap2D {
        x_intervals: Box<[IntervalVariable]>,
        y_intervals: Box<[IntervalVariable]>,
    },
    /// At every point in time, the demands of the running tasks do not exceed the capacity.
    Cumulative {
        tasks: Box<[CumulativeTask]>,
        capacity: LinearExpression,
    },
    /// The selected arcs form a single circuit over the nodes which do not select their self-loop.
    Circuit(Box<[CircuitArc]>),
    /// The selected arcs form routes which all start and end at node 0.
    Routes(Box<[CircuitArc]>),
}

impl Constraint {
    /// A short name of the kind of constraint, used in error messages and logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Constraint::Linear { .. } => "linear",
            Constraint::BoolOr(_) => "bool_or",
            Constraint::BoolAnd(_) => "bool_and",
            Constraint::AtMostOne(_) => "at_most_one",
            Constraint::ExactlyOne(_) => "exactly_one",
            Constraint::BoolXor(_) => "bool_xor",
            Constraint::LinMax { .. } => "lin_max",
            Constraint::LinMin { .. } => "lin_min",
            Constraint::IntProd { .. } => "int_prod",
            Constraint::IntDiv { .. } => "int_div",
            Constraint::IntMod { .. } => "int_mod",
            Constraint::AllDifferent(_) => "all_different",
            Constraint::NoOverlap(_) => "no_overlap",
            Constraint::NoOverlap2D { .. } => "no_overlap_2d",
            Constraint::Cumulative { .. } => "cumulative",
            Constraint::Circuit(_) => "circuit",
            Constraint::Routes(_) => "routes",
        }
    }

    /// The literals whose variables must be 0-1.
    pub(crate) fn literals(&self) -> Box<dyn Iterator<Item = Literal> + '_> {
        match self {
            Constraint::BoolOr(literals)
            | Constraint::BoolAnd(literals)
            | Constraint::AtMostOne(literals)
            | Constraint::ExactlyOne(literals)
            | Constraint::BoolXor(literals) => Box::new(literals.iter().copied()),
            Constraint::NoOverlap(intervals) => {
                Box::new(intervals.iter().filter_map(|interval| interval.presence))
            }
            Constraint::NoOverlap2D {
                x_intervals,
                y_intervals,
            } => Box::new(
                x_intervals
                    .iter()
                    .chain(y_intervals.iter())
                    .filter_map(|interval| interval.presence),
            ),
            Constraint::Cumulative { tasks, .. } => {
                Box::new(tasks.iter().filter_map(|task| task.interval.presence))
            }
            Constraint::Circuit(arcs) | Constraint::Routes(arcs) => {
                Box::new(arcs.iter().map(|arc| arc.literal))
            }
            Constraint::Linear { .. }
            | Constraint::LinMax { .. }
            | Constraint::LinMin { .. }
            | Constraint::IntProd { .. }
            | Constraint::IntDiv { .. }
            | Constraint::IntMod { .. }
            | Constraint::AllDifferent(_) => Box::new(std::iter::empty()),
        }
    }

    /// All variables the constraint refers to, possibly with repetitions.
    pub(crate) fn variables(&self) -> Vec<DomainId> {
        let mut variables = vec![];

        match self {
            Constraint::Linear { expression, .. } => {
                extend_with_expressions(&mut variables, [expression])
            }
            Constraint::LinMax { target, exprs } | Constraint::LinMin { target, exprs } => {
                extend_with_expressions(&mut variables, std::iter::once(target).chain(exprs.iter()))
            }
            Constraint::IntProd { target, factors } => extend_with_expressions(
                &mut variables,
                std::iter::once(target).chain(factors.iter()),
            ),
            Constraint::IntDiv {
                target,
                numerator,
                denominator,
            }
            | Constraint::IntMod {
                target,
                numerator,
                denominator,
            } => extend_with_expressions(&mut variables, [target, numerator, denominator]),
            Constraint::AllDifferent(exprs) => {
                extend_with_expressions(&mut variables, exprs.iter())
            }
            Constraint::NoOverlap(intervals) => {
                variables.extend(intervals.iter().flat_map(IntervalVariable::variables))
            }
            Constraint::NoOverlap2D {
                x_intervals,
                y_intervals,
            } => variables.extend(
                x_intervals
                    .iter()
                    .chain(y_intervals.iter())
                    .flat_map(IntervalVariable::variables),
            ),
            Constraint::Cumulative { tasks, capacity } => {
                variables.extend(tasks.iter().flat_map(|task| {
                    task.interval.variables().chain(task.demand.variables())
                }));
                variables.extend(capacity.variables());
            }
            Constraint::BoolOr(_)
            | Constraint::BoolAnd(_)
            | Constraint::AtMostOne(_)
            | Constraint::ExactlyOne(_)
            | Constraint::BoolXor(_)
            | Constraint::Circuit(_)
            | Constraint::Routes(_) => {
                variables.extend(self.literals().map(|literal| literal.variable()))
            }
        }

        variables
    }
}

fn extend_with_expressions<'a>(
    variables: &mut Vec<DomainId>,
    expressions: impl IntoIterator<Item = &'a LinearExpression>,
) {
    for expression in expressions {
        variables.extend(expression.variables());
    }
}
