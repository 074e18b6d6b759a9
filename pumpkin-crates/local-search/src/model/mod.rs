//! The immutable description of an optimisation problem which is evaluated by the
//! [`LsEvaluator`].
//!
//! A [`Model`] is created once through a [`ModelBuilder`], which rejects malformed constraints
//! before any evaluation begins. The model is read-only afterwards, so several local-search
//! workers can share it while each owns its own evaluator.
//!
//! # Example
//! ```
//! # use pumpkin_local_search::model::Constraint;
//! # use pumpkin_local_search::model::ModelBuilder;
//! # use pumpkin_local_search::Domain;
//! # use pumpkin_local_search::LinearExpression;
//! let mut builder = ModelBuilder::default();
//!
//! let x = builder.new_variable(Domain::new(0, 4)).unwrap();
//! let y = builder.new_variable(Domain::new(0, 5)).unwrap();
//!
//! // 2x + 3y in [1, 4]
//! builder
//!     .add_constraint(Constraint::Linear {
//!         expression: LinearExpression::new([(x, 2), (y, 3)], 0),
//!         lower: 1,
//!         upper: 4,
//!     })
//!     .unwrap();
//!
//! let model = builder.build();
//! assert_eq!(2, model.num_variables());
//! ```
//!
//! [`LsEvaluator`]: crate::evaluator::LsEvaluator

mod constraint;

pub use constraint::*;
use log::debug;

use crate::containers::KeyedVec;
use crate::containers::StorageKey;
use crate::Domain;
use crate::DomainId;
use crate::LinearExpression;
use crate::Literal;
use crate::ModelError;

/// A constraint of the model together with the literals which enforce it.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ModelConstraint {
    pub constraint: Constraint,
    /// The constraint only has to hold when all of these literals are true.
    pub enforcement: Box<[Literal]>,
}

/// The expression which is minimised, with the bounds it is currently required to satisfy.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Objective {
    pub expression: LinearExpression,
    pub lower: i64,
    pub upper: i64,
}

/// A built model: variable domains, constraints in the order they were added, and the optional
/// objective.
#[derive(Clone, Debug, Default)]
pub struct Model {
    domains: KeyedVec<DomainId, Domain>,
    constraints: Vec<ModelConstraint>,
    objective: Option<Objective>,
}

impl Model {
    pub fn num_variables(&self) -> usize {
        self.domains.len()
    }

    pub fn domains(&self) -> &KeyedVec<DomainId, Domain> {
        &self.domains
    }

    pub fn domain(&self, variable: DomainId) -> &Domain {
        &self.domains[variable]
    }

    pub fn variables(&self) -> impl Iterator<Item = DomainId> {
        self.domains.keys()
    }

    pub fn constraints(&self) -> &[ModelConstraint] {
        &self.constraints
    }

    pub fn objective(&self) -> Option<&Objective> {
        self.objective.as_ref()
    }
}

/// Incrementally builds a [`Model`], validating every addition.
#[derive(Clone, Debug, Default)]
pub struct ModelBuilder {
    model: Model,
}

impl ModelBuilder {
    /// Creates a new variable with the given domain.
    pub fn new_variable(&mut self, domain: Domain) -> Result<DomainId, ModelError> {
        if domain.is_empty() {
            return Err(ModelError::EmptyDomain);
        }

        Ok(self.model.domains.push(domain))
    }

    /// Creates a new variable with domain `[lower_bound, upper_bound]`.
    pub fn new_interval_variable(
        &mut self,
        lower_bound: i64,
        upper_bound: i64,
    ) -> Result<DomainId, ModelError> {
        self.new_variable(Domain::new(lower_bound, upper_bound))
    }

    /// Creates a new variable with domain `{0, 1}`.
    pub fn new_boolean(&mut self) -> DomainId {
        self.model.domains.push(Domain::boolean())
    }

    /// Creates a new 0-1 variable and returns its positive literal.
    pub fn new_literal(&mut self) -> Literal {
        Literal::new(self.new_boolean())
    }

    pub fn add_constraint(&mut self, constraint: Constraint) -> Result<(), ModelError> {
        self.add_enforced_constraint(constraint, [])
    }

    /// Adds a constraint which only has to hold when all `enforcement` literals are true.
    pub fn add_enforced_constraint(
        &mut self,
        constraint: Constraint,
        enforcement: impl IntoIterator<Item = Literal>,
    ) -> Result<(), ModelError> {
        let enforcement: Box<[Literal]> = enforcement.into_iter().collect();

        for literal in enforcement.iter().copied().chain(constraint.literals()) {
            self.check_literal(literal)?;
        }
        for variable in constraint.variables() {
            self.check_variable(variable)?;
        }
        self.check_operands(&constraint)?;

        debug!(
            "Adding {} constraint with {} enforcement literals",
            constraint.kind(),
            enforcement.len()
        );
        self.model.constraints.push(ModelConstraint {
            constraint,
            enforcement,
        });

        Ok(())
    }

    /// Sets the expression to minimise, which is required to lie within `[lower, upper]`.
    pub fn set_objective(
        &mut self,
        expression: LinearExpression,
        lower: i64,
        upper: i64,
    ) -> Result<(), ModelError> {
        if self.model.objective.is_some() {
            return Err(ModelError::ObjectiveAlreadySet);
        }
        if lower > upper {
            return Err(ModelError::InvalidBounds { lower, upper });
        }
        for variable in expression.variables() {
            self.check_variable(variable)?;
        }

        self.model.objective = Some(Objective {
            expression,
            lower,
            upper,
        });

        Ok(())
    }

    pub fn build(self) -> Model {
        self.model
    }

    fn check_variable(&self, variable: DomainId) -> Result<(), ModelError> {
        if variable.index() < self.model.domains.len() {
            Ok(())
        } else {
            Err(ModelError::UnknownVariable(variable))
        }
    }

    fn check_literal(&self, literal: Literal) -> Result<(), ModelError> {
        let variable = literal.variable();
        self.check_variable(variable)?;

        if self.model.domains[variable].is_boolean() {
            Ok(())
        } else {
            Err(ModelError::NonBooleanLiteral(variable))
        }
    }

    fn check_operands(&self, constraint: &Constraint) -> Result<(), ModelError> {
        let kind = constraint.kind();
        let at_least_one = |actual: usize| {
            if actual == 0 {
                Err(ModelError::InvalidArity {
                    kind,
                    expected: "at least 1",
                    actual,
                })
            } else {
                Ok(())
            }
        };

        match constraint {
            Constraint::Linear { lower, upper, .. } if lower > upper => {
                Err(ModelError::InvalidBounds {
                    lower: *lower,
                    upper: *upper,
                })
            }
            Constraint::LinMax { exprs, .. } | Constraint::LinMin { exprs, .. } => {
                at_least_one(exprs.len())
            }
            Constraint::IntProd { factors, .. } => at_least_one(factors.len()),
            Constraint::IntDiv { denominator, .. } | Constraint::IntMod { denominator, .. }
                if denominator.can_be_zero(&self.model.domains) =>
            {
                Err(ModelError::DivisorCanBeZero { kind })
            }
            Constraint::NoOverlap2D {
                x_intervals,
                y_intervals,
            } if x_intervals.len() != y_intervals.len() => Err(ModelError::InvalidArity {
                kind,
                expected: "as many y-intervals as x-intervals",
                actual: y_intervals.len(),
            }),
            _ => Ok(()),
        }
    }
}
