use thiserror::Error;

use super::DomainId;
#[cfg(doc)]
use crate::model::ModelBuilder;

/// Errors related to building a model with the [`ModelBuilder`].
///
/// These are reported before any evaluation starts; a model that was built successfully can always
/// be evaluated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// A variable was created with a domain that contains no values.
    #[error("cannot create a variable with an empty domain")]
    EmptyDomain,
    /// A constraint or the objective refers to a variable which was not created by the builder.
    #[error("variable {0} is not part of the model")]
    UnknownVariable(DomainId),
    /// A literal (or enforcement literal) refers to a variable whose domain is not within 0..1.
    #[error("variable {0} is used as a literal but its domain is not 0-1")]
    NonBooleanLiteral(DomainId),
    /// A constraint received the wrong number of operands.
    #[error("a {kind} constraint expects {expected} operands but received {actual}")]
    InvalidArity {
        kind: &'static str,
        expected: &'static str,
        actual: usize,
    },
    /// The divisor of a division or modulo constraint can evaluate to zero.
    #[error("the divisor of the {kind} constraint can be zero")]
    DivisorCanBeZero { kind: &'static str },
    /// A linear constraint or objective has a lower bound which exceeds its upper bound.
    #[error("the bounds [{lower}, {upper}] are empty")]
    InvalidBounds { lower: i64, upper: i64 },
    /// The objective was set more than once.
    #[error("the model already has an objective")]
    ObjectiveAlreadySet,
}
