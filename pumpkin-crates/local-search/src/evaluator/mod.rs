//! Evaluation of the violations of a [`Model`](crate::model::Model) under a complete solution.
//!
//! The [`LsEvaluator`] is the entry point; it delegates the linear constraints to the
//! [`LinearIncrementalEvaluator`] and the structural constraints to the [`compiled`] violation
//! functions.
pub mod compiled;
mod linear;
mod ls_evaluator;
mod options;

pub use linear::LinearConstraintId;
pub use linear::LinearIncrementalEvaluator;
pub use ls_evaluator::ConstraintId;
pub use ls_evaluator::EvaluatorStatistics;
pub use ls_evaluator::LsEvaluator;
pub use options::EvaluatorOptions;
pub use options::ObjectiveHandling;
