//! # Pumpkin local search
//! Incremental evaluation of constraint violations, the core of a local-search (feasibility
//! jump) worker.
//!
//! A [`model::Model`] is built once through a [`model::ModelBuilder`]. Every worker then creates
//! its own [`evaluator::LsEvaluator`], which scores a complete assignment by the violation of each
//! constraint and keeps these scores up to date while the search changes one variable at a time.
//! The linear constraints are maintained incrementally; the structural constraints (all-different,
//! no-overlap, cumulative, circuit, ...) are recomputed when one of their variables changes.
//!
//! # Example
//! ```
//! # use pumpkin_local_search::evaluator::EvaluatorOptions;
//! # use pumpkin_local_search::evaluator::LsEvaluator;
//! # use pumpkin_local_search::model::Constraint;
//! # use pumpkin_local_search::model::ModelBuilder;
//! let mut builder = ModelBuilder::default();
//! let literals = (0..4).map(|_| builder.new_literal()).collect::<Vec<_>>();
//! builder
//!     .add_constraint(Constraint::ExactlyOne(literals.into()))
//!     .unwrap();
//! let model = builder.build();
//!
//! let mut evaluator = LsEvaluator::new(&model, EvaluatorOptions::default());
//!
//! evaluator.compute_all_violations(&[0, 0, 0, 1]);
//! assert_eq!(evaluator.sum_of_violations(), 0);
//!
//! evaluator.compute_all_violations(&[0, 0, 1, 1]);
//! assert_eq!(evaluator.sum_of_violations(), 1);
//! ```
mod basic_types;
pub mod containers;
pub(crate) mod math;
#[doc(hidden)]
pub mod pumpkin_asserts;

pub mod evaluator;
pub mod model;
pub mod statistics;

pub use convert_case;

pub use crate::basic_types::*;
