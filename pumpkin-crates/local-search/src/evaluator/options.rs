/// Options which determine how the [`LsEvaluator`] is built from a model.
///
/// [`LsEvaluator`]: super::LsEvaluator
#[derive(Debug, Clone, Copy, Default)]
pub struct EvaluatorOptions {
    /// How the objective of the model, if any, is evaluated.
    pub objective: ObjectiveHandling,
}

/// What the evaluator does with the objective of the model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum ObjectiveHandling {
    /// The objective becomes linear constraint 0, requiring it to lie within its bounds. The
    /// bounds can be tightened during search with [`LsEvaluator::reduce_objective_bounds`].
    ///
    /// [`LsEvaluator::reduce_objective_bounds`]: super::LsEvaluator::reduce_objective_bounds
    #[default]
    AsConstraint,
    /// Only the constraints are evaluated; the objective can still be read with
    /// [`LsEvaluator::objective_value`].
    ///
    /// [`LsEvaluator::objective_value`]: super::LsEvaluator::objective_value
    Ignore,
}
