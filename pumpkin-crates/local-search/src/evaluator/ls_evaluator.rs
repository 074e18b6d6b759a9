use std::fmt::Display;

use log::debug;
use log::trace;

use super::compiled::CompiledConstraint;
use super::compiled::NonLinearConstraint;
use super::linear::LinearConstraintId;
use super::linear::LinearIncrementalEvaluator;
use super::options::EvaluatorOptions;
use super::options::ObjectiveHandling;
use crate::containers::KeyedVec;
use crate::containers::StorageKey;
use crate::create_statistics_struct;
use crate::model::Constraint;
use crate::model::Model;
use crate::print_pumpkin_assert_warning_message;
use crate::pumpkin_assert_extreme;
use crate::pumpkin_assert_moderate;
use crate::pumpkin_assert_simple;
use crate::statistics::CumulativeMovingAverage;
use crate::statistics::MovingAverage;
use crate::statistics::Statistic;
use crate::statistics::StatisticLogger;
use crate::DomainId;
use crate::LinearExpression;
use crate::Literal;

/// The identifier of a constraint of the [`LsEvaluator`].
///
/// The linear constraints come first, numbered as in the [`LinearIncrementalEvaluator`]; the
/// non-linear constraints follow in the order they were added to the model.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConstraintId {
    id: u32,
}

impl ConstraintId {
    pub const fn new(id: u32) -> Self {
        ConstraintId { id }
    }
}

impl StorageKey for ConstraintId {
    fn index(&self) -> usize {
        self.id as usize
    }

    fn create_from_index(index: usize) -> Self {
        ConstraintId { id: index as u32 }
    }
}

impl Display for ConstraintId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "c{}", self.id)
    }
}

/// When the objective is evaluated as a constraint, it is always the first linear constraint.
const OBJECTIVE_CONSTRAINT: LinearConstraintId = LinearConstraintId::new(0);

create_statistics_struct!(
    /// Statistics on the work done by the [`LsEvaluator`].
    EvaluatorStatistics {
        /// The number of times all violations were computed from scratch
        num_full_recomputations: u64,
        /// The number of committed changes processed by the linear evaluator
        num_linear_updates: u64,
        /// The number of times a non-linear constraint was recomputed after a committed change
        num_non_linear_recomputations: u64,
        /// The average number of linear constraints containing a changed variable
        average_constraints_per_linear_update: CumulativeMovingAverage<u64>,
});

/// Evaluates how far a solution is from satisfying the constraints of a [`Model`], and keeps
/// this up to date while single variables change.
///
/// Every constraint has a violation, which is 0 exactly when it is satisfied. Callers combine
/// the violations with a slice of weights, indexed by [`ConstraintId`]. Besides the violations,
/// the evaluator maintains for every variable the number of violated constraints it occurs in,
/// ignoring the objective.
///
/// The linear constraints (including the Boolean constraints which are linear sums of literals,
/// and optionally the objective) are maintained incrementally by a [`LinearIncrementalEvaluator`].
/// The other constraints are recomputed from the solution when one of their variables changes.
///
/// A committed change of `x` from `old` to `new` is processed by calling
/// [`LsEvaluator::update_linear_scores`] followed by [`LsEvaluator::update_non_linear_violations`]
/// with the solution in which `x` already has the value `new`; each exactly once.
#[derive(Debug)]
pub struct LsEvaluator {
    linear: LinearIncrementalEvaluator,
    has_objective_constraint: bool,
    objective: Option<LinearExpression>,

    non_linear: Vec<NonLinearConstraint>,
    /// The cached violation of each non-linear constraint.
    non_linear_violations: Vec<i64>,
    /// For every variable the indices of the non-linear constraints it occurs in.
    non_linear_by_variable: KeyedVec<DomainId, Vec<usize>>,

    /// For every variable the number of violated constraints, other than the objective, which
    /// contain it.
    num_violated_constraints_per_var: KeyedVec<DomainId, u32>,
    last_update_violation_changes: Vec<ConstraintId>,
    /// Reused buffer for the linear constraints which flipped during an update.
    modified_linear_constraints: Vec<LinearConstraintId>,
    /// Reused buffer for the non-linear constraints affected by an update.
    affected_non_linear: Vec<usize>,

    statistics: EvaluatorStatistics,
}

fn sum_of_literals(literals: &[Literal]) -> LinearExpression {
    let mut offset = 0;
    let terms = literals
        .iter()
        .map(|literal| {
            let (coefficient, literal_offset) = literal.as_linear_term();
            offset += literal_offset;
            (literal.variable(), coefficient)
        })
        .collect::<Vec<_>>();
    LinearExpression::new(terms, offset)
}

/// The Boolean constraints which are sums of literals, and the linear constraint itself, as an
/// expression with bounds.
fn linear_form(constraint: &Constraint) -> Option<(LinearExpression, i64, i64)> {
    let form = match constraint {
        Constraint::Linear {
            expression,
            lower,
            upper,
        } => (expression.clone(), *lower, *upper),
        Constraint::BoolOr(literals) => (sum_of_literals(literals), 1, i64::MAX),
        Constraint::BoolAnd(literals) => {
            let num_literals = literals.len() as i64;
            (sum_of_literals(literals), num_literals, num_literals)
        }
        Constraint::AtMostOne(literals) => (sum_of_literals(literals), i64::MIN, 1),
        Constraint::ExactlyOne(literals) => (sum_of_literals(literals), 1, 1),
        _ => return None,
    };

    Some(form)
}

impl LsEvaluator {
    /// Compiles the constraints of the model. All violations are 0 until
    /// [`LsEvaluator::compute_all_violations`] is called.
    pub fn new(model: &Model, options: EvaluatorOptions) -> LsEvaluator {
        print_pumpkin_assert_warning_message!();

        let mut linear = LinearIncrementalEvaluator::default();

        let has_objective_constraint =
            model.objective().is_some() && options.objective == ObjectiveHandling::AsConstraint;
        if let Some(objective) = model.objective().filter(|_| has_objective_constraint) {
            let constraint = linear.new_constraint(objective.lower, objective.upper);
            pumpkin_assert_moderate!(constraint == OBJECTIVE_CONSTRAINT);
            linear.add_linear_expression(constraint, &objective.expression);
        }

        let mut non_linear = vec![];
        for model_constraint in model.constraints() {
            if let Some((expression, lower, upper)) = linear_form(&model_constraint.constraint) {
                let constraint = linear.new_constraint(lower, upper);
                linear.add_linear_expression(constraint, &expression);
                for &literal in model_constraint.enforcement.iter() {
                    linear.add_enforcement_literal(constraint, literal);
                }
            } else if let Some(compiled) = CompiledConstraint::compile(&model_constraint.constraint)
            {
                non_linear.push(NonLinearConstraint::new(
                    compiled,
                    model_constraint.enforcement.clone(),
                ));
            }
        }

        linear.precompute_compact_view(model.num_variables());

        let mut non_linear_by_variable = KeyedVec::default();
        non_linear_by_variable.resize(model.num_variables(), vec![]);
        for (index, constraint) in non_linear.iter().enumerate() {
            for &variable in constraint.variables() {
                non_linear_by_variable[variable].push(index);
            }
        }

        debug!(
            "Created evaluator with {} linear and {} non-linear constraints over {} variables",
            linear.num_constraints(),
            non_linear.len(),
            model.num_variables()
        );

        let mut num_violated_constraints_per_var = KeyedVec::default();
        num_violated_constraints_per_var.resize(model.num_variables(), 0);

        LsEvaluator {
            linear,
            has_objective_constraint,
            objective: model
                .objective()
                .map(|objective| objective.expression.clone()),
            non_linear_violations: vec![0; non_linear.len()],
            non_linear,
            non_linear_by_variable,
            num_violated_constraints_per_var,
            last_update_violation_changes: vec![],
            modified_linear_constraints: vec![],
            affected_non_linear: vec![],
            statistics: EvaluatorStatistics::default(),
        }
    }

    /// Computes all violations and per-variable counts from scratch.
    pub fn compute_all_violations(&mut self, solution: &[i64]) {
        self.statistics.num_full_recomputations += 1;

        self.linear.compute_initial_activities(solution);
        for (violation, constraint) in self
            .non_linear_violations
            .iter_mut()
            .zip(self.non_linear.iter())
        {
            *violation = constraint.compute_violation(solution);
        }

        self.num_violated_constraints_per_var
            .iter_mut()
            .for_each(|count| *count = 0);
        for index in 0..self.num_evaluation_constraints() {
            let constraint = ConstraintId::create_from_index(index);
            if self.is_violated(constraint) && !self.is_objective_constraint(constraint) {
                self.update_violated_counts(constraint, true);
            }
        }

        self.last_update_violation_changes.clear();
    }

    /// Processes a committed change of `variable` from `old_value` to `new_value` for the linear
    /// constraints; see [`LinearIncrementalEvaluator::update_variable_and_scores`] for the
    /// maintenance of `jump_scores`.
    ///
    /// Resets [`LsEvaluator::last_update_violation_changes`] to the linear constraints whose
    /// violated status flipped.
    ///
    /// The difference `new_value - old_value` has to fit in an `i64`.
    pub fn update_linear_scores(
        &mut self,
        variable: DomainId,
        old_value: i64,
        new_value: i64,
        weights: &[f64],
        jump_deltas: &[i64],
        jump_scores: &mut [f64],
    ) {
        self.statistics.num_linear_updates += 1;
        self.statistics
            .average_constraints_per_linear_update
            .add_term(self.linear.variable_constraints(variable).len() as u64);

        let delta = new_value.checked_sub(old_value);
        pumpkin_assert_simple!(
            delta.is_some(),
            "the change of {variable} from {old_value} to {new_value} overflows"
        );

        self.last_update_violation_changes.clear();
        let mut modified = std::mem::take(&mut self.modified_linear_constraints);
        modified.clear();

        self.linear.update_variable_and_scores(
            variable,
            delta.unwrap_or_default(),
            weights,
            jump_deltas,
            jump_scores,
            &mut modified,
        );

        for &linear_constraint in modified.iter() {
            let constraint = ConstraintId::create_from_index(linear_constraint.index());
            if !self.is_objective_constraint(constraint) {
                let is_violated = self.linear.is_violated(linear_constraint);
                self.update_violated_counts(constraint, is_violated);
            }
            self.last_update_violation_changes.push(constraint);
        }

        self.modified_linear_constraints = modified;
    }

    /// Recomputes the non-linear constraints containing any of `variables` under `solution`, which
    /// contains the committed values.
    ///
    /// The non-linear constraints whose violated status flipped are appended to
    /// [`LsEvaluator::last_update_violation_changes`].
    pub fn update_non_linear_violations(
        &mut self,
        variables: impl IntoIterator<Item = DomainId>,
        solution: &[i64],
    ) {
        pumpkin_assert_extreme!(
            (0..self.linear.num_constraints())
                .map(LinearConstraintId::create_from_index)
                .all(|constraint| self.linear.activity(constraint)
                    == self.linear.compute_activity(constraint, solution)),
            "the incremental linear activities differ from a recomputation"
        );

        let mut affected = std::mem::take(&mut self.affected_non_linear);
        affected.clear();
        for variable in variables {
            affected.extend(self.non_linear_by_variable[variable].iter().copied());
        }
        affected.sort_unstable();
        affected.dedup();

        for &index in affected.iter() {
            self.statistics.num_non_linear_recomputations += 1;

            let old_violation = self.non_linear_violations[index];
            let new_violation = self.non_linear[index].compute_violation(solution);
            self.non_linear_violations[index] = new_violation;

            if (old_violation > 0) != (new_violation > 0) {
                let constraint =
                    ConstraintId::create_from_index(self.linear.num_constraints() + index);
                self.update_violated_counts(constraint, new_violation > 0);
                self.last_update_violation_changes.push(constraint);
            }
        }

        self.affected_non_linear = affected;
    }

    /// The change in the weighted violation if `delta` were added to the value of `variable`.
    ///
    /// Unless `linear_only` is set, the non-linear constraints containing `variable` are
    /// recomputed by temporarily changing `solution`, which is restored before returning.
    /// `solution` should be the solution the violations were last computed for, and the value of
    /// `variable` plus `delta` has to fit in an `i64`.
    pub fn weighted_violation_delta(
        &self,
        linear_only: bool,
        weights: &[f64],
        variable: DomainId,
        delta: i64,
        solution: &mut [i64],
    ) -> f64 {
        let mut weighted_delta = self.linear.weighted_violation_delta(weights, variable, delta);
        if linear_only || self.non_linear_by_variable[variable].is_empty() {
            return weighted_delta;
        }

        let old_value = solution[variable.index()];
        let new_value = old_value.checked_add(delta);
        pumpkin_assert_simple!(
            new_value.is_some(),
            "moving {variable} from {old_value} by {delta} overflows"
        );
        solution[variable.index()] = new_value.unwrap_or_default();

        for &index in self.non_linear_by_variable[variable].iter() {
            let new_violation = self.non_linear[index].compute_violation(solution);
            let weight = weights[self.linear.num_constraints() + index];
            weighted_delta += weight * (new_violation - self.non_linear_violations[index]) as f64;
        }

        solution[variable.index()] = old_value;
        weighted_delta
    }

    /// The sum of all violations, saturating at [`i64::MAX`].
    pub fn sum_of_violations(&self) -> i64 {
        (0..self.num_evaluation_constraints())
            .map(|index| self.violation(ConstraintId::create_from_index(index)))
            .fold(0_i64, i64::saturating_add)
    }

    /// `sum(weights[c] * violation(c))` over all constraints.
    pub fn weighted_violation(&self, weights: &[f64]) -> f64 {
        (0..self.num_evaluation_constraints())
            .map(|index| {
                weights[index] * self.violation(ConstraintId::create_from_index(index)) as f64
            })
            .sum()
    }

    /// The violated constraints, in increasing order of [`ConstraintId`].
    pub fn violated_constraints(&self) -> Vec<ConstraintId> {
        (0..self.num_evaluation_constraints())
            .map(ConstraintId::create_from_index)
            .filter(|&constraint| self.is_violated(constraint))
            .collect()
    }

    pub fn num_violated_constraints_for_var_ignoring_objective(&self, variable: DomainId) -> u32 {
        self.num_violated_constraints_per_var[variable]
    }

    /// Intersects the bounds of the objective constraint with `[lower, upper]`; returns whether
    /// they changed. The violation of the objective reflects the new bounds immediately.
    ///
    /// Does nothing if the objective is not evaluated as a constraint.
    pub fn reduce_objective_bounds(&mut self, lower: i64, upper: i64) -> bool {
        if !self.has_objective_constraint {
            return false;
        }

        let changed = self.linear.reduce_bounds(OBJECTIVE_CONSTRAINT, lower, upper);
        if changed {
            let (lower, upper) = self.linear.bounds(OBJECTIVE_CONSTRAINT);
            trace!("Objective bounds reduced to [{lower}, {upper}]");
        }
        changed
    }

    /// The constraints whose violated status flipped during the last update.
    pub fn last_update_violation_changes(&self) -> &[ConstraintId] {
        &self.last_update_violation_changes
    }

    pub fn violation(&self, constraint: ConstraintId) -> i64 {
        let num_linear = self.linear.num_constraints();
        if constraint.index() < num_linear {
            self.linear
                .violation(LinearConstraintId::create_from_index(constraint.index()))
        } else {
            self.non_linear_violations[constraint.index() - num_linear]
        }
    }

    pub fn is_violated(&self, constraint: ConstraintId) -> bool {
        self.violation(constraint) > 0
    }

    pub fn num_evaluation_constraints(&self) -> usize {
        self.linear.num_constraints() + self.non_linear.len()
    }

    pub fn num_linear_constraints(&self) -> usize {
        self.linear.num_constraints()
    }

    pub fn num_non_linear_constraints(&self) -> usize {
        self.non_linear.len()
    }

    pub fn is_objective_constraint(&self, constraint: ConstraintId) -> bool {
        self.has_objective_constraint && constraint.index() == OBJECTIVE_CONSTRAINT.index()
    }

    /// The value of the objective under `solution`, if the model has one.
    pub fn objective_value(&self, solution: &[i64]) -> Option<i128> {
        self.objective
            .as_ref()
            .map(|objective| objective.evaluate(solution))
    }

    pub fn linear_evaluator(&self) -> &LinearIncrementalEvaluator {
        &self.linear
    }

    /// The non-linear constraints, in the order of their [`ConstraintId`]s.
    pub fn non_linear_constraints(&self) -> &[NonLinearConstraint] {
        &self.non_linear
    }

    pub fn statistics(&self) -> &EvaluatorStatistics {
        &self.statistics
    }

    pub fn log_statistics(&self, statistic_logger: StatisticLogger) {
        self.statistics.log(statistic_logger)
    }

    /// Adds (or removes) one violated constraint to the count of every variable of `constraint`.
    fn update_violated_counts(&mut self, constraint: ConstraintId, is_violated: bool) {
        let num_linear = self.linear.num_constraints();
        if constraint.index() < num_linear {
            let linear_constraint = LinearConstraintId::create_from_index(constraint.index());
            for variable in self.linear.constraint_variables(linear_constraint) {
                change_count(&mut self.num_violated_constraints_per_var[variable], is_violated);
            }
        } else {
            for &variable in self.non_linear[constraint.index() - num_linear].variables() {
                change_count(&mut self.num_violated_constraints_per_var[variable], is_violated);
            }
        }
    }
}

fn change_count(count: &mut u32, increase: bool) {
    if increase {
        *count += 1;
    } else {
        pumpkin_assert_moderate!(*count > 0);
        *count -= 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ModelBuilder;

    fn literals(builder: &mut ModelBuilder, num_literals: usize) -> Vec<Literal> {
        (0..num_literals).map(|_| builder.new_literal()).collect()
    }

    fn evaluator_for(model: &Model) -> LsEvaluator {
        LsEvaluator::new(model, EvaluatorOptions::default())
    }

    #[test]
    fn exactly_one_is_evaluated_as_a_linear_constraint() {
        let mut builder = ModelBuilder::default();
        let literals = literals(&mut builder, 4);
        builder
            .add_constraint(Constraint::ExactlyOne(literals.into()))
            .expect("valid constraint");
        let model = builder.build();

        let mut evaluator = evaluator_for(&model);
        assert_eq!(1, evaluator.num_linear_constraints());
        assert_eq!(0, evaluator.num_non_linear_constraints());

        evaluator.compute_all_violations(&[0, 0, 0, 1]);
        assert_eq!(0, evaluator.sum_of_violations());

        evaluator.compute_all_violations(&[0, 0, 1, 1]);
        assert_eq!(1, evaluator.sum_of_violations());
    }

    #[test]
    fn disjunction_with_negated_literals() {
        let mut builder = ModelBuilder::default();
        let literals = literals(&mut builder, 4);
        let clause = vec![literals[0], !literals[1], literals[2], !literals[3]];
        builder
            .add_constraint(Constraint::BoolOr(clause.into()))
            .expect("valid constraint");
        let model = builder.build();

        let mut evaluator = evaluator_for(&model);

        evaluator.compute_all_violations(&[0, 1, 0, 1]);
        assert_eq!(1, evaluator.sum_of_violations());
        evaluator.compute_all_violations(&[0, 0, 0, 1]);
        assert_eq!(0, evaluator.sum_of_violations());
        evaluator.compute_all_violations(&[0, 1, 0, 0]);
        assert_eq!(0, evaluator.sum_of_violations());
    }

    #[test]
    fn violated_constraints_are_ordered_linear_first() {
        let mut builder = ModelBuilder::default();
        let x = builder.new_interval_variable(0, 5).expect("non-empty domain");
        let y = builder.new_interval_variable(0, 5).expect("non-empty domain");
        builder
            .add_constraint(Constraint::AllDifferent(
                vec![LinearExpression::from(x), LinearExpression::from(y)].into(),
            ))
            .expect("valid constraint");
        builder
            .add_constraint(Constraint::Linear {
                expression: LinearExpression::new([(x, 1), (y, 1)], 0),
                lower: 0,
                upper: 3,
            })
            .expect("valid constraint");
        let model = builder.build();

        let mut evaluator = evaluator_for(&model);
        evaluator.compute_all_violations(&[2, 2]);

        // The linear constraint is violated by 1, the all-different by 1.
        assert_eq!(
            vec![ConstraintId::new(0), ConstraintId::new(1)],
            evaluator.violated_constraints()
        );
        assert_eq!(2, evaluator.num_violated_constraints_for_var_ignoring_objective(x));
        assert_eq!(3.5, evaluator.weighted_violation(&[1.5, 2.0]));
    }

    #[test]
    fn objective_is_the_first_constraint_and_not_counted() {
        let mut builder = ModelBuilder::default();
        let x = builder.new_interval_variable(0, 10).expect("non-empty domain");
        builder
            .set_objective(LinearExpression::from(x), 0, 10)
            .expect("valid objective");
        let model = builder.build();

        let mut evaluator = evaluator_for(&model);
        evaluator.compute_all_violations(&[6]);
        let objective = ConstraintId::new(0);

        assert!(evaluator.is_objective_constraint(objective));
        assert_eq!(Some(6), evaluator.objective_value(&[6]));
        assert_eq!(0, evaluator.violation(objective));

        assert!(evaluator.reduce_objective_bounds(i64::MIN, 4));
        assert!(!evaluator.reduce_objective_bounds(i64::MIN, 5));
        assert_eq!(2, evaluator.violation(objective));
        assert_eq!(0, evaluator.num_violated_constraints_for_var_ignoring_objective(x));
    }

    #[test]
    fn ignored_objective_is_not_a_constraint() {
        let mut builder = ModelBuilder::default();
        let x = builder.new_interval_variable(0, 10).expect("non-empty domain");
        builder
            .set_objective(LinearExpression::from(x), 0, 10)
            .expect("valid objective");
        let model = builder.build();

        let mut evaluator = LsEvaluator::new(
            &model,
            EvaluatorOptions {
                objective: ObjectiveHandling::Ignore,
            },
        );
        evaluator.compute_all_violations(&[3]);

        assert_eq!(0, evaluator.num_evaluation_constraints());
        assert!(!evaluator.reduce_objective_bounds(0, 1));
        assert_eq!(Some(3), evaluator.objective_value(&[3]));
    }

    #[test]
    fn committed_changes_update_violations_and_counts() {
        let mut builder = ModelBuilder::default();
        let x = builder.new_interval_variable(0, 5).expect("non-empty domain");
        let y = builder.new_interval_variable(0, 5).expect("non-empty domain");
        builder
            .add_constraint(Constraint::AllDifferent(
                vec![LinearExpression::from(x), LinearExpression::from(y)].into(),
            ))
            .expect("valid constraint");
        builder
            .add_constraint(Constraint::Linear {
                expression: LinearExpression::new([(x, 1), (y, -1)], 0),
                lower: 1,
                upper: i64::MAX,
            })
            .expect("valid constraint");
        let model = builder.build();

        let mut evaluator = evaluator_for(&model);
        let mut solution = vec![2, 2];
        evaluator.compute_all_violations(&solution);
        assert_eq!(2, evaluator.sum_of_violations());

        let weights = [1.0, 1.0];
        let predicted = evaluator.weighted_violation_delta(false, &weights, x, 1, &mut solution);
        assert_eq!(vec![2, 2], solution);
        assert_eq!(-2.0, predicted);
        assert_eq!(
            -1.0,
            evaluator.weighted_violation_delta(true, &weights, x, 1, &mut solution)
        );

        let jump_deltas = [0, 0];
        let mut jump_scores = [0.0, 0.0];
        solution[0] = 3;
        evaluator.update_linear_scores(x, 2, 3, &weights, &jump_deltas, &mut jump_scores);
        evaluator.update_non_linear_violations([x], &solution);

        assert_eq!(0, evaluator.sum_of_violations());
        assert_eq!(
            &[ConstraintId::new(0), ConstraintId::new(1)],
            evaluator.last_update_violation_changes()
        );
        assert_eq!(0, evaluator.num_violated_constraints_for_var_ignoring_objective(x));
        assert_eq!(0, evaluator.num_violated_constraints_for_var_ignoring_objective(y));
        assert_eq!(1, evaluator.statistics().num_linear_updates);
        assert_eq!(1, evaluator.statistics().num_non_linear_recomputations);
    }

    #[test]
    fn enforced_structural_constraint() {
        let mut builder = ModelBuilder::default();
        let enforcement = builder.new_literal();
        let x = builder.new_interval_variable(0, 5).expect("non-empty domain");
        builder
            .add_enforced_constraint(
                Constraint::AllDifferent(
                    vec![LinearExpression::from(x), LinearExpression::from(x)].into(),
                ),
                [enforcement],
            )
            .expect("valid constraint");
        let model = builder.build();

        let mut evaluator = evaluator_for(&model);
        evaluator.compute_all_violations(&[0, 1]);
        assert_eq!(0, evaluator.sum_of_violations());

        let mut solution = vec![1, 1];
        evaluator.compute_all_violations(&solution);
        assert_eq!(1, evaluator.sum_of_violations());
        assert_eq!(
            1,
            evaluator.num_violated_constraints_for_var_ignoring_objective(enforcement.variable())
        );
        assert_eq!(
            -1.0,
            evaluator.weighted_violation_delta(
                false,
                &[1.0],
                enforcement.variable(),
                -1,
                &mut solution
            )
        );
    }

    #[test]
    fn shared_structural_constraint_is_recomputed_once() {
        let mut builder = ModelBuilder::default();
        let x = builder.new_interval_variable(0, 5).expect("non-empty domain");
        let y = builder.new_interval_variable(0, 5).expect("non-empty domain");
        builder
            .add_constraint(Constraint::AllDifferent(
                vec![LinearExpression::from(x), LinearExpression::from(y)].into(),
            ))
            .expect("valid constraint");
        let model = builder.build();

        let mut evaluator = evaluator_for(&model);
        let mut solution = vec![2, 2];
        evaluator.compute_all_violations(&solution);
        assert_eq!(1, evaluator.num_violated_constraints_for_var_ignoring_objective(x));
        assert_eq!(1, evaluator.num_violated_constraints_for_var_ignoring_objective(y));

        solution[0] = 1;
        solution[1] = 3;
        evaluator.update_non_linear_violations([x, y], &solution);

        assert_eq!(1, evaluator.statistics().num_non_linear_recomputations);
        assert_eq!(
            &[ConstraintId::new(0)],
            evaluator.last_update_violation_changes()
        );
        assert_eq!(0, evaluator.num_violated_constraints_for_var_ignoring_objective(x));
        assert_eq!(0, evaluator.num_violated_constraints_for_var_ignoring_objective(y));
        assert_eq!(0, evaluator.sum_of_violations());
    }

    #[test]
    #[should_panic(expected = "overflows")]
    fn committing_an_overflowing_change_panics() {
        let mut builder = ModelBuilder::default();
        let x = builder
            .new_interval_variable(i64::MIN, i64::MAX)
            .expect("non-empty domain");
        builder
            .add_constraint(Constraint::Linear {
                expression: LinearExpression::from(x),
                lower: 0,
                upper: i64::MAX,
            })
            .expect("valid constraint");
        let model = builder.build();

        let mut evaluator = evaluator_for(&model);
        evaluator.compute_all_violations(&[i64::MIN]);

        let mut jump_scores = [0.0];
        evaluator.update_linear_scores(x, i64::MIN, i64::MAX, &[1.0], &[0], &mut jump_scores);
    }

    #[test]
    #[should_panic(expected = "overflows")]
    fn evaluating_an_overflowing_move_panics() {
        let mut builder = ModelBuilder::default();
        let x = builder
            .new_interval_variable(i64::MIN, i64::MAX)
            .expect("non-empty domain");
        let y = builder.new_interval_variable(0, 5).expect("non-empty domain");
        builder
            .add_constraint(Constraint::AllDifferent(
                vec![LinearExpression::from(x), LinearExpression::from(y)].into(),
            ))
            .expect("valid constraint");
        let model = builder.build();

        let mut evaluator = evaluator_for(&model);
        let mut solution = vec![i64::MAX, 0];
        evaluator.compute_all_violations(&solution);

        let _ = evaluator.weighted_violation_delta(false, &[1.0], x, 1, &mut solution);
    }
}
