use std::cmp::Ordering;
use std::fmt::Display;

use log::debug;
use log::warn;

use crate::containers::HashMap;
use crate::containers::HashSet;
use crate::containers::KeyedVec;
use crate::containers::StorageKey;
use crate::math::distance_to_interval;
use crate::math::NumExt;
use crate::pumpkin_assert_moderate;
use crate::pumpkin_assert_simple;
use crate::Domain;
use crate::DomainId;
use crate::LinearExpression;
use crate::Literal;

/// The identifier of a constraint of the [`LinearIncrementalEvaluator`]; identifiers are handed
/// out sequentially starting at 0.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LinearConstraintId {
    id: u32,
}

impl LinearConstraintId {
    pub const fn new(id: u32) -> Self {
        LinearConstraintId { id }
    }
}

impl StorageKey for LinearConstraintId {
    fn index(&self) -> usize {
        self.id as usize
    }

    fn create_from_index(index: usize) -> Self {
        LinearConstraintId { id: index as u32 }
    }
}

impl Display for LinearConstraintId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "l{}", self.id)
    }
}

/// Maintains the activity `offset + sum(coefficient * value)` of a set of linear constraints
/// `lower <= activity <= upper` while single variables change their value.
///
/// The violation of a constraint is the distance of its activity to `[lower, upper]`, or 0 when
/// one of its enforcement literals is false.
///
/// The evaluator goes through two phases. While *accepting*, constraints, terms and enforcement
/// literals can be added; coefficients of a variable which occurs more than once in a constraint
/// are summed. [`LinearIncrementalEvaluator::precompute_compact_view`] then freezes the terms
/// into flat row (constraint to variables) and column (variable to constraints) arrays, after
/// which the evaluator can be queried and updated but no longer extended.
///
/// Activities are stored with 128 bits, so a sum of 64-bit products cannot wrap. The only
/// arithmetic which can overflow is the accumulation of a coefficient itself; in that case the
/// coefficient saturates and the variable is reported by
/// [`LinearIncrementalEvaluator::var_is_consistent`].
#[derive(Debug, Default)]
pub struct LinearIncrementalEvaluator {
    /// The terms of each constraint during the accepting phase.
    pending: KeyedVec<LinearConstraintId, PendingConstraint>,
    /// Whether [`LinearIncrementalEvaluator::precompute_compact_view`] has been called.
    finalized: bool,

    /// For each constraint the variables it contains, sorted by variable.
    rows: CompactAdjacency<RowEntry>,
    /// For each variable the constraints containing it, sorted by constraint.
    columns: CompactAdjacency<ColumnEntry>,
    enforcement: KeyedVec<LinearConstraintId, Vec<Literal>>,

    offsets: KeyedVec<LinearConstraintId, i128>,
    bounds: KeyedVec<LinearConstraintId, (i64, i64)>,
    activities: KeyedVec<LinearConstraintId, i128>,
    /// The number of enforcement literals of each constraint which are currently false.
    num_false_enforcement: KeyedVec<LinearConstraintId, i32>,

    inconsistent_variables: HashSet<DomainId>,
    inconsistent_constraints: HashSet<LinearConstraintId>,
}

/// A constraint which is still accepting terms.
#[derive(Clone, Debug, Default)]
struct PendingConstraint {
    entries: Vec<PendingEntry>,
    positions: HashMap<DomainId, usize>,
}

impl PendingConstraint {
    fn entry_mut(&mut self, variable: DomainId) -> &mut PendingEntry {
        let position = *self.positions.entry(variable).or_insert_with(|| {
            self.entries.push(PendingEntry {
                variable,
                coefficient: 0,
                literal_shift: 0,
            });
            self.entries.len() - 1
        });

        &mut self.entries[position]
    }
}

#[derive(Clone, Copy, Debug)]
struct PendingEntry {
    variable: DomainId,
    coefficient: i64,
    literal_shift: i32,
}

/// A variable of a constraint, with its accumulated coefficient and the change in the number of
/// false enforcement literals of the constraint when the variable increases.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct RowEntry {
    variable: DomainId,
    coefficient: i64,
    literal_shift: i32,
}

/// A constraint containing a variable; the transpose of [`RowEntry`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct ColumnEntry {
    constraint: LinearConstraintId,
    coefficient: i64,
    literal_shift: i32,
}

/// A list of lists stored in one flat array; list `i` is `entries[starts[i]..starts[i + 1]]`.
#[derive(Clone, Debug)]
struct CompactAdjacency<Entry> {
    starts: Vec<usize>,
    entries: Vec<Entry>,
}

impl<Entry> Default for CompactAdjacency<Entry> {
    fn default() -> Self {
        CompactAdjacency {
            starts: vec![0],
            entries: vec![],
        }
    }
}

impl<Entry> CompactAdjacency<Entry> {
    fn from_lists(lists: impl IntoIterator<Item = Vec<Entry>>) -> Self {
        let mut adjacency = CompactAdjacency::default();
        for list in lists {
            adjacency.entries.extend(list);
            adjacency.starts.push(adjacency.entries.len());
        }
        adjacency
    }

    fn get(&self, index: usize) -> &[Entry] {
        match (self.starts.get(index), self.starts.get(index + 1)) {
            (Some(&start), Some(&end)) => &self.entries[start..end],
            _ => &[],
        }
    }
}

/// The change in the number of false enforcement literals when a variable with the given shift
/// moves by `delta`; enforcement literals are over 0-1 variables so only the direction matters.
fn enforcement_change(literal_shift: i32, delta: i64) -> i32 {
    match delta.cmp(&0) {
        Ordering::Greater => literal_shift,
        Ordering::Less => -literal_shift,
        Ordering::Equal => 0,
    }
}

impl LinearIncrementalEvaluator {
    /// Creates a new constraint `lower <= 0 <= upper` without any terms.
    pub fn new_constraint(&mut self, lower: i64, upper: i64) -> LinearConstraintId {
        self.assert_accepting();

        let _ = self.offsets.push(0);
        let _ = self.bounds.push((lower, upper));
        let _ = self.enforcement.push(vec![]);
        self.pending.push(PendingConstraint::default())
    }

    /// Adds `coefficient * variable` to the constraint.
    ///
    /// Should the accumulated coefficient of `variable` overflow, it saturates and both the
    /// variable and the constraint are marked as inconsistent.
    pub fn add_term(
        &mut self,
        constraint: LinearConstraintId,
        variable: DomainId,
        coefficient: i64,
    ) {
        self.assert_accepting();

        let entry = self.pending[constraint].entry_mut(variable);
        match entry.coefficient.checked_add(coefficient) {
            Some(sum) => entry.coefficient = sum,
            None => {
                entry.coefficient = entry.coefficient.saturating_add(coefficient);
                warn!(
                    "The coefficient of {variable} in linear constraint {constraint} overflowed, its evaluation is no longer exact"
                );
                let _ = self.inconsistent_variables.insert(variable);
                let _ = self.inconsistent_constraints.insert(constraint);
            }
        }
    }

    pub fn add_offset(&mut self, constraint: LinearConstraintId, offset: i64) {
        self.assert_accepting();
        self.offsets[constraint] += i128::from(offset);
    }

    pub fn add_linear_expression(
        &mut self,
        constraint: LinearConstraintId,
        expression: &LinearExpression,
    ) {
        self.add_offset(constraint, expression.offset());
        for &(variable, coefficient) in expression.terms() {
            self.add_term(constraint, variable, coefficient);
        }
    }

    /// The constraint only needs to hold while `literal` is true.
    pub fn add_enforcement_literal(&mut self, constraint: LinearConstraintId, literal: Literal) {
        self.assert_accepting();

        self.pending[constraint]
            .entry_mut(literal.variable())
            .literal_shift += literal.falsified_on_increase();
        self.enforcement[constraint].push(literal);
    }

    /// Freezes the constraints into the compact row and column view. Afterwards no constraints,
    /// terms or enforcement literals can be added.
    ///
    /// Variables with index `num_variables` or larger may not occur in any constraint.
    pub fn precompute_compact_view(&mut self, num_variables: usize) {
        self.assert_accepting();
        self.finalized = true;

        let pending = std::mem::take(&mut self.pending);
        let mut columns: Vec<Vec<ColumnEntry>> = vec![vec![]; num_variables];

        let rows = pending.iter_with_keys().map(|(constraint, pending)| {
            let mut row: Vec<RowEntry> = pending
                .entries
                .iter()
                .filter(|entry| entry.coefficient != 0 || entry.literal_shift != 0)
                .map(|entry| RowEntry {
                    variable: entry.variable,
                    coefficient: entry.coefficient,
                    literal_shift: entry.literal_shift,
                })
                .collect();
            row.sort_unstable_by_key(|entry| entry.variable);

            for entry in row.iter() {
                pumpkin_assert_simple!(
                    entry.variable.index() < num_variables,
                    "{} occurs in {constraint} but only {num_variables} variables exist",
                    entry.variable
                );
                columns[entry.variable.index()].push(ColumnEntry {
                    constraint,
                    coefficient: entry.coefficient,
                    literal_shift: entry.literal_shift,
                });
            }

            row
        });
        self.rows = CompactAdjacency::from_lists(rows.collect::<Vec<_>>());
        self.columns = CompactAdjacency::from_lists(columns);

        self.activities = KeyedVec::from(self.offsets.as_slice().to_vec());
        self.num_false_enforcement = KeyedVec::from(vec![0; self.num_constraints()]);

        debug!(
            "Compacted {} linear constraints with {} non-zero entries over {num_variables} variables",
            self.num_constraints(),
            self.rows.entries.len()
        );
    }

    /// Sets the activities and enforcement status of all constraints from scratch.
    pub fn compute_initial_activities(&mut self, solution: &[i64]) {
        self.assert_finalized();

        for constraint in self.offsets.keys() {
            self.activities[constraint] = self.compute_activity(constraint, solution);
            self.num_false_enforcement[constraint] = self.enforcement[constraint]
                .iter()
                .filter(|literal| !literal.is_true_in(solution))
                .count() as i32;
        }
    }

    /// The change in `sum(weights[c] * violation(c))` if `delta` were added to the value of
    /// `variable`. Nothing is modified.
    pub fn weighted_violation_delta(&self, weights: &[f64], variable: DomainId, delta: i64) -> f64 {
        self.columns
            .get(variable.index())
            .iter()
            .map(|entry| {
                let old_violation = self.violation(entry.constraint);
                let new_violation = self.violation_after(
                    entry.constraint,
                    entry.coefficient,
                    entry.literal_shift,
                    delta,
                );
                weights[entry.constraint.index()] * (new_violation - old_violation) as f64
            })
            .sum()
    }

    /// Commits `delta` to the value of `variable`.
    ///
    /// For every other variable `v` sharing a constraint with `variable`, `jump_scores[v]` is
    /// kept equal to the weighted violation delta of moving `v` by `jump_deltas[v]`. The
    /// constraints whose violated status flipped are appended to `modified_constraints`.
    pub fn update_variable_and_scores(
        &mut self,
        variable: DomainId,
        delta: i64,
        weights: &[f64],
        jump_deltas: &[i64],
        jump_scores: &mut [f64],
        modified_constraints: &mut Vec<LinearConstraintId>,
    ) {
        self.assert_finalized();

        for &column in self.columns.get(variable.index()) {
            let constraint = column.constraint;
            let weight = weights[constraint.index()];
            let was_violated = self.is_violated(constraint);

            self.add_row_jump_scores(constraint, variable, -weight, jump_deltas, jump_scores);

            self.activities[constraint] = self.activities[constraint]
                .saturating_add(i128::from(column.coefficient) * i128::from(delta));
            self.num_false_enforcement[constraint] +=
                enforcement_change(column.literal_shift, delta);
            pumpkin_assert_moderate!(self.num_false_enforcement[constraint] >= 0);

            self.add_row_jump_scores(constraint, variable, weight, jump_deltas, jump_scores);

            if was_violated != self.is_violated(constraint) {
                modified_constraints.push(constraint);
            }
        }
    }

    /// Adds `weight` times the current violation delta of each variable in the row of
    /// `constraint`, other than `skip`, to its jump score.
    fn add_row_jump_scores(
        &self,
        constraint: LinearConstraintId,
        skip: DomainId,
        weight: f64,
        jump_deltas: &[i64],
        jump_scores: &mut [f64],
    ) {
        let violation = self.violation(constraint);
        for row in self.rows.get(constraint.index()) {
            if row.variable == skip {
                continue;
            }

            let jump_violation = self.violation_after(
                constraint,
                row.coefficient,
                row.literal_shift,
                jump_deltas[row.variable.index()],
            );
            jump_scores[row.variable.index()] += weight * (jump_violation - violation) as f64;
        }
    }

    /// The values at which the violation of some constraint containing `variable`, viewed as a
    /// function of `variable` alone, changes its slope.
    ///
    /// The result is sorted, deduplicated, always contains the endpoints of the intervals of
    /// `explore_domain`, and otherwise only values strictly between the bounds of
    /// `explore_domain` which it contains. `current_value` is the value `variable` has in the
    /// solution the activities were computed for.
    pub fn slope_breakpoints(
        &self,
        variable: DomainId,
        current_value: i64,
        explore_domain: &Domain,
    ) -> Vec<i64> {
        let mut breakpoints: Vec<i64> = explore_domain.flattened_endpoints().collect();
        if explore_domain.size() <= 2 {
            breakpoints.dedup();
            return breakpoints;
        }

        let (min, max) = (explore_domain.min(), explore_domain.max());
        for entry in self.columns.get(variable.index()) {
            if entry.coefficient == 0 || !self.is_enforced(entry.constraint) {
                continue;
            }

            let coefficient = i128::from(entry.coefficient);
            let base = self.activities[entry.constraint] - coefficient * i128::from(current_value);
            let (lower, upper) = self.bounds[entry.constraint];

            for bound in [lower, upper] {
                if bound == i64::MIN || bound == i64::MAX {
                    continue;
                }

                let target = i128::from(bound) - base;
                for crossing in [
                    NumExt::div_floor(target, coefficient),
                    NumExt::div_ceil(target, coefficient),
                ] {
                    if let Ok(value) = i64::try_from(crossing) {
                        if min < value && value < max && explore_domain.contains(value) {
                            breakpoints.push(value);
                        }
                    }
                }
            }
        }

        breakpoints.sort_unstable();
        breakpoints.dedup();
        breakpoints
    }

    /// False iff an accumulated coefficient of `variable` overflowed.
    pub fn var_is_consistent(&self, variable: DomainId) -> bool {
        !self.inconsistent_variables.contains(&variable)
    }

    /// False iff an accumulated coefficient of `constraint` overflowed.
    pub fn constraint_is_consistent(&self, constraint: LinearConstraintId) -> bool {
        !self.inconsistent_constraints.contains(&constraint)
    }

    pub fn num_constraints(&self) -> usize {
        self.offsets.len()
    }

    pub fn activity(&self, constraint: LinearConstraintId) -> i128 {
        self.activities[constraint]
    }

    pub fn bounds(&self, constraint: LinearConstraintId) -> (i64, i64) {
        self.bounds[constraint]
    }

    /// Whether none of the enforcement literals of the constraint is false.
    pub fn is_enforced(&self, constraint: LinearConstraintId) -> bool {
        self.num_false_enforcement[constraint] == 0
    }

    pub fn violation(&self, constraint: LinearConstraintId) -> i64 {
        if !self.is_enforced(constraint) {
            return 0;
        }

        let (lower, upper) = self.bounds[constraint];
        distance_to_interval(self.activities[constraint], lower, upper)
    }

    pub fn is_violated(&self, constraint: LinearConstraintId) -> bool {
        self.violation(constraint) > 0
    }

    /// Intersects the bounds of the constraint with `[lower, upper]`; returns whether they
    /// changed. The violation immediately reflects the new bounds.
    pub fn reduce_bounds(
        &mut self,
        constraint: LinearConstraintId,
        lower: i64,
        upper: i64,
    ) -> bool {
        let (old_lower, old_upper) = self.bounds[constraint];
        let new_bounds = (old_lower.max(lower), old_upper.min(upper));

        self.bounds[constraint] = new_bounds;
        new_bounds != (old_lower, old_upper)
    }

    /// The variables with a non-zero coefficient or an enforcement literal in the constraint.
    pub fn constraint_variables(
        &self,
        constraint: LinearConstraintId,
    ) -> impl ExactSizeIterator<Item = DomainId> + '_ {
        self.rows
            .get(constraint.index())
            .iter()
            .map(|entry| entry.variable)
    }

    /// The constraints in which `variable` has a non-zero coefficient or an enforcement literal.
    pub fn variable_constraints(
        &self,
        variable: DomainId,
    ) -> impl ExactSizeIterator<Item = LinearConstraintId> + '_ {
        self.columns
            .get(variable.index())
            .iter()
            .map(|entry| entry.constraint)
    }

    /// The activity of the constraint under `solution`, computed from scratch.
    pub(crate) fn compute_activity(
        &self,
        constraint: LinearConstraintId,
        solution: &[i64],
    ) -> i128 {
        self.rows
            .get(constraint.index())
            .iter()
            .fold(self.offsets[constraint], |activity, entry| {
                activity.saturating_add(
                    i128::from(entry.coefficient) * i128::from(solution[entry.variable.index()]),
                )
            })
    }

    fn violation_after(
        &self,
        constraint: LinearConstraintId,
        coefficient: i64,
        literal_shift: i32,
        delta: i64,
    ) -> i64 {
        let num_false =
            self.num_false_enforcement[constraint] + enforcement_change(literal_shift, delta);
        if num_false > 0 {
            return 0;
        }

        let activity = self.activities[constraint]
            .saturating_add(i128::from(coefficient) * i128::from(delta));
        let (lower, upper) = self.bounds[constraint];
        distance_to_interval(activity, lower, upper)
    }

    fn assert_accepting(&self) {
        pumpkin_assert_simple!(
            !self.finalized,
            "linear constraints cannot be changed after the compact view is computed"
        );
    }

    fn assert_finalized(&self) {
        pumpkin_assert_simple!(
            self.finalized,
            "the compact view should be computed before evaluating linear constraints"
        );
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::SmallRng;
    use rand::Rng;
    use rand::SeedableRng;

    use super::*;

    const X: DomainId = DomainId::new(0);
    const Y: DomainId = DomainId::new(1);

    fn full_weighted_violation(evaluator: &LinearIncrementalEvaluator, weights: &[f64]) -> f64 {
        evaluator
            .offsets
            .keys()
            .map(|constraint| weights[constraint.index()] * evaluator.violation(constraint) as f64)
            .sum()
    }

    #[test]
    fn violation_is_distance_to_bounds() {
        let mut evaluator = LinearIncrementalEvaluator::default();
        let constraint = evaluator.new_constraint(1, 4);
        evaluator.add_linear_expression(constraint, &LinearExpression::new([(X, 2), (Y, 3)], 0));
        evaluator.precompute_compact_view(2);

        for (solution, expected) in [([0, 0], 1), ([2, 0], 0), ([2, 3], 9)] {
            evaluator.compute_initial_activities(&solution);
            assert_eq!(expected, evaluator.violation(constraint));
        }
    }

    #[test]
    fn breakpoints_are_where_the_bounds_are_crossed() {
        let mut evaluator = LinearIncrementalEvaluator::default();
        let first = evaluator.new_constraint(1, 4);
        evaluator.add_linear_expression(first, &LinearExpression::new([(X, 2), (Y, 3)], 0));
        let second = evaluator.new_constraint(1, 20);
        evaluator.add_linear_expression(second, &LinearExpression::new([(X, 7), (Y, 8)], 0));
        evaluator.precompute_compact_view(2);
        evaluator.compute_initial_activities(&[0, 0]);

        let breakpoints = evaluator.slope_breakpoints(Y, 0, &Domain::new(-5, 8));

        assert_eq!(vec![-5, 0, 1, 2, 3, 8], breakpoints);
    }

    #[test]
    fn breakpoints_skip_holes_in_the_explored_domain() {
        let mut evaluator = LinearIncrementalEvaluator::default();
        let constraint = evaluator.new_constraint(i64::MIN, 4);
        evaluator.add_term(constraint, Y, 2);
        evaluator.precompute_compact_view(2);
        evaluator.compute_initial_activities(&[0, 0]);

        let breakpoints = evaluator.slope_breakpoints(
            Y,
            0,
            &Domain::from_intervals([(-5, 1), (4, 8)]),
        );

        assert_eq!(vec![-5, 1, 4, 8], breakpoints);
    }

    #[test]
    fn repeated_terms_are_accumulated() {
        let mut evaluator = LinearIncrementalEvaluator::default();
        let constraint = evaluator.new_constraint(0, 0);
        evaluator.add_term(constraint, X, 3);
        evaluator.add_term(constraint, Y, 1);
        evaluator.add_term(constraint, X, -3);
        evaluator.precompute_compact_view(2);

        assert_eq!(vec![Y], evaluator.constraint_variables(constraint).collect::<Vec<_>>());
        assert_eq!(0, evaluator.variable_constraints(X).len());
    }

    #[test]
    fn coefficient_overflow_only_marks_the_variable_and_constraint() {
        let mut evaluator = LinearIncrementalEvaluator::default();
        let overflowing = evaluator.new_constraint(0, 10);
        evaluator.add_term(overflowing, X, i64::MAX);
        evaluator.add_term(overflowing, X, 1);
        evaluator.add_term(overflowing, Y, 1);
        let other = evaluator.new_constraint(0, 10);
        evaluator.add_term(other, Y, 1);
        evaluator.precompute_compact_view(2);
        evaluator.compute_initial_activities(&[0, 5]);

        assert!(!evaluator.var_is_consistent(X));
        assert!(evaluator.var_is_consistent(Y));
        assert!(!evaluator.constraint_is_consistent(overflowing));
        assert!(evaluator.constraint_is_consistent(other));
        assert_eq!(0, evaluator.violation(other));
    }

    #[test]
    fn false_enforcement_literal_deactivates_the_constraint() {
        let enforcement = DomainId::new(2);
        let mut evaluator = LinearIncrementalEvaluator::default();
        let constraint = evaluator.new_constraint(i64::MIN, 0);
        evaluator.add_term(constraint, X, 1);
        evaluator.add_enforcement_literal(constraint, Literal::new(enforcement));
        evaluator.precompute_compact_view(3);
        evaluator.compute_initial_activities(&[5, 0, 0]);

        assert!(!evaluator.is_enforced(constraint));
        assert_eq!(0, evaluator.violation(constraint));
        assert_eq!(5.0, evaluator.weighted_violation_delta(&[1.0], enforcement, 1));

        let mut modified = vec![];
        evaluator.update_variable_and_scores(
            enforcement,
            1,
            &[1.0],
            &[0; 3],
            &mut [0.0; 3],
            &mut modified,
        );

        assert_eq!(5, evaluator.violation(constraint));
        assert_eq!(vec![constraint], modified);
    }

    #[test]
    fn negated_enforcement_literal_of_a_term_variable() {
        let mut evaluator = LinearIncrementalEvaluator::default();
        // !x -> x + y >= 3
        let constraint = evaluator.new_constraint(3, i64::MAX);
        evaluator.add_term(constraint, X, 1);
        evaluator.add_term(constraint, Y, 1);
        evaluator.add_enforcement_literal(constraint, !Literal::new(X));
        evaluator.precompute_compact_view(2);
        evaluator.compute_initial_activities(&[1, 0]);

        assert_eq!(0, evaluator.violation(constraint));
        assert_eq!(3.0, evaluator.weighted_violation_delta(&[1.0], X, -1));
    }

    #[test]
    fn reducing_bounds_updates_the_violation() {
        let mut evaluator = LinearIncrementalEvaluator::default();
        let constraint = evaluator.new_constraint(i64::MIN, i64::MAX);
        evaluator.add_term(constraint, X, 1);
        evaluator.precompute_compact_view(1);
        evaluator.compute_initial_activities(&[7]);

        assert!(evaluator.reduce_bounds(constraint, i64::MIN, 5));
        assert_eq!(2, evaluator.violation(constraint));
        assert!(!evaluator.reduce_bounds(constraint, i64::MIN, 6));
        assert_eq!((i64::MIN, 5), evaluator.bounds(constraint));
    }

    #[test]
    #[should_panic(expected = "cannot be changed after the compact view")]
    fn adding_terms_after_compaction_panics() {
        let mut evaluator = LinearIncrementalEvaluator::default();
        let constraint = evaluator.new_constraint(0, 0);
        evaluator.precompute_compact_view(1);

        evaluator.add_term(constraint, X, 1);
    }

    #[test]
    fn incremental_updates_match_recomputation() {
        let num_variables = 5;
        let mut rng = SmallRng::seed_from_u64(42);

        for _ in 0..20 {
            let mut evaluator = LinearIncrementalEvaluator::default();
            let num_constraints = rng.gen_range(1..5);
            for _ in 0..num_constraints {
                let lower = rng.gen_range(-10..5);
                let constraint = evaluator.new_constraint(lower, lower + rng.gen_range(0..6));
                evaluator.add_offset(constraint, rng.gen_range(-3..=3));
                for _ in 0..rng.gen_range(1..5) {
                    let variable = DomainId::new(rng.gen_range(1..num_variables));
                    evaluator.add_term(constraint, variable, rng.gen_range(-4..=4));
                }
                if rng.gen_bool(0.5) {
                    let literal = Literal::new(DomainId::new(0));
                    evaluator.add_enforcement_literal(
                        constraint,
                        if rng.gen_bool(0.5) { literal } else { !literal },
                    );
                }
            }
            evaluator.precompute_compact_view(num_variables as usize);

            let weights: Vec<f64> = (0..num_constraints)
                .map(|_| rng.gen_range(1..4) as f64)
                .collect();
            let mut solution: Vec<i64> = (0..num_variables).map(|_| rng.gen_range(0..2)).collect();
            evaluator.compute_initial_activities(&solution);

            for _ in 0..30 {
                let variable = DomainId::new(rng.gen_range(0..num_variables));
                let new_value = if variable.index() == 0 {
                    1 - solution[0]
                } else {
                    rng.gen_range(-5..=5)
                };
                let delta = new_value - solution[variable.index()];

                let jump_deltas: Vec<i64> = solution
                    .iter()
                    .enumerate()
                    .map(|(index, &value)| if index == 0 { 1 - 2 * value } else { 1 })
                    .collect();
                let mut jump_scores: Vec<f64> = (0..num_variables)
                    .map(|index| {
                        evaluator.weighted_violation_delta(
                            &weights,
                            DomainId::new(index),
                            jump_deltas[index as usize],
                        )
                    })
                    .collect();

                let before = full_weighted_violation(&evaluator, &weights);
                let predicted = evaluator.weighted_violation_delta(&weights, variable, delta);

                let mut modified = vec![];
                evaluator.update_variable_and_scores(
                    variable,
                    delta,
                    &weights,
                    &jump_deltas,
                    &mut jump_scores,
                    &mut modified,
                );
                solution[variable.index()] = new_value;

                let after = full_weighted_violation(&evaluator, &weights);
                assert!((predicted - (after - before)).abs() < 1e-9);

                for constraint in evaluator.offsets.keys() {
                    assert_eq!(
                        evaluator.compute_activity(constraint, &solution),
                        evaluator.activity(constraint)
                    );
                }

                for other in (0..num_variables).map(DomainId::new) {
                    if other == variable {
                        continue;
                    }
                    let expected = evaluator.weighted_violation_delta(
                        &weights,
                        other,
                        jump_deltas[other.index()],
                    );
                    assert!((expected - jump_scores[other.index()]).abs() < 1e-9);
                }
            }
        }
    }
}
