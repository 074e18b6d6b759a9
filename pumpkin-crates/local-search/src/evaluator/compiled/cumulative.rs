use std::collections::BTreeMap;

use super::ViolationFunction;
use crate::math::saturate_to_i64;
use crate::model::CumulativeTask;
use crate::DomainId;
use crate::LinearExpression;

/// At every point in time the summed demand of the running tasks does not exceed the capacity.
///
/// The violation integrates the overload over time: for every stretch of time during which the
/// load exceeds the capacity, the excess multiplied by the length of the stretch. A negative
/// capacity can never be met and adds its magnitude.
#[derive(Clone, Debug)]
pub struct Cumulative {
    tasks: Box<[CumulativeTask]>,
    capacity: LinearExpression,
}

impl Cumulative {
    pub(crate) fn new(tasks: Box<[CumulativeTask]>, capacity: LinearExpression) -> Self {
        Cumulative { tasks, capacity }
    }
}

impl ViolationFunction for Cumulative {
    fn compute_violation(&self, solution: &[i64]) -> i64 {
        // The keys are time points and the values the change in load at that time point; the
        // BTreeMap keeps them in chronological order.
        let mut profile: BTreeMap<i128, i128> = BTreeMap::new();

        for task in self.tasks.iter() {
            let Some((start, end)) = task.interval.evaluate(solution) else {
                continue;
            };
            if start == end {
                continue;
            }

            let demand = task.demand.evaluate(solution);
            let at_start = profile.entry(start).or_insert(0);
            *at_start = at_start.saturating_add(demand);
            let at_end = profile.entry(end).or_insert(0);
            *at_end = at_end.saturating_sub(demand);
        }

        let capacity = self.capacity.evaluate(solution);
        let mut violation = if capacity < 0 { -capacity } else { 0 };

        let mut load: i128 = 0;
        let mut previous_time = None;
        for (&time, &change) in profile.iter() {
            if let Some(previous_time) = previous_time {
                if load > capacity {
                    violation = violation
                        .saturating_add((load - capacity).saturating_mul(time - previous_time));
                }
            }

            load = load.saturating_add(change);
            previous_time = Some(time);
        }

        saturate_to_i64(violation)
    }

    fn collect_variables(&self, variables: &mut Vec<DomainId>) {
        for task in self.tasks.iter() {
            variables.extend(task.interval.variables());
            variables.extend(task.demand.variables());
        }
        variables.extend(self.capacity.variables());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::IntervalVariable;

    fn task(start: u32, duration: i64, demand: i64) -> CumulativeTask {
        CumulativeTask {
            interval: IntervalVariable::new(DomainId::new(start), duration),
            demand: demand.into(),
        }
    }

    #[test]
    fn overload_is_integrated_over_time() {
        let cumulative = Cumulative::new(
            Box::new([task(0, 4, 2), task(1, 3, 2), task(2, 2, 1)]),
            LinearExpression::constant(3),
        );

        assert_eq!(0, cumulative.compute_violation(&[0, 4, 0]));
        // Loads: [0, 2) 2, [2, 4) 5, [4, 5) 2.
        assert_eq!(2 * 2, cumulative.compute_violation(&[0, 2, 2]));
    }

    #[test]
    fn capacity_can_be_a_variable() {
        let cumulative = Cumulative::new(
            Box::new([task(0, 2, 3), task(1, 2, 3)]),
            DomainId::new(2).into(),
        );

        assert_eq!(0, cumulative.compute_violation(&[0, 0, 6]));
        assert_eq!(2 * 2, cumulative.compute_violation(&[0, 0, 4]));
        // A negative capacity is also exceeded while no task runs.
        assert_eq!(2 + 5 * 2 + 2 * 3 + 5 * 2, cumulative.compute_violation(&[0, 5, -2]));
    }
}
