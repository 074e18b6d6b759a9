use super::ViolationFunction;
use crate::math::saturate_to_i64;
use crate::model::IntervalVariable;
use crate::DomainId;

/// No two present intervals overlap.
///
/// The violation is the sum over all pairs of present intervals of the length of their overlap.
#[derive(Clone, Debug)]
pub struct NoOverlap {
    intervals: Box<[IntervalVariable]>,
}

impl NoOverlap {
    pub(crate) fn new(intervals: Box<[IntervalVariable]>) -> Self {
        NoOverlap { intervals }
    }
}

impl ViolationFunction for NoOverlap {
    fn compute_violation(&self, solution: &[i64]) -> i64 {
        let mut intervals: Vec<(i128, i128)> = self
            .intervals
            .iter()
            .filter_map(|interval| interval.evaluate(solution))
            .collect();
        intervals.sort_unstable();

        let mut overlap: i128 = 0;
        for (index, &(_, end)) in intervals.iter().enumerate() {
            for &(other_start, other_end) in &intervals[index + 1..] {
                // Sorted by start, so no later interval overlaps either.
                if other_start >= end {
                    break;
                }
                overlap = overlap.saturating_add(end.min(other_end) - other_start);
            }
        }

        saturate_to_i64(overlap)
    }

    fn collect_variables(&self, variables: &mut Vec<DomainId>) {
        variables.extend(self.intervals.iter().flat_map(IntervalVariable::variables))
    }
}

/// No two present boxes overlap, where box `i` is `x_intervals[i] × y_intervals[i]`; a box is
/// present when both its intervals are.
///
/// The violation is the sum over all pairs of present boxes of the area of their intersection.
#[derive(Clone, Debug)]
pub struct NoOverlap2D {
    x_intervals: Box<[IntervalVariable]>,
    y_intervals: Box<[IntervalVariable]>,
}

impl NoOverlap2D {
    pub(crate) fn new(
        x_intervals: Box<[IntervalVariable]>,
        y_intervals: Box<[IntervalVariable]>,
    ) -> Self {
        NoOverlap2D {
            x_intervals,
            y_intervals,
        }
    }
}

impl ViolationFunction for NoOverlap2D {
    fn compute_violation(&self, solution: &[i64]) -> i64 {
        let mut boxes: Vec<((i128, i128), (i128, i128))> = self
            .x_intervals
            .iter()
            .zip(self.y_intervals.iter())
            .filter_map(|(x, y)| Some((x.evaluate(solution)?, y.evaluate(solution)?)))
            .collect();
        boxes.sort_unstable();

        let mut area: i128 = 0;
        for (index, &((_, x_end), (y_start, y_end))) in boxes.iter().enumerate() {
            for &((other_x_start, other_x_end), (other_y_start, other_y_end)) in
                &boxes[index + 1..]
            {
                if other_x_start >= x_end {
                    break;
                }

                let width = x_end.min(other_x_end) - other_x_start;
                let height = y_end.min(other_y_end) - y_start.max(other_y_start);
                if width > 0 && height > 0 {
                    area = area.saturating_add(width.saturating_mul(height));
                }
            }
        }

        saturate_to_i64(area)
    }

    fn collect_variables(&self, variables: &mut Vec<DomainId>) {
        variables.extend(
            self.x_intervals
                .iter()
                .chain(self.y_intervals.iter())
                .flat_map(IntervalVariable::variables),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Literal;

    fn intervals_of_length(length: i64, num_intervals: u32) -> Box<[IntervalVariable]> {
        (0..num_intervals)
            .map(|id| IntervalVariable::new(DomainId::new(id), length))
            .collect()
    }

    #[test]
    fn overlap_lengths_are_summed() {
        let no_overlap = NoOverlap::new(intervals_of_length(4, 3));

        assert_eq!(0, no_overlap.compute_violation(&[0, 4, 8]));
        assert_eq!(4, no_overlap.compute_violation(&[0, 2, 4]));
        assert_eq!(4, no_overlap.compute_violation(&[4, 2, 0]));
        assert_eq!(12, no_overlap.compute_violation(&[1, 1, 1]));
    }

    #[test]
    fn absent_intervals_are_ignored() {
        let presence = Literal::new(DomainId::new(2));
        let no_overlap = NoOverlap::new(Box::new([
            IntervalVariable::new(DomainId::new(0), 5_i64),
            IntervalVariable::optional(DomainId::new(1), 5_i64, presence),
        ]));

        assert_eq!(0, no_overlap.compute_violation(&[0, 2, 0]));
        assert_eq!(3, no_overlap.compute_violation(&[0, 2, 1]));
    }

    #[test]
    fn overlap_areas_are_summed() {
        let y_intervals = (2..4)
            .map(|id| IntervalVariable::new(DomainId::new(id), 3_i64))
            .collect();
        let no_overlap = NoOverlap2D::new(intervals_of_length(2, 2), y_intervals);

        // Boxes [0, 2) x [0, 3) and [1, 3) x [1, 4).
        assert_eq!(2, no_overlap.compute_violation(&[0, 1, 0, 1]));
        // Touching boxes do not overlap.
        assert_eq!(0, no_overlap.compute_violation(&[0, 2, 0, 0]));
        // Overlapping on a single axis is allowed.
        assert_eq!(0, no_overlap.compute_violation(&[0, 0, 0, 3]));
    }
}
