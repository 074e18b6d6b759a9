use std::fmt::Display;

use itertools::Itertools;

use crate::pumpkin_assert_simple;

/// The admissible values of a variable: a sorted list of disjoint, non-adjacent, inclusive
/// intervals. Holes between the intervals are values the variable may never take.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Domain {
    intervals: Box<[(i64, i64)]>,
}

impl Domain {
    /// The interval `[lower_bound, upper_bound]`; empty if `lower_bound > upper_bound`.
    pub fn new(lower_bound: i64, upper_bound: i64) -> Domain {
        Domain::from_intervals([(lower_bound, upper_bound)])
    }

    pub fn boolean() -> Domain {
        Domain::new(0, 1)
    }

    /// Creates a domain from arbitrary, possibly overlapping, intervals. Empty intervals are
    /// dropped.
    pub fn from_intervals(intervals: impl IntoIterator<Item = (i64, i64)>) -> Domain {
        let intervals = intervals
            .into_iter()
            .filter(|(lower, upper)| lower <= upper)
            .sorted_unstable()
            .coalesce(|previous, current| {
                if current.0 <= previous.1.saturating_add(1) {
                    Ok((previous.0, previous.1.max(current.1)))
                } else {
                    Err((previous, current))
                }
            })
            .collect();

        Domain { intervals }
    }

    pub fn from_values(values: impl IntoIterator<Item = i64>) -> Domain {
        Domain::from_intervals(values.into_iter().map(|value| (value, value)))
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    pub fn intervals(&self) -> &[(i64, i64)] {
        &self.intervals
    }

    pub fn min(&self) -> i64 {
        pumpkin_assert_simple!(!self.is_empty(), "an empty domain has no minimum");
        self.intervals[0].0
    }

    pub fn max(&self) -> i64 {
        pumpkin_assert_simple!(!self.is_empty(), "an empty domain has no maximum");
        self.intervals[self.intervals.len() - 1].1
    }

    /// Whether every value of the domain is 0 or 1.
    pub fn is_boolean(&self) -> bool {
        !self.is_empty() && self.min() >= 0 && self.max() <= 1
    }

    pub fn contains(&self, value: i64) -> bool {
        // The first interval whose upper bound is at least `value` is the only candidate.
        let position = self.intervals.partition_point(|&(_, upper)| upper < value);
        position < self.intervals.len() && self.intervals[position].0 <= value
    }

    /// The number of values in the domain, saturating at [`u64::MAX`].
    pub fn size(&self) -> u64 {
        self.intervals
            .iter()
            .map(|&(lower, upper)| (upper as i128 - lower as i128 + 1) as u128)
            .fold(0_u64, |acc, size| {
                acc.saturating_add(u64::try_from(size).unwrap_or(u64::MAX))
            })
    }

    /// The interval endpoints, in increasing order: `[l0, u0, l1, u1, ...]`.
    pub fn flattened_endpoints(&self) -> impl Iterator<Item = i64> + '_ {
        self.intervals
            .iter()
            .flat_map(|&(lower, upper)| [lower, upper])
    }

    /// The value of the domain closest to `value`; ties are broken towards the smaller value.
    pub fn closest_value(&self, value: i64) -> i64 {
        pumpkin_assert_simple!(!self.is_empty(), "an empty domain has no closest value");

        let position = self.intervals.partition_point(|&(_, upper)| upper < value);
        if position == self.intervals.len() {
            return self.max();
        }

        let (lower, _) = self.intervals[position];
        if lower <= value {
            return value;
        }
        if position == 0 {
            return lower;
        }

        let previous_upper = self.intervals[position - 1].1;
        if value as i128 - previous_upper as i128 <= lower as i128 - value as i128 {
            previous_upper
        } else {
            lower
        }
    }
}

impl Display for Domain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let intervals = self.intervals.iter().format_with(", ", |&(lower, upper), f| {
            if lower == upper {
                f(&format_args!("{lower}"))
            } else {
                f(&format_args!("{lower}..{upper}"))
            }
        });
        write!(f, "{{{intervals}}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlapping_and_adjacent_intervals_are_merged() {
        let domain = Domain::from_intervals([(5, 7), (0, 2), (3, 3), (10, 12), (11, 15)]);

        assert_eq!(&[(0, 3), (5, 7), (10, 15)], domain.intervals());
        assert_eq!(13, domain.size());
    }

    #[test]
    fn holes_are_not_contained() {
        let domain = Domain::from_values([1, 2, 5, 9]);

        assert!(domain.contains(2));
        assert!(!domain.contains(3));
        assert!(!domain.contains(0));
        assert!(domain.contains(9));
        assert!(!domain.contains(10));
        assert_eq!(vec![1, 2, 5, 5, 9, 9], domain.flattened_endpoints().collect::<Vec<_>>());
    }

    #[test]
    fn closest_value_prefers_the_smaller_on_ties() {
        let domain = Domain::from_values([-3, 3, 10]);

        assert_eq!(-3, domain.closest_value(0));
        assert_eq!(3, domain.closest_value(5));
        assert_eq!(10, domain.closest_value(7));
        assert_eq!(10, domain.closest_value(100));
        assert_eq!(-3, domain.closest_value(-100));
    }

    #[test]
    fn size_saturates_for_huge_domains() {
        let domain = Domain::from_intervals([(i64::MIN, -1), (1, i64::MAX)]);

        assert_eq!(u64::MAX, domain.size());
        assert!(!domain.contains(0));
    }

    #[test]
    fn domains_are_displayed_as_interval_lists() {
        assert_eq!("{0..2, 5}", Domain::from_values([0, 1, 2, 5]).to_string());
        assert_eq!("{}", Domain::new(1, 0).to_string());
    }
}
