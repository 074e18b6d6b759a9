use super::Domain;
use super::DomainId;
use crate::containers::KeyedVec;
use crate::containers::StorageKey;
use crate::pumpkin_assert_simple;

/// A complete assignment of the variables of a model: the domain of every variable and the value
/// it currently takes.
///
/// Every value is always contained in the domain of its variable; committing a value outside of
/// the domain is a programming error and panics.
#[derive(Clone, Debug)]
pub struct Assignment {
    domains: KeyedVec<DomainId, Domain>,
    values: Vec<i64>,
}

impl Assignment {
    /// Creates an assignment in which every variable takes the value of its domain that is
    /// closest to zero.
    pub fn new(domains: KeyedVec<DomainId, Domain>) -> Assignment {
        let values = domains
            .iter()
            .map(|domain| domain.closest_value(0))
            .collect();

        Assignment { domains, values }
    }

    /// Creates an assignment with the given starting values.
    pub fn with_values(domains: KeyedVec<DomainId, Domain>, values: Vec<i64>) -> Assignment {
        pumpkin_assert_simple!(
            domains.len() == values.len(),
            "expected {} values but received {}",
            domains.len(),
            values.len()
        );

        let assignment = Assignment { domains, values };
        for variable in assignment.domains.keys() {
            assignment.assert_in_domain(variable, assignment.value(variable));
        }

        assignment
    }

    pub fn num_variables(&self) -> usize {
        self.values.len()
    }

    pub fn domain(&self, variable: DomainId) -> &Domain {
        &self.domains[variable]
    }

    pub fn value(&self, variable: DomainId) -> i64 {
        self.values[variable.index()]
    }

    /// The values of all variables, indexed by [`DomainId`].
    pub fn values(&self) -> &[i64] {
        &self.values
    }

    /// Commits `value` for `variable` and returns the value it replaced.
    pub fn set_value(&mut self, variable: DomainId, value: i64) -> i64 {
        self.assert_in_domain(variable, value);
        std::mem::replace(&mut self.values[variable.index()], value)
    }

    fn assert_in_domain(&self, variable: DomainId, value: i64) {
        pumpkin_assert_simple!(
            self.domains[variable].contains(value),
            "value {value} is not in the domain {} of {variable}",
            self.domains[variable]
        );
    }
}
