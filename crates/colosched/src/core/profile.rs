//! Ranked view of the three resource dimensions of an app or a machine.

use std::cmp::Reverse;

use ordered_float::OrderedFloat;

use crate::core::common::{MatchMode, Resource};

pub const DIMENSIONS: usize = 3;

/// Resource dimensions ordered from the largest value to the smallest one.
///
/// For an app this is the list of its most needed resources, for a machine the list of its most underutilized ones.
pub type Signature = [Resource; DIMENSIONS];

/// Stores mean CPU, mean memory and disk values ranked in descending order.
#[derive(Clone, Debug, PartialEq)]
pub struct ResourceProfile {
    ranked: [(Resource, f64); DIMENSIONS],
}

impl ResourceProfile {
    /// Creates profile, ties keep the cpu, mem, disk order.
    pub fn new(mean_cpu: f64, mean_mem: f64, disk: f64) -> Self {
        let mut ranked = [(Resource::Cpu, mean_cpu), (Resource::Mem, mean_mem), (Resource::Disk, disk)];
        ranked.sort_by_key(|&(_, value)| Reverse(OrderedFloat(value)));
        Self { ranked }
    }

    /// Creates profile from per-slot CPU and memory sequences and a disk value.
    pub fn from_series(cpu: &[f64], mem: &[f64], disk: f64) -> Self {
        Self::new(mean(cpu), mean(mem), disk)
    }

    /// Returns the value of the specified dimension.
    pub fn get(&self, resource: Resource) -> f64 {
        self.ranked
            .iter()
            .find(|(r, _)| *r == resource)
            .map(|(_, value)| *value)
            .unwrap_or_default()
    }

    pub fn ranked(&self) -> &[(Resource, f64)] {
        &self.ranked
    }

    pub fn signature(&self) -> Signature {
        self.ranked.map(|(resource, _)| resource)
    }

    /// Returns the smallest of the three values.
    pub fn least(&self) -> f64 {
        self.ranked[DIMENSIONS - 1].1
    }

    /// Returns the sum of the three values.
    pub fn total(&self) -> f64 {
        self.ranked.iter().map(|(_, value)| value).sum()
    }
}

/// Checks whether a machine with signature `machine` is a packing candidate for an app with signature `app`.
pub fn signatures_match(machine: &Signature, app: &Signature, mode: MatchMode) -> bool {
    match mode {
        MatchMode::Strict => machine == app,
        MatchMode::Relaxed => machine.iter().all(|resource| app.contains(resource)),
    }
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranks_descending() {
        let profile = ResourceProfile::new(10., 30., 20.);
        assert_eq!(profile.signature(), [Resource::Mem, Resource::Disk, Resource::Cpu]);
        assert_eq!(
            profile.ranked(),
            [(Resource::Mem, 30.), (Resource::Disk, 20.), (Resource::Cpu, 10.)]
        );
        assert_eq!(profile.least(), 10.);
        assert_eq!(profile.total(), 60.);
        assert_eq!(profile.get(Resource::Disk), 20.);
    }

    #[test]
    fn ties_keep_input_order() {
        let profile = ResourceProfile::new(5., 5., 5.);
        assert_eq!(profile.signature(), [Resource::Cpu, Resource::Mem, Resource::Disk]);

        let profile = ResourceProfile::new(1., 7., 7.);
        assert_eq!(profile.signature(), [Resource::Mem, Resource::Disk, Resource::Cpu]);
    }

    #[test]
    fn profile_from_series_uses_means() {
        let profile = ResourceProfile::from_series(&[1., 3.], &[10., 20.], 4.);
        assert_eq!(profile.get(Resource::Cpu), 2.);
        assert_eq!(profile.get(Resource::Mem), 15.);
        assert_eq!(profile.signature(), [Resource::Mem, Resource::Disk, Resource::Cpu]);
    }

    #[test]
    fn strict_match_requires_same_order() {
        let a = [Resource::Cpu, Resource::Mem, Resource::Disk];
        let b = [Resource::Mem, Resource::Cpu, Resource::Disk];
        assert!(signatures_match(&a, &a, MatchMode::Strict));
        assert!(!signatures_match(&a, &b, MatchMode::Strict));
        assert!(signatures_match(&a, &b, MatchMode::Relaxed));
    }
}
