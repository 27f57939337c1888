//! Machine state: time-indexed resource ledger and resident instances.

use indexmap::IndexMap;

use crate::core::app::App;
use crate::core::profile::{ResourceProfile, Signature};

/// Stores remaining machine capacity (per-slot CPU and memory, scalar disk) and the instances residing on it.
///
/// Residents are split into good ones, which passed the constraint check when placed, and bad ones, which violate
/// constraints and wait for repair. Only good residents take part in interference checks.
#[derive(Clone, Debug)]
pub struct Machine {
    id: String,
    cpu: Vec<f64>,
    mem: Vec<f64>,
    disk: f64,
    profile: ResourceProfile,
    good: IndexMap<String, Vec<String>>,
    bad: IndexMap<String, Vec<String>>,
}

impl Machine {
    /// Creates machine with flat CPU and memory capacity replicated over `time_frame` slots.
    pub fn new(id: &str, cpu: f64, mem: f64, disk: f64, time_frame: usize) -> Self {
        Self::with_series(id, vec![cpu; time_frame], vec![mem; time_frame], disk)
    }

    /// Creates machine with arbitrary per-slot capacity.
    pub fn with_series(id: &str, cpu: Vec<f64>, mem: Vec<f64>, disk: f64) -> Self {
        let profile = ResourceProfile::from_series(&cpu, &mem, disk);
        Self {
            id: id.to_string(),
            cpu,
            mem,
            disk,
            profile,
            good: IndexMap::new(),
            bad: IndexMap::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Remaining CPU capacity per slot.
    pub fn cpu(&self) -> &[f64] {
        &self.cpu
    }

    /// Remaining memory capacity per slot.
    pub fn mem(&self) -> &[f64] {
        &self.mem
    }

    pub fn disk(&self) -> f64 {
        self.disk
    }

    pub fn profile(&self) -> &ResourceProfile {
        &self.profile
    }

    /// Returns the most underutilized resources of the machine.
    pub fn signature(&self) -> Signature {
        self.profile.signature()
    }

    /// Returns the sum of mean remaining CPU, mean remaining memory and remaining disk.
    pub fn total(&self) -> f64 {
        self.profile.total()
    }

    /// Checks if the most constrained dimension has less than `margin` left.
    pub fn is_full(&self, margin: f64) -> bool {
        self.profile.least() < margin
    }

    /// Subtracts app demand from the remaining capacity.
    ///
    /// Does not check bounds, legality must be checked before.
    pub fn deduct(&mut self, app: &App) {
        for (capacity, demand) in self.cpu.iter_mut().zip(app.cpu()) {
            *capacity -= demand;
        }
        for (capacity, demand) in self.mem.iter_mut().zip(app.mem()) {
            *capacity -= demand;
        }
        self.disk -= app.disk();
        self.refresh_profile();
    }

    /// Returns app demand to the remaining capacity, the exact inverse of [`deduct`](Machine::deduct).
    pub fn restore(&mut self, app: &App) {
        for (capacity, demand) in self.cpu.iter_mut().zip(app.cpu()) {
            *capacity += demand;
        }
        for (capacity, demand) in self.mem.iter_mut().zip(app.mem()) {
            *capacity += demand;
        }
        self.disk += app.disk();
        self.refresh_profile();
    }

    fn refresh_profile(&mut self) {
        self.profile = ResourceProfile::from_series(&self.cpu, &self.mem, self.disk);
    }

    /// Valid residents grouped by app, in order of arrival.
    pub fn good_residents(&self) -> &IndexMap<String, Vec<String>> {
        &self.good
    }

    /// Residents violating constraints grouped by app, in order of arrival.
    pub fn bad_residents(&self) -> &IndexMap<String, Vec<String>> {
        &self.bad
    }

    /// Returns the number of valid residents of the specified app.
    pub fn resident_count(&self, app_id: &str) -> usize {
        self.good.get(app_id).map_or(0, Vec::len)
    }

    pub fn has_bad_residents(&self) -> bool {
        !self.bad.is_empty()
    }

    pub(crate) fn add_good(&mut self, app_id: &str, instance_id: &str) {
        self.good
            .entry(app_id.to_string())
            .or_default()
            .push(instance_id.to_string());
    }

    pub(crate) fn add_bad(&mut self, app_id: &str, instance_id: &str) {
        self.bad
            .entry(app_id.to_string())
            .or_default()
            .push(instance_id.to_string());
    }

    /// Removes bad resident, dropping the app entry once it becomes empty.
    pub(crate) fn remove_bad(&mut self, app_id: &str, instance_id: &str) -> bool {
        let Some(instances) = self.bad.get_mut(app_id) else {
            return false;
        };
        let Some(pos) = instances.iter().position(|id| id == instance_id) else {
            return false;
        };
        instances.remove(pos);
        if instances.is_empty() {
            self.bad.shift_remove(app_id);
        }
        true
    }
}
