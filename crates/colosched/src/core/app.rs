//! Application kind with time-varying resource demand.

use crate::core::common::Resource;
use crate::core::error::{PlanError, Result};
use crate::core::profile::{ResourceProfile, Signature};

/// Stores app demand (per-slot CPU and memory, scalar disk) and the lists of its placed and unplaced instances.
///
/// Every instance of the app is in exactly one of the two lists.
#[derive(Clone, Debug)]
pub struct App {
    id: String,
    cpu: Vec<f64>,
    mem: Vec<f64>,
    disk: f64,
    profile: ResourceProfile,
    placed: Vec<String>,
    unplaced: Vec<String>,
}

impl App {
    /// Creates app, both demand sequences must have exactly `time_frame` slots.
    pub fn new(id: &str, cpu: Vec<f64>, mem: Vec<f64>, disk: f64, time_frame: usize) -> Result<Self> {
        for (resource, series) in [(Resource::Cpu, &cpu), (Resource::Mem, &mem)] {
            if series.len() != time_frame {
                return Err(PlanError::DemandLength {
                    app_id: id.to_string(),
                    resource,
                    expected: time_frame,
                    actual: series.len(),
                });
            }
        }
        let profile = ResourceProfile::from_series(&cpu, &mem, disk);
        Ok(Self {
            id: id.to_string(),
            cpu,
            mem,
            disk,
            profile,
            placed: Vec::new(),
            unplaced: Vec::new(),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn cpu(&self) -> &[f64] {
        &self.cpu
    }

    pub fn mem(&self) -> &[f64] {
        &self.mem
    }

    pub fn disk(&self) -> f64 {
        self.disk
    }

    pub fn profile(&self) -> &ResourceProfile {
        &self.profile
    }

    /// Returns the most needed resources of the app.
    pub fn signature(&self) -> Signature {
        self.profile.signature()
    }

    /// Returns the sum of mean CPU, mean memory and disk demand.
    pub fn total(&self) -> f64 {
        self.profile.total()
    }

    /// Instances currently considered placed (including invalid residents pending repair).
    pub fn placed(&self) -> &[String] {
        &self.placed
    }

    pub fn unplaced(&self) -> &[String] {
        &self.unplaced
    }

    pub fn has_unplaced(&self) -> bool {
        !self.unplaced.is_empty()
    }

    pub(crate) fn add_placed(&mut self, instance_id: &str) {
        self.placed.push(instance_id.to_string());
    }

    pub(crate) fn add_unplaced(&mut self, instance_id: &str) {
        self.unplaced.push(instance_id.to_string());
    }

    /// Moves instance from the unplaced list to the placed list.
    pub(crate) fn mark_placed(&mut self, instance_id: &str) -> bool {
        move_between(&mut self.unplaced, &mut self.placed, instance_id)
    }

    /// Moves instance from the placed list to the unplaced list.
    pub(crate) fn mark_unplaced(&mut self, instance_id: &str) -> bool {
        move_between(&mut self.placed, &mut self.unplaced, instance_id)
    }
}

fn move_between(from: &mut Vec<String>, to: &mut Vec<String>, instance_id: &str) -> bool {
    match from.iter().position(|id| id == instance_id) {
        Some(pos) => {
            to.push(from.remove(pos));
            true
        }
        None => false,
    }
}
