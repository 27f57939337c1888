//! Cluster state owned by the planner.

use indexmap::IndexMap;
use log::trace;

use crate::core::app::App;
use crate::core::common::{Assignment, PlacementVerdict};
use crate::core::config::PlannerConfig;
use crate::core::constraint::check_placement;
use crate::core::error::{PlanError, Result};
use crate::core::instance::Instance;
use crate::core::interference::InterferenceTable;
use crate::core::machine::Machine;

/// Result of registering an instance from the existing plan.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InitialPlacement {
    Unplaced,
    Valid,
    Invalid,
}

/// Instance residing on a machine where it violates constraints.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BadResident {
    pub machine_id: String,
    pub app_id: String,
    pub instance_id: String,
}

/// Stores apps, machines and instances (all in registration order) and the interference table.
///
/// All entity references are checked when entities are registered, so the scheduling stages can index the
/// registries directly.
#[derive(Clone, Debug)]
pub struct Cluster {
    time_frame: usize,
    safety_margin: f64,
    apps: IndexMap<String, App>,
    machines: IndexMap<String, Machine>,
    instances: IndexMap<String, Instance>,
    interference: InterferenceTable,
}

impl Cluster {
    pub fn new(config: &PlannerConfig) -> Self {
        Self {
            time_frame: config.time_frame,
            safety_margin: config.safety_margin,
            apps: IndexMap::new(),
            machines: IndexMap::new(),
            instances: IndexMap::new(),
            interference: InterferenceTable::new(),
        }
    }

    pub fn time_frame(&self) -> usize {
        self.time_frame
    }

    pub fn safety_margin(&self) -> f64 {
        self.safety_margin
    }

    /// Registers app with per-slot CPU and memory demand and disk demand.
    pub fn add_app(&mut self, id: &str, cpu: Vec<f64>, mem: Vec<f64>, disk: f64) -> Result<()> {
        if self.apps.contains_key(id) {
            return Err(PlanError::DuplicateApp { app_id: id.to_string() });
        }
        let app = App::new(id, cpu, mem, disk, self.time_frame)?;
        self.apps.insert(id.to_string(), app);
        Ok(())
    }

    /// Registers machine with flat CPU and memory capacity and disk capacity.
    pub fn add_machine(&mut self, id: &str, cpu: f64, mem: f64, disk: f64) -> Result<()> {
        if self.machines.contains_key(id) {
            return Err(PlanError::DuplicateMachine {
                machine_id: id.to_string(),
            });
        }
        self.machines
            .insert(id.to_string(), Machine::new(id, cpu, mem, disk, self.time_frame));
        Ok(())
    }

    /// Adds interference limit of `app_b` instances in presence of `app_a`.
    pub fn add_interference(&mut self, app_a: &str, app_b: &str, k: u32) -> Result<()> {
        self.app(app_a)?;
        self.app(app_b)?;
        self.interference.insert(app_a, app_b, k);
        Ok(())
    }

    /// Registers instance from the existing plan.
    ///
    /// An instance assigned to a machine is checked against the current machine state and becomes either a valid or
    /// an invalid resident. In both cases the app demand is deducted from the machine, since the instance occupies it
    /// until repaired.
    pub fn add_instance(&mut self, id: &str, app_id: &str, machine_id: Option<&str>) -> Result<InitialPlacement> {
        if self.instances.contains_key(id) {
            return Err(PlanError::DuplicateInstance {
                instance_id: id.to_string(),
            });
        }
        self.app(app_id)?;
        if let Some(machine_id) = machine_id {
            self.machine(machine_id)?;
        }
        self.instances
            .insert(id.to_string(), Instance::new(id, app_id, machine_id));

        let Some(machine_id) = machine_id else {
            self.apps[app_id].add_unplaced(id);
            return Ok(InitialPlacement::Unplaced);
        };
        let verdict = self.check_placement(machine_id, app_id)?;
        let app = &self.apps[app_id];
        let machine = &mut self.machines[machine_id];
        let placement = if verdict.is_success() {
            machine.add_good(app_id, id);
            InitialPlacement::Valid
        } else {
            trace!("instance {} violates constraints on machine {}: {:?}", id, machine_id, verdict);
            machine.add_bad(app_id, id);
            InitialPlacement::Invalid
        };
        machine.deduct(app);
        self.apps[app_id].add_placed(id);
        Ok(placement)
    }

    /// Places an unplaced instance on the specified machine without checking constraints.
    pub fn assign(&mut self, instance_id: &str, machine_id: &str) -> Result<Assignment> {
        let instance = self.instance(instance_id)?;
        if let Some(current) = instance.machine_id() {
            return Err(PlanError::AlreadyPlaced {
                instance_id: instance_id.to_string(),
                machine_id: current.to_string(),
            });
        }
        self.machine(machine_id)?;
        Ok(self.place(instance_id, machine_id))
    }

    /// Checks if one more instance of the app can be placed on the machine.
    pub fn check_placement(&self, machine_id: &str, app_id: &str) -> Result<PlacementVerdict> {
        Ok(check_placement(
            self.machine(machine_id)?,
            self.app(app_id)?,
            &self.interference,
            self.safety_margin,
        ))
    }

    /// Same as [`check_placement`](Cluster::check_placement), returns `true` only on success.
    pub fn may_place(&self, machine_id: &str, app_id: &str) -> Result<bool> {
        Ok(self.check_placement(machine_id, app_id)?.is_success())
    }

    pub fn app(&self, id: &str) -> Result<&App> {
        self.apps
            .get(id)
            .ok_or_else(|| PlanError::UnknownApp { app_id: id.to_string() })
    }

    pub fn machine(&self, id: &str) -> Result<&Machine> {
        self.machines.get(id).ok_or_else(|| PlanError::UnknownMachine {
            machine_id: id.to_string(),
        })
    }

    pub fn instance(&self, id: &str) -> Result<&Instance> {
        self.instances.get(id).ok_or_else(|| PlanError::UnknownInstance {
            instance_id: id.to_string(),
        })
    }

    pub fn apps(&self) -> &IndexMap<String, App> {
        &self.apps
    }

    pub fn machines(&self) -> &IndexMap<String, Machine> {
        &self.machines
    }

    pub fn instances(&self) -> &IndexMap<String, Instance> {
        &self.instances
    }

    pub fn interference(&self) -> &InterferenceTable {
        &self.interference
    }

    /// Returns all invalid residents: machines in registration order, apps and instances in order of arrival.
    pub fn bad_residents(&self) -> Vec<BadResident> {
        let mut result = Vec::new();
        for (machine_id, machine) in self.machines.iter() {
            for (app_id, instances) in machine.bad_residents() {
                for instance_id in instances {
                    result.push(BadResident {
                        machine_id: machine_id.clone(),
                        app_id: app_id.clone(),
                        instance_id: instance_id.clone(),
                    });
                }
            }
        }
        result
    }

    /// Returns IDs of all unplaced instances, apps in registration order.
    pub fn unplaced_instances(&self) -> Vec<String> {
        self.apps.values().flat_map(|app| app.unplaced().iter().cloned()).collect()
    }

    /// Moves instance to the placed list of its app, records it as a valid resident and deducts app demand.
    pub(crate) fn place(&mut self, instance_id: &str, machine_id: &str) -> Assignment {
        let instance = &mut self.instances[instance_id];
        instance.set_machine(machine_id);
        let app = &mut self.apps[instance.app_id()];
        app.mark_placed(instance_id);
        let machine = &mut self.machines[machine_id];
        machine.add_good(app.id(), instance_id);
        machine.deduct(app);
        trace!("placed instance {} of app {} on machine {}", instance_id, app.id(), machine_id);
        Assignment::new(instance_id, machine_id)
    }

    /// Starts relocation of an invalid resident: the instance becomes unplaced while a destination is searched.
    pub(crate) fn begin_relocation(&mut self, bad: &BadResident) {
        self.apps[&bad.app_id].mark_unplaced(&bad.instance_id);
    }

    /// Completes relocation: places the instance on `to` and gives its demand back to the origin machine.
    pub(crate) fn commit_relocation(&mut self, bad: &BadResident, to: &str) -> Assignment {
        let assignment = self.place(&bad.instance_id, to);
        let app = &self.apps[&bad.app_id];
        let origin = &mut self.machines[&bad.machine_id];
        origin.remove_bad(&bad.app_id, &bad.instance_id);
        origin.restore(app);
        assignment
    }

    /// Reverts relocation: the instance stays an invalid resident of its origin machine.
    pub(crate) fn revert_relocation(&mut self, bad: &BadResident) {
        self.apps[&bad.app_id].mark_placed(&bad.instance_id);
    }
}
