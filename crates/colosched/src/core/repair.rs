//! Repair of invalid placements from the existing plan.

use log::{debug, info, warn};

use crate::core::cluster::{BadResident, Cluster};
use crate::core::common::{Assignment, MatchMode};
use crate::core::constraint::may_place;
use crate::core::profile::signatures_match;

/// Result of a single attempt to move an invalid resident.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RelocationOutcome {
    Relocated {
        instance_id: String,
        from: String,
        to: String,
    },
    /// No destination was found, the instance stays on its origin machine.
    Reverted { instance_id: String, at: String },
}

/// Summary of the repair stage.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RepairReport {
    /// Number of sweeps over invalid residents that were performed.
    pub sweeps: u32,
    /// Outcomes of all relocation attempts in order.
    pub attempts: Vec<RelocationOutcome>,
    /// Invalid residents left after the sweep budget was exhausted.
    pub unresolved: Vec<BadResident>,
}

impl RepairReport {
    pub fn relocated_count(&self) -> usize {
        self.attempts
            .iter()
            .filter(|outcome| matches!(outcome, RelocationOutcome::Relocated { .. }))
            .count()
    }
}

/// Moves instances that violate constraints on their machines to machines where they fit.
///
/// Each sweep visits every invalid resident once. The first `strict_sweeps` sweeps only consider machines whose
/// most underutilized resources are exactly the most needed resources of the app, later sweeps accept any machine
/// whose underutilized resources are all needed by the app. Machines with invalid residents are never used as
/// destinations. Sweeps repeat while some instance could not be moved, up to `max_sweeps`.
pub struct RepairEngine {
    strict_sweeps: u32,
    max_sweeps: u32,
}

impl RepairEngine {
    pub fn new(strict_sweeps: u32, max_sweeps: u32) -> Self {
        Self {
            strict_sweeps,
            max_sweeps,
        }
    }

    /// Runs repair sweeps, appending all placement decisions to `assignments`.
    pub fn run(&self, cluster: &mut Cluster, assignments: &mut Vec<Assignment>) -> RepairReport {
        let mut report = RepairReport::default();
        loop {
            let pending = cluster.bad_residents();
            if pending.is_empty() {
                break;
            }
            if report.sweeps == self.max_sweeps {
                for bad in pending.iter() {
                    warn!(
                        "instance {} of app {} left on machine {} in violation of constraints",
                        bad.instance_id, bad.app_id, bad.machine_id
                    );
                }
                report.unresolved = pending;
                break;
            }

            let mode = MatchMode::for_pass(report.sweeps, self.strict_sweeps);
            let mut relocated = 0;
            for bad in pending.iter() {
                let outcome = self.relocate(cluster, bad, mode);
                if let RelocationOutcome::Relocated { instance_id, to, .. } = &outcome {
                    assignments.push(Assignment::new(instance_id, to));
                    relocated += 1;
                }
                report.attempts.push(outcome);
            }
            report.sweeps += 1;
            debug!(
                "repair sweep {} ({:?}): relocated {} of {} instances",
                report.sweeps,
                mode,
                relocated,
                pending.len()
            );
        }
        info!(
            "repair finished after {} sweeps: {} relocated, {} unresolved",
            report.sweeps,
            report.relocated_count(),
            report.unresolved.len()
        );
        report
    }

    /// Tries to move one invalid resident to the first suitable machine in registration order.
    pub fn relocate(&self, cluster: &mut Cluster, bad: &BadResident, mode: MatchMode) -> RelocationOutcome {
        cluster.begin_relocation(bad);
        match find_destination(cluster, &bad.app_id, mode) {
            Some(to) => {
                cluster.commit_relocation(bad, &to);
                RelocationOutcome::Relocated {
                    instance_id: bad.instance_id.clone(),
                    from: bad.machine_id.clone(),
                    to,
                }
            }
            None => {
                cluster.revert_relocation(bad);
                RelocationOutcome::Reverted {
                    instance_id: bad.instance_id.clone(),
                    at: bad.machine_id.clone(),
                }
            }
        }
    }
}

fn find_destination(cluster: &Cluster, app_id: &str, mode: MatchMode) -> Option<String> {
    let app = &cluster.apps()[app_id];
    if !app.has_unplaced() {
        return None;
    }
    let needed = app.signature();
    cluster
        .machines()
        .values()
        .filter(|machine| !machine.has_bad_residents())
        .filter(|machine| signatures_match(&machine.signature(), &needed, mode))
        .find(|machine| may_place(machine, app, cluster.interference(), cluster.safety_margin()))
        .map(|machine| machine.id().to_string())
}
