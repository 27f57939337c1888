//! Greedy scheduling of unplaced instances.

use std::cmp::Reverse;

use log::{debug, info};
use ordered_float::OrderedFloat;

use crate::core::cluster::Cluster;
use crate::core::common::{Assignment, MatchMode};
use crate::core::constraint::may_place;
use crate::core::profile::signatures_match;

/// Summary of the greedy scheduling stage.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScheduleReport {
    pub sweeps: u32,
    pub placed: usize,
}

/// Packs unplaced instances onto machines, least loaded machines first.
///
/// For every machine that still has at least `margin` of each resource left, apps with unplaced instances are
/// visited in descending order of their total demand. An app is a candidate when its most needed resources match the
/// most underutilized resources of the machine (strictly during the first `strict_sweeps` sweeps, relaxed later).
/// Instances of a candidate app are placed one by one until the constraint check fails or the machine becomes full.
///
/// Scheduling ends with the first sweep that places nothing.
pub struct GreedyScheduler {
    strict_sweeps: u32,
}

impl GreedyScheduler {
    pub fn new(strict_sweeps: u32) -> Self {
        Self { strict_sweeps }
    }

    /// Runs scheduling sweeps, appending all placement decisions to `assignments`.
    pub fn run(&self, cluster: &mut Cluster, assignments: &mut Vec<Assignment>) -> ScheduleReport {
        let margin = cluster.safety_margin();
        let mut report = ScheduleReport::default();

        let mut apps: Vec<String> = cluster
            .apps()
            .values()
            .filter(|app| app.has_unplaced())
            .map(|app| app.id().to_string())
            .collect();
        apps.sort_by_key(|id| Reverse(OrderedFloat(cluster.apps()[id].total())));
        let mut machines: Vec<String> = cluster.machines().keys().cloned().collect();

        let mut pass = 0;
        while !apps.is_empty() && !machines.is_empty() {
            machines.sort_by_key(|id| OrderedFloat(cluster.machines()[id].total()));
            let mode = MatchMode::for_pass(pass, self.strict_sweeps);
            let mut full = Vec::new();
            let mut placed = 0;

            for machine_id in machines.iter() {
                if cluster.machines()[machine_id].is_full(margin) {
                    full.push(machine_id.clone());
                    continue;
                }
                for app_id in apps.iter() {
                    placed += self.pack(cluster, machine_id, app_id, mode, assignments);
                    if cluster.machines()[machine_id].is_full(margin) {
                        full.push(machine_id.clone());
                        break;
                    }
                }
            }

            apps.retain(|id| cluster.apps()[id].has_unplaced());
            machines.retain(|id| !full.contains(id));
            report.sweeps += 1;
            report.placed += placed;
            debug!(
                "scheduling sweep {} ({:?}): placed {} instances, {} apps and {} machines left",
                report.sweeps,
                mode,
                placed,
                apps.len(),
                machines.len()
            );

            if placed == 0 {
                break;
            }
            pass += 1;
        }
        info!(
            "scheduling finished after {} sweeps: {} instances placed",
            report.sweeps, report.placed
        );
        report
    }

    /// Places instances of one app on one machine while the app matches and the constraints hold.
    fn pack(
        &self,
        cluster: &mut Cluster,
        machine_id: &str,
        app_id: &str,
        mode: MatchMode,
        assignments: &mut Vec<Assignment>,
    ) -> usize {
        let margin = cluster.safety_margin();
        let app = &cluster.apps()[app_id];
        let machine = &cluster.machines()[machine_id];
        if !app.has_unplaced() || !signatures_match(&machine.signature(), &app.signature(), mode) {
            return 0;
        }

        let mut placed = 0;
        loop {
            let app = &cluster.apps()[app_id];
            let machine = &cluster.machines()[machine_id];
            let Some(instance_id) = app.unplaced().first().cloned() else {
                break;
            };
            if !may_place(machine, app, cluster.interference(), margin) {
                break;
            }
            assignments.push(cluster.place(&instance_id, machine_id));
            placed += 1;
            if cluster.machines()[machine_id].is_full(margin) {
                break;
            }
        }
        placed
    }
}
