//! Top-level planning run: repair followed by greedy scheduling.

use log::{info, warn};

use crate::core::cluster::Cluster;
use crate::core::common::Assignment;
use crate::core::config::PlannerConfig;
use crate::core::repair::{RepairEngine, RepairReport};
use crate::core::scheduler::{GreedyScheduler, ScheduleReport};

/// Result of a planning run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlanOutcome {
    /// All placement decisions in the order they were made.
    pub assignments: Vec<Assignment>,
    pub repair: RepairReport,
    pub schedule: ScheduleReport,
    /// Instances left without a machine.
    pub unplaced: Vec<String>,
}

/// Owns the cluster state and runs both planning stages over it.
pub struct Planner {
    config: PlannerConfig,
    cluster: Cluster,
}

impl Planner {
    /// Creates planner with an empty cluster.
    pub fn new(config: PlannerConfig) -> Self {
        let cluster = Cluster::new(&config);
        Self { config, cluster }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn cluster(&self) -> &Cluster {
        &self.cluster
    }

    /// Returns mutable cluster reference, used by dataset readers to register entities.
    pub fn cluster_mut(&mut self) -> &mut Cluster {
        &mut self.cluster
    }

    /// Repairs invalid placements and schedules all unplaced instances.
    pub fn run(&mut self) -> PlanOutcome {
        let mut assignments = Vec::new();
        info!(
            "planning {} instances of {} apps on {} machines",
            self.cluster.instances().len(),
            self.cluster.apps().len(),
            self.cluster.machines().len()
        );

        let repair = RepairEngine::new(self.config.strict_sweeps, self.config.max_repair_sweeps)
            .run(&mut self.cluster, &mut assignments);
        let schedule = GreedyScheduler::new(self.config.strict_sweeps).run(&mut self.cluster, &mut assignments);

        let unplaced = self.cluster.unplaced_instances();
        if !unplaced.is_empty() {
            warn!("{} instances left unplaced", unplaced.len());
        }
        PlanOutcome {
            assignments,
            repair,
            schedule,
            unplaced,
        }
    }
}
