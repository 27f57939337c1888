//! Error type of the planner.

use thiserror::Error;

use crate::core::common::Resource;

/// Result type of planner operations.
pub type Result<T> = std::result::Result<T, PlanError>;

/// Precondition and I/O failures.
///
/// Constraint violations are not errors: they are reported by [`PlacementVerdict`](crate::core::common::PlacementVerdict)
/// and drive the scheduling loops.
#[derive(Error, Debug)]
pub enum PlanError {
    #[error("unknown app: {app_id}")]
    UnknownApp { app_id: String },

    #[error("unknown machine: {machine_id}")]
    UnknownMachine { machine_id: String },

    #[error("unknown instance: {instance_id}")]
    UnknownInstance { instance_id: String },

    #[error("duplicate app: {app_id}")]
    DuplicateApp { app_id: String },

    #[error("duplicate machine: {machine_id}")]
    DuplicateMachine { machine_id: String },

    #[error("duplicate instance: {instance_id}")]
    DuplicateInstance { instance_id: String },

    #[error("instance {instance_id} is already placed on machine {machine_id}")]
    AlreadyPlaced { instance_id: String, machine_id: String },

    #[error("app {app_id}: {resource} demand has {actual} slots, expected {expected}")]
    DemandLength {
        app_id: String,
        resource: Resource,
        expected: usize,
        actual: usize,
    },

    #[error("{table} table, line {line}: {reason}")]
    InvalidRecord { table: String, line: u64, reason: String },

    #[error("invalid config: {reason}")]
    InvalidConfig { reason: String },

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
