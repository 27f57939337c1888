use std::fmt;

use serde::Serialize;

/// Resource dimension tracked by machine ledgers and ranked by resource profiles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Resource {
    Cpu,
    Mem,
    Disk,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Resource::Cpu => write!(f, "cpu"),
            Resource::Mem => write!(f, "mem"),
            Resource::Disk => write!(f, "disk"),
        }
    }
}

/// Single placement decision made by the repair engine or the greedy scheduler.
///
/// Serialized as an `instance_id,machine_id` record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Assignment {
    pub instance_id: String,
    pub machine_id: String,
}

impl Assignment {
    pub fn new(instance_id: &str, machine_id: &str) -> Self {
        Self {
            instance_id: instance_id.to_string(),
            machine_id: machine_id.to_string(),
        }
    }
}

/// How a machine signature is compared with an app signature.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchMode {
    /// Signatures must be equal, including the order of dimensions.
    Strict,
    /// Every dimension of the machine signature must appear in the app signature.
    Relaxed,
}

impl MatchMode {
    /// Returns the mode used at the given pass: strict for the first `strict_passes` passes, relaxed afterwards.
    pub fn for_pass(pass: u32, strict_passes: u32) -> Self {
        if pass < strict_passes {
            MatchMode::Strict
        } else {
            MatchMode::Relaxed
        }
    }
}

/// Outcome of checking whether one more instance of an app can be placed on a machine.
#[derive(Clone, Debug, PartialEq)]
pub enum PlacementVerdict {
    NotEnoughCpu { slot: usize },
    NotEnoughMemory { slot: usize },
    NotEnoughDisk,
    /// Too many instances of the candidate app would co-reside with instances of `resident`.
    ResidentLimit { resident: String },
    /// Too many instances of `resident` already co-reside with the candidate app.
    CandidateLimit { resident: String },
    Success,
}

impl PlacementVerdict {
    pub fn is_success(&self) -> bool {
        *self == PlacementVerdict::Success
    }
}
