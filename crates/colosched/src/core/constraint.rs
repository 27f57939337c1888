//! Placement constraints: capacity with a safety margin and pairwise interference limits.

use crate::core::app::App;
use crate::core::common::PlacementVerdict;
use crate::core::interference::InterferenceTable;
use crate::core::machine::Machine;

/// Checks if one more instance of `app` can be placed on `machine`.
///
/// Capacity is checked first: every CPU and memory slot and the disk must keep at least `margin` free after
/// placement. Then interference limits are checked in both directions against every app with valid residents on the
/// machine, the candidate app included.
pub fn check_placement(
    machine: &Machine,
    app: &App,
    interference: &InterferenceTable,
    margin: f64,
) -> PlacementVerdict {
    let verdict = check_capacity(machine, app, margin);
    if !verdict.is_success() {
        return verdict;
    }
    check_interference(machine, app, interference)
}

/// Same as [`check_placement`], returns `true` only on success.
pub fn may_place(machine: &Machine, app: &App, interference: &InterferenceTable, margin: f64) -> bool {
    check_placement(machine, app, interference, margin).is_success()
}

pub fn check_capacity(machine: &Machine, app: &App, margin: f64) -> PlacementVerdict {
    let slots = machine.cpu().iter().zip(machine.mem()).zip(app.cpu().iter().zip(app.mem()));
    for (slot, ((cpu, mem), (cpu_demand, mem_demand))) in slots.enumerate() {
        if cpu - cpu_demand < margin {
            return PlacementVerdict::NotEnoughCpu { slot };
        }
        if mem - mem_demand < margin {
            return PlacementVerdict::NotEnoughMemory { slot };
        }
    }
    if machine.disk() - app.disk() < margin {
        return PlacementVerdict::NotEnoughDisk;
    }
    PlacementVerdict::Success
}

pub fn check_interference(machine: &Machine, app: &App, interference: &InterferenceTable) -> PlacementVerdict {
    let candidate_count = machine.resident_count(app.id());
    for (resident, instances) in machine.good_residents() {
        if instances.is_empty() {
            continue;
        }
        // resident present: at most `limit` instances of the candidate app
        if let Some(limit) = interference.limit(resident, app.id()) {
            if candidate_count >= limit as usize {
                return PlacementVerdict::ResidentLimit {
                    resident: resident.clone(),
                };
            }
        }
        // self-pair reads the same entry as above
        if resident == app.id() {
            continue;
        }
        // candidate present: at most `limit` instances of the resident app
        if let Some(limit) = interference.limit(app.id(), resident) {
            if instances.len() >= limit as usize {
                return PlacementVerdict::CandidateLimit {
                    resident: resident.clone(),
                };
            }
        }
    }
    PlacementVerdict::Success
}
