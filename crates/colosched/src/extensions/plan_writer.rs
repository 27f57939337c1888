//! Writer of the produced placement plan.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use log::info;

use crate::core::common::Assignment;
use crate::core::error::Result;

/// Writes assignments as headerless `instance_id,machine_id` rows, returns the number of written rows.
pub fn write_assignments<W: Write>(writer: W, assignments: &[Assignment]) -> Result<usize> {
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
    for assignment in assignments {
        writer.serialize(assignment)?;
    }
    writer.flush()?;
    Ok(assignments.len())
}

/// Creates (or truncates) the file and writes assignments to it.
pub fn write_assignments_to_file<P: AsRef<Path>>(path: P, assignments: &[Assignment]) -> Result<usize> {
    let count = write_assignments(File::create(path.as_ref())?, assignments)?;
    info!("Done! {} lines written to <{}>", count, path.as_ref().display());
    Ok(count)
}
