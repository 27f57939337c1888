//! Dataset reader for the CSV input tables.

use std::fs::File;
use std::io::Read;
use std::path::PathBuf;
use std::str::FromStr;

use csv::StringRecord;
use log::info;

use crate::core::cluster::{Cluster, InitialPlacement};
use crate::core::error::{PlanError, Result};

/// Paths of the four input tables.
#[derive(Clone, Debug)]
pub struct DatasetPaths {
    pub apps: PathBuf,
    pub machines: PathBuf,
    pub instances: PathBuf,
    pub interference: PathBuf,
}

/// Counts of entities registered by the reader.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DatasetSummary {
    pub apps: usize,
    pub machines: usize,
    pub interference_rules: usize,
    pub instances: usize,
    pub valid: usize,
    pub invalid: usize,
    pub unplaced: usize,
}

/// Reads headerless comma-separated tables:
///
/// - apps: `app_id,cpu_curve,mem_curve,disk,...` where curves are `|`-separated per-slot values,
/// - machines: `machine_id,cpu,mem,disk,...`,
/// - interference: `app_a,app_b,k`,
/// - instances: `instance_id,app_id,machine_id` with empty `machine_id` for unplaced instances.
///
/// Extra trailing columns are ignored. Disk values of apps and machines are multiplied by `disk_scale`.
pub struct CsvDatasetReader {
    disk_scale: f64,
}

impl CsvDatasetReader {
    /// Creates dataset reader.
    pub fn new(disk_scale: f64) -> Self {
        Self { disk_scale }
    }

    /// Loads all tables into the cluster. Apps and machines are read first, instances last.
    pub fn load(&self, paths: &DatasetPaths, cluster: &mut Cluster) -> Result<DatasetSummary> {
        let mut summary = DatasetSummary::default();
        summary.apps = self.read_apps(File::open(&paths.apps)?, cluster)?;
        summary.machines = self.read_machines(File::open(&paths.machines)?, cluster)?;
        summary.interference_rules = self.read_interference(File::open(&paths.interference)?, cluster)?;
        self.read_instances(File::open(&paths.instances)?, cluster, &mut summary)?;
        info!(
            "Read {} apps, {} machines, {} interference rules",
            summary.apps, summary.machines, summary.interference_rules
        );
        info!(
            "Read {} instances: {} valid, {} invalid, {} unplaced",
            summary.instances, summary.valid, summary.invalid, summary.unplaced
        );
        Ok(summary)
    }

    pub fn read_apps<R: Read>(&self, reader: R, cluster: &mut Cluster) -> Result<usize> {
        let mut count = 0;
        for record in csv_reader(reader).records() {
            let row = Row::new("app", record?);
            let cpu = row.series(1)?;
            let mem = row.series(2)?;
            let disk: f64 = row.parse(3)?;
            cluster.add_app(row.get(0)?, cpu, mem, disk * self.disk_scale)?;
            count += 1;
        }
        Ok(count)
    }

    pub fn read_machines<R: Read>(&self, reader: R, cluster: &mut Cluster) -> Result<usize> {
        let mut count = 0;
        for record in csv_reader(reader).records() {
            let row = Row::new("machine", record?);
            let cpu: f64 = row.parse(1)?;
            let mem: f64 = row.parse(2)?;
            let disk: f64 = row.parse(3)?;
            cluster.add_machine(row.get(0)?, cpu, mem, disk * self.disk_scale)?;
            count += 1;
        }
        Ok(count)
    }

    pub fn read_interference<R: Read>(&self, reader: R, cluster: &mut Cluster) -> Result<usize> {
        let mut count = 0;
        for record in csv_reader(reader).records() {
            let row = Row::new("interference", record?);
            let k: u32 = row.parse(2)?;
            cluster.add_interference(row.get(0)?, row.get(1)?, k)?;
            count += 1;
        }
        Ok(count)
    }

    /// Reads the existing plan, classifying assigned instances into valid and invalid residents.
    pub fn read_instances<R: Read>(&self, reader: R, cluster: &mut Cluster, summary: &mut DatasetSummary) -> Result<()> {
        for record in csv_reader(reader).records() {
            let row = Row::new("instance", record?);
            let machine_id = row.get_optional(2);
            match cluster.add_instance(row.get(0)?, row.get(1)?, machine_id)? {
                InitialPlacement::Unplaced => summary.unplaced += 1,
                InitialPlacement::Valid => summary.valid += 1,
                InitialPlacement::Invalid => summary.invalid += 1,
            }
            summary.instances += 1;
        }
        Ok(())
    }
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader)
}

/// Record of one of the tables with field accessors reporting the table and line on failure.
struct Row {
    table: &'static str,
    record: StringRecord,
}

impl Row {
    fn new(table: &'static str, record: StringRecord) -> Self {
        Self { table, record }
    }

    fn error(&self, reason: String) -> PlanError {
        PlanError::InvalidRecord {
            table: self.table.to_string(),
            line: self.record.position().map_or(0, |pos| pos.line()),
            reason,
        }
    }

    fn get(&self, index: usize) -> Result<&str> {
        match self.record.get(index) {
            Some(value) if !value.is_empty() => Ok(value),
            _ => Err(self.error(format!("missing field {}", index + 1))),
        }
    }

    fn get_optional(&self, index: usize) -> Option<&str> {
        self.record.get(index).filter(|value| !value.is_empty())
    }

    fn parse<T: FromStr>(&self, index: usize) -> Result<T> {
        let value = self.get(index)?;
        value
            .parse()
            .map_err(|_| self.error(format!("can't parse field {} from {:?}", index + 1, value)))
    }

    fn series(&self, index: usize) -> Result<Vec<f64>> {
        self.get(index)?
            .split('|')
            .map(|value| {
                value
                    .trim()
                    .parse::<f64>()
                    .map_err(|_| self.error(format!("can't parse value {:?} in field {}", value, index + 1)))
            })
            .collect()
    }
}
