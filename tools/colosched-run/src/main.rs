use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use log::info;

use colosched::core::config::PlannerConfig;
use colosched::core::planner::Planner;
use colosched::extensions::csv_dataset_reader::{CsvDatasetReader, DatasetPaths};
use colosched::extensions::plan_writer::write_assignments_to_file;

fn init_logger() {
    use env_logger::{Builder, Env};
    Builder::from_env(Env::default().default_filter_or("info")).init();
}

#[derive(Parser, Debug)]
#[command(about, long_about = None)]
/// Repairs an existing instance placement and schedules all unplaced instances
struct Args {
    /// Path to app resources file
    #[arg(long)]
    app: PathBuf,

    /// Path to machine resources file
    #[arg(long)]
    machine: PathBuf,

    /// Path to instances file with the existing placement
    #[arg(long)]
    instances: PathBuf,

    /// Path to app interference file
    #[arg(long)]
    interference: PathBuf,

    /// Path to produced CSV file with placement decisions
    #[arg(short, long)]
    output: PathBuf,

    /// Path to YAML file with planner configuration
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn Error>> {
    init_logger();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => PlannerConfig::from_file(path)?,
        None => PlannerConfig::default(),
    };
    let reader = CsvDatasetReader::new(config.disk_scale);
    let mut planner = Planner::new(config);
    reader.load(
        &DatasetPaths {
            apps: args.app,
            machines: args.machine,
            instances: args.instances,
            interference: args.interference,
        },
        planner.cluster_mut(),
    )?;

    let outcome = planner.run();
    info!(
        "{} relocated by repair, {} placed by scheduling, {} unresolved, {} unplaced",
        outcome.repair.relocated_count(),
        outcome.schedule.placed,
        outcome.repair.unresolved.len(),
        outcome.unplaced.len()
    );
    write_assignments_to_file(&args.output, &outcome.assignments)?;
    Ok(())
}
