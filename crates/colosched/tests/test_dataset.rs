use std::path::PathBuf;

use colosched::core::cluster::Cluster;
use colosched::core::common::Assignment;
use colosched::core::config::PlannerConfig;
use colosched::core::error::PlanError;
use colosched::core::planner::Planner;
use colosched::extensions::csv_dataset_reader::{CsvDatasetReader, DatasetPaths, DatasetSummary};
use colosched::extensions::plan_writer::{write_assignments, write_assignments_to_file};

fn name_wrapper(file_name: &str) -> PathBuf {
    PathBuf::from(format!("test-data/{}", file_name))
}

fn dataset_paths() -> DatasetPaths {
    DatasetPaths {
        apps: name_wrapper("apps.csv"),
        machines: name_wrapper("machines.csv"),
        instances: name_wrapper("instances.csv"),
        interference: name_wrapper("interference.csv"),
    }
}

fn load_planner() -> (Planner, DatasetSummary) {
    let config = PlannerConfig::from_file(name_wrapper("config.yaml")).unwrap();
    let reader = CsvDatasetReader::new(config.disk_scale);
    let mut planner = Planner::new(config);
    let summary = reader.load(&dataset_paths(), planner.cluster_mut()).unwrap();
    (planner, summary)
}

#[test]
fn test_config_from_file() {
    let config = PlannerConfig::from_file(name_wrapper("config.yaml")).unwrap();
    assert_eq!(config.time_frame, 4);
    assert_eq!(config.max_repair_sweeps, 10);

    let partial = PlannerConfig::from_file(name_wrapper("config-partial.yaml")).unwrap();
    assert_eq!(
        partial,
        PlannerConfig {
            time_frame: 24,
            ..PlannerConfig::default()
        }
    );
}

#[test]
fn test_config_defaults_and_validation() {
    let config = PlannerConfig::default();
    assert_eq!(config.time_frame, 98);
    assert_eq!(config.safety_margin, 16.);
    assert_eq!(config.strict_sweeps, 3);
    assert_eq!(config.disk_scale, 0.1);
    assert_eq!(PlannerConfig::from_yaml("").unwrap(), config);

    assert!(matches!(
        PlannerConfig::from_yaml("time_frame: 0"),
        Err(PlanError::InvalidConfig { .. })
    ));
    assert!(matches!(
        PlannerConfig::from_yaml("time_frame: [1, 2]"),
        Err(PlanError::Yaml(_))
    ));
}

#[test]
// Existing plan: inst_1 and inst_2 fit machine_1, inst_3 exceeds its memory, inst_4 exceeds disk of machine_3.
fn test_load_dataset() {
    let (planner, summary) = load_planner();
    assert_eq!(
        summary,
        DatasetSummary {
            apps: 3,
            machines: 3,
            interference_rules: 2,
            instances: 6,
            valid: 2,
            invalid: 2,
            unplaced: 2,
        }
    );

    let cluster = planner.cluster();
    assert_eq!(cluster.app("app_1").unwrap().disk(), 5.);
    assert_eq!(cluster.app("app_2").unwrap().mem(), [40., 50., 40., 50.]);
    assert_eq!(cluster.machine("machine_2").unwrap().disk(), 100.);
    assert_eq!(cluster.interference().limit("app_2", "app_2"), Some(1));
    assert_eq!(cluster.bad_residents().len(), 2);
    assert_eq!(cluster.unplaced_instances(), vec!["inst_5".to_string(), "inst_6".to_string()]);
}

#[test]
// Both invalid instances are relocated at the first relaxed repair sweep. Scheduling packs inst_5 in its first sweep,
// inst_6 (disk-heavy) matches no machine strictly in the second one, which ends scheduling.
fn test_plan_dataset() {
    let (mut planner, _) = load_planner();

    let outcome = planner.run();

    assert_eq!(
        outcome.assignments,
        vec![
            Assignment::new("inst_3", "machine_2"),
            Assignment::new("inst_4", "machine_1"),
            Assignment::new("inst_5", "machine_3"),
        ]
    );
    assert_eq!(outcome.repair.sweeps, 4);
    assert_eq!(outcome.schedule.sweeps, 2);
    assert_eq!(outcome.unplaced, vec!["inst_6".to_string()]);
    assert!(planner.cluster().bad_residents().is_empty());
}

#[test]
fn test_write_plan() {
    let (mut planner, _) = load_planner();
    let outcome = planner.run();

    let file = tempfile::NamedTempFile::new().unwrap();
    let count = write_assignments_to_file(file.path(), &outcome.assignments).unwrap();
    assert_eq!(count, 3);
    assert_eq!(
        std::fs::read_to_string(file.path()).unwrap(),
        "inst_3,machine_2\ninst_4,machine_1\ninst_5,machine_3\n"
    );
}

#[test]
fn test_write_empty_plan() {
    let mut buffer = Vec::new();
    assert_eq!(write_assignments(&mut buffer, &[]).unwrap(), 0);
    assert!(buffer.is_empty());
}

fn small_cluster() -> Cluster {
    Cluster::new(&PlannerConfig {
        time_frame: 2,
        ..PlannerConfig::default()
    })
}

#[test]
fn test_malformed_tables() {
    let reader = CsvDatasetReader::new(1.);
    let mut cluster = small_cluster();

    let err = reader
        .read_apps("a,1|2,3|4,5\nb,1|x,3|4,5\n".as_bytes(), &mut cluster)
        .unwrap_err();
    match err {
        PlanError::InvalidRecord { table, line, .. } => {
            assert_eq!(table, "app");
            assert_eq!(line, 2);
        }
        other => panic!("unexpected error: {}", other),
    }

    assert!(matches!(
        reader.read_apps("c,1|2|3,3|4,5\n".as_bytes(), &mut cluster),
        Err(PlanError::DemandLength { .. })
    ));
    assert!(matches!(
        reader.read_machines("m1,10,10\n".as_bytes(), &mut cluster),
        Err(PlanError::InvalidRecord { .. })
    ));
    assert!(matches!(
        reader.read_interference("a,a,-1\n".as_bytes(), &mut cluster),
        Err(PlanError::InvalidRecord { .. })
    ));
}

#[test]
fn test_unknown_references_in_plan() {
    let reader = CsvDatasetReader::new(1.);
    let mut cluster = small_cluster();
    reader.read_apps("a,1|2,3|4,5\n".as_bytes(), &mut cluster).unwrap();
    reader.read_machines("m1,100,100,100\n".as_bytes(), &mut cluster).unwrap();

    let mut summary = DatasetSummary::default();
    assert!(matches!(
        reader.read_instances("i1,a,m2\n".as_bytes(), &mut cluster, &mut summary),
        Err(PlanError::UnknownMachine { .. })
    ));
    assert!(matches!(
        reader.read_instances("i2,b,\n".as_bytes(), &mut cluster, &mut summary),
        Err(PlanError::UnknownApp { .. })
    ));

    reader
        .read_instances("i3,a,\ni4,a,m1\n".as_bytes(), &mut cluster, &mut summary)
        .unwrap();
    assert_eq!(summary.instances, 2);
    assert_eq!(summary.unplaced, 1);
    assert_eq!(summary.valid, 1);
}
