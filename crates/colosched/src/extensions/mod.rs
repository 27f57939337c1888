pub mod csv_dataset_reader;
pub mod plan_writer;
