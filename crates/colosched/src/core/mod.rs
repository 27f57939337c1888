pub mod app;
pub mod cluster;
pub mod common;
pub mod config;
pub mod constraint;
pub mod error;
pub mod instance;
pub mod interference;
pub mod machine;
pub mod planner;
pub mod profile;
pub mod repair;
pub mod scheduler;
