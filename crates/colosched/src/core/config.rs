//! Planner configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{PlanError, Result};

/// Holds raw planner config parsed from YAML file.
#[derive(Debug, PartialEq, Serialize, Deserialize, Clone, Default)]
struct RawPlannerConfig {
    pub time_frame: Option<usize>,
    pub safety_margin: Option<f64>,
    pub strict_sweeps: Option<u32>,
    pub max_repair_sweeps: Option<u32>,
    pub disk_scale: Option<f64>,
}

/// Represents planner configuration.
#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct PlannerConfig {
    /// Number of discrete time slots in demand and capacity sequences.
    pub time_frame: usize,
    /// Minimum amount of each resource that must stay free in every slot after a placement.
    pub safety_margin: f64,
    /// Number of repair and scheduling sweeps using strict signature matching before switching to relaxed matching.
    pub strict_sweeps: u32,
    /// Maximum number of repair sweeps, instances still invalid after them stay on their original machines.
    pub max_repair_sweeps: u32,
    /// Factor applied by dataset readers to raw disk values of apps and machines.
    pub disk_scale: f64,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self::from_raw(RawPlannerConfig::default())
    }
}

impl PlannerConfig {
    /// Creates planner config by reading parameter values from YAML file
    /// (uses default values if some parameters are absent).
    pub fn from_file<P: AsRef<Path>>(file_name: P) -> Result<Self> {
        Self::from_yaml(&std::fs::read_to_string(file_name)?)
    }

    /// Creates planner config from YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let raw: RawPlannerConfig = if yaml.trim().is_empty() {
            RawPlannerConfig::default()
        } else {
            serde_yaml::from_str(yaml)?
        };
        let config = Self::from_raw(raw);
        config.validate()?;
        Ok(config)
    }

    fn from_raw(raw: RawPlannerConfig) -> Self {
        Self {
            time_frame: raw.time_frame.unwrap_or(98),
            safety_margin: raw.safety_margin.unwrap_or(16.),
            strict_sweeps: raw.strict_sweeps.unwrap_or(3),
            max_repair_sweeps: raw.max_repair_sweeps.unwrap_or(16),
            disk_scale: raw.disk_scale.unwrap_or(0.1),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.time_frame == 0 {
            return Err(PlanError::InvalidConfig {
                reason: "time_frame must be positive".to_string(),
            });
        }
        if !self.safety_margin.is_finite() || self.safety_margin < 0. {
            return Err(PlanError::InvalidConfig {
                reason: format!("safety_margin must be a non-negative number, got {}", self.safety_margin),
            });
        }
        if !self.disk_scale.is_finite() || self.disk_scale <= 0. {
            return Err(PlanError::InvalidConfig {
                reason: format!("disk_scale must be a positive number, got {}", self.disk_scale),
            });
        }
        Ok(())
    }
}
