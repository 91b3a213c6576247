//! Configuration types for the simulation.

use crate::error::{Error, Result};
use crate::types::MAX_EPOCHS;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Engine parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Random seed for reproducibility
    pub seed: u64,
    /// Number of epochs before the run is forcibly stopped
    pub max_epochs: u32,
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_epochs == 0 || self.max_epochs > MAX_EPOCHS {
            return Err(Error::InvalidEpochBudget(self.max_epochs));
        }
        Ok(())
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            max_epochs: MAX_EPOCHS,
        }
    }
}

/// Settings for one command-line run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Map file describing the cities and their roads
    pub map_path: PathBuf,
    /// Number of aliens to unleash
    pub alien_count: usize,
    /// Random seed; drawn from OS entropy when absent
    pub seed: Option<u64>,
    /// Epoch budget
    pub max_epochs: u32,
    /// `tracing` filter directive, overridden by `RUST_LOG`
    pub log_filter: Option<String>,
}

impl RunConfig {
    /// Load from a JSON file. Missing fields keep their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn simulation_config(&self, seed: u64) -> SimulationConfig {
        SimulationConfig {
            seed,
            max_epochs: self.max_epochs,
        }
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            map_path: PathBuf::from("data.txt"),
            alien_count: 0,
            seed: None,
            max_epochs: MAX_EPOCHS,
            log_filter: None,
        }
    }
}
