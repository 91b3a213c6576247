//! Command-line arguments.

use clap::Parser;
use invasion_core::{Result, RunConfig};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "invasion", version, about = "Simulate an alien invasion over a map of cities")]
pub struct Args {
    /// Number of aliens to unleash
    pub aliens: Option<usize>,

    /// Map file to read
    #[arg(long)]
    pub map: Option<PathBuf>,

    /// Random seed, drawn from OS entropy when omitted
    #[arg(long)]
    pub seed: Option<u64>,

    /// Epoch budget (1 to 10,000)
    #[arg(long)]
    pub max_epochs: Option<u32>,

    /// JSON run configuration; flags given here override it
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Print a JSON summary after the report
    #[arg(long)]
    pub json: bool,

    /// tracing filter directive, e.g. "debug" or "invasion_world=trace"
    #[arg(long = "log")]
    pub log_filter: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,
}

impl Args {
    /// Merge the optional config file with the flags
    pub fn resolve(&self) -> Result<RunConfig> {
        let mut config = match &self.config {
            Some(path) => RunConfig::from_json_file(path)?,
            None => RunConfig::default(),
        };

        if let Some(aliens) = self.aliens {
            config.alien_count = aliens;
        }
        if let Some(map) = &self.map {
            config.map_path = map.clone();
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if let Some(max_epochs) = self.max_epochs {
            config.max_epochs = max_epochs;
        }
        if self.log_filter.is_some() {
            config.log_filter = self.log_filter.clone();
        }

        Ok(config)
    }
}
