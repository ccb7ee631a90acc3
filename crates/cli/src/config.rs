//! Configuration for fleetctl

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// fleetctl configuration
///
/// Read from an optional config file and then from `FLEETCTL_*`
/// environment variables; command-line flags win over both.
#[derive(Debug, Clone, Deserialize)]
pub struct FleetctlConfig {
    /// JSON data set with inventory and series
    #[serde(default)]
    pub data_file: Option<PathBuf>,

    /// Window used when a command gets no `--duration`
    #[serde(default = "default_duration_minutes")]
    pub default_duration_minutes: u32,

    /// Propagate channel fetch failures instead of reading them as no data
    #[serde(default)]
    pub strict_fetch: bool,
}

fn default_duration_minutes() -> u32 {
    60
}

impl Default for FleetctlConfig {
    fn default() -> Self {
        Self {
            data_file: None,
            default_duration_minutes: default_duration_minutes(),
            strict_fetch: false,
        }
    }
}

impl FleetctlConfig {
    /// Load configuration from an optional file and the environment
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();

        if let Some(path) = config_file {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        let config = builder
            .add_source(config::Environment::with_prefix("FLEETCTL").try_parsing(true))
            .build()
            .context("Failed to read fleetctl configuration")?;

        config
            .try_deserialize()
            .context("Invalid fleetctl configuration")
    }
}
