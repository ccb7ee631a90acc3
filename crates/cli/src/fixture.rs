//! File-backed data set
//!
//! A data set is a JSON document:
//!
//! ```json
//! {
//!   "instances": [{"instanceId": "i-1", "state": "running", "instanceType": "t3.large"}],
//!   "metrics": {"i-1": {"cpu": [{"timestamp": "2024-01-01T00:00:00Z", "value": 12.5}]}},
//!   "unreachable": ["i-2"]
//! }
//! ```
//!
//! Without `instances` the inventory is unavailable.

use analytics_lib::provider::InMemoryProvider;
use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

/// Load a data set from a JSON file
pub fn load_data_set(path: &Path) -> Result<InMemoryProvider> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read data file {}", path.display()))?;

    let provider: InMemoryProvider = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse data file {}", path.display()))?;

    info!(
        path = %path.display(),
        instances_with_metrics = provider.recorded_instances(),
        "Loaded data set"
    );

    Ok(provider)
}
