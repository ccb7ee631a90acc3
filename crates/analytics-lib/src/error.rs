//! Error types surfaced by the analytics service

use thiserror::Error;

/// Failures that propagate to the caller
///
/// Empty or degenerate data never produces an error; it degrades to empty
/// or zero-valued results instead.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// Fetching one instance's channels failed
    #[error("Failed to fetch metrics: {source}")]
    MetricsUnavailable {
        instance_id: String,
        #[source]
        source: anyhow::Error,
    },

    /// The inventory could not be listed while computing fleet health
    #[error("Failed to fetch fleet health: {0}")]
    FleetHealthUnavailable(#[source] anyhow::Error),

    /// The inventory could not be listed
    #[error("Failed to list instances: {0}")]
    InventoryUnavailable(#[source] anyhow::Error),

    #[error("duration must be a positive number of minutes, got {0}")]
    InvalidDuration(u32),

    #[error("unknown cost scenario '{0}' (expected downsize, upsize, optimize or resize)")]
    UnknownScenario(String),
}

pub type Result<T> = std::result::Result<T, AnalyticsError>;
