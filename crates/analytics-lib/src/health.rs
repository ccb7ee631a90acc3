//! Fleet health aggregation
//!
//! Summarizes every inventoried instance concurrently and classifies its
//! average CPU. A failing instance is reported as CRITICAL in its own slot
//! instead of failing the whole fleet.

use crate::error::{AnalyticsError, Result};
use crate::metrics::summarize;
use crate::observability::{AnalyticsMetrics, StructuredLogger};
use crate::provider::{fetch_instance_metrics, InventoryProvider, TimeSeriesProvider};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::fmt;

/// CPU average above which an instance is CRITICAL
pub const CRITICAL_CPU_THRESHOLD: f64 = 85.0;

/// CPU average above which an instance is WARNING
pub const WARNING_CPU_THRESHOLD: f64 = 70.0;

pub const FETCH_FAILED_INSIGHT: &str = "Failed to fetch metrics";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HealthTier {
    Healthy,
    Warning,
    Critical,
}

impl HealthTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            HealthTier::Healthy => "HEALTHY",
            HealthTier::Warning => "WARNING",
            HealthTier::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for HealthTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a (rounded) CPU average
pub fn classify_health(cpu_avg: f64) -> HealthTier {
    if cpu_avg > CRITICAL_CPU_THRESHOLD {
        HealthTier::Critical
    } else if cpu_avg > WARNING_CPU_THRESHOLD {
        HealthTier::Warning
    } else {
        HealthTier::Healthy
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceHealth {
    pub instance_id: String,
    pub cpu_avg: f64,
    pub health: HealthTier,
    pub insights: Vec<String>,
}

impl InstanceHealth {
    fn fetch_failed(instance_id: &str) -> Self {
        Self {
            instance_id: instance_id.to_string(),
            cpu_avg: 0.0,
            health: HealthTier::Critical,
            insights: vec![FETCH_FAILED_INSIGHT.to_string()],
        }
    }
}

/// Compute the health of every inventoried instance
///
/// Entries without an identifier are skipped. Output follows inventory
/// order. Only an inventory failure fails the call.
pub async fn fleet_health(
    inventory: &dyn InventoryProvider,
    series: &dyn TimeSeriesProvider,
    duration_minutes: u32,
    logger: &StructuredLogger,
    metrics: &AnalyticsMetrics,
) -> Result<Vec<InstanceHealth>> {
    let instances = inventory
        .list()
        .await
        .map_err(AnalyticsError::FleetHealthUnavailable)?;

    let ids: Vec<&str> = instances.iter().filter_map(|i| i.id()).collect();

    let checks = ids.iter().map(|id| async move {
        match fetch_instance_metrics(series, id, duration_minutes).await {
            Ok(raw) => {
                let summary = summarize(id, &raw);
                metrics.inc_summaries_computed();
                InstanceHealth {
                    instance_id: summary.instance_id,
                    cpu_avg: summary.cpu_avg,
                    health: classify_health(summary.cpu_avg),
                    insights: summary.insights,
                }
            }
            Err(e) => {
                logger.log_instance_degraded(id, &format!("{:#}", e));
                metrics.inc_fleet_instances_degraded();
                InstanceHealth::fetch_failed(id)
            }
        }
    });

    Ok(join_all(checks).await)
}
