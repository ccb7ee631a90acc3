//! In-memory provider backed by a fixed data set

use super::{async_trait, InventoryProvider, TimeSeriesProvider};
use crate::models::{InstanceInfo, InstanceMetrics, MetricName, MetricSeries};
use anyhow::{anyhow, bail, Result};
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Serves inventory and series from memory
///
/// The duration window is anchored at the newest sample of each series,
/// so recorded data sets stay usable regardless of wall-clock time.
/// Instances listed as unreachable fail every fetch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InMemoryProvider {
    /// `None` makes `list()` fail
    #[serde(default)]
    instances: Option<Vec<InstanceInfo>>,
    #[serde(default)]
    metrics: HashMap<String, InstanceMetrics>,
    #[serde(default)]
    unreachable: BTreeSet<String>,
}

impl InMemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_instances(mut self, instances: Vec<InstanceInfo>) -> Self {
        self.instances = Some(instances);
        self
    }

    pub fn with_metrics(mut self, instance_id: impl Into<String>, metrics: InstanceMetrics) -> Self {
        self.metrics.insert(instance_id.into(), metrics);
        self
    }

    pub fn with_unreachable(mut self, instance_id: impl Into<String>) -> Self {
        self.unreachable.insert(instance_id.into());
        self
    }

    /// Number of instances with recorded series
    pub fn recorded_instances(&self) -> usize {
        self.metrics.len()
    }
}

#[async_trait]
impl TimeSeriesProvider for InMemoryProvider {
    async fn fetch(
        &self,
        metric: MetricName,
        instance_id: &str,
        duration_minutes: u32,
    ) -> Result<MetricSeries> {
        if self.unreachable.contains(instance_id) {
            bail!("instance {} is unreachable", instance_id);
        }

        let mut series = self
            .metrics
            .get(instance_id)
            .map(|m| m.series(metric).to_vec())
            .unwrap_or_default();
        series.sort_by_key(|p| p.timestamp);

        if let Some(latest) = series.last().map(|p| p.timestamp) {
            let cutoff = latest - Duration::minutes(i64::from(duration_minutes));
            series.retain(|p| p.timestamp > cutoff);
        }

        Ok(series)
    }
}

#[async_trait]
impl InventoryProvider for InMemoryProvider {
    async fn list(&self) -> Result<Vec<InstanceInfo>> {
        self.instances
            .clone()
            .ok_or_else(|| anyhow!("no instance inventory available"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{series_from_values, Datapoint};
    use chrono::{TimeZone, Utc};

    fn start() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_window_anchored_at_latest_sample() {
        // 24 samples five minutes apart span 115 minutes
        let values: Vec<Option<f64>> = (0..24).map(|i| Some(i as f64)).collect();
        let provider = InMemoryProvider::new().with_metrics(
            "i-1",
            InstanceMetrics {
                cpu: series_from_values(start(), &values),
                ..Default::default()
            },
        );

        let series = provider
            .fetch(MetricName::CpuUtilization, "i-1", 60)
            .await
            .unwrap();

        assert_eq!(series.len(), 12);
        assert_eq!(series[0].value, Some(12.0));
        assert_eq!(series[11].value, Some(23.0));
    }

    #[tokio::test]
    async fn test_series_sorted_by_timestamp() {
        let t0 = start();
        let provider = InMemoryProvider::new().with_metrics(
            "i-1",
            InstanceMetrics {
                network_in: vec![
                    Datapoint::new(t0 + Duration::minutes(10), Some(3.0)),
                    Datapoint::new(t0, Some(1.0)),
                    Datapoint::new(t0 + Duration::minutes(5), Some(2.0)),
                ],
                ..Default::default()
            },
        );

        let series = provider
            .fetch(MetricName::NetworkIn, "i-1", 60)
            .await
            .unwrap();
        let values: Vec<_> = series.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![Some(1.0), Some(2.0), Some(3.0)]);
    }

    #[tokio::test]
    async fn test_unknown_instance_has_no_data() {
        let provider = InMemoryProvider::new();
        let series = provider
            .fetch(MetricName::CpuUtilization, "i-missing", 60)
            .await
            .unwrap();
        assert!(series.is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_instance_fails() {
        let provider = InMemoryProvider::new().with_unreachable("i-down");
        assert!(provider
            .fetch(MetricName::CpuUtilization, "i-down", 60)
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_inventory() {
        assert!(InMemoryProvider::new().list().await.is_err());

        let provider = InMemoryProvider::new().with_instances(vec![InstanceInfo {
            instance_id: Some("i-1".to_string()),
            state: Some("running".to_string()),
            instance_type: Some("t3.large".to_string()),
        }]);
        let instances = provider.list().await.unwrap();
        assert_eq!(instances.len(), 1);
        assert_eq!(instances[0].id(), Some("i-1"));
    }

    #[test]
    fn test_deserializes_from_json() {
        let provider: InMemoryProvider = serde_json::from_str(
            r#"{
                "instances": [{"instanceId": "i-1", "instanceType": "m5.large"}],
                "metrics": {"i-1": {"cpu": [{"timestamp": "2024-01-01T00:00:00Z", "value": 5.0}]}},
                "unreachable": ["i-2"]
            }"#,
        )
        .unwrap();
        assert_eq!(provider.recorded_instances(), 1);
        assert!(provider.unreachable.contains("i-2"));
    }
}
