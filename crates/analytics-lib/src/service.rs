//! Analytics service composing providers with the analytics modules

use crate::anomaly::{AnomalyDetectionSummary, SigmaDetector};
use crate::cost::{calculate_fleet_cost, FleetCostSummary};
use crate::error::{AnalyticsError, Result};
use crate::health::{self, HealthTier, InstanceHealth, FETCH_FAILED_INSIGHT};
use crate::metrics::{summarize, MetricsSummary};
use crate::models::{InstanceInfo, InstanceMetrics};
use crate::observability::{AnalyticsMetrics, StructuredLogger};
use crate::predictor::{FailurePredictionSummary, FailurePredictor};
use crate::provider::{fetch_instance_metrics, InventoryProvider, TimeSeriesProvider};
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// Instance type reported for inventory entries without one
pub const UNKNOWN_INSTANCE_TYPE: &str = "unknown";

/// Entry point for every analytics view
///
/// Holds no per-call state; every result is computed fresh from the
/// providers.
pub struct FleetAnalytics {
    series: Arc<dyn TimeSeriesProvider>,
    inventory: Arc<dyn InventoryProvider>,
    detector: SigmaDetector,
    predictor: FailurePredictor,
    metrics: AnalyticsMetrics,
    logger: StructuredLogger,
}

impl FleetAnalytics {
    pub fn new(series: Arc<dyn TimeSeriesProvider>, inventory: Arc<dyn InventoryProvider>) -> Self {
        Self {
            series,
            inventory,
            detector: SigmaDetector::default(),
            predictor: FailurePredictor::default(),
            metrics: AnalyticsMetrics::new(),
            logger: StructuredLogger::new("fleet-analytics"),
        }
    }

    pub fn with_logger(mut self, logger: StructuredLogger) -> Self {
        self.logger = logger;
        self
    }

    pub fn with_detector(mut self, detector: SigmaDetector) -> Self {
        self.detector = detector;
        self
    }

    pub fn with_predictor(mut self, predictor: FailurePredictor) -> Self {
        self.predictor = predictor;
        self
    }

    /// Rounded channel averages and CPU insights for one instance
    pub async fn metrics_summary(
        &self,
        instance_id: &str,
        duration_minutes: u32,
    ) -> Result<MetricsSummary> {
        let raw = self.fetch(instance_id, duration_minutes).await?;
        let summary = summarize(instance_id, &raw);
        self.metrics.inc_summaries_computed();
        Ok(summary)
    }

    /// Sigma outliers across all channels of one instance
    pub async fn detect_anomalies(
        &self,
        instance_id: &str,
        duration_minutes: u32,
    ) -> Result<AnomalyDetectionSummary> {
        let raw = self.fetch(instance_id, duration_minutes).await?;
        let summary = self.detector.detect_all(instance_id, duration_minutes, &raw);

        for anomaly in &summary.anomalies_detected {
            self.logger.log_anomaly(
                instance_id,
                anomaly.metric.as_str(),
                anomaly.value,
                anomaly.sigma_deviation,
                anomaly.severity.as_str(),
            );
        }
        self.metrics.add_anomalies_detected(summary.anomaly_count);

        Ok(summary)
    }

    /// Trend based failure risk for one instance
    pub async fn predict_failure(
        &self,
        instance_id: &str,
        duration_minutes: u32,
    ) -> Result<FailurePredictionSummary> {
        let raw = self.fetch(instance_id, duration_minutes).await?;
        let summary = self.predictor.predict(instance_id, duration_minutes, &raw);

        self.logger.log_prediction(
            instance_id,
            summary.overall_risk_score,
            summary.overall_risk_level.as_str(),
            &summary.time_to_failure_estimate,
        );
        self.metrics.inc_predictions_generated();

        Ok(summary)
    }

    /// Health tier of every inventoried instance, in inventory order
    pub async fn fleet_health(&self, duration_minutes: u32) -> Result<Vec<InstanceHealth>> {
        validate_duration(duration_minutes)?;
        let start = Instant::now();

        let fleet = health::fleet_health(
            self.inventory.as_ref(),
            self.series.as_ref(),
            duration_minutes,
            &self.logger,
            &self.metrics,
        )
        .await?;

        let elapsed = start.elapsed();
        self.metrics
            .observe_fleet_health_latency(elapsed.as_secs_f64());

        let count = |tier: HealthTier| fleet.iter().filter(|h| h.health == tier).count();
        let degraded = fleet
            .iter()
            .filter(|h| h.cpu_avg == 0.0 && h.insights.iter().any(|i| i == FETCH_FAILED_INSIGHT))
            .count();
        self.logger.log_fleet_health(
            fleet.len(),
            count(HealthTier::Critical),
            count(HealthTier::Warning),
            degraded,
            elapsed.as_millis(),
        );

        Ok(fleet)
    }

    /// Inventory as reported by the provider
    pub async fn list_instances(&self) -> Result<Vec<InstanceInfo>> {
        self.inventory
            .list()
            .await
            .map_err(AnalyticsError::InventoryUnavailable)
    }

    /// Monthly and annual cost of the inventoried fleet
    pub async fn fleet_cost(&self) -> Result<FleetCostSummary> {
        let instances = self.list_instances().await?;
        Ok(calculate_fleet_cost(instances.iter().map(|i| {
            i.instance_type
                .as_deref()
                .unwrap_or(UNKNOWN_INSTANCE_TYPE)
        })))
    }

    async fn fetch(&self, instance_id: &str, duration_minutes: u32) -> Result<InstanceMetrics> {
        validate_duration(duration_minutes)?;
        debug!(instance_id = %instance_id, duration_minutes, "Fetching instance metrics");

        fetch_instance_metrics(self.series.as_ref(), instance_id, duration_minutes)
            .await
            .map_err(|source| AnalyticsError::MetricsUnavailable {
                instance_id: instance_id.to_string(),
                source,
            })
    }
}

fn validate_duration(duration_minutes: u32) -> Result<()> {
    if duration_minutes == 0 {
        return Err(AnalyticsError::InvalidDuration(duration_minutes));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anomaly::AnomalySeverity;
    use crate::models::{series_from_values, MetricName};
    use crate::predictor::{RiskLevel, Trend};
    use crate::provider::{Degrading, InMemoryProvider};
    use chrono::Utc;

    fn values(raw: &[f64]) -> Vec<Option<f64>> {
        raw.iter().copied().map(Some).collect()
    }

    fn service(provider: InMemoryProvider) -> FleetAnalytics {
        let provider = Arc::new(provider);
        FleetAnalytics::new(provider.clone(), provider)
    }

    fn instance(id: &str, instance_type: Option<&str>) -> InstanceInfo {
        InstanceInfo {
            instance_id: Some(id.to_string()),
            state: Some("running".to_string()),
            instance_type: instance_type.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_metrics_summary() {
        let now = Utc::now();
        let provider = InMemoryProvider::new().with_metrics(
            "i-1",
            InstanceMetrics {
                cpu: series_from_values(now, &[Some(4.0), None, Some(8.0)]),
                network_in: series_from_values(now, &values(&[100.0, 200.0])),
                network_out: Vec::new(),
            },
        );

        let summary = service(provider).metrics_summary("i-1", 60).await.unwrap();

        assert_eq!(summary.cpu_avg, 4.0);
        assert_eq!(summary.net_in_avg, 150.0);
        assert_eq!(summary.net_out_avg, 0.0);
        assert_eq!(summary.insights, vec!["Instance may be underutilized"]);
    }

    #[tokio::test]
    async fn test_detect_anomalies() {
        let mut cpu = vec![1.0; 9];
        cpu.push(50.0);
        let provider = InMemoryProvider::new().with_metrics(
            "i-1",
            InstanceMetrics {
                cpu: series_from_values(Utc::now(), &values(&cpu)),
                ..Default::default()
            },
        );

        let summary = service(provider).detect_anomalies("i-1", 60).await.unwrap();

        assert_eq!(summary.anomaly_count, 1);
        assert_eq!(summary.total_metrics_analyzed, 3);
        assert_eq!(summary.anomalies_detected[0].metric, MetricName::CpuUtilization);
        assert_eq!(summary.anomalies_detected[0].severity, AnomalySeverity::Minor);
    }

    #[tokio::test]
    async fn test_predict_failure() {
        let provider = InMemoryProvider::new().with_metrics(
            "i-1",
            InstanceMetrics {
                cpu: series_from_values(Utc::now(), &values(&[50.0, 60.0, 70.0, 80.0, 90.0])),
                ..Default::default()
            },
        );

        let summary = service(provider).predict_failure("i-1", 60).await.unwrap();

        assert_eq!(summary.predictions[0].trend, Trend::Increasing);
        assert_eq!(summary.overall_risk_score, 100);
        assert_eq!(summary.overall_risk_level, RiskLevel::Critical);
    }

    #[tokio::test]
    async fn test_custom_detector_and_predictor() {
        let provider = InMemoryProvider::new().with_metrics(
            "i-1",
            InstanceMetrics {
                cpu: series_from_values(
                    Utc::now(),
                    &values(&[1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 2.0, 50.0]),
                ),
                ..Default::default()
            },
        );
        let analytics = service(provider)
            .with_detector(SigmaDetector::new(2.0))
            .with_predictor(FailurePredictor::new(0.0));

        // Just under 3 sigma, so only the lowered threshold flags it
        let anomalies = analytics.detect_anomalies("i-1", 60).await.unwrap();
        assert_eq!(anomalies.anomaly_count, 1);
        assert_eq!(anomalies.anomalies_detected[0].value, 50.0);
        assert_eq!(anomalies.anomalies_detected[0].severity, AnomalySeverity::Normal);

        // A zero horizon predicts the current value
        let prediction = analytics.predict_failure("i-1", 60).await.unwrap();
        assert_eq!(prediction.predictions[0].predicted_value, 50.0);
    }

    #[tokio::test]
    async fn test_fetch_failure_is_typed() {
        let provider = InMemoryProvider::new().with_unreachable("i-down");

        let err = service(provider)
            .metrics_summary("i-down", 60)
            .await
            .unwrap_err();

        assert!(matches!(
            &err,
            AnalyticsError::MetricsUnavailable { instance_id, .. } if instance_id == "i-down"
        ));
        assert_eq!(
            err.to_string(),
            "Failed to fetch metrics: instance i-down is unreachable"
        );
    }

    #[tokio::test]
    async fn test_degrading_provider_reads_failure_as_no_data() {
        let provider = Arc::new(InMemoryProvider::new().with_unreachable("i-down"));
        let series = Arc::new(Degrading::new(
            provider.clone(),
            StructuredLogger::new("test"),
        ));
        let analytics = FleetAnalytics::new(series, provider);

        let summary = analytics.detect_anomalies("i-down", 60).await.unwrap();
        assert_eq!(summary.anomaly_count, 0);
    }

    #[tokio::test]
    async fn test_zero_duration_rejected() {
        let analytics = service(InMemoryProvider::new().with_instances(Vec::new()));

        assert!(matches!(
            analytics.metrics_summary("i-1", 0).await,
            Err(AnalyticsError::InvalidDuration(0))
        ));
        assert!(matches!(
            analytics.fleet_health(0).await,
            Err(AnalyticsError::InvalidDuration(0))
        ));
    }

    #[tokio::test]
    async fn test_list_instances_and_cost() {
        let provider = InMemoryProvider::new().with_instances(vec![
            instance("i-1", Some("m5.large")),
            instance("i-2", None),
            instance("i-3", Some("m5.large")),
        ]);
        let analytics = service(provider);

        assert_eq!(analytics.list_instances().await.unwrap().len(), 3);

        let cost = analytics.fleet_cost().await.unwrap();
        assert_eq!(cost.total_instances, 3);
        assert_eq!(cost.cost_by_instance_type["m5.large"].count, 2);
        assert_eq!(cost.cost_by_instance_type[UNKNOWN_INSTANCE_TYPE].monthly_cost, 36.5);
        // 2 * 70.08 + 36.5
        assert_eq!(cost.current_monthly_cost, 176.66);
    }

    #[tokio::test]
    async fn test_inventory_failure_on_listing() {
        let analytics = service(InMemoryProvider::new());
        let err = analytics.list_instances().await.unwrap_err();
        assert!(matches!(err, AnalyticsError::InventoryUnavailable(_)));
        assert!(analytics.fleet_cost().await.is_err());
    }
}
