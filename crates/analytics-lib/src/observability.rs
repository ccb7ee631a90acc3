//! Observability for the analytics service
//!
//! Provides:
//! - Prometheus counters and a fleet latency histogram
//! - Structured JSON logging with tracing

use prometheus::{
    register_histogram, register_int_counter, Encoder, Histogram, IntCounter, TextEncoder,
};
use std::sync::OnceLock;
use tracing::{info, warn};

/// Histogram buckets for fleet aggregation latency (in seconds)
const LATENCY_BUCKETS: &[f64] = &[
    0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

/// Global metrics instance (registered once)
static GLOBAL_METRICS: OnceLock<AnalyticsMetricsInner> = OnceLock::new();

struct AnalyticsMetricsInner {
    summaries_computed: IntCounter,
    anomalies_detected: IntCounter,
    predictions_generated: IntCounter,
    fleet_instances_degraded: IntCounter,
    fleet_health_latency_seconds: Histogram,
}

impl AnalyticsMetricsInner {
    fn new() -> Self {
        Self {
            summaries_computed: register_int_counter!(
                "fleet_analytics_summaries_computed_total",
                "Total number of metric summaries computed"
            )
            .expect("Failed to register summaries_computed"),

            anomalies_detected: register_int_counter!(
                "fleet_analytics_anomalies_detected_total",
                "Total number of anomalous samples flagged"
            )
            .expect("Failed to register anomalies_detected"),

            predictions_generated: register_int_counter!(
                "fleet_analytics_predictions_generated_total",
                "Total number of failure predictions generated"
            )
            .expect("Failed to register predictions_generated"),

            fleet_instances_degraded: register_int_counter!(
                "fleet_analytics_fleet_instances_degraded_total",
                "Instances reported as CRITICAL because their metrics could not be fetched"
            )
            .expect("Failed to register fleet_instances_degraded"),

            fleet_health_latency_seconds: register_histogram!(
                "fleet_analytics_fleet_health_latency_seconds",
                "Time spent aggregating fleet health",
                LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register fleet_health_latency_seconds"),
        }
    }
}

/// Handle to the process-wide analytics metrics
///
/// Clones share the same underlying metrics.
#[derive(Clone)]
pub struct AnalyticsMetrics {
    inner: &'static AnalyticsMetricsInner,
}

impl Default for AnalyticsMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalyticsMetrics {
    /// Create a handle, registering the metrics on first use
    pub fn new() -> Self {
        Self {
            inner: GLOBAL_METRICS.get_or_init(AnalyticsMetricsInner::new),
        }
    }

    pub fn inc_summaries_computed(&self) {
        self.inner.summaries_computed.inc();
    }

    pub fn add_anomalies_detected(&self, count: usize) {
        self.inner.anomalies_detected.inc_by(count as u64);
    }

    pub fn inc_predictions_generated(&self) {
        self.inner.predictions_generated.inc();
    }

    pub fn inc_fleet_instances_degraded(&self) {
        self.inner.fleet_instances_degraded.inc();
    }

    pub fn observe_fleet_health_latency(&self, duration_secs: f64) {
        self.inner.fleet_health_latency_seconds.observe(duration_secs);
    }
}

/// Render every registered metric in the Prometheus text format
pub fn gather_metrics_text() -> prometheus::Result<String> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

/// Structured logger for analytics events
#[derive(Debug, Clone)]
pub struct StructuredLogger {
    component: String,
}

impl StructuredLogger {
    pub fn new(component: impl Into<String>) -> Self {
        Self {
            component: component.into(),
        }
    }

    /// Log one anomalous sample
    pub fn log_anomaly(
        &self,
        instance_id: &str,
        metric: &str,
        value: f64,
        sigma_deviation: f64,
        severity: &str,
    ) {
        match severity {
            "CRITICAL" | "MAJOR" => {
                warn!(
                    event = "anomaly_detected",
                    component = %self.component,
                    instance_id = %instance_id,
                    metric = %metric,
                    value = value,
                    sigma_deviation = sigma_deviation,
                    severity = %severity,
                    "Severe anomaly detected"
                );
            }
            _ => {
                info!(
                    event = "anomaly_detected",
                    component = %self.component,
                    instance_id = %instance_id,
                    metric = %metric,
                    value = value,
                    sigma_deviation = sigma_deviation,
                    severity = %severity,
                    "Anomaly detected"
                );
            }
        }
    }

    /// Log a failure prediction
    pub fn log_prediction(
        &self,
        instance_id: &str,
        overall_risk_score: u32,
        overall_risk_level: &str,
        time_to_failure: &str,
    ) {
        info!(
            event = "prediction_generated",
            component = %self.component,
            instance_id = %instance_id,
            overall_risk_score = overall_risk_score,
            overall_risk_level = %overall_risk_level,
            time_to_failure = %time_to_failure,
            "Generated failure prediction"
        );
    }

    /// Log the outcome of a fleet health aggregation
    pub fn log_fleet_health(
        &self,
        instances: usize,
        critical: usize,
        warning: usize,
        degraded: usize,
        elapsed_ms: u128,
    ) {
        info!(
            event = "fleet_health_computed",
            component = %self.component,
            instances = instances,
            critical = critical,
            warning = warning,
            degraded = degraded,
            elapsed_ms = elapsed_ms as u64,
            "Computed fleet health"
        );
    }

    /// Log an instance whose metrics could not be fetched during aggregation
    pub fn log_instance_degraded(&self, instance_id: &str, error: &str) {
        warn!(
            event = "instance_degraded",
            component = %self.component,
            instance_id = %instance_id,
            error = %error,
            "Failed to fetch metrics, reporting instance as CRITICAL"
        );
    }

    /// Log a channel fetch that was replaced by an empty series
    pub fn log_channel_degraded(&self, instance_id: &str, metric: &str, error: &str) {
        warn!(
            event = "channel_degraded",
            component = %self.component,
            instance_id = %instance_id,
            metric = %metric,
            error = %error,
            "Metric fetch failed, treating as no data"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_handles_share_registry() {
        let first = AnalyticsMetrics::new();
        let second = AnalyticsMetrics::default();

        first.inc_summaries_computed();
        second.add_anomalies_detected(2);
        first.inc_predictions_generated();
        second.inc_fleet_instances_degraded();
        first.observe_fleet_health_latency(0.01);

        assert!(std::ptr::eq(first.inner, second.inner));
    }

    #[test]
    fn test_gather_includes_analytics_metrics() {
        let metrics = AnalyticsMetrics::new();
        metrics.inc_summaries_computed();

        let text = gather_metrics_text().unwrap();
        assert!(text.contains("fleet_analytics_summaries_computed_total"));
    }

    #[test]
    fn test_structured_logger_creation() {
        let logger = StructuredLogger::new("analytics");
        assert_eq!(logger.component, "analytics");
    }
}
