//! Three-sigma outlier detection
//!
//! Computes the population mean and standard deviation of a whole metric
//! series and flags every sample lying at least `threshold` standard
//! deviations away from the mean.

use crate::models::{valid_values, Datapoint, InstanceMetrics, MetricName};
use crate::stats::{mean, population_std_dev};
use serde::{Deserialize, Serialize};

/// Minimum valid samples required for detection
pub const MIN_SAMPLES_FOR_DETECTION: usize = 3;

/// Default outlier threshold in standard deviations
pub const DEFAULT_SIGMA_THRESHOLD: f64 = 3.0;

/// Severity levels for a sigma deviation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnomalySeverity {
    Normal,
    Minor,
    Major,
    Critical,
}

impl AnomalySeverity {
    /// Classify any sigma deviation (sign is ignored)
    pub fn from_sigma(sigma_deviation: f64) -> Self {
        let abs_sigma = sigma_deviation.abs();
        if abs_sigma < 3.0 {
            AnomalySeverity::Normal
        } else if abs_sigma < 4.0 {
            AnomalySeverity::Minor
        } else if abs_sigma < 5.0 {
            AnomalySeverity::Major
        } else {
            AnomalySeverity::Critical
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AnomalySeverity::Normal => "NORMAL",
            AnomalySeverity::Minor => "MINOR",
            AnomalySeverity::Major => "MAJOR",
            AnomalySeverity::Critical => "CRITICAL",
        }
    }
}

impl std::fmt::Display for AnomalySeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single anomalous sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnomalyResult {
    pub instance_id: String,
    pub metric: MetricName,
    /// Always true; only anomalous samples are materialized
    pub is_anomaly: bool,
    pub value: f64,
    pub mean: f64,
    pub std_dev: f64,
    /// Signed number of standard deviations from the mean
    pub sigma_deviation: f64,
    pub severity: AnomalySeverity,
}

/// Anomalies found across all channels of one instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnomalyDetectionSummary {
    pub instance_id: String,
    pub duration_minutes: u32,
    pub anomalies_detected: Vec<AnomalyResult>,
    pub total_metrics_analyzed: usize,
    pub anomaly_count: usize,
}

/// Detects samples exceeding a standard deviation threshold
#[derive(Debug, Clone)]
pub struct SigmaDetector {
    /// Number of standard deviations to consider an outlier
    pub threshold: f64,
}

impl SigmaDetector {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    /// Flag the outliers of one metric series
    ///
    /// Returns an empty list when fewer than three valid samples exist or
    /// the series is constant.
    pub fn detect(
        &self,
        metric: MetricName,
        instance_id: &str,
        series: &[Datapoint],
    ) -> Vec<AnomalyResult> {
        let values = valid_values(series);
        if values.len() < MIN_SAMPLES_FOR_DETECTION {
            return Vec::new();
        }

        let mean = mean(&values);
        let std_dev = population_std_dev(&values, mean);

        // A constant series cannot be anomalous
        if std_dev == 0.0 {
            return Vec::new();
        }

        values
            .into_iter()
            .filter_map(|value| {
                let sigma_deviation = (value - mean) / std_dev;
                if sigma_deviation.abs() < self.threshold {
                    return None;
                }
                Some(AnomalyResult {
                    instance_id: instance_id.to_string(),
                    metric,
                    is_anomaly: true,
                    value,
                    mean,
                    std_dev,
                    sigma_deviation,
                    severity: AnomalySeverity::from_sigma(sigma_deviation),
                })
            })
            .collect()
    }

    /// Run detection on every channel and concatenate in channel order
    pub fn detect_all(
        &self,
        instance_id: &str,
        duration_minutes: u32,
        metrics: &InstanceMetrics,
    ) -> AnomalyDetectionSummary {
        let anomalies: Vec<AnomalyResult> = MetricName::ALL
            .iter()
            .flat_map(|metric| self.detect(*metric, instance_id, metrics.series(*metric)))
            .collect();

        AnomalyDetectionSummary {
            instance_id: instance_id.to_string(),
            duration_minutes,
            anomaly_count: anomalies.len(),
            anomalies_detected: anomalies,
            total_metrics_analyzed: MetricName::ALL.len(),
        }
    }
}

impl Default for SigmaDetector {
    fn default() -> Self {
        Self::new(DEFAULT_SIGMA_THRESHOLD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::series_from_values;
    use chrono::{DateTime, Utc};

    fn series(values: &[f64]) -> Vec<Datapoint> {
        let start: DateTime<Utc> = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let values: Vec<Option<f64>> = values.iter().copied().map(Some).collect();
        series_from_values(start, &values)
    }

    fn with_outlier(base: f64, count: usize, outlier: f64) -> Vec<f64> {
        let mut values = vec![base; count];
        values.push(outlier);
        values
    }

    #[test]
    fn test_single_outlier_is_minor() {
        let detector = SigmaDetector::default();
        let values = with_outlier(1.0, 9, 50.0);
        let anomalies = detector.detect(MetricName::CpuUtilization, "i-1", &series(&values));

        assert_eq!(anomalies.len(), 1);
        let anomaly = &anomalies[0];
        assert_eq!(anomaly.value, 50.0);
        assert!((anomaly.mean - 5.9).abs() < 1e-9);
        assert!((anomaly.std_dev - 14.7).abs() < 1e-9);
        assert!((anomaly.sigma_deviation - 3.0).abs() < 1e-9);
        assert_eq!(anomaly.severity, AnomalySeverity::Minor);
        assert_eq!(anomaly.metric, MetricName::CpuUtilization);
        assert!(anomaly.is_anomaly);

        let json = serde_json::to_value(anomaly).unwrap();
        assert_eq!(json["isAnomaly"], true);
        assert_eq!(json["sigmaDeviation"], anomaly.sigma_deviation);
    }

    #[test]
    fn test_outlier_below_three_sigma_not_flagged() {
        let detector = SigmaDetector::default();
        // Slightly perturbed baseline keeps the outlier just under 3 sigma
        let values = [1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 2.0, 50.0];
        let anomalies = detector.detect(MetricName::CpuUtilization, "i-1", &series(&values));
        assert!(anomalies.is_empty());
    }

    #[test]
    fn test_severity_scales_with_sample_count() {
        let detector = SigmaDetector::default();

        let major = detector.detect(
            MetricName::NetworkIn,
            "i-1",
            &series(&with_outlier(10.0, 19, 100.0)),
        );
        assert_eq!(major.len(), 1);
        assert_eq!(major[0].severity, AnomalySeverity::Major);

        let critical = detector.detect(
            MetricName::NetworkIn,
            "i-1",
            &series(&with_outlier(10.0, 29, 100.0)),
        );
        assert_eq!(critical.len(), 1);
        assert_eq!(critical[0].severity, AnomalySeverity::Critical);
    }

    #[test]
    fn test_negative_outlier_flagged() {
        let detector = SigmaDetector::default();
        let values = with_outlier(100.0, 19, 10.0);
        let anomalies = detector.detect(MetricName::NetworkOut, "i-1", &series(&values));
        assert_eq!(anomalies.len(), 1);
        assert!(anomalies[0].sigma_deviation < 0.0);
    }

    #[test]
    fn test_insufficient_samples() {
        let detector = SigmaDetector::default();
        let anomalies = detector.detect(MetricName::CpuUtilization, "i-1", &series(&[1.0, 100.0]));
        assert!(anomalies.is_empty());
    }

    #[test]
    fn test_absent_values_do_not_count_as_samples() {
        let detector = SigmaDetector::default();
        let start = DateTime::from_timestamp(0, 0).unwrap();
        let s = series_from_values(start, &[Some(1.0), None, Some(f64::NAN), Some(100.0)]);
        assert!(detector.detect(MetricName::CpuUtilization, "i-1", &s).is_empty());
    }

    #[test]
    fn test_constant_series_has_no_anomalies() {
        let detector = SigmaDetector::default();
        let anomalies = detector.detect(MetricName::CpuUtilization, "i-1", &series(&[42.0; 12]));
        assert!(anomalies.is_empty());
    }

    #[test]
    fn test_severity_mapping_is_total() {
        assert_eq!(AnomalySeverity::from_sigma(0.0), AnomalySeverity::Normal);
        assert_eq!(AnomalySeverity::from_sigma(-2.99), AnomalySeverity::Normal);
        assert_eq!(AnomalySeverity::from_sigma(3.0), AnomalySeverity::Minor);
        assert_eq!(AnomalySeverity::from_sigma(-4.0), AnomalySeverity::Major);
        assert_eq!(AnomalySeverity::from_sigma(4.99), AnomalySeverity::Major);
        assert_eq!(AnomalySeverity::from_sigma(5.0), AnomalySeverity::Critical);
    }

    #[test]
    fn test_detect_all_concatenates_channels() {
        let detector = SigmaDetector::default();
        let metrics = InstanceMetrics {
            cpu: series(&with_outlier(1.0, 9, 50.0)),
            network_in: series(&[5.0; 10]),
            network_out: series(&with_outlier(10.0, 19, 100.0)),
        };
        let summary = detector.detect_all("i-7", 60, &metrics);

        assert_eq!(summary.instance_id, "i-7");
        assert_eq!(summary.duration_minutes, 60);
        assert_eq!(summary.total_metrics_analyzed, 3);
        assert_eq!(summary.anomaly_count, 2);
        assert_eq!(summary.anomalies_detected[0].metric, MetricName::CpuUtilization);
        assert_eq!(summary.anomalies_detected[1].metric, MetricName::NetworkOut);
    }

    #[test]
    fn test_detection_is_deterministic() {
        let detector = SigmaDetector::default();
        let s = series(&with_outlier(1.0, 9, 50.0));
        let first = detector.detect(MetricName::CpuUtilization, "i-1", &s);
        let second = detector.detect(MetricName::CpuUtilization, "i-1", &s);
        assert_eq!(first, second);
    }

    #[test]
    fn test_summary_serialization() {
        let summary = SigmaDetector::default().detect_all("i-1", 30, &InstanceMetrics::default());
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["totalMetricsAnalyzed"], 3);
        assert_eq!(json["anomalyCount"], 0);
        assert_eq!(
            serde_json::to_value(AnomalySeverity::Critical).unwrap(),
            "CRITICAL"
        );
    }
}
