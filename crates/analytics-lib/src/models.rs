//! Core data models shared by the analytics modules

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Nominal sampling period of a metric series, in seconds
pub const SAMPLE_PERIOD_SECS: i64 = 300;

/// One sample of a metric; the provider may omit the value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Datapoint {
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub value: Option<f64>,
}

impl Datapoint {
    pub fn new(timestamp: DateTime<Utc>, value: Option<f64>) -> Self {
        Self { timestamp, value }
    }

    /// Value usable for statistics (present and not NaN)
    pub fn valid_value(&self) -> Option<f64> {
        self.value.filter(|v| !v.is_nan())
    }
}

/// Time-ascending sequence of samples for one metric
pub type MetricSeries = Vec<Datapoint>;

/// Extract the values usable for statistics, in series order
pub fn valid_values(series: &[Datapoint]) -> Vec<f64> {
    series.iter().filter_map(Datapoint::valid_value).collect()
}

/// Build a series sampled every [`SAMPLE_PERIOD_SECS`] starting at `start`
pub fn series_from_values(start: DateTime<Utc>, values: &[Option<f64>]) -> MetricSeries {
    values
        .iter()
        .enumerate()
        .map(|(i, value)| {
            Datapoint::new(
                start + chrono::Duration::seconds(i as i64 * SAMPLE_PERIOD_SECS),
                *value,
            )
        })
        .collect()
}

/// Metrics tracked per instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MetricName {
    #[serde(rename = "CPUUtilization")]
    CpuUtilization,
    #[serde(rename = "NetworkIn")]
    NetworkIn,
    #[serde(rename = "NetworkOut")]
    NetworkOut,
}

impl MetricName {
    /// All channels in their fixed reporting order
    pub const ALL: [MetricName; 3] = [
        MetricName::CpuUtilization,
        MetricName::NetworkIn,
        MetricName::NetworkOut,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MetricName::CpuUtilization => "CPUUtilization",
            MetricName::NetworkIn => "NetworkIn",
            MetricName::NetworkOut => "NetworkOut",
        }
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The three raw channels fetched for one instance
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceMetrics {
    #[serde(default)]
    pub cpu: MetricSeries,
    #[serde(default)]
    pub network_in: MetricSeries,
    #[serde(default)]
    pub network_out: MetricSeries,
}

impl InstanceMetrics {
    pub fn series(&self, metric: MetricName) -> &[Datapoint] {
        match metric {
            MetricName::CpuUtilization => &self.cpu,
            MetricName::NetworkIn => &self.network_in,
            MetricName::NetworkOut => &self.network_out,
        }
    }
}

/// Inventory entry as reported by the inventory provider
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceInfo {
    #[serde(default)]
    pub instance_id: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub instance_type: Option<String>,
}

impl InstanceInfo {
    /// Identifier if present and non-empty
    pub fn id(&self) -> Option<&str> {
        self.instance_id.as_deref().filter(|id| !id.is_empty())
    }
}

/// Round to a fixed number of decimal places (half away from zero)
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
