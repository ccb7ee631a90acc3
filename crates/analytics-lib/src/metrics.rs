//! Metrics summaries
//!
//! Reduces the raw channels of one instance to rounded averages and
//! qualitative insights about CPU load.

use crate::models::{round_to, Datapoint, InstanceMetrics};
use serde::{Deserialize, Serialize};

/// CPU average above which the instance is reported as heavily loaded
pub const HIGH_CPU_THRESHOLD: f64 = 80.0;

/// CPU average below which the instance is reported as underutilized
pub const LOW_CPU_THRESHOLD: f64 = 10.0;

pub const HIGH_CPU_INSIGHT: &str = "High CPU load detected";
pub const UNDERUTILIZED_INSIGHT: &str = "Instance may be underutilized";

/// Rounded per-channel averages for one instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSummary {
    pub instance_id: String,
    pub cpu_avg: f64,
    pub net_in_avg: f64,
    pub net_out_avg: f64,
    pub insights: Vec<String>,
}

/// Plain average over every sample, counting absent values as zero
///
/// Unlike the anomaly and trend statistics this divides by the full channel
/// length, so gaps pull the average down.
pub fn plain_average(series: &[Datapoint]) -> f64 {
    if series.is_empty() {
        return 0.0;
    }
    let sum: f64 = series.iter().map(|dp| dp.valid_value().unwrap_or(0.0)).sum();
    sum / series.len() as f64
}

/// Insights derived from the CPU average; both, one or neither may apply
pub fn cpu_insights(cpu_avg: f64) -> Vec<String> {
    let mut insights = Vec::new();
    if cpu_avg > HIGH_CPU_THRESHOLD {
        insights.push(HIGH_CPU_INSIGHT.to_string());
    }
    if cpu_avg < LOW_CPU_THRESHOLD {
        insights.push(UNDERUTILIZED_INSIGHT.to_string());
    }
    insights
}

/// Summarize the channels of one instance
pub fn summarize(instance_id: &str, metrics: &InstanceMetrics) -> MetricsSummary {
    let cpu_avg = plain_average(&metrics.cpu);
    let net_in_avg = plain_average(&metrics.network_in);
    let net_out_avg = plain_average(&metrics.network_out);

    MetricsSummary {
        instance_id: instance_id.to_string(),
        cpu_avg: round_to(cpu_avg, 2),
        net_in_avg: round_to(net_in_avg, 2),
        net_out_avg: round_to(net_out_avg, 2),
        insights: cpu_insights(cpu_avg),
    }
}
