//! Failure prediction from CPU trends
//!
//! Fits a linear trend to the CPU series, projects it a fixed number of
//! periods ahead and turns the current level, trend and projection into a
//! bounded risk score.

use super::risk::{cpu_risk_score, recommendation, time_to_failure, RiskLevel};
use super::trend::{current_value, trend_slope, Trend};
use crate::models::{Datapoint, InstanceMetrics, MetricName};
use serde::{Deserialize, Serialize};

/// Number of sample periods the linear projection looks ahead
pub const DEFAULT_HORIZON_PERIODS: f64 = 10.0;

/// Prediction for a single metric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResult {
    pub instance_id: String,
    pub metric: MetricName,
    pub current_value: f64,
    pub predicted_value: f64,
    pub trend: Trend,
    pub trend_slope: f64,
    pub risk_score: f64,
    pub risk_level: RiskLevel,
    pub failure_probability: f64,
    pub recommendation: String,
}

/// Failure prediction across the metrics of one instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FailurePredictionSummary {
    pub instance_id: String,
    pub duration_minutes: u32,
    pub predictions: Vec<PredictionResult>,
    pub overall_risk_score: u32,
    pub overall_risk_level: RiskLevel,
    pub time_to_failure_estimate: String,
}

/// Trend-based failure predictor
#[derive(Debug, Clone)]
pub struct FailurePredictor {
    /// Periods ahead used for the projected value
    pub horizon_periods: f64,
}

impl FailurePredictor {
    pub fn new(horizon_periods: f64) -> Self {
        Self { horizon_periods }
    }

    /// Predict CPU failure risk from a utilization series (percent scale)
    pub fn predict_cpu(&self, instance_id: &str, series: &[Datapoint]) -> PredictionResult {
        let current = current_value(series);
        let slope = trend_slope(series);
        let predicted = (current + slope * self.horizon_periods).clamp(0.0, 100.0);

        let trend = Trend::from_slope(slope);
        let risk_score = cpu_risk_score(current, slope, predicted);
        let risk_level = RiskLevel::from_score(risk_score);

        PredictionResult {
            instance_id: instance_id.to_string(),
            metric: MetricName::CpuUtilization,
            current_value: current,
            predicted_value: predicted,
            trend,
            trend_slope: slope,
            risk_score,
            risk_level,
            failure_probability: (risk_score / 100.0).min(1.0),
            recommendation: recommendation(
                MetricName::CpuUtilization,
                risk_level,
                trend,
                current,
            )
            .to_string(),
        }
    }

    /// Predict every supported metric and combine them into one summary
    pub fn predict(
        &self,
        instance_id: &str,
        duration_minutes: u32,
        metrics: &InstanceMetrics,
    ) -> FailurePredictionSummary {
        // Only CPU has a risk model; network predictors would be appended here
        let cpu = self.predict_cpu(instance_id, &metrics.cpu);
        let time_to_failure_estimate = time_to_failure(cpu.trend_slope, cpu.current_value);

        summarize(
            instance_id,
            duration_minutes,
            vec![cpu],
            time_to_failure_estimate,
        )
    }
}

impl Default for FailurePredictor {
    fn default() -> Self {
        Self::new(DEFAULT_HORIZON_PERIODS)
    }
}

/// Average the per-metric scores into an overall risk
fn summarize(
    instance_id: &str,
    duration_minutes: u32,
    predictions: Vec<PredictionResult>,
    time_to_failure_estimate: &str,
) -> FailurePredictionSummary {
    let overall = if predictions.is_empty() {
        0.0
    } else {
        predictions.iter().map(|p| p.risk_score).sum::<f64>() / predictions.len() as f64
    };

    FailurePredictionSummary {
        instance_id: instance_id.to_string(),
        duration_minutes,
        predictions,
        overall_risk_score: overall.round().clamp(0.0, 100.0) as u32,
        overall_risk_level: RiskLevel::from_score(overall),
        time_to_failure_estimate: time_to_failure_estimate.to_string(),
    }
}
