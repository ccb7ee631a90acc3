//! CPU risk scoring heuristics

use super::Trend;
use crate::models::MetricName;
use serde::{Deserialize, Serialize};

/// Utilization at which an instance is considered failed
pub const FAILURE_THRESHOLD: f64 = 90.0;

/// Bucketed risk derived from a 0-100 score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub fn from_score(score: f64) -> Self {
        if score >= 75.0 {
            RiskLevel::Critical
        } else if score >= 50.0 {
            RiskLevel::High
        } else if score >= 25.0 {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
            RiskLevel::Critical => "CRITICAL",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Additive CPU risk score clamped to [0, 100]
///
/// Combines the current level, an upward trend and the projected level.
pub fn cpu_risk_score(current_value: f64, slope: f64, predicted_value: f64) -> f64 {
    let mut score = 0.0;

    if current_value > 80.0 {
        score += 40.0;
    } else if current_value > 60.0 {
        score += 20.0;
    } else if current_value > 40.0 {
        score += 10.0;
    }

    if slope > 0.0 {
        score += (slope * 5.0).min(30.0);
    }

    if predicted_value > 90.0 {
        score += 30.0;
    } else if predicted_value > 80.0 {
        score += 20.0;
    } else if predicted_value > 70.0 {
        score += 10.0;
    }

    score.clamp(0.0, 100.0)
}

/// Operator advice for a prediction; only CPU has specific guidance
pub fn recommendation(
    metric: MetricName,
    risk_level: RiskLevel,
    trend: Trend,
    current_value: f64,
) -> &'static str {
    if metric == MetricName::CpuUtilization {
        if risk_level == RiskLevel::Critical {
            return "Immediate action required: Scale up instance or optimize workload";
        }
        if risk_level == RiskLevel::High {
            return "Consider scaling up instance or investigating high CPU processes";
        }
        if trend == Trend::Increasing && current_value > 50.0 {
            return "Monitor closely - CPU trending upward";
        }
        if current_value < 20.0 {
            return "Instance may be over-provisioned - consider downsizing";
        }
    }

    "Continue monitoring"
}

/// Coarse estimate of how long until CPU reaches [`FAILURE_THRESHOLD`]
///
/// One period is one five-minute sample.
pub fn time_to_failure(slope: f64, current_value: f64) -> &'static str {
    if slope <= 0.0 {
        return "No immediate failure risk (stable or decreasing trend)";
    }

    let periods_to_failure = (FAILURE_THRESHOLD - current_value) / slope;

    if periods_to_failure <= 0.0 {
        "Already at critical levels"
    } else if periods_to_failure < 6.0 {
        "< 30 minutes"
    } else if periods_to_failure < 12.0 {
        "30-60 minutes"
    } else if periods_to_failure < 24.0 {
        "1-2 hours"
    } else if periods_to_failure < 72.0 {
        "2-6 hours"
    } else {
        "> 6 hours"
    }
}
