//! Failure risk prediction
//!
//! Trend fitting, risk scoring and the CPU failure predictor built on them.

mod failure;
mod risk;
mod trend;

pub use failure::{
    FailurePredictionSummary, FailurePredictor, PredictionResult, DEFAULT_HORIZON_PERIODS,
};
pub use risk::{cpu_risk_score, recommendation, time_to_failure, RiskLevel, FAILURE_THRESHOLD};
pub use trend::{current_value, trend_slope, Trend, STABLE_SLOPE_THRESHOLD};
