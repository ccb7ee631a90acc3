//! Trend fitting over metric series

use crate::models::Datapoint;
use crate::stats::linear_regression_slope;
use serde::{Deserialize, Serialize};

/// Slopes with a smaller magnitude are considered flat
pub const STABLE_SLOPE_THRESHOLD: f64 = 0.1;

/// Direction of a fitted trend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Trend {
    Increasing,
    Decreasing,
    Stable,
}

impl Trend {
    pub fn from_slope(slope: f64) -> Self {
        if slope.abs() < STABLE_SLOPE_THRESHOLD {
            Trend::Stable
        } else if slope > 0.0 {
            Trend::Increasing
        } else {
            Trend::Decreasing
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::Increasing => "INCREASING",
            Trend::Decreasing => "DECREASING",
            Trend::Stable => "STABLE",
        }
    }
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Least-squares slope of a series per sample period
///
/// The x coordinate is the ordinal position of each sample in the series
/// (absent samples keep their slot), not its timestamp.
pub fn trend_slope(series: &[Datapoint]) -> f64 {
    let points: Vec<(f64, f64)> = series
        .iter()
        .enumerate()
        .filter_map(|(index, dp)| dp.valid_value().map(|value| (index as f64, value)))
        .collect();

    linear_regression_slope(&points)
}

/// Last valid value of a series, 0 when none exists
pub fn current_value(series: &[Datapoint]) -> f64 {
    series
        .iter()
        .rev()
        .find_map(Datapoint::valid_value)
        .unwrap_or(0.0)
}
