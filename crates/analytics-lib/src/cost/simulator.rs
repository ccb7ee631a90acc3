//! Cost change simulation between two instance types

use super::pricing::InstanceCost;
use super::sizing::suggest_instance_type;
use crate::error::AnalyticsError;
use crate::models::round_to;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Intent behind a proposed instance type change
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scenario {
    Downsize,
    Upsize,
    Optimize,
    #[default]
    Resize,
}

impl Scenario {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scenario::Downsize => "downsize",
            Scenario::Upsize => "upsize",
            Scenario::Optimize => "optimize",
            Scenario::Resize => "resize",
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scenario {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "downsize" => Ok(Scenario::Downsize),
            "upsize" => Ok(Scenario::Upsize),
            "optimize" => Ok(Scenario::Optimize),
            "resize" => Ok(Scenario::Resize),
            _ => Err(AnalyticsError::UnknownScenario(s.to_string())),
        }
    }
}

/// Computed monthly and annual delta between two instance types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostSimulationResult {
    pub scenario: Scenario,
    pub current_cost: InstanceCost,
    pub proposed_cost: InstanceCost,
    /// Positive when the proposal is cheaper
    pub monthly_savings: f64,
    /// Savings relative to the current monthly cost, one decimal
    pub monthly_savings_percent: f64,
    pub annual_savings: f64,
    pub recommendation: String,
}

/// Simulate moving from `current_type` to `proposed_type`
pub fn simulate_cost_change(
    current_type: &str,
    proposed_type: &str,
    scenario: Scenario,
) -> CostSimulationResult {
    let current_cost = InstanceCost::for_type(current_type);
    let proposed_cost = InstanceCost::for_type(proposed_type);

    let monthly_savings = current_cost.monthly - proposed_cost.monthly;
    let monthly_savings_percent = if current_cost.monthly > 0.0 {
        monthly_savings / current_cost.monthly * 100.0
    } else {
        0.0
    };
    let annual_savings = monthly_savings * 12.0;

    let recommendation =
        cost_recommendation(scenario, monthly_savings_percent, current_type, proposed_type);

    CostSimulationResult {
        scenario,
        current_cost,
        proposed_cost,
        monthly_savings: round_to(monthly_savings, 2),
        monthly_savings_percent: round_to(monthly_savings_percent, 1),
        annual_savings: round_to(annual_savings, 2),
        recommendation,
    }
}

/// Simulate a change, deriving the proposal when none is given
///
/// Without a proposed type the suggestion for `avg_cpu_utilization` is
/// used; with neither, the current type is compared against itself.
pub fn simulate_with_suggestion(
    current_type: &str,
    proposed_type: Option<&str>,
    scenario: Scenario,
    avg_cpu_utilization: Option<f64>,
) -> CostSimulationResult {
    let proposed = match (proposed_type, avg_cpu_utilization) {
        (Some(proposed), _) => proposed.to_string(),
        (None, Some(cpu)) => suggest_instance_type(current_type, cpu),
        (None, None) => current_type.to_string(),
    };

    simulate_cost_change(current_type, &proposed, scenario)
}

fn cost_recommendation(
    scenario: Scenario,
    savings_percent: f64,
    current_type: &str,
    proposed_type: &str,
) -> String {
    match scenario {
        Scenario::Downsize if savings_percent > 50.0 => format!(
            "Significant cost savings opportunity. Consider migrating from {} to {}.",
            current_type, proposed_type
        ),
        Scenario::Downsize if savings_percent > 25.0 => {
            "Moderate cost savings available. Evaluate workload requirements before downsizing."
                .to_string()
        }
        Scenario::Downsize => {
            "Minor cost reduction. Ensure performance requirements are still met.".to_string()
        }
        Scenario::Upsize => format!(
            "Upgrading to {} will increase costs by {:.1}%. Recommended only if current performance is insufficient.",
            proposed_type,
            savings_percent.abs()
        ),
        Scenario::Optimize if savings_percent > 0.0 => format!(
            "Switch to {} for better price-performance ratio.",
            proposed_type
        ),
        Scenario::Optimize => {
            "Current instance type is already cost-optimized for this workload class.".to_string()
        }
        Scenario::Resize => "Review workload requirements against instance capabilities.".to_string(),
    }
}
