//! Fleet-level cost aggregation and deployment previews
//!
//! Everything here is a simulation over the static price table; nothing
//! touches real resources.

use super::pricing::{hourly_price, monthly_cost, InstanceCost};
use super::simulator::{simulate_cost_change, Scenario};
use crate::models::round_to;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const SIMULATION_WARNING: &str =
    "This is a SIMULATION ONLY. No actual AWS resources will be modified.";

/// Instance count and summed monthly cost for one type
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeCost {
    pub count: usize,
    pub monthly_cost: f64,
}

/// Monthly and annual cost of a whole fleet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FleetCostSummary {
    pub total_instances: usize,
    pub current_monthly_cost: f64,
    pub estimated_annual_cost: f64,
    pub cost_by_instance_type: BTreeMap<String, TypeCost>,
}

/// Sum the monthly cost of every instance, grouped by type
pub fn calculate_fleet_cost<'a, I>(instance_types: I) -> FleetCostSummary
where
    I: IntoIterator<Item = &'a str>,
{
    let mut by_type: BTreeMap<String, TypeCost> = BTreeMap::new();
    let mut total_instances = 0;
    let mut total_monthly = 0.0;

    for instance_type in instance_types {
        let cost = InstanceCost::for_type(instance_type);
        let entry = by_type.entry(instance_type.to_string()).or_default();
        entry.count += 1;
        entry.monthly_cost += cost.monthly;

        total_instances += 1;
        total_monthly += cost.monthly;
    }

    for entry in by_type.values_mut() {
        entry.monthly_cost = round_to(entry.monthly_cost, 2);
    }

    FleetCostSummary {
        total_instances,
        current_monthly_cost: round_to(total_monthly, 2),
        estimated_annual_cost: round_to(total_monthly * 12.0, 2),
        cost_by_instance_type: by_type,
    }
}

/// A capacity change to preview
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum DeploymentAction {
    ResizeInstance {
        #[serde(default, rename = "instanceId")]
        instance_id: Option<String>,
        #[serde(rename = "currentInstanceType")]
        current_type: String,
        #[serde(rename = "targetInstanceType")]
        target_type: String,
    },
    ScaleFleet {
        #[serde(rename = "currentFleetSize")]
        current_size: u32,
        #[serde(rename = "targetFleetSize")]
        target_size: u32,
        #[serde(rename = "instanceType")]
        instance_type: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResizeChanges {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResizeImpact {
    pub monthly_cost_difference: f64,
    pub percent_change: f64,
    pub annual_impact: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaleChanges {
    pub current_size: u32,
    pub target_size: u32,
    pub instance_type: String,
    pub instance_change: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaleImpact {
    pub current_monthly_cost: f64,
    pub target_monthly_cost: f64,
    pub monthly_savings: f64,
    pub annual_impact: f64,
}

/// Simulated outcome of a [`DeploymentAction`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum DeploymentPreview {
    ResizeInstance {
        simulation: bool,
        #[serde(rename = "instanceId")]
        instance_id: String,
        changes: ResizeChanges,
        impact: ResizeImpact,
        recommendation: String,
        warning: String,
    },
    ScaleFleet {
        simulation: bool,
        changes: ScaleChanges,
        impact: ScaleImpact,
        recommendation: String,
        warning: String,
    },
}

/// Preview the cost impact of a deployment change without applying it
pub fn preview_deployment(action: &DeploymentAction) -> DeploymentPreview {
    match action {
        DeploymentAction::ResizeInstance {
            instance_id,
            current_type,
            target_type,
        } => {
            let simulation = simulate_cost_change(current_type, target_type, Scenario::Resize);
            DeploymentPreview::ResizeInstance {
                simulation: true,
                instance_id: instance_id.clone().unwrap_or_else(|| "N/A".to_string()),
                changes: ResizeChanges {
                    from: current_type.clone(),
                    to: target_type.clone(),
                },
                impact: ResizeImpact {
                    monthly_cost_difference: simulation.monthly_savings,
                    percent_change: simulation.monthly_savings_percent,
                    annual_impact: simulation.annual_savings,
                },
                recommendation: simulation.recommendation,
                warning: SIMULATION_WARNING.to_string(),
            }
        }
        DeploymentAction::ScaleFleet {
            current_size,
            target_size,
            instance_type,
        } => {
            let per_instance = monthly_cost(hourly_price(instance_type));
            let current_cost = f64::from(*current_size) * per_instance;
            let target_cost = f64::from(*target_size) * per_instance;
            let difference = current_cost - target_cost;

            let recommendation = if target_size > current_size {
                "Scaling up will increase capacity and costs. Ensure demand justifies expansion."
            } else {
                "Scaling down will reduce costs. Verify remaining capacity meets requirements."
            };

            DeploymentPreview::ScaleFleet {
                simulation: true,
                changes: ScaleChanges {
                    current_size: *current_size,
                    target_size: *target_size,
                    instance_type: instance_type.clone(),
                    instance_change: i64::from(*target_size) - i64::from(*current_size),
                },
                impact: ScaleImpact {
                    current_monthly_cost: round_to(current_cost, 2),
                    target_monthly_cost: round_to(target_cost, 2),
                    monthly_savings: round_to(difference, 2),
                    annual_impact: round_to(difference * 12.0, 2),
                },
                recommendation: recommendation.to_string(),
                warning: SIMULATION_WARNING.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fleet_cost_groups_by_type() {
        let summary = calculate_fleet_cost(["t3.large", "m5.large", "t3.large"]);

        assert_eq!(summary.total_instances, 3);
        // 2 * 60.74 + 70.08
        assert_eq!(summary.current_monthly_cost, 191.56);
        assert_eq!(summary.estimated_annual_cost, 2298.72);

        let t3 = &summary.cost_by_instance_type["t3.large"];
        assert_eq!(t3.count, 2);
        assert_eq!(t3.monthly_cost, 121.48);
        assert_eq!(summary.cost_by_instance_type["m5.large"].count, 1);
    }

    #[test]
    fn test_empty_fleet_costs_nothing() {
        let summary = calculate_fleet_cost(std::iter::empty());
        assert_eq!(summary.total_instances, 0);
        assert_eq!(summary.current_monthly_cost, 0.0);
        assert!(summary.cost_by_instance_type.is_empty());
    }

    #[test]
    fn test_resize_preview() {
        let preview = preview_deployment(&DeploymentAction::ResizeInstance {
            instance_id: None,
            current_type: "m5.2xlarge".to_string(),
            target_type: "m5.large".to_string(),
        });

        let DeploymentPreview::ResizeInstance {
            simulation,
            instance_id,
            changes,
            impact,
            recommendation,
            warning,
        } = preview
        else {
            panic!("expected resize preview");
        };

        assert!(simulation);
        assert_eq!(instance_id, "N/A");
        assert_eq!(changes.from, "m5.2xlarge");
        assert_eq!(impact.monthly_cost_difference, 210.24);
        assert_eq!(impact.percent_change, 75.0);
        assert_eq!(impact.annual_impact, 2522.88);
        assert_eq!(
            recommendation,
            "Review workload requirements against instance capabilities."
        );
        assert_eq!(warning, SIMULATION_WARNING);
    }

    #[test]
    fn test_scale_fleet_preview() {
        let preview = preview_deployment(&DeploymentAction::ScaleFleet {
            current_size: 4,
            target_size: 2,
            instance_type: "m5.large".to_string(),
        });

        let DeploymentPreview::ScaleFleet {
            changes,
            impact,
            recommendation,
            ..
        } = preview
        else {
            panic!("expected scale preview");
        };

        assert_eq!(changes.instance_change, -2);
        assert_eq!(impact.current_monthly_cost, 280.32);
        assert_eq!(impact.target_monthly_cost, 140.16);
        assert_eq!(impact.monthly_savings, 140.16);
        assert_eq!(impact.annual_impact, 1681.92);
        assert!(recommendation.starts_with("Scaling down"));
    }

    #[test]
    fn test_scale_up_recommendation() {
        let preview = preview_deployment(&DeploymentAction::ScaleFleet {
            current_size: 1,
            target_size: 3,
            instance_type: "t3.micro".to_string(),
        });
        let json = serde_json::to_value(&preview).unwrap();
        assert_eq!(json["action"], "scale_fleet");
        assert_eq!(json["changes"]["instanceChange"], 2);
        assert!(json["impact"]["monthlySavings"].as_f64().unwrap() < 0.0);
        assert!(json["recommendation"]
            .as_str()
            .unwrap()
            .starts_with("Scaling up"));
    }

    #[test]
    fn test_action_deserializes_from_tagged_json() {
        let action: DeploymentAction = serde_json::from_str(
            r#"{"action":"resize_instance","currentInstanceType":"t3.large","targetInstanceType":"t3.medium"}"#,
        )
        .unwrap();
        assert_eq!(
            action,
            DeploymentAction::ResizeInstance {
                instance_id: None,
                current_type: "t3.large".to_string(),
                target_type: "t3.medium".to_string(),
            }
        );
    }
}
