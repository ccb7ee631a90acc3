//! Cost estimation
//!
//! Static pricing, right-sizing suggestions, cost change simulation and
//! simulated deployment previews.

mod fleet;
mod pricing;
mod simulator;
mod sizing;

pub use fleet::{
    calculate_fleet_cost, preview_deployment, DeploymentAction, DeploymentPreview,
    FleetCostSummary, ResizeChanges, ResizeImpact, ScaleChanges, ScaleImpact, TypeCost,
    SIMULATION_WARNING,
};
pub use pricing::{
    hourly_price, is_known_type, monthly_cost, InstanceCost, FALLBACK_HOURLY_PRICE,
    HOURS_PER_MONTH,
};
pub use simulator::{simulate_cost_change, simulate_with_suggestion, CostSimulationResult, Scenario};
pub use sizing::{suggest_instance_type, SIZE_LADDER};
