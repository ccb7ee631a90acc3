//! Static on-demand pricing
//!
//! Approximate US East on-demand hourly rates. These are estimates for
//! capacity planning, not billing data.

use crate::models::round_to;
use serde::{Deserialize, Serialize};

/// Hours in an average month (365 * 24 / 12)
pub const HOURS_PER_MONTH: f64 = 730.0;

/// Hourly rate used for types missing from the table
pub const FALLBACK_HOURLY_PRICE: f64 = 0.05;

const EC2_PRICING: &[(&str, f64)] = &[
    // Burstable
    ("t2.micro", 0.0116),
    ("t2.small", 0.023),
    ("t2.medium", 0.0464),
    ("t2.large", 0.0928),
    ("t3.micro", 0.0104),
    ("t3.small", 0.0208),
    ("t3.medium", 0.0416),
    ("t3.large", 0.0832),
    ("t3.xlarge", 0.1664),
    ("t3.2xlarge", 0.3328),
    // General purpose
    ("m5.large", 0.096),
    ("m5.xlarge", 0.192),
    ("m5.2xlarge", 0.384),
    ("m5.4xlarge", 0.768),
    ("m5.8xlarge", 1.536),
    ("m6i.large", 0.096),
    ("m6i.xlarge", 0.192),
    ("m6i.2xlarge", 0.384),
    // Compute optimized
    ("c5.large", 0.085),
    ("c5.xlarge", 0.17),
    ("c5.2xlarge", 0.34),
    ("c5.4xlarge", 0.68),
    ("c6i.large", 0.085),
    ("c6i.xlarge", 0.17),
    // Memory optimized
    ("r5.large", 0.126),
    ("r5.xlarge", 0.252),
    ("r5.2xlarge", 0.504),
    ("r5.4xlarge", 1.008),
];

/// Hourly on-demand price, falling back for unknown types
pub fn hourly_price(instance_type: &str) -> f64 {
    EC2_PRICING
        .iter()
        .find(|(name, _)| *name == instance_type)
        .map(|(_, price)| *price)
        .unwrap_or(FALLBACK_HOURLY_PRICE)
}

/// Whether the type has an explicit entry in the price table
pub fn is_known_type(instance_type: &str) -> bool {
    EC2_PRICING.iter().any(|(name, _)| *name == instance_type)
}

/// Monthly cost of running one instance continuously
pub fn monthly_cost(hourly: f64) -> f64 {
    hourly * HOURS_PER_MONTH
}

/// On-demand cost of one instance type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceCost {
    pub instance_type: String,
    /// Hourly rate rounded to 4 decimals
    pub hourly: f64,
    /// Monthly cost rounded to 2 decimals
    pub monthly: f64,
}

impl InstanceCost {
    pub fn for_type(instance_type: &str) -> Self {
        let hourly = hourly_price(instance_type);
        Self {
            instance_type: instance_type.to_string(),
            hourly: round_to(hourly, 4),
            monthly: round_to(monthly_cost(hourly), 2),
        }
    }
}
