//! Fleet analytics library
//!
//! This crate turns per-instance time series (CPU, network in/out) into:
//! - Rounded metric summaries with CPU insights
//! - Sigma based anomaly flags
//! - Trend based failure risk predictions
//! - Cost simulations and right-sizing suggestions
//! - Fleet-wide health with per-instance failure isolation
//!
//! Raw data comes from pluggable providers; see [`provider`].

pub mod anomaly;
pub mod cost;
pub mod error;
pub mod health;
pub mod metrics;
pub mod models;
pub mod observability;
pub mod predictor;
pub mod provider;
pub mod service;
pub mod stats;

pub use error::{AnalyticsError, Result};
pub use health::{classify_health, HealthTier, InstanceHealth};
pub use metrics::{summarize, MetricsSummary};
pub use models::*;
pub use observability::{gather_metrics_text, AnalyticsMetrics, StructuredLogger};
pub use service::FleetAnalytics;
