//! Data providers feeding the analytics
//!
//! The library never talks to a cloud API itself. Callers plug in a
//! [`TimeSeriesProvider`] for raw samples and an [`InventoryProvider`] for
//! the instance list.

mod degrading;
mod memory;

pub use degrading::Degrading;
pub use memory::InMemoryProvider;

use crate::models::{InstanceInfo, InstanceMetrics, MetricName, MetricSeries};
use anyhow::Result;
use std::sync::Arc;

pub use async_trait::async_trait;

/// Source of raw metric samples
///
/// Implementations should return an empty series when the backend has no
/// data or fails; wrap fallible backends in [`Degrading`] to get that
/// behavior.
#[async_trait]
pub trait TimeSeriesProvider: Send + Sync {
    /// Samples of `metric` for the last `duration_minutes`, time ascending
    async fn fetch(
        &self,
        metric: MetricName,
        instance_id: &str,
        duration_minutes: u32,
    ) -> Result<MetricSeries>;
}

/// Source of the instance inventory
#[async_trait]
pub trait InventoryProvider: Send + Sync {
    async fn list(&self) -> Result<Vec<InstanceInfo>>;
}

#[async_trait]
impl<P: TimeSeriesProvider + ?Sized> TimeSeriesProvider for Arc<P> {
    async fn fetch(
        &self,
        metric: MetricName,
        instance_id: &str,
        duration_minutes: u32,
    ) -> Result<MetricSeries> {
        (**self).fetch(metric, instance_id, duration_minutes).await
    }
}

#[async_trait]
impl<P: InventoryProvider + ?Sized> InventoryProvider for Arc<P> {
    async fn list(&self) -> Result<Vec<InstanceInfo>> {
        (**self).list().await
    }
}

/// Fetch all three channels of one instance concurrently
///
/// The first failing channel fails the whole fetch.
pub async fn fetch_instance_metrics(
    provider: &dyn TimeSeriesProvider,
    instance_id: &str,
    duration_minutes: u32,
) -> Result<InstanceMetrics> {
    let (cpu, network_in, network_out) = tokio::try_join!(
        provider.fetch(MetricName::CpuUtilization, instance_id, duration_minutes),
        provider.fetch(MetricName::NetworkIn, instance_id, duration_minutes),
        provider.fetch(MetricName::NetworkOut, instance_id, duration_minutes),
    )?;

    Ok(InstanceMetrics {
        cpu,
        network_in,
        network_out,
    })
}
