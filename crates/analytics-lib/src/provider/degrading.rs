//! Adapter that turns provider failures into empty series

use super::{async_trait, TimeSeriesProvider};
use crate::models::{MetricName, MetricSeries};
use crate::observability::StructuredLogger;
use anyhow::Result;

/// Wraps a fallible provider so that a failed fetch reads as "no data"
///
/// The cause is logged and an empty series is returned. Downstream an
/// empty series summarizes to zero and yields no anomalies.
pub struct Degrading<P> {
    inner: P,
    logger: StructuredLogger,
}

impl<P> Degrading<P> {
    pub fn new(inner: P, logger: StructuredLogger) -> Self {
        Self { inner, logger }
    }
}

#[async_trait]
impl<P: TimeSeriesProvider> TimeSeriesProvider for Degrading<P> {
    async fn fetch(
        &self,
        metric: MetricName,
        instance_id: &str,
        duration_minutes: u32,
    ) -> Result<MetricSeries> {
        match self.inner.fetch(metric, instance_id, duration_minutes).await {
            Ok(series) => Ok(series),
            Err(e) => {
                self.logger
                    .log_channel_degraded(instance_id, metric.as_str(), &format!("{:#}", e));
                Ok(Vec::new())
            }
        }
    }
}
