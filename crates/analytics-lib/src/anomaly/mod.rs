//! Anomaly detection for instance metrics
//!
//! Flags individual samples of each channel that deviate from the series
//! mean by at least three population standard deviations.

mod sigma_detector;

pub use sigma_detector::{
    AnomalyDetectionSummary, AnomalyResult, AnomalySeverity, SigmaDetector,
    DEFAULT_SIGMA_THRESHOLD, MIN_SAMPLES_FOR_DETECTION,
};
