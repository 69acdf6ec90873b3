//! Z-score outlier detection over one reading.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use twin_core::SensorSnapshot;

use super::valid_points;

/// Default |z| above which a reading is flagged.
pub const DEFAULT_Z_THRESHOLD: f64 = 2.5;

/// Fewest valid readings for which outliers are looked for.
const MIN_POINTS: usize = 3;

/// A reading that lies more than the threshold number of standard
/// deviations from the series mean.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Anomaly {
    /// Position in the input series.
    pub index: usize,
    pub value: f64,
    /// Absolute z-score.
    pub z_score: f64,
    pub timestamp: DateTime<Utc>,
}

/// Flag every valid reading whose |z| exceeds `z_threshold`.
///
/// Mean and standard deviation are population statistics over all valid
/// readings. A series with fewer than three valid readings, or with zero
/// spread, has no anomalies.
pub fn detect_anomalies(data: &[SensorSnapshot], key: &str, z_threshold: f64) -> Vec<Anomaly> {
    let points = valid_points(data, key);
    if points.len() < MIN_POINTS {
        return Vec::new();
    }

    let (lo, hi) = points
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &(_, v)| (lo.min(v), hi.max(v)));
    if lo == hi {
        return Vec::new();
    }

    let n = points.len() as f64;
    let mean = points.iter().map(|(_, v)| v).sum::<f64>() / n;
    let variance = points.iter().map(|(_, v)| (v - mean).powi(2)).sum::<f64>() / n;
    let stddev = variance.sqrt();

    // Rounding in the mean leaves a few ulps of spread on near-constant data.
    if stddev <= f64::EPSILON * mean.abs().max(1.0) {
        return Vec::new();
    }

    let anomalies: Vec<Anomaly> = points
        .into_iter()
        .filter_map(|(index, value)| {
            let z_score = ((value - mean) / stddev).abs();
            (z_score > z_threshold).then(|| Anomaly {
                index,
                value,
                z_score,
                timestamp: data[index].timestamp,
            })
        })
        .collect();

    debug!(key, mean, stddev, anomalies = anomalies.len(), "anomaly scan complete");
    anomalies
}
