//! Trend classification from the regression slope.

use std::fmt;

use serde::{Deserialize, Serialize};

use twin_core::SensorSnapshot;

use super::linear_regression;

/// |slope| at or below which a series is considered stable.
pub const DEFAULT_TREND_SLOPE_THRESHOLD: f64 = 0.1;

/// Direction of a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Increasing,
    Decreasing,
    Stable,
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trend::Increasing => write!(f, "increasing"),
            Trend::Decreasing => write!(f, "decreasing"),
            Trend::Stable => write!(f, "stable"),
        }
    }
}

impl Trend {
    /// Classify a slope against a symmetric threshold.
    pub fn from_slope(slope: f64, threshold: f64) -> Self {
        if slope > threshold {
            Trend::Increasing
        } else if slope < -threshold {
            Trend::Decreasing
        } else {
            Trend::Stable
        }
    }
}

/// Classify with the default slope threshold.
pub fn classify_trend(data: &[SensorSnapshot], key: &str) -> Trend {
    classify_trend_with(data, key, DEFAULT_TREND_SLOPE_THRESHOLD)
}

/// Classify with an explicit slope threshold. Too little data is `Stable`.
pub fn classify_trend_with(data: &[SensorSnapshot], key: &str, slope_threshold: f64) -> Trend {
    linear_regression(data, key)
        .map(|m| Trend::from_slope(m.slope, slope_threshold))
        .unwrap_or(Trend::Stable)
}
