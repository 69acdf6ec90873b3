//! Predictive analytics over a history series.
//!
//! Every function takes the series plus the reading key to analyze and
//! looks only at entries where that reading is a finite number. Missing
//! or non-finite readings are dropped before computing, never treated as
//! zero. Nothing here mutates its input or keeps state between calls.
//!
//! Sub-modules:
//! - [`regression`]: least-squares fit against sample index, prediction
//! - [`smoothing`]: trailing moving average
//! - [`anomaly`]: z-score outlier detection
//! - [`trend`]: slope-based trend classification
//! - [`forecast`]: extrapolated future points
//! - [`statistics`]: descriptive statistics and dataset comparison
//! - [`health`]: dashboard health score

pub mod anomaly;
pub mod forecast;
pub mod health;
pub mod regression;
pub mod smoothing;
pub mod statistics;
pub mod trend;

mod report;

use twin_core::SensorSnapshot;

// ── Re-exports ────────────────────────────────────────────────────────

pub use anomaly::{detect_anomalies, Anomaly, DEFAULT_Z_THRESHOLD};
pub use forecast::{forecast, ForecastPoint};
pub use health::{health_score, PerformanceMetrics};
pub use regression::{linear_regression, predict, RegressionModel};
pub use report::{Analyzer, SeriesReport};
pub use smoothing::moving_average;
pub use statistics::{compare, statistics, Comparison, Statistics, StatsDifference, StatsPercentageChange};
pub use trend::{classify_trend, classify_trend_with, Trend, DEFAULT_TREND_SLOPE_THRESHOLD};

/// `(position in data, value)` for every entry with a finite `key` reading.
pub(crate) fn valid_points(data: &[SensorSnapshot], key: &str) -> Vec<(usize, f64)> {
    data.iter()
        .enumerate()
        .filter_map(|(i, s)| s.value(key).map(|v| (i, v)))
        .collect()
}

/// Finite `key` readings in series order.
pub(crate) fn valid_values(data: &[SensorSnapshot], key: &str) -> Vec<f64> {
    data.iter().filter_map(|s| s.value(key)).collect()
}

/// Round to two decimal places for display.
pub(crate) fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use twin_core::SensorSnapshot;

    pub fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    /// One snapshot per value under `key`, two seconds apart.
    pub fn series(key: &str, values: &[f64]) -> Vec<SensorSnapshot> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| SensorSnapshot::at(t0() + Duration::seconds(2 * i as i64), [(key, *v)]))
            .collect()
    }
}
