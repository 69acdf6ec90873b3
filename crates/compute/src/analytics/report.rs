//! Config-driven bundle of every analysis for one reading key.

use chrono::Duration;
use serde::{Deserialize, Serialize};
use tracing::debug;

use twin_core::config::AnalyticsConfig;
use twin_core::SensorSnapshot;

use super::{
    classify_trend_with, detect_anomalies, forecast, linear_regression, moving_average,
    statistics, Anomaly, ForecastPoint, RegressionModel, Statistics, Trend,
};

/// Everything the presentation layer shows for one key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesReport {
    pub key: String,
    pub statistics: Option<Statistics>,
    pub regression: Option<RegressionModel>,
    pub trend: Trend,
    /// Most recent moving-average value, if the window has filled.
    pub moving_average: Option<f64>,
    pub anomalies: Vec<Anomaly>,
    pub forecast: Vec<ForecastPoint>,
}

/// Runs the analytics with one set of parameters.
#[derive(Debug, Clone)]
pub struct Analyzer {
    z_threshold: f64,
    forecast_steps: usize,
    moving_average_window: usize,
    trend_slope_threshold: f64,
    forecast_interval: Duration,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::from_config(&AnalyticsConfig::default())
    }
}

impl Analyzer {
    pub fn from_config(config: &AnalyticsConfig) -> Self {
        Self {
            z_threshold: config.z_threshold,
            forecast_steps: config.forecast_steps,
            moving_average_window: config.moving_average_window,
            trend_slope_threshold: config.trend_slope_threshold,
            forecast_interval: Duration::milliseconds(
                i64::try_from(config.forecast_interval_ms).unwrap_or(i64::MAX / 1_000_000),
            ),
        }
    }

    pub fn with_forecast_interval(mut self, interval: Duration) -> Self {
        self.forecast_interval = interval;
        self
    }

    /// Analyze `key` across `history`.
    pub fn report(&self, history: &[SensorSnapshot], key: &str) -> SeriesReport {
        let ma_key = format!("{}_ma", key);
        let report = SeriesReport {
            key: key.to_string(),
            statistics: statistics(history, key),
            regression: linear_regression(history, key),
            trend: classify_trend_with(history, key, self.trend_slope_threshold),
            moving_average: moving_average(history, key, self.moving_average_window)
                .last()
                .and_then(|s| s.value(&ma_key)),
            anomalies: detect_anomalies(history, key, self.z_threshold),
            forecast: forecast(history, key, self.forecast_steps, self.forecast_interval),
        };

        debug!(
            key,
            points = history.len(),
            trend = %report.trend,
            anomalies = report.anomalies.len(),
            "series report built"
        );
        report
    }

    /// One report per key, in the given order.
    pub fn report_all(&self, history: &[SensorSnapshot], keys: &[&str]) -> Vec<SeriesReport> {
        keys.iter().map(|k| self.report(history, k)).collect()
    }
}
