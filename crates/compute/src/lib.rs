//! Stateless analytics over sensor history: regression, smoothing,
//! anomaly detection, trend, forecast, statistics and health scoring.

pub mod analytics;

pub use analytics::{
    classify_trend, compare, detect_anomalies, forecast, health_score, linear_regression,
    moving_average, predict, statistics, Analyzer, Anomaly, Comparison, ForecastPoint,
    PerformanceMetrics, RegressionModel, SeriesReport, Statistics, Trend,
};
