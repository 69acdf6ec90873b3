//! Single-number equipment health score for dashboards.

use serde::{Deserialize, Serialize};

use twin_core::SensorSnapshot;

/// Service-level figures that feed the health score alongside the readings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    /// Percent, e.g. `99.8`.
    pub uptime: f64,
    /// Milliseconds.
    pub response_time: f64,
    /// Records per second.
    pub data_throughput: f64,
    /// Fraction of failed operations, e.g. `0.02`.
    pub error_rate: f64,
}

impl Default for PerformanceMetrics {
    fn default() -> Self {
        Self {
            uptime: 99.8,
            response_time: 45.0,
            data_throughput: 1250.0,
            error_rate: 0.02,
        }
    }
}

/// Score from 0 to 100 built from fixed penalties.
///
/// | condition                         | penalty |
/// |-----------------------------------|---------|
/// | temperature > 30                  | 10      |
/// | temperature > 35                  | 10 more |
/// | vibration > 7                     | 5       |
/// | vibration > 9                     | 10 more |
/// | pressure outside 1000..=1050      | 5       |
/// | status is warning                 | 15      |
/// | error rate > 0.05                 | 5       |
/// | uptime < 99                       | 10      |
///
/// Missing readings carry no penalty.
pub fn health_score(snapshot: &SensorSnapshot, metrics: &PerformanceMetrics) -> u8 {
    let mut score: i32 = 100;

    if let Some(t) = snapshot.value("temperature") {
        if t > 30.0 {
            score -= 10;
        }
        if t > 35.0 {
            score -= 10;
        }
    }

    if let Some(v) = snapshot.value("vibration") {
        if v > 7.0 {
            score -= 5;
        }
        if v > 9.0 {
            score -= 10;
        }
    }

    if let Some(p) = snapshot.value("pressure") {
        if !(1000.0..=1050.0).contains(&p) {
            score -= 5;
        }
    }

    if snapshot.is_warning() {
        score -= 15;
    }

    if metrics.error_rate > 0.05 {
        score -= 5;
    }
    if metrics.uptime < 99.0 {
        score -= 10;
    }

    score.clamp(0, 100) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use twin_core::OperatingStatus;

    fn nominal() -> SensorSnapshot {
        SensorSnapshot::now([
            ("temperature", 25.0),
            ("vibration", 3.0),
            ("pressure", 1020.0),
        ])
    }

    #[test]
    fn nominal_is_perfect() {
        assert_eq!(health_score(&nominal(), &PerformanceMetrics::default()), 100);
    }

    #[test]
    fn penalties_stack() {
        let snapshot = SensorSnapshot::now([
            ("temperature", 36.0),
            ("vibration", 9.5),
            ("pressure", 990.0),
        ])
        .with_status(OperatingStatus::Warning);
        let metrics = PerformanceMetrics {
            uptime: 98.0,
            error_rate: 0.1,
            ..Default::default()
        };
        // 100 - 20 - 15 - 5 - 15 - 5 - 10
        assert_eq!(health_score(&snapshot, &metrics), 30);
    }

    #[test]
    fn thresholds_are_strict() {
        let snapshot = SensorSnapshot::now([
            ("temperature", 30.0),
            ("vibration", 7.0),
            ("pressure", 1050.0),
        ]);
        let metrics = PerformanceMetrics {
            uptime: 99.0,
            error_rate: 0.05,
            ..Default::default()
        };
        assert_eq!(health_score(&snapshot, &metrics), 100);
    }

    #[test]
    fn missing_readings_are_not_penalized() {
        let empty = SensorSnapshot::now(std::iter::empty::<(&str, f64)>());
        assert_eq!(health_score(&empty, &PerformanceMetrics::default()), 100);
    }
}
