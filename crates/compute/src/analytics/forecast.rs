//! Extrapolated future points from the regression line.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use twin_core::SensorSnapshot;

use super::{regression, valid_values};

/// One predicted future reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub key: String,
    pub value: f64,
    pub timestamp: DateTime<Utc>,
    /// Always true; lets charts tell predictions from observations.
    pub is_forecast: bool,
}

impl ForecastPoint {
    /// The forecast as a one-reading snapshot, so it can be appended to a
    /// history and analyzed like observed data.
    pub fn to_snapshot(&self) -> SensorSnapshot {
        SensorSnapshot::at(self.timestamp, [(self.key.as_str(), self.value)])
    }
}

/// Predict `steps` readings after the last valid one.
///
/// Timestamps continue from the last snapshot in `data`, `interval` apart.
/// Empty when no regression can be fitted. Stops early at the first step
/// whose timestamp would fall outside the representable range.
pub fn forecast(
    data: &[SensorSnapshot],
    key: &str,
    steps: usize,
    interval: Duration,
) -> Vec<ForecastPoint> {
    let values = valid_values(data, key);
    let Some(model) = regression::fit(&values) else {
        return Vec::new();
    };
    let Some(last) = data.last() else {
        return Vec::new();
    };

    let current_index = values.len() - 1;
    let points: Vec<ForecastPoint> = (1..=steps)
        .map_while(|i| {
            let offset = interval.checked_mul(i32::try_from(i).ok()?)?;
            let timestamp = last.timestamp.checked_add_signed(offset)?;
            Some(ForecastPoint {
                key: key.to_string(),
                value: model.predict(i, current_index),
                timestamp,
                is_forecast: true,
            })
        })
        .collect();

    if points.len() < steps {
        debug!(key, steps, produced = points.len(), "forecast truncated at timestamp overflow");
    }
    points
}
