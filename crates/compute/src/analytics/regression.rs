//! Ordinary least squares of a reading against its sample index.
//!
//! The x axis is the 0-based position among the valid readings, not wall
//! clock time, so samples are assumed to be evenly spaced.

use serde::{Deserialize, Serialize};
use tracing::debug;

use twin_core::SensorSnapshot;

use super::valid_values;

/// Fitted line `value = slope * index + intercept`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegressionModel {
    pub slope: f64,
    pub intercept: f64,
    /// Coefficient of determination; 0 for a perfectly flat series.
    pub r_squared: f64,
}

impl RegressionModel {
    /// Value predicted `steps_ahead` samples after `current_index`.
    pub fn predict(&self, steps_ahead: usize, current_index: usize) -> f64 {
        self.slope * (current_index + steps_ahead) as f64 + self.intercept
    }
}

/// Fit a line through the valid `key` readings.
///
/// Returns `None` with fewer than two valid readings.
pub fn linear_regression(data: &[SensorSnapshot], key: &str) -> Option<RegressionModel> {
    let values = valid_values(data, key);
    fit(&values)
}

/// Prediction helper accepting an absent model.
pub fn predict(
    model: Option<&RegressionModel>,
    steps_ahead: usize,
    current_index: usize,
) -> Option<f64> {
    model.map(|m| m.predict(steps_ahead, current_index))
}

pub(crate) fn fit(values: &[f64]) -> Option<RegressionModel> {
    let n = values.len();
    if n < 2 {
        return None;
    }

    let nf = n as f64;
    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    let mut sum_xy = 0.0;
    let mut sum_xx = 0.0;
    for (i, &y) in values.iter().enumerate() {
        let x = i as f64;
        sum_x += x;
        sum_y += y;
        sum_xy += x * y;
        sum_xx += x * x;
    }

    let denom = nf * sum_xx - sum_x * sum_x;
    if denom.abs() <= f64::EPSILON {
        return None;
    }

    let slope = (nf * sum_xy - sum_x * sum_y) / denom;
    let intercept = (sum_y - slope * sum_x) / nf;

    let mean_y = sum_y / nf;
    let mut ss_res = 0.0;
    let mut ss_tot = 0.0;
    for (i, &y) in values.iter().enumerate() {
        let fitted = slope * i as f64 + intercept;
        ss_res += (y - fitted).powi(2);
        ss_tot += (y - mean_y).powi(2);
    }
    let r_squared = if ss_tot == 0.0 { 0.0 } else { 1.0 - ss_res / ss_tot };

    debug!(points = n, slope, intercept, r_squared, "linear regression fitted");

    Some(RegressionModel {
        slope,
        intercept,
        r_squared,
    })
}
