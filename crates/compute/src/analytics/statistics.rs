//! Descriptive statistics and two-dataset comparison.
//!
//! All figures are rounded to two decimal places for display. Comparisons
//! are computed from the rounded figures, the way a reader of the two
//! summaries would compute them by hand.

use serde::{Deserialize, Serialize};

use twin_core::SensorSnapshot;

use super::{round2, valid_values};

/// Summary of the valid readings of one key.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
    /// Population standard deviation.
    pub std_dev: f64,
    pub count: usize,
}

/// `a - b` for each location figure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatsDifference {
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
}

/// `(a - b) / b * 100`; `None` when the baseline `b` is zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatsPercentageChange {
    pub mean: Option<f64>,
    pub median: Option<f64>,
}

/// Side-by-side statistics of two datasets. `b` is the baseline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    pub a: Statistics,
    pub b: Statistics,
    pub difference: StatsDifference,
    pub percentage_change: StatsPercentageChange,
}

/// Statistics over the valid `key` readings; `None` if there are none.
pub fn statistics(data: &[SensorSnapshot], key: &str) -> Option<Statistics> {
    let values = valid_values(data, key);
    if values.is_empty() {
        return None;
    }

    let n = values.len();
    let mut sorted = values.clone();
    sorted.sort_by(f64::total_cmp);

    let mean = values.iter().sum::<f64>() / n as f64;
    let median = if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    } else {
        sorted[n / 2]
    };
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n as f64;

    Some(Statistics {
        mean: round2(mean),
        median: round2(median),
        min: round2(sorted[0]),
        max: round2(sorted[n - 1]),
        std_dev: round2(variance.sqrt()),
        count: n,
    })
}

/// Compare dataset `a` against baseline `b`. `None` if either has no valid readings.
pub fn compare(a: &[SensorSnapshot], b: &[SensorSnapshot], key: &str) -> Option<Comparison> {
    let sa = statistics(a, key)?;
    let sb = statistics(b, key)?;

    let pct = |x: f64, base: f64| (base != 0.0).then(|| round2((x - base) / base * 100.0));

    Some(Comparison {
        a: sa,
        b: sb,
        difference: StatsDifference {
            mean: round2(sa.mean - sb.mean),
            median: round2(sa.median - sb.median),
            min: round2(sa.min - sb.min),
            max: round2(sa.max - sb.max),
        },
        percentage_change: StatsPercentageChange {
            mean: pct(sa.mean, sb.mean),
            median: pct(sa.median, sb.median),
        },
    })
}
