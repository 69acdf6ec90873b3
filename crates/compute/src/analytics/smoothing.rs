//! Trailing simple moving average.

use twin_core::SensorSnapshot;

/// Trailing unweighted average of `key` over `window` valid readings.
///
/// Each output entry is the snapshot at the end of its window with an
/// extra `"{key}_ma"` reading. Entries without a valid `key` reading do not
/// take part, so the output has `valid - window + 1` entries. Empty when
/// `window` is 0 or larger than the number of valid readings.
pub fn moving_average(data: &[SensorSnapshot], key: &str, window: usize) -> Vec<SensorSnapshot> {
    if window == 0 {
        return Vec::new();
    }

    let valid: Vec<(&SensorSnapshot, f64)> = data
        .iter()
        .filter_map(|s| s.value(key).map(|v| (s, v)))
        .collect();
    if valid.len() < window {
        return Vec::new();
    }

    let ma_key = format!("{}_ma", key);
    let mut out = Vec::with_capacity(valid.len() - window + 1);
    let mut sum: f64 = valid[..window].iter().map(|(_, v)| v).sum();
    out.push(valid[window - 1].0.with_reading(ma_key.as_str(), sum / window as f64));

    for i in window..valid.len() {
        sum += valid[i].1 - valid[i - window].1;
        out.push(valid[i].0.with_reading(ma_key.as_str(), sum / window as f64));
    }
    out
}
