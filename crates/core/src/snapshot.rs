use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Sensor type keys produced by the simulated production line.
pub const KNOWN_SENSORS: &[&str] = &["temperature", "humidity", "pressure", "vibration", "energy"];

/// Coarse device status reported alongside the readings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperatingStatus {
    Operational,
    Warning,
}

impl fmt::Display for OperatingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperatingStatus::Operational => write!(f, "operational"),
            OperatingStatus::Warning => write!(f, "warning"),
        }
    }
}

/// One set of simultaneous sensor readings captured at a point in time.
///
/// Readings are keyed by sensor type (`"temperature"`, `"pressure"`, ...).
/// A snapshot is never mutated after capture; derived series (moving
/// averages, forecasts) build new snapshots instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorSnapshot {
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<OperatingStatus>,
    #[serde(deserialize_with = "finite_readings")]
    pub readings: BTreeMap<String, f64>,
}

/// JSON has no NaN or infinity, so such readings are written as `null`.
/// Read them back as missing.
fn finite_readings<'de, D>(deserializer: D) -> Result<BTreeMap<String, f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, Option<f64>>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .filter_map(|(key, value)| value.map(|v| (key, v)))
        .collect())
}

impl SensorSnapshot {
    /// Capture a snapshot stamped with the current wall-clock time.
    pub fn now<I, K>(readings: I) -> Self
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<String>,
    {
        Self::at(Utc::now(), readings)
    }

    /// Capture a snapshot with an explicit timestamp.
    pub fn at<I, K>(timestamp: DateTime<Utc>, readings: I) -> Self
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<String>,
    {
        Self {
            timestamp,
            device_id: None,
            status: None,
            readings: readings.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    pub fn with_device(mut self, device_id: impl Into<String>) -> Self {
        self.device_id = Some(device_id.into());
        self
    }

    pub fn with_status(mut self, status: OperatingStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Copy of this snapshot with one extra reading added (or replaced).
    pub fn with_reading(&self, key: impl Into<String>, value: f64) -> Self {
        let mut next = self.clone();
        next.readings.insert(key.into(), value);
        next
    }

    /// Reading for `key`, only if present and finite.
    ///
    /// NaN and infinite values are treated the same as a missing key so
    /// that neither the evaluator nor the analytics ever see them.
    pub fn value(&self, key: &str) -> Option<f64> {
        self.readings.get(key).copied().filter(|v| v.is_finite())
    }

    pub fn is_warning(&self) -> bool {
        self.status == Some(OperatingStatus::Warning)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_filters_non_finite() {
        let snap = SensorSnapshot::now([
            ("temperature", 21.5),
            ("humidity", f64::NAN),
            ("pressure", f64::INFINITY),
        ]);
        assert_eq!(snap.value("temperature"), Some(21.5));
        assert_eq!(snap.value("humidity"), None);
        assert_eq!(snap.value("pressure"), None);
        assert_eq!(snap.value("vibration"), None);
    }

    #[test]
    fn with_reading_leaves_original_untouched() {
        let snap = SensorSnapshot::now([("temperature", 20.0)]);
        let derived = snap.with_reading("temperature_ma", 19.0);
        assert_eq!(derived.value("temperature_ma"), Some(19.0));
        assert_eq!(snap.value("temperature_ma"), None);
        assert_eq!(derived.timestamp, snap.timestamp);
    }

    #[test]
    fn serde_round_trip_keeps_status_lowercase() {
        let snap = SensorSnapshot::now([("energy", 55.0)])
            .with_device("device-1")
            .with_status(OperatingStatus::Warning);
        let json = serde_json::to_string(&snap).unwrap();
        assert!(json.contains("\"warning\""));
        let back: SensorSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snap);
        assert!(back.is_warning());
    }

    #[test]
    fn non_finite_readings_come_back_missing() {
        let snap = SensorSnapshot::now([
            ("temperature", 22.0),
            ("humidity", f64::NAN),
            ("pressure", f64::NEG_INFINITY),
        ]);
        let json = serde_json::to_string(&snap).unwrap();
        let back: SensorSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back.value("temperature"), Some(22.0));
        assert!(!back.readings.contains_key("humidity"));
        assert!(!back.readings.contains_key("pressure"));
    }
}
