//! JSON file persistence for the snapshot history.
//!
//! The history is stored as a plain JSON array of snapshots, oldest first.
//! Writes go through a dot-prefixed `.tmp` sibling and a rename so a crash
//! never leaves a half-written file behind.

use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::error::Result;
use crate::history::HistorySeries;
use crate::snapshot::SensorSnapshot;

/// Atomically write the history to `path`, creating parent directories.
pub fn save_history(path: &Path, history: &HistorySeries) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("history.json");
    let tmp_path = path.with_file_name(format!(".{}.tmp", file_name));

    let json = serde_json::to_vec(history.as_slice())?;
    fs::write(&tmp_path, json)?;
    fs::rename(&tmp_path, path)?;

    info!(path = %path.display(), snapshots = history.len(), "saved history");
    Ok(())
}

/// Load a history file, keeping the newest `capacity` snapshots.
///
/// A missing file yields an empty history rather than an error.
pub fn load_history(path: &Path, capacity: usize) -> Result<HistorySeries> {
    if !path.exists() {
        debug!(path = %path.display(), "no history file, starting empty");
        return Ok(HistorySeries::new(capacity));
    }

    let contents = fs::read(path)?;
    let snapshots: Vec<SensorSnapshot> = serde_json::from_slice(&contents)?;
    let history = HistorySeries::from_snapshots(snapshots, capacity);

    info!(path = %path.display(), snapshots = history.len(), "loaded history");
    Ok(history)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn save_then_load_trims_to_capacity() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("history.json");

        let mut history = HistorySeries::new(10);
        for i in 0..6 {
            history.push(SensorSnapshot::now([("temperature", 20.0 + i as f64)]));
        }
        save_history(&path, &history).unwrap();

        let loaded = load_history(&path, 3).unwrap();
        assert_eq!(loaded.len(), 3);
        assert_eq!(loaded.values("temperature"), vec![23.0, 24.0, 25.0]);
        assert!(!dir.path().join("nested").join(".history.json.tmp").exists());
    }

    #[test]
    fn history_with_nan_reading_reloads() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("history.json");

        let mut history = HistorySeries::new(10);
        history.push(SensorSnapshot::now([("temperature", f64::NAN), ("humidity", 45.0)]));
        history.push(SensorSnapshot::now([("temperature", 21.0), ("humidity", f64::INFINITY)]));
        save_history(&path, &history).unwrap();

        let loaded = load_history(&path, 10).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.values("temperature"), vec![21.0]);
        assert_eq!(loaded.values("humidity"), vec![45.0]);
    }

    #[test]
    fn missing_file_is_empty_history() {
        let dir = TempDir::new().unwrap();
        let loaded = load_history(&dir.path().join("absent.json"), 5).unwrap();
        assert!(loaded.is_empty());
        assert_eq!(loaded.capacity(), 5);
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("history.json");
        fs::write(&path, "not json").unwrap();
        assert!(load_history(&path, 5).is_err());
    }
}
