//! Bounded, oldest-first buffer of past snapshots.

use serde::{Deserialize, Serialize};

use crate::snapshot::SensorSnapshot;

/// Default number of snapshots retained by the host.
pub const DEFAULT_HISTORY_CAPACITY: usize = 1000;

/// Append-only history with FIFO eviction once `capacity` is exceeded.
///
/// Owned by a single writer (the ingestion host). Analytics read it through
/// [`HistorySeries::as_slice`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistorySeries {
    entries: Vec<SensorSnapshot>,
    capacity: usize,
}

impl Default for HistorySeries {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

impl HistorySeries {
    /// Create an empty history. A capacity of zero is bumped to one.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            capacity: capacity.max(1),
        }
    }

    /// Build a history from existing snapshots, keeping only the newest `capacity`.
    pub fn from_snapshots(snapshots: Vec<SensorSnapshot>, capacity: usize) -> Self {
        let mut history = Self::new(capacity);
        history.extend(snapshots);
        history
    }

    pub fn push(&mut self, snapshot: SensorSnapshot) {
        self.entries.push(snapshot);
        self.evict();
    }

    pub fn extend<I: IntoIterator<Item = SensorSnapshot>>(&mut self, snapshots: I) {
        self.entries.extend(snapshots);
        self.evict();
    }

    fn evict(&mut self) {
        if self.entries.len() > self.capacity {
            let excess = self.entries.len() - self.capacity;
            self.entries.drain(..excess);
        }
    }

    pub fn as_slice(&self) -> &[SensorSnapshot] {
        &self.entries
    }

    pub fn latest(&self) -> Option<&SensorSnapshot> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Finite values of one field across the series, oldest first.
    pub fn values(&self, key: &str) -> Vec<f64> {
        self.entries.iter().filter_map(|s| s.value(key)).collect()
    }

    pub fn into_vec(self) -> Vec<SensorSnapshot> {
        self.entries
    }
}
