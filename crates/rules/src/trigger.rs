//! Level- vs edge-triggered alert gating.
//!
//! The evaluator reports every violated rule on every call. The gate sits
//! between the evaluator and the host's alert feed and remembers which
//! `(device, rule)` pairs were violated on the previous evaluation so it can
//! report transitions:
//!
//! - **Level**: every alert is passed through.
//! - **Edge**: an alert passes only when its pair was not violated last time.
//!
//! In both modes pairs that stop violating are reported as `resolved`.

use std::collections::{HashMap, HashSet};

use tracing::debug;

pub use twin_core::config::TriggerMode;

use crate::evaluator::TriggeredAlert;

/// Outcome of gating one evaluation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transitions {
    /// Alerts the host should surface.
    pub fired: Vec<TriggeredAlert>,
    /// Rule ids that were violated last evaluation and are not any more.
    pub resolved: Vec<String>,
}

/// Remembers the active (violated) rule set per device.
#[derive(Debug, Default)]
pub struct TriggerGate {
    mode: TriggerMode,
    /// Device key (empty string for "no device") → violated rule ids.
    active: HashMap<String, HashSet<String>>,
}

impl TriggerGate {
    pub fn new(mode: TriggerMode) -> Self {
        Self {
            mode,
            active: HashMap::new(),
        }
    }

    pub fn mode(&self) -> TriggerMode {
        self.mode
    }

    /// Gate the alerts produced by one evaluation for `device_id`.
    ///
    /// `alerts` must be the complete evaluator output for that snapshot:
    /// any previously active rule missing from it counts as resolved.
    pub fn apply(&mut self, device_id: Option<&str>, alerts: Vec<TriggeredAlert>) -> Transitions {
        let device_key = device_id.unwrap_or_default().to_string();
        let previous = self.active.remove(&device_key).unwrap_or_default();
        let current: HashSet<String> = alerts.iter().map(|a| a.rule_id.clone()).collect();

        let mut resolved: Vec<String> = previous.difference(&current).cloned().collect();
        resolved.sort();

        let fired: Vec<TriggeredAlert> = match self.mode {
            TriggerMode::Level => alerts,
            TriggerMode::Edge => alerts
                .into_iter()
                .filter(|a| !previous.contains(&a.rule_id))
                .collect(),
        };

        debug!(
            device = %device_key,
            mode = %self.mode,
            fired = fired.len(),
            resolved = resolved.len(),
            "trigger gate applied"
        );

        if !current.is_empty() {
            self.active.insert(device_key, current);
        }

        Transitions { fired, resolved }
    }

    /// Rule ids currently considered violated for `device_id`.
    pub fn active(&self, device_id: Option<&str>) -> Vec<String> {
        let mut ids: Vec<String> = self
            .active
            .get(device_id.unwrap_or_default())
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default();
        ids.sort();
        ids
    }

    /// Forget all state, re-arming every rule.
    pub fn reset(&mut self) {
        self.active.clear();
    }
}
