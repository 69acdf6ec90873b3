//! Notification flags carried by a rule.

use serde::{Deserialize, Serialize};

use super::metadata::default_true;

/// Where a triggered alert should be surfaced.
///
/// Advisory only: the rule engine never delivers anything itself, the host
/// reads these flags when it decides how to display an alert.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct NotifyFlags {
    #[serde(default = "default_true")]
    pub in_app: bool,
    #[serde(default)]
    pub email: bool,
}

impl Default for NotifyFlags {
    fn default() -> Self {
        Self {
            in_app: true,
            email: false,
        }
    }
}
