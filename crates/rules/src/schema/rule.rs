//! Alert rule document: metadata plus the sensor condition it watches.

use serde::{Deserialize, Serialize};

use super::{Check, CommonMetadata, Condition, NotifyFlags, Severity, Threshold};

pub const API_VERSION: &str = "v1";
pub const ALERT_RULE_KIND: &str = "AlertRule";

/// Top-level alert rule definition parsed from YAML.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct AlertRule {
    #[serde(rename = "apiVersion")]
    pub api_version: String,
    pub kind: String,
    pub metadata: CommonMetadata,
    pub spec: AlertSpec,
}

/// What the rule watches and how loudly it reports.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct AlertSpec {
    /// Snapshot key this rule reads, e.g. `temperature`.
    pub sensor_type: String,
    pub condition: Condition,
    pub threshold: Threshold,
    pub severity: Severity,
    /// Absolute tolerance for `equals`. Absent means exact comparison.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tolerance: Option<f64>,
    #[serde(default)]
    pub notify: NotifyFlags,
}

impl AlertRule {
    /// Build an enabled rule with default notification flags.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        sensor_type: impl Into<String>,
        condition: Condition,
        threshold: Threshold,
        severity: Severity,
    ) -> Self {
        Self {
            api_version: API_VERSION.to_string(),
            kind: ALERT_RULE_KIND.to_string(),
            metadata: CommonMetadata::new(id, name),
            spec: AlertSpec {
                sensor_type: sensor_type.into(),
                condition,
                threshold,
                severity,
                tolerance: None,
                notify: NotifyFlags::default(),
            },
        }
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.metadata.enabled = enabled;
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.spec.tolerance = Some(tolerance);
        self
    }

    pub fn id(&self) -> &str {
        &self.metadata.id
    }

    pub fn is_enabled(&self) -> bool {
        self.metadata.enabled
    }

    /// Compile condition + threshold into a [`Check`].
    pub fn check(&self) -> Result<Check, String> {
        Check::compile(self.spec.condition, self.spec.threshold, self.spec.tolerance)
    }

    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}

/// The rules a fresh installation starts with.
pub fn default_rules() -> Vec<AlertRule> {
    vec![
        AlertRule::new(
            "temp-high",
            "High Temperature Alert",
            "temperature",
            Condition::GreaterThan,
            Threshold::Scalar(30.0),
            Severity::Warning,
        ),
        AlertRule::new(
            "temp-critical",
            "Critical Temperature Alert",
            "temperature",
            Condition::GreaterThan,
            Threshold::Scalar(35.0),
            Severity::Critical,
        ),
        AlertRule::new(
            "vibration-high",
            "High Vibration Alert",
            "vibration",
            Condition::GreaterThan,
            Threshold::Scalar(7.0),
            Severity::Warning,
        ),
        AlertRule::new(
            "pressure-out-of-range",
            "Pressure Out of Range",
            "pressure",
            Condition::OutOfRange,
            Threshold::range(1000.0, 1050.0),
            Severity::Warning,
        ),
    ]
}
