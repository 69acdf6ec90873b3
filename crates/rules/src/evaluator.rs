//! Rule evaluator: snapshot + rules → triggered alerts.
//!
//! Evaluation is a pure function of its inputs plus the capture time. Rules
//! are visited in list order and alerts come back in that same order; the
//! evaluator never sorts by severity and never de-duplicates across calls
//! (see [`crate::trigger`] for edge-triggered suppression).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use twin_core::SensorSnapshot;

use crate::schema::{AlertRule, Severity, Threshold};

/// One violated rule for one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggeredAlert {
    pub rule_id: String,
    pub rule_name: String,
    pub sensor_type: String,
    pub sensor_value: f64,
    pub severity: Severity,
    pub threshold: Threshold,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl TriggeredAlert {
    /// Human-readable one-liner, e.g. `temperature is 36 (threshold: 35)`.
    pub fn message(&self) -> String {
        format!(
            "{} is {} (threshold: {})",
            self.sensor_type, self.sensor_value, self.threshold
        )
    }
}

/// Evaluates alert rules against sensor snapshots.
pub struct RuleEvaluator;

impl RuleEvaluator {
    /// Evaluate every enabled rule against `snapshot`, stamping alerts with
    /// the current time.
    pub fn evaluate(
        snapshot: &SensorSnapshot,
        rules: &[AlertRule],
        device_id: Option<&str>,
    ) -> Vec<TriggeredAlert> {
        Self::evaluate_at(snapshot, rules, device_id, Utc::now())
    }

    /// Same as [`RuleEvaluator::evaluate`] with an explicit capture time.
    ///
    /// - Disabled rules are skipped.
    /// - Rules whose sensor is absent (or non-finite) in the snapshot are skipped.
    /// - Rules whose threshold shape does not fit their condition are skipped
    ///   with a warning; the store and loader refuse such rules, so this only
    ///   happens for hand-built rule lists.
    pub fn evaluate_at(
        snapshot: &SensorSnapshot,
        rules: &[AlertRule],
        device_id: Option<&str>,
        now: DateTime<Utc>,
    ) -> Vec<TriggeredAlert> {
        let mut alerts = Vec::new();

        for rule in rules.iter().filter(|r| r.metadata.enabled) {
            let Some(value) = snapshot.value(&rule.spec.sensor_type) else {
                continue;
            };

            let check = match rule.check() {
                Ok(check) => check,
                Err(e) => {
                    warn!(rule_id = %rule.metadata.id, error = %e, "skipping malformed rule");
                    continue;
                }
            };

            if check.is_triggered(value) {
                alerts.push(TriggeredAlert {
                    rule_id: rule.metadata.id.clone(),
                    rule_name: rule.metadata.name.clone(),
                    sensor_type: rule.spec.sensor_type.clone(),
                    sensor_value: value,
                    severity: rule.spec.severity,
                    threshold: rule.spec.threshold,
                    device_id: device_id.map(str::to_string),
                    timestamp: now,
                });
            }
        }

        debug!(rules = rules.len(), triggered = alerts.len(), "rule evaluation complete");
        alerts
    }
}

// ── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{default_rules, Condition};

    fn critical_temp_rule() -> AlertRule {
        AlertRule::new(
            "temp-critical",
            "Critical Temperature Alert",
            "temperature",
            Condition::GreaterThan,
            Threshold::Scalar(35.0),
            Severity::Critical,
        )
    }

    fn pressure_rule(condition: Condition) -> AlertRule {
        AlertRule::new(
            "pressure",
            "Pressure",
            "pressure",
            condition,
            Threshold::range(1000.0, 1050.0),
            Severity::Warning,
        )
    }

    #[test]
    fn triggers_above_threshold() {
        let snapshot = SensorSnapshot::now([("temperature", 36.0)]);
        let alerts = RuleEvaluator::evaluate(&snapshot, &[critical_temp_rule()], None);

        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].severity, Severity::Critical);
        assert_eq!(alerts[0].sensor_value, 36.0);
        assert_eq!(alerts[0].rule_id, "temp-critical");
        assert_eq!(alerts[0].threshold, Threshold::Scalar(35.0));
        assert_eq!(alerts[0].message(), "temperature is 36 (threshold: 35)");
    }

    #[test]
    fn quiet_below_threshold() {
        let snapshot = SensorSnapshot::now([("temperature", 20.0)]);
        assert!(RuleEvaluator::evaluate(&snapshot, &[critical_temp_rule()], None).is_empty());
    }

    #[test]
    fn disabled_rule_never_fires() {
        let snapshot = SensorSnapshot::now([("temperature", 90.0)]);
        let rule = critical_temp_rule().with_enabled(false);
        assert!(RuleEvaluator::evaluate(&snapshot, &[rule], None).is_empty());
    }

    #[test]
    fn missing_sensor_is_skipped() {
        let snapshot = SensorSnapshot::now([("humidity", 55.0)]);
        assert!(RuleEvaluator::evaluate(&snapshot, &[critical_temp_rule()], None).is_empty());

        let snapshot = SensorSnapshot::now([("temperature", f64::NAN)]);
        assert!(RuleEvaluator::evaluate(&snapshot, &[critical_temp_rule()], None).is_empty());
    }

    #[test]
    fn out_of_range_boundaries() {
        let rules = [pressure_rule(Condition::OutOfRange)];
        let fires = |v: f64| {
            !RuleEvaluator::evaluate(&SensorSnapshot::now([("pressure", v)]), &rules, None)
                .is_empty()
        };
        assert!(fires(1060.0));
        assert!(!fires(1025.0));
        assert!(!fires(1000.0));
        assert!(!fires(1050.0));
    }

    #[test]
    fn in_range_boundaries() {
        let rules = [pressure_rule(Condition::InRange)];
        let fires = |v: f64| {
            !RuleEvaluator::evaluate(&SensorSnapshot::now([("pressure", v)]), &rules, None)
                .is_empty()
        };
        assert!(fires(1000.0));
        assert!(fires(1050.0));
        assert!(fires(1025.0));
        assert!(!fires(999.0));
    }

    #[test]
    fn output_follows_rule_order_and_carries_device() {
        let snapshot = SensorSnapshot::now([
            ("temperature", 36.0),
            ("vibration", 8.0),
            ("pressure", 990.0),
        ]);
        let now = Utc::now();
        let alerts =
            RuleEvaluator::evaluate_at(&snapshot, &default_rules(), Some("device-1"), now);

        let ids: Vec<&str> = alerts.iter().map(|a| a.rule_id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["temp-high", "temp-critical", "vibration-high", "pressure-out-of-range"]
        );
        assert!(alerts
            .iter()
            .all(|a| a.device_id.as_deref() == Some("device-1") && a.timestamp == now));
    }

    #[test]
    fn never_more_alerts_than_enabled_rules() {
        let mut rules = default_rules();
        rules[0].metadata.enabled = false;
        rules[3].metadata.enabled = false;
        let snapshot = SensorSnapshot::now([
            ("temperature", 50.0),
            ("vibration", 50.0),
            ("pressure", 50.0),
        ]);

        let alerts = RuleEvaluator::evaluate(&snapshot, &rules, None);
        let enabled = rules.iter().filter(|r| r.is_enabled()).count();
        assert!(alerts.len() <= enabled);
        assert!(alerts
            .iter()
            .all(|a| a.rule_id != "temp-high" && a.rule_id != "pressure-out-of-range"));
    }

    #[test]
    fn malformed_rule_is_skipped_not_fatal() {
        let mut bad = critical_temp_rule();
        bad.spec.condition = Condition::OutOfRange;
        let rules = [bad, pressure_rule(Condition::OutOfRange)];
        let snapshot = SensorSnapshot::now([("temperature", 99.0), ("pressure", 2000.0)]);

        let alerts = RuleEvaluator::evaluate(&snapshot, &rules, None);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].rule_id, "pressure");
    }

    #[test]
    fn evaluation_does_not_mutate_inputs() {
        let rules = default_rules();
        let snapshot = SensorSnapshot::now([("temperature", 36.0)]);
        let before = (rules.clone(), snapshot.clone());
        let _ = RuleEvaluator::evaluate(&snapshot, &rules, None);
        assert_eq!((rules, snapshot), before);
    }
}
