//! In-memory alert rule store.
//!
//! Rules keep their insertion order, which is also the order the evaluator
//! visits them in. Every mutation is validated first; a failed `add` or
//! `update` leaves the store exactly as it was.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Result, RuleError};
use crate::schema::{default_rules, AlertRule, Condition, NotifyFlags, Severity, Threshold};
use crate::validation::validate_rule;

/// Partial update applied by [`RuleStore::update`]. `None` leaves the field as is.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RulePatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub sensor_type: Option<String>,
    pub condition: Option<Condition>,
    pub threshold: Option<Threshold>,
    pub severity: Option<Severity>,
    pub tolerance: Option<f64>,
    pub enabled: Option<bool>,
    pub notify: Option<NotifyFlags>,
}

impl RulePatch {
    fn apply_to(self, rule: &mut AlertRule) {
        if let Some(name) = self.name {
            rule.metadata.name = name;
        }
        if let Some(description) = self.description {
            rule.metadata.description = Some(description);
        }
        if let Some(sensor_type) = self.sensor_type {
            rule.spec.sensor_type = sensor_type;
        }
        if let Some(condition) = self.condition {
            rule.spec.condition = condition;
        }
        if let Some(threshold) = self.threshold {
            rule.spec.threshold = threshold;
        }
        if let Some(severity) = self.severity {
            rule.spec.severity = severity;
        }
        if let Some(tolerance) = self.tolerance {
            rule.spec.tolerance = Some(tolerance);
        }
        if let Some(enabled) = self.enabled {
            rule.metadata.enabled = enabled;
        }
        if let Some(notify) = self.notify {
            rule.spec.notify = notify;
        }
    }
}

/// Ordered collection of validated alert rules keyed by id.
#[derive(Debug, Clone, Default)]
pub struct RuleStore {
    rules: IndexMap<String, AlertRule>,
}

impl RuleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store seeded with [`default_rules`].
    pub fn with_defaults() -> Self {
        let mut store = Self::new();
        for rule in default_rules() {
            store.rules.insert(rule.metadata.id.clone(), rule);
        }
        store
    }

    /// Validate and append a rule. An empty id is replaced by `rule-<uuid>`.
    ///
    /// Returns the id the rule was stored under.
    pub fn add(&mut self, mut rule: AlertRule) -> Result<String> {
        if rule.metadata.id.trim().is_empty() {
            rule.metadata.id = format!("rule-{}", uuid::Uuid::new_v4());
        }
        if self.rules.contains_key(&rule.metadata.id) {
            return Err(RuleError::Duplicate(rule.metadata.id));
        }
        ensure_valid(&rule)?;

        let id = rule.metadata.id.clone();
        info!(rule_id = %id, sensor = %rule.spec.sensor_type, "rule added");
        self.rules.insert(id.clone(), rule);
        Ok(id)
    }

    /// Insert or replace a rule, keeping the position of an existing entry.
    pub fn upsert(&mut self, rule: AlertRule) -> Result<()> {
        ensure_valid(&rule)?;
        debug!(rule_id = %rule.metadata.id, "rule upserted");
        self.rules.insert(rule.metadata.id.clone(), rule);
        Ok(())
    }

    /// Patch an existing rule. The patched rule is validated before it replaces
    /// the stored one.
    pub fn update(&mut self, id: &str, patch: RulePatch) -> Result<&AlertRule> {
        let current = self
            .rules
            .get(id)
            .ok_or_else(|| RuleError::NotFound(id.to_string()))?;

        let mut patched = current.clone();
        patch.apply_to(&mut patched);
        ensure_valid(&patched)?;

        info!(rule_id = %id, "rule updated");
        let slot = self
            .rules
            .get_mut(id)
            .ok_or_else(|| RuleError::NotFound(id.to_string()))?;
        *slot = patched;
        Ok(slot)
    }

    /// Remove a rule, preserving the order of the rest.
    pub fn delete(&mut self, id: &str) -> Result<AlertRule> {
        let removed = self
            .rules
            .shift_remove(id)
            .ok_or_else(|| RuleError::NotFound(id.to_string()))?;
        info!(rule_id = %id, "rule deleted");
        Ok(removed)
    }

    /// Remove a rule if present.
    pub fn remove(&mut self, id: &str) -> Option<AlertRule> {
        self.rules.shift_remove(id)
    }

    /// Flip the enabled flag; returns the new value.
    pub fn toggle(&mut self, id: &str) -> Result<bool> {
        let rule = self
            .rules
            .get_mut(id)
            .ok_or_else(|| RuleError::NotFound(id.to_string()))?;
        rule.metadata.enabled = !rule.metadata.enabled;
        info!(rule_id = %id, enabled = rule.metadata.enabled, "rule toggled");
        Ok(rule.metadata.enabled)
    }

    pub fn get(&self, id: &str) -> Option<&AlertRule> {
        self.rules.get(id)
    }

    /// All rules in insertion order.
    pub fn rules(&self) -> Vec<AlertRule> {
        self.rules.values().cloned().collect()
    }

    /// Enabled rules in insertion order.
    pub fn enabled(&self) -> Vec<AlertRule> {
        self.rules
            .values()
            .filter(|r| r.metadata.enabled)
            .cloned()
            .collect()
    }

    /// Rules watching `sensor`, in insertion order.
    pub fn by_sensor(&self, sensor: &str) -> Vec<&AlertRule> {
        self.rules
            .values()
            .filter(|r| r.spec.sensor_type == sensor)
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AlertRule> {
        self.rules.values()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Turn blocking validation errors into [`RuleError::InvalidRule`].
pub fn ensure_valid(rule: &AlertRule) -> Result<()> {
    let result = validate_rule(rule);
    if result.valid {
        Ok(())
    } else {
        Err(RuleError::InvalidRule(format!(
            "{}: {}",
            rule.metadata.id,
            result.error_summary()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn humidity_rule(id: &str) -> AlertRule {
        AlertRule::new(
            id,
            "Dry Air",
            "humidity",
            Condition::LessThan,
            Threshold::Scalar(40.0),
            Severity::Info,
        )
    }

    #[test]
    fn defaults_are_seeded_in_order() {
        let store = RuleStore::with_defaults();
        let ids: Vec<String> = store.rules().into_iter().map(|r| r.metadata.id).collect();
        assert_eq!(
            ids,
            vec!["temp-high", "temp-critical", "vibration-high", "pressure-out-of-range"]
        );
        assert_eq!(store.by_sensor("temperature").len(), 2);
    }

    #[test]
    fn add_generates_id_when_empty() {
        let mut store = RuleStore::new();
        let id = store.add(humidity_rule("")).unwrap();
        assert!(id.starts_with("rule-"));
        assert!(store.get(&id).is_some());
    }

    #[test]
    fn add_rejects_duplicates_and_invalid_rules() {
        let mut store = RuleStore::with_defaults();
        assert!(matches!(
            store.add(humidity_rule("temp-high")),
            Err(RuleError::Duplicate(_))
        ));

        let mut bad = humidity_rule("dry-air");
        bad.spec.threshold = Threshold::range(30.0, 40.0);
        assert!(matches!(store.add(bad), Err(RuleError::InvalidRule(_))));
        assert_eq!(store.len(), 4);
    }

    #[test]
    fn update_validates_before_replacing() {
        let mut store = RuleStore::with_defaults();

        let patch = RulePatch {
            condition: Some(Condition::InRange),
            ..Default::default()
        };
        assert!(matches!(
            store.update("temp-high", patch),
            Err(RuleError::InvalidRule(_))
        ));
        assert_eq!(
            store.get("temp-high").unwrap().spec.condition,
            Condition::GreaterThan
        );

        let patch = RulePatch {
            condition: Some(Condition::InRange),
            threshold: Some(Threshold::range(25.0, 28.0)),
            severity: Some(Severity::Info),
            ..Default::default()
        };
        let updated = store.update("temp-high", patch).unwrap();
        assert_eq!(updated.spec.threshold, Threshold::range(25.0, 28.0));
        assert_eq!(store.rules()[0].metadata.id, "temp-high");
    }

    #[test]
    fn update_unknown_rule_is_not_found() {
        let mut store = RuleStore::new();
        assert!(matches!(
            store.update("nope", RulePatch::default()),
            Err(RuleError::NotFound(_))
        ));
    }

    #[test]
    fn toggle_and_enabled() {
        let mut store = RuleStore::with_defaults();
        assert!(!store.toggle("vibration-high").unwrap());
        assert_eq!(store.enabled().len(), 3);
        assert!(store.toggle("vibration-high").unwrap());
        assert_eq!(store.enabled().len(), 4);
        assert!(store.toggle("missing").is_err());
    }

    #[test]
    fn delete_keeps_remaining_order() {
        let mut store = RuleStore::with_defaults();
        store.delete("temp-critical").unwrap();
        let ids: Vec<String> = store.iter().map(|r| r.metadata.id.clone()).collect();
        assert_eq!(ids, vec!["temp-high", "vibration-high", "pressure-out-of-range"]);
        assert!(matches!(
            store.delete("temp-critical"),
            Err(RuleError::NotFound(_))
        ));
    }

    #[test]
    fn upsert_replaces_in_place() {
        let mut store = RuleStore::with_defaults();
        let mut rule = store.get("temp-high").unwrap().clone();
        rule.spec.threshold = Threshold::Scalar(31.0);
        store.upsert(rule).unwrap();
        assert_eq!(store.rules()[0].spec.threshold, Threshold::Scalar(31.0));
        assert_eq!(store.len(), 4);
    }
}
