//! Schema and spec validation: apiVersion, kind, metadata, sensor, threshold shape.

use twin_core::KNOWN_SENSORS;

use super::fuzzy::{is_valid_rule_id, suggest_sensor};
use super::ValidationResult;
use crate::schema::*;

// ── Schema validation ───────────────────────────────────────────────

pub(super) fn validate_schema(rule: &AlertRule, result: &mut ValidationResult) {
    if rule.api_version != API_VERSION {
        result.error(
            "apiVersion",
            format!("apiVersion must be '{}', got '{}'", API_VERSION, rule.api_version),
        );
    }

    if rule.kind != ALERT_RULE_KIND {
        result.error(
            "kind",
            format!("kind must be '{}', got '{}'", ALERT_RULE_KIND, rule.kind),
        );
    }

    // metadata.id must be kebab-case
    if !is_valid_rule_id(&rule.metadata.id) {
        result.error(
            "metadata.id",
            format!(
                "id must be kebab-case (lowercase alphanumeric + hyphens), got '{}'",
                rule.metadata.id
            ),
        );
    }

    if rule.metadata.name.trim().is_empty() {
        result.error("metadata.name", "name must not be empty");
    }

    if !rule.metadata.enabled {
        result.warn("metadata.enabled", "rule is disabled and will never trigger");
    }
}

// ── Spec validation ─────────────────────────────────────────────────

pub(super) fn validate_spec(rule: &AlertRule, result: &mut ValidationResult) {
    let spec = &rule.spec;

    let sensor = spec.sensor_type.trim();
    if sensor.is_empty() {
        result.error("spec.sensor_type", "sensor_type must not be empty");
    } else if !KNOWN_SENSORS.contains(&sensor) {
        let message = format!(
            "sensor_type '{}' is not produced by the built-in simulator; the rule only fires if ingestion supplies it",
            sensor
        );
        match suggest_sensor(sensor) {
            Some(suggestion) => result.warn(
                "spec.sensor_type",
                format!("{} (did you mean '{}'?)", message, suggestion),
            ),
            None => result.warn("spec.sensor_type", message),
        }
    }

    if !spec.threshold.is_finite() {
        result.error("spec.threshold", "threshold values must be finite numbers");
        return;
    }

    match (spec.condition.is_range(), spec.threshold) {
        (true, Threshold::Scalar(v)) => {
            result.error_with_suggestion(
                "spec.threshold",
                format!(
                    "condition '{}' requires a {{min, max}} threshold, got scalar {}",
                    spec.condition, v
                ),
                format!("threshold: {{ min: {}, max: {} }}", v, v),
            );
        }
        (false, Threshold::Range { min, .. }) => {
            result.error_with_suggestion(
                "spec.threshold",
                format!(
                    "condition '{}' requires a scalar threshold, got a range",
                    spec.condition
                ),
                format!("threshold: {}", min),
            );
        }
        (true, Threshold::Range { min, max }) if min > max => {
            result.error_with_suggestion(
                "spec.threshold",
                format!("range min ({}) must not exceed max ({})", min, max),
                format!("threshold: {{ min: {}, max: {} }}", max, min),
            );
        }
        (true, Threshold::Range { min, max }) if min == max && spec.condition == Condition::InRange => {
            result.warn(
                "spec.threshold",
                "in_range with min == max only triggers on an exact value",
            );
        }
        _ => {}
    }

    match spec.tolerance {
        Some(tol) if !tol.is_finite() || tol < 0.0 => {
            result.error(
                "spec.tolerance",
                format!("tolerance must be a non-negative finite number, got {}", tol),
            );
        }
        Some(_) if spec.condition != Condition::Equals => {
            result.warn(
                "spec.tolerance",
                format!("tolerance is ignored for condition '{}'", spec.condition),
            );
        }
        _ => {}
    }
}
