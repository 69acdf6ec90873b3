//! Rule validation with structured errors and suggestions.
//!
//! Returns a [`ValidationResult`] with errors (block save/load) and
//! warnings (advisory). The store and loader refuse any rule with errors,
//! which is what keeps operator and threshold shapes consistent by the time
//! the evaluator sees them.

mod notification_checks;
mod schema_checks;

pub mod fuzzy;

use crate::schema::*;
use serde::{Deserialize, Serialize};

// ── Result types ────────────────────────────────────────────────────

/// Overall validation outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

/// A blocking validation error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationError {
    /// Dotted location, e.g. `"spec.threshold"`.
    pub path: String,
    pub message: String,
    /// Optional "Did you mean …?" suggestion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

/// A non-blocking advisory warning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationResult {
    pub(crate) fn new() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub(crate) fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.valid = false;
        self.errors.push(ValidationError {
            path: path.into(),
            message: message.into(),
            suggestion: None,
        });
    }

    pub(crate) fn error_with_suggestion(
        &mut self,
        path: impl Into<String>,
        message: impl Into<String>,
        suggestion: impl Into<String>,
    ) {
        self.valid = false;
        self.errors.push(ValidationError {
            path: path.into(),
            message: message.into(),
            suggestion: Some(suggestion.into()),
        });
    }

    pub(crate) fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ValidationWarning {
            path: path.into(),
            message: message.into(),
        });
    }

    /// All error messages joined into one line, for error propagation.
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| {
                if e.path.is_empty() {
                    e.message.clone()
                } else {
                    format!("{}: {}", e.path, e.message)
                }
            })
            .collect::<Vec<_>>()
            .join("; ")
    }
}

// ── Public API ──────────────────────────────────────────────────────

/// Validate a parsed [`AlertRule`].
pub fn validate_rule(rule: &AlertRule) -> ValidationResult {
    let mut result = ValidationResult::new();
    schema_checks::validate_schema(rule, &mut result);
    schema_checks::validate_spec(rule, &mut result);
    notification_checks::validate_notifications(rule, &mut result);
    result
}

/// Parse raw YAML and validate. Returns parse errors merged with validation errors.
pub fn validate_yaml(yaml: &str) -> ValidationResult {
    match serde_yaml::from_str::<AlertRule>(yaml) {
        Ok(rule) => validate_rule(&rule),
        Err(e) => {
            let mut result = ValidationResult::new();
            let message = format!("YAML parse error: {e}");
            match unknown_variant(&message).and_then(fuzzy::suggest_condition) {
                Some(condition) => result.error_with_suggestion(
                    "spec.condition",
                    message,
                    format!("condition: {condition}"),
                ),
                None => result.error("", message),
            }
            result
        }
    }
}

/// The rejected value out of serde's "unknown variant `x`" message.
fn unknown_variant(message: &str) -> Option<&str> {
    let rest = message.split_once("unknown variant `")?.1;
    rest.split_once('`').map(|(variant, _)| variant)
}
