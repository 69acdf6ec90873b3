//! Notification flag checks.

use super::ValidationResult;
use crate::schema::*;

pub(super) fn validate_notifications(rule: &AlertRule, result: &mut ValidationResult) {
    let notify = &rule.spec.notify;
    if !notify.in_app && !notify.email {
        result.warn(
            "spec.notify",
            "both in_app and email are off; triggered alerts are recorded but never surfaced",
        );
    }
    if notify.email && rule.spec.severity == Severity::Info {
        result.warn(
            "spec.notify.email",
            "email notifications for info-severity rules are usually noise",
        );
    }
}
