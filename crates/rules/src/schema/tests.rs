//! Tests for schema types.

use super::*;

const RANGE_RULE_YAML: &str = r#"
apiVersion: v1
kind: AlertRule
metadata:
  id: pressure-out-of-range
  name: Pressure Out of Range
  description: Line pressure outside the safe operating band
  tags: [pressure, safety]
spec:
  sensor_type: pressure
  condition: out_of_range
  threshold: { min: 1000, max: 1050 }
  severity: warning
  notify:
    in_app: true
    email: true
"#;

const SCALAR_RULE_YAML: &str = r#"
apiVersion: v1
kind: AlertRule
metadata:
  id: temp-critical
  name: Critical Temperature Alert
  enabled: false
spec:
  sensor_type: temperature
  condition: greaterThan
  threshold: 35
  severity: critical
"#;

#[test]
fn parse_range_rule() {
    let rule: AlertRule = serde_yaml::from_str(RANGE_RULE_YAML).unwrap();
    assert_eq!(rule.api_version, "v1");
    assert_eq!(rule.kind, "AlertRule");
    assert_eq!(rule.metadata.id, "pressure-out-of-range");
    assert!(rule.metadata.enabled, "enabled defaults to true");
    assert_eq!(rule.spec.condition, Condition::OutOfRange);
    assert_eq!(rule.spec.threshold, Threshold::range(1000.0, 1050.0));
    assert_eq!(rule.spec.severity, Severity::Warning);
    assert!(rule.spec.notify.email);
    assert_eq!(
        rule.check().unwrap(),
        Check::OutsideRange {
            min: 1000.0,
            max: 1050.0
        }
    );
}

#[test]
fn parse_scalar_rule_with_camel_case_condition() {
    let rule: AlertRule = serde_yaml::from_str(SCALAR_RULE_YAML).unwrap();
    assert!(!rule.metadata.enabled);
    assert_eq!(rule.spec.condition, Condition::GreaterThan);
    assert_eq!(rule.spec.threshold, Threshold::Scalar(35.0));
    assert_eq!(rule.spec.notify, NotifyFlags::default());
    assert_eq!(rule.spec.tolerance, None);
}

#[test]
fn unknown_fields_are_rejected() {
    let yaml = SCALAR_RULE_YAML.replace("severity: critical", "severity: critical\n  colour: red");
    assert!(serde_yaml::from_str::<AlertRule>(&yaml).is_err());
}

#[test]
fn unknown_severity_is_rejected() {
    let yaml = SCALAR_RULE_YAML.replace("severity: critical", "severity: apocalyptic");
    assert!(serde_yaml::from_str::<AlertRule>(&yaml).is_err());
}

#[test]
fn round_trip() {
    let rule: AlertRule = serde_yaml::from_str(RANGE_RULE_YAML).unwrap();
    let serialized = rule.to_yaml().unwrap();
    let rule2: AlertRule = serde_yaml::from_str(&serialized).unwrap();
    assert_eq!(rule, rule2);
}

#[test]
fn default_rules_all_compile() {
    let rules = default_rules();
    assert_eq!(rules.len(), 4);
    for rule in &rules {
        assert!(rule.is_enabled());
        assert!(rule.check().is_ok(), "{} should compile", rule.id());
    }
    assert_eq!(rules[1].spec.severity, Severity::Critical);
}

#[test]
fn severity_orders_by_urgency() {
    assert!(Severity::Info < Severity::Warning);
    assert!(Severity::Warning < Severity::Critical);
}
