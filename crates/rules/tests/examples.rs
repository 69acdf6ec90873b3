//! Integration tests that verify every example YAML rule in
//! `data/rules/examples/` deserializes and validates against the schema.

use twin_core::SensorSnapshot;
use twin_rules::loader::{LoadStatus, RuleLoader};
use twin_rules::schema::{AlertRule, Condition, Severity, Threshold};
use twin_rules::validation::validate_rule;
use twin_rules::RuleEvaluator;

/// Resolve the examples directory relative to the workspace root.
/// Integration tests run from the crate directory, so we go up two levels.
fn examples_dir() -> std::path::PathBuf {
    let manifest = std::path::Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest.join("../../data/rules/examples")
}

fn load_rule(filename: &str) -> AlertRule {
    let path = examples_dir().join(filename);
    let yaml = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", path.display(), e));
    serde_yaml::from_str(&yaml)
        .unwrap_or_else(|e| panic!("Failed to parse {}: {}", path.display(), e))
}

fn tags(rule: &AlertRule) -> Vec<&str> {
    rule.metadata
        .tags
        .as_ref()
        .unwrap()
        .iter()
        .map(|s| s.as_str())
        .collect()
}

// ── humidity-comfort-band.yml ───────────────────────────────

#[test]
fn parse_humidity_comfort_band() {
    let rule = load_rule("humidity-comfort-band.yml");
    assert_eq!(rule.api_version, "v1");
    assert_eq!(rule.kind, "AlertRule");
    assert!(rule.metadata.enabled);
    assert_eq!(tags(&rule), vec!["environment", "humidity"]);
    assert_eq!(rule.spec.condition, Condition::OutOfRange);
    assert_eq!(rule.spec.threshold, Threshold::range(40.0, 70.0));
    assert_eq!(rule.spec.severity, Severity::Warning);
    assert!(rule.spec.notify.in_app);
    assert!(!rule.spec.notify.email);
}

// ── energy-spike.yml ────────────────────────────────────────

#[test]
fn parse_energy_spike() {
    let rule = load_rule("energy-spike.yml");
    assert_eq!(rule.spec.threshold, Threshold::Scalar(78.5));
    assert_eq!(rule.spec.severity, Severity::Critical);
    assert!(rule.spec.notify.email);
}

// ── vibration-idle.yml ──────────────────────────────────────

#[test]
fn parse_vibration_idle_camel_case_condition() {
    let rule = load_rule("vibration-idle.yml");
    assert!(!rule.metadata.enabled);
    assert_eq!(rule.spec.condition, Condition::LessThan);

    let result = validate_rule(&rule);
    assert!(result.valid);
    assert!(result
        .warnings
        .iter()
        .any(|w| w.path == "metadata.enabled"));
}

// ── pressure-setpoint.yml ───────────────────────────────────

#[test]
fn parse_pressure_setpoint_with_tolerance() {
    let rule = load_rule("pressure-setpoint.yml");
    assert_eq!(rule.spec.condition, Condition::Equals);
    assert_eq!(rule.spec.tolerance, Some(0.05));

    let snapshot = SensorSnapshot::now([("pressure", 1013.27)]);
    let alerts = RuleEvaluator::evaluate(&snapshot, &[rule], None);
    assert_eq!(alerts.len(), 1);
}

// ── temperature-nominal.yml ─────────────────────────────────

#[test]
fn parse_temperature_nominal_flow_mapping() {
    let rule = load_rule("temperature-nominal.yml");
    assert_eq!(rule.spec.condition, Condition::InRange);
    assert_eq!(rule.spec.threshold, Threshold::range(20.0, 25.0));
}

// ── Whole directory ─────────────────────────────────────────

#[test]
fn every_example_loads_and_validates() {
    let dir = tempfile::tempdir().unwrap();
    for entry in std::fs::read_dir(examples_dir()).unwrap() {
        let path = entry.unwrap().path();
        std::fs::copy(&path, dir.path().join(path.file_name().unwrap())).unwrap();
    }

    let loader = RuleLoader::new(dir.path().to_path_buf());
    let results = loader.load_all().unwrap();

    for r in &results {
        assert!(
            matches!(r.status, LoadStatus::Loaded { .. }),
            "{}: {:?}",
            r.path.display(),
            r.status
        );
    }
    assert_eq!(results.len(), 5);

    let store = loader.store();
    let guard = store.read().unwrap();
    assert_eq!(guard.len(), 5);
    assert_eq!(guard.enabled().len(), 4);
    for rule in guard.iter() {
        assert!(validate_rule(rule).valid, "{}", rule.metadata.id);
    }
}
