//! `twin rules list|validate|init`.

use std::path::PathBuf;

use anyhow::{anyhow, bail, Result};
use tracing::info;

use twin_core::TwinConfig;
use twin_rules::loader::{LoadStatus, RuleLoader};
use twin_rules::schema::default_rules;
use twin_rules::validation::validate_rule;

use crate::cli::RulesAction;

pub fn rules(action: RulesAction, config: &TwinConfig) -> Result<()> {
    let dir = |d: Option<PathBuf>| d.unwrap_or_else(|| config.alerts.rules_dir.clone());
    match action {
        RulesAction::List { rules_dir } => list(dir(rules_dir)),
        RulesAction::Validate { rules_dir } => validate(dir(rules_dir)),
        RulesAction::Init { rules_dir } => init(dir(rules_dir)),
    }
}

fn list(rules_dir: PathBuf) -> Result<()> {
    let (loader, _) = super::open_rules(rules_dir)?;
    let store = loader.store();
    let guard = store.read().map_err(|_| anyhow!("rule store lock poisoned"))?;

    println!(
        "{:<28} {:<8} {:<12} {:<14} {:<16} {}",
        "ID", "ENABLED", "SENSOR", "CONDITION", "THRESHOLD", "SEVERITY"
    );
    for rule in guard.iter() {
        println!(
            "{:<28} {:<8} {:<12} {:<14} {:<16} {}",
            rule.metadata.id,
            rule.metadata.enabled,
            rule.spec.sensor_type,
            rule.spec.condition.as_str(),
            rule.spec.threshold.to_string(),
            rule.spec.severity
        );
    }
    Ok(())
}

fn validate(rules_dir: PathBuf) -> Result<()> {
    let loader = RuleLoader::new(rules_dir);
    let results = loader.load_all()?;
    let store = loader.store();
    let guard = store.read().map_err(|_| anyhow!("rule store lock poisoned"))?;

    let mut failed = 0usize;
    for r in &results {
        match &r.status {
            LoadStatus::Loaded { rule_id } => {
                println!("ok      {}", r.path.display());
                if let Some(rule) = guard.get(rule_id) {
                    for w in validate_rule(rule).warnings {
                        println!("  warning {}: {}", w.path, w.message);
                    }
                }
            }
            LoadStatus::Failed { error } => {
                failed += 1;
                println!("FAILED  {}\n  {}", r.path.display(), error);
            }
            LoadStatus::Skipped { .. } => {}
        }
    }

    if failed > 0 {
        bail!("{} of {} rule files are invalid", failed, results.len());
    }
    Ok(())
}

fn init(rules_dir: PathBuf) -> Result<()> {
    let loader = RuleLoader::new(rules_dir);
    for rule in default_rules() {
        let path = loader.rules_dir().join(format!("{}.yml", rule.metadata.id));
        if path.exists() {
            info!(path = %path.display(), "rule file exists, leaving it alone");
            continue;
        }
        let written = loader.write_rule(&rule)?;
        println!("wrote {}", written.display());
    }
    Ok(())
}
