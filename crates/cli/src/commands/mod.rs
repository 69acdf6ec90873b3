pub mod analyze;
pub mod export;
pub mod rules;
pub mod run;

use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use anyhow::{Context, Result};
use tracing::warn;

use twin_rules::loader::{LoadResult, LoadStatus, RuleLoader};
use twin_rules::RuleStore;

/// Built-in rules overlaid with every rule file under `rules_dir`.
///
/// A file whose id matches a built-in rule replaces it in place.
pub(crate) fn open_rules(rules_dir: PathBuf) -> Result<(RuleLoader, Vec<LoadResult>)> {
    let store = Arc::new(RwLock::new(RuleStore::with_defaults()));
    let loader = RuleLoader::with_store(rules_dir, store);
    let results = loader
        .load_all()
        .with_context(|| format!("failed to scan {}", loader.rules_dir().display()))?;

    for r in &results {
        if let LoadStatus::Failed { error } = &r.status {
            warn!(path = %r.path.display(), error = %error, "rule file ignored");
        }
    }
    Ok((loader, results))
}

/// Pretty JSON for terminal output.
pub(crate) fn to_json<T: serde::Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("failed to serialize output")
}
