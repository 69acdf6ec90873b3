//! Core [`RuleLoader`] struct: filesystem-backed rule loading with optional hot-reload.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{info, warn};

use crate::error::{Result, RuleError};
use crate::schema::AlertRule;
use crate::store::{ensure_valid, RuleStore};

use super::error::{LoadResult, LoadStatus};
use super::watcher::handle_fs_event;

/// Filesystem-backed rule loader with optional hot-reload.
///
/// Scans a directory (recursively) for `*.yml` / `*.yaml` files, parses and
/// validates each into an [`AlertRule`], and upserts it into the shared
/// [`RuleStore`].
pub struct RuleLoader {
    /// Root directory containing rule YAML files.
    rules_dir: PathBuf,
    /// Store shared with the host and the watcher thread.
    store: Arc<RwLock<RuleStore>>,
    /// Active filesystem watcher (held to keep it alive).
    _watcher: Option<RecommendedWatcher>,
}

impl RuleLoader {
    /// Create a loader feeding a fresh, empty store.
    ///
    /// Creates the directory (and parents) if it does not exist.
    pub fn new(rules_dir: PathBuf) -> Self {
        Self::with_store(rules_dir, Arc::new(RwLock::new(RuleStore::new())))
    }

    /// Create a loader feeding an existing store.
    pub fn with_store(rules_dir: PathBuf, store: Arc<RwLock<RuleStore>>) -> Self {
        if !rules_dir.exists() {
            if let Err(e) = fs::create_dir_all(&rules_dir) {
                warn!(path = %rules_dir.display(), error = %e, "failed to create rules directory");
            }
        }
        Self {
            rules_dir,
            store,
            _watcher: None,
        }
    }

    /// Recursively scan the rules directory and load all YAML files.
    ///
    /// Dotfiles (filenames starting with `.`) and non-YAML files are skipped.
    /// Subdirectories are scanned recursively.
    /// Parse and validation errors are reported per-file but do not abort the scan.
    pub fn load_all(&self) -> Result<Vec<LoadResult>> {
        let mut results = Vec::new();
        self.scan_dir_recursive(&self.rules_dir, &mut results)?;
        let loaded = results.iter().filter(|r| r.is_loaded()).count();
        let failed = results.iter().filter(|r| r.is_failed()).count();
        info!(path = %self.rules_dir.display(), loaded, failed, "rules directory scanned");
        Ok(results)
    }

    /// Recursively scan a directory for YAML rule files.
    fn scan_dir_recursive(&self, dir: &Path, results: &mut Vec<LoadResult>) -> Result<()> {
        let entries = match fs::read_dir(dir) {
            Ok(e) => e,
            Err(e) => {
                warn!(path = %dir.display(), error = %e, "failed to read directory");
                return Ok(());
            }
        };

        // Sorted so load order (and therefore evaluation order) is stable.
        let mut paths = entries
            .map(|entry| entry.map(|e| e.path()))
            .collect::<std::io::Result<Vec<_>>>()?;
        paths.sort();

        for path in paths {
            // Skip dotfiles/dotdirs
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                if name.starts_with('.') {
                    if path.is_file() {
                        results.push(LoadResult {
                            path,
                            status: LoadStatus::Skipped {
                                reason: "dotfile".to_string(),
                            },
                        });
                    }
                    continue;
                }
            }

            // Recurse into subdirectories
            if path.is_dir() {
                self.scan_dir_recursive(&path, results)?;
                continue;
            }

            if !is_yaml(&path) {
                results.push(LoadResult {
                    path,
                    status: LoadStatus::Skipped {
                        reason: "not a YAML file".to_string(),
                    },
                });
                continue;
            }

            match self.load_file(&path) {
                Ok(rule) => {
                    let rule_id = rule.metadata.id.clone();
                    info!(rule_id = %rule_id, sensor = %rule.spec.sensor_type, path = %path.display(), "loaded rule");
                    self.store
                        .write()
                        .expect("rule store lock poisoned")
                        .upsert(rule)?;
                    results.push(LoadResult {
                        path,
                        status: LoadStatus::Loaded { rule_id },
                    });
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "failed to load rule file");
                    results.push(LoadResult {
                        path,
                        status: LoadStatus::Failed {
                            error: e.to_string(),
                        },
                    });
                }
            }
        }

        Ok(())
    }

    /// Parse and validate a single YAML rule file without touching the store.
    pub fn load_file(&self, path: &Path) -> Result<AlertRule> {
        parse_rule_file(path)
    }

    /// Start a filesystem watcher with 500ms debounce.
    ///
    /// On file create/modify the rule is re-parsed and upserted.
    /// On file delete the rule is removed from the store.
    /// Parse or validation errors are logged as warnings; the previous version is kept.
    pub fn watch(&mut self) -> Result<()> {
        let store = Arc::clone(&self.store);

        let mut watcher = notify::recommended_watcher(move |res: std::result::Result<notify::Event, notify::Error>| {
            match res {
                Ok(event) => handle_fs_event(&event, &store),
                Err(e) => warn!(error = %e, "filesystem watcher error"),
            }
        })?;

        // Watch recursively to pick up changes in subdirectories.
        watcher.watch(&self.rules_dir, RecursiveMode::Recursive)?;

        let _ = watcher.configure(notify::Config::default().with_poll_interval(Duration::from_millis(500)));

        info!(path = %self.rules_dir.display(), "watching rules directory for changes (recursive)");
        self._watcher = Some(watcher);
        Ok(())
    }

    /// Get the rules directory path.
    pub fn rules_dir(&self) -> &Path {
        &self.rules_dir
    }

    /// Get the shared rule store.
    pub fn store(&self) -> Arc<RwLock<RuleStore>> {
        Arc::clone(&self.store)
    }

    /// Validate and atomically write a rule to `<id>.yml`, then upsert it.
    ///
    /// Writes to a `.tmp` file first, then renames to the final path to
    /// avoid partial writes on crash.
    pub fn write_rule(&self, rule: &AlertRule) -> Result<PathBuf> {
        ensure_valid(rule)?;

        let id = &rule.metadata.id;
        let final_path = self.rules_dir.join(format!("{}.yml", id));
        let tmp_path = self.rules_dir.join(format!(".{}.tmp", id));

        let yaml = rule.to_yaml()?;
        fs::write(&tmp_path, yaml)?;
        fs::rename(&tmp_path, &final_path)?;

        info!(rule_id = %id, path = %final_path.display(), "wrote rule file");

        self.store
            .write()
            .expect("rule store lock poisoned")
            .upsert(rule.clone())?;
        Ok(final_path)
    }

    /// Delete a rule file by rule ID.
    ///
    /// Removes both the file and the store entry.
    pub fn delete_rule(&self, id: &str) -> Result<()> {
        // Try both extensions
        let yml_path = self.rules_dir.join(format!("{}.yml", id));
        let yaml_path = self.rules_dir.join(format!("{}.yaml", id));

        if yml_path.exists() {
            fs::remove_file(&yml_path)?;
        } else if yaml_path.exists() {
            fs::remove_file(&yaml_path)?;
        } else {
            return Err(RuleError::NotFound(id.to_string()));
        }

        self.store
            .write()
            .expect("rule store lock poisoned")
            .remove(id);

        info!(rule_id = %id, "deleted rule");
        Ok(())
    }
}

pub(super) fn is_yaml(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "yml" || e == "yaml")
        .unwrap_or(false)
}

/// Read, parse and validate one rule file named `<id>.yml` or `<id>.yaml`.
pub(super) fn parse_rule_file(path: &Path) -> Result<AlertRule> {
    let contents = fs::read_to_string(path)?;
    let rule: AlertRule = serde_yaml::from_str(&contents)?;

    if rule.metadata.id.is_empty() {
        return Err(RuleError::InvalidRule(
            "rule metadata.id must not be empty".to_string(),
        ));
    }

    // Deletes map a file back to its rule by stem, so the two must agree.
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
    if stem != rule.metadata.id {
        return Err(RuleError::InvalidRule(format!(
            "file name '{}' does not match rule id '{}' (expected {}.yml)",
            stem, rule.metadata.id, rule.metadata.id
        )));
    }

    ensure_valid(&rule)?;
    Ok(rule)
}
