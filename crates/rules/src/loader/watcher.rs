//! Filesystem event handler for the notify watcher (hot-reload).

use std::path::Path;
use std::sync::{Arc, RwLock};

use notify::event::{CreateKind, ModifyKind, RemoveKind};
use notify::{Event, EventKind};
use tracing::{info, warn};

use crate::store::RuleStore;

use super::core::{is_yaml, parse_rule_file};

/// Handle a single filesystem event from the notify watcher.
pub(super) fn handle_fs_event(event: &Event, store: &Arc<RwLock<RuleStore>>) {
    for path in &event.paths {
        if !is_yaml(path) {
            continue;
        }

        // Skip dotfiles (including our .tmp files)
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            if name.starts_with('.') {
                continue;
            }
        }

        match &event.kind {
            EventKind::Create(CreateKind::File)
            | EventKind::Modify(ModifyKind::Data(_))
            | EventKind::Modify(ModifyKind::Name(_)) => {
                // A rename away from the watched name shows up as Modify(Name)
                // for a path that no longer exists.
                if !path.exists() {
                    remove_rule_by_path(store, path);
                    continue;
                }
                match parse_rule_file(path) {
                    Ok(rule) => {
                        let rule_id = rule.metadata.id.clone();
                        let mut guard = store.write().expect("rule store lock poisoned");
                        match guard.upsert(rule) {
                            Ok(()) => {
                                info!(rule_id = %rule_id, path = %path.display(), "hot-reloaded rule")
                            }
                            Err(e) => warn!(rule_id = %rule_id, error = %e, "hot-reload rejected"),
                        }
                    }
                    Err(e) => {
                        warn!(
                            path = %path.display(),
                            error = %e,
                            "failed to load rule during hot-reload, keeping previous version"
                        );
                    }
                }
            }
            EventKind::Remove(RemoveKind::File) => {
                remove_rule_by_path(store, path);
            }
            _ => {}
        }
    }
}

/// Remove the rule whose file this was (rule id == file stem).
fn remove_rule_by_path(store: &Arc<RwLock<RuleStore>>, path: &Path) {
    let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
        return;
    };
    let removed = store.write().expect("rule store lock poisoned").remove(stem);
    if removed.is_some() {
        info!(rule_id = %stem, path = %path.display(), "removed rule after file deletion");
    }
}
