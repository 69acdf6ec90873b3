//! `twin export`: dump a saved history as pretty JSON.

use std::fs;

use anyhow::{Context, Result};
use tracing::info;

use twin_core::persist::load_history;
use twin_core::TwinConfig;

use crate::cli::ExportArgs;

pub fn export(args: ExportArgs, config: &TwinConfig) -> Result<()> {
    let history = load_history(&args.history, config.history.capacity)
        .with_context(|| format!("failed to load history from {}", args.history.display()))?;
    let json = super::to_json(&history.as_slice())?;

    match &args.out {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
            info!(path = %path.display(), snapshots = history.len(), "history exported");
        }
        None => println!("{}", json),
    }
    Ok(())
}
