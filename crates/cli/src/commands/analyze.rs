//! `twin analyze`: one-shot analytics report over a saved history.

use anyhow::{Context, Result};
use serde::Serialize;

use twin_compute::{compare, health_score, Analyzer, Comparison, PerformanceMetrics, SeriesReport};
use twin_core::persist::load_history;
use twin_core::TwinConfig;

use crate::cli::AnalyzeArgs;

#[derive(Debug, Serialize)]
struct AnalyzeOutput {
    snapshots: usize,
    report: SeriesReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    health_score: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    comparison: Option<Comparison>,
}

pub fn analyze(args: AnalyzeArgs, config: &TwinConfig) -> Result<()> {
    let history = load_history(&args.history, config.history.capacity)
        .with_context(|| format!("failed to load history from {}", args.history.display()))?;
    let data = history.as_slice();

    let comparison = match &args.other {
        Some(path) => {
            let baseline = load_history(path, config.history.capacity)
                .with_context(|| format!("failed to load history from {}", path.display()))?;
            compare(data, baseline.as_slice(), &args.key)
        }
        None => None,
    };

    let output = AnalyzeOutput {
        snapshots: data.len(),
        report: Analyzer::from_config(&config.analytics).report(data, &args.key),
        health_score: history
            .latest()
            .map(|s| health_score(s, &PerformanceMetrics::default())),
        comparison,
    };

    println!("{}", super::to_json(&output)?);
    Ok(())
}
