//! `twin run`: the host loop.
//!
//! One tokio interval drives everything: each tick produces a snapshot,
//! evaluates the enabled rules against it, appends it to the history and
//! every few ticks refreshes the analytics. The loop is the single writer
//! of the history; the rule store is shared with the optional watcher.

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use tracing::{debug, info, warn};

use twin_compute::{health_score, Analyzer, PerformanceMetrics};
use twin_core::persist::{load_history, save_history};
use twin_core::{HistorySeries, TwinConfig, KNOWN_SENSORS};
use twin_rules::{RuleEvaluator, TriggerGate};

use crate::cli::RunArgs;
use crate::feed::{AlertFeed, NotificationFeed};
use crate::simulator::Simulator;

pub async fn run(args: RunArgs, config: &TwinConfig) -> Result<()> {
    let rules_dir = args.rules_dir.unwrap_or_else(|| config.alerts.rules_dir.clone());
    let history_path = args.history.unwrap_or_else(|| config.history.path.clone());
    let device = args.device.or_else(|| config.ingest.device_id.clone());
    let interval = args
        .interval_ms
        .map(|ms| Duration::from_millis(ms.max(1)))
        .unwrap_or_else(|| config.ingest.tick_interval());

    let (mut loader, _) = super::open_rules(rules_dir)?;
    if args.watch {
        loader.watch().context("failed to start rules watcher")?;
    }
    let store = loader.store();

    let mut history = load_history(&history_path, config.history.capacity)
        .with_context(|| format!("failed to load history from {}", history_path.display()))?;

    let mut gate = TriggerGate::new(config.alerts.trigger_mode);
    let mut alerts = AlertFeed::new(config.alerts.max_alerts);
    let mut notifications = NotificationFeed::new(config.alerts.max_notifications);
    let analyzer = Analyzer::from_config(&config.analytics);
    let mut simulator = Simulator::new(args.seed, device.clone());

    let mut ticker = tokio::time::interval(interval);
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    info!(
        interval_ms = interval.as_millis() as u64,
        device = device.as_deref().unwrap_or("(none)"),
        mode = %gate.mode(),
        "ingestion loop started"
    );

    let mut tick: u64 = 0;
    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = &mut shutdown => {
                info!("shutdown requested");
                break;
            }
        }
        tick += 1;

        let snapshot = simulator.next_snapshot();
        let rules = store
            .read()
            .map_err(|_| anyhow!("rule store lock poisoned"))?
            .enabled();

        let triggered = RuleEvaluator::evaluate(&snapshot, &rules, device.as_deref());
        history.push(snapshot);

        let transitions = gate.apply(device.as_deref(), triggered);
        for rule_id in &transitions.resolved {
            info!(rule_id = %rule_id, "alert resolved");
        }
        for alert in transitions.fired {
            let notify = rules
                .iter()
                .find(|r| r.metadata.id == alert.rule_id)
                .map(|r| r.spec.notify)
                .unwrap_or_default();

            warn!(
                rule_id = %alert.rule_id,
                severity = %alert.severity,
                "{}",
                alert.message()
            );
            if notify.in_app {
                notifications.push_alert(&alert);
            }
            if notify.email {
                info!(rule_id = %alert.rule_id, "email notification requested, no mail transport configured");
            }
            alerts.push(alert);
        }

        if tick % config.analytics.refresh_every_ticks.max(1) == 0 {
            refresh_analytics(&analyzer, &history);
        }

        if args.ticks.is_some_and(|n| tick >= n) {
            break;
        }
    }

    save_history(&history_path, &history)
        .with_context(|| format!("failed to save history to {}", history_path.display()))?;

    info!(
        ticks = tick,
        alerts = alerts.len(),
        unacknowledged = alerts.unacknowledged(),
        notifications = notifications.len(),
        unread = notifications.unread(),
        "run finished"
    );
    Ok(())
}

/// Presentation refresh: the numbers a dashboard would redraw.
fn refresh_analytics(analyzer: &Analyzer, history: &HistorySeries) {
    let data = history.as_slice();
    for report in analyzer.report_all(data, KNOWN_SENSORS) {
        let stats = report.statistics;
        debug!(
            key = %report.key,
            mean = stats.map(|s| s.mean),
            std_dev = stats.map(|s| s.std_dev),
            trend = %report.trend,
            anomalies = report.anomalies.len(),
            next = report.forecast.first().map(|p| p.value),
            "analytics refreshed"
        );
    }

    if let Some(latest) = history.latest() {
        let score = health_score(latest, &PerformanceMetrics::default());
        info!(health = score, snapshots = history.len(), "health score");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn bounded_run_persists_history() {
        let dir = tempfile::tempdir().unwrap();
        let history_path = dir.path().join("out").join("history.json");
        let args = RunArgs {
            ticks: Some(3),
            seed: Some(1),
            device: Some("press-1".into()),
            rules_dir: Some(dir.path().join("rules")),
            history: Some(history_path.clone()),
            watch: false,
            interval_ms: Some(1),
        };

        run(args, &TwinConfig::default()).await.unwrap();

        let history = load_history(&history_path, 1000).unwrap();
        assert_eq!(history.len(), 3);
        assert!(history
            .as_slice()
            .iter()
            .all(|s| s.device_id.as_deref() == Some("press-1")));
    }

    #[tokio::test]
    async fn history_is_appended_across_runs() {
        let dir = tempfile::tempdir().unwrap();
        let history_path = dir.path().join("history.json");
        for _ in 0..2 {
            let args = RunArgs {
                ticks: Some(2),
                seed: None,
                device: None,
                rules_dir: Some(dir.path().join("rules")),
                history: Some(history_path.clone()),
                watch: false,
                interval_ms: Some(1),
            };
            run(args, &TwinConfig::default()).await.unwrap();
        }
        assert_eq!(load_history(&history_path, 1000).unwrap().len(), 4);
    }
}
