use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::history::DEFAULT_HISTORY_CAPACITY;

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Read a profiled env var: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_env_opt(profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = env_opt(&prefixed) {
            return Some(v);
        }
    }
    env_opt(key)
}

fn profiled_env_or(profile: &str, key: &str, default: &str) -> String {
    profiled_env_opt(profile, key).unwrap_or_else(|| default.to_string())
}

/// Unparsable values fall back to `default` with a warning.
fn profiled_env_parse<T: FromStr>(profile: &str, key: &str, default: T) -> T {
    match profiled_env_opt(profile, key) {
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, "unparsable config value, using default");
            default
        }),
        None => default,
    }
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TwinConfig {
    /// Active profile name (empty = default).
    pub profile: String,
    pub history: HistoryConfig,
    pub ingest: IngestConfig,
    pub alerts: AlertsConfig,
    pub analytics: AnalyticsConfig,
}

impl TwinConfig {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `TWIN_PROFILE`. When set (e.g. `LINE_B`), every
    /// key is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Self {
        let profile = env_or("TWIN_PROFILE", "").to_uppercase();
        Self::for_profile(&profile)
    }

    /// Build config for a specific named profile (empty string = default).
    pub fn for_profile(profile: &str) -> Self {
        let p = profile.to_uppercase();
        let p = p.as_str();
        Self {
            profile: p.to_string(),
            history: HistoryConfig::from_env_profiled(p),
            ingest: IngestConfig::from_env_profiled(p),
            alerts: AlertsConfig::from_env_profiled(p),
            analytics: AnalyticsConfig::from_env_profiled(p),
        }
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    /// Print a summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!("  history:    capacity={}, path={}", self.history.capacity, self.history.path.display());
        tracing::info!("  ingest:     tick={}ms, device={}", self.ingest.tick_interval_ms, self.ingest.device_id.as_deref().unwrap_or("(none)"));
        tracing::info!("  alerts:     rules_dir={}, mode={}", self.alerts.rules_dir.display(), self.alerts.trigger_mode);
        tracing::info!("  analytics:  z={}, forecast_steps={}, ma_window={}", self.analytics.z_threshold, self.analytics.forecast_steps, self.analytics.moving_average_window);
    }
}

// ── History ───────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    pub capacity: usize,
    pub path: PathBuf,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_HISTORY_CAPACITY,
            path: PathBuf::from("data/history.json"),
        }
    }
}

impl HistoryConfig {
    fn from_env_profiled(p: &str) -> Self {
        let d = Self::default();
        Self {
            capacity: profiled_env_parse(p, "HISTORY_CAPACITY", d.capacity),
            path: PathBuf::from(profiled_env_or(p, "HISTORY_PATH", "data/history.json")),
        }
    }
}

// ── Ingest ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestConfig {
    pub tick_interval_ms: u64,
    pub device_id: Option<String>,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 2000,
            device_id: None,
        }
    }
}

impl IngestConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            tick_interval_ms: profiled_env_parse(p, "TICK_INTERVAL_MS", 2000u64).max(1),
            device_id: profiled_env_opt(p, "DEVICE_ID"),
        }
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

// ── Alerts ────────────────────────────────────────────────────

/// Whether a rule that stays violated re-fires on every evaluation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriggerMode {
    /// Fire on every evaluation while the condition holds.
    #[default]
    Level,
    /// Fire once on the transition into the violated state.
    Edge,
}

impl fmt::Display for TriggerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TriggerMode::Level => write!(f, "level"),
            TriggerMode::Edge => write!(f, "edge"),
        }
    }
}

impl FromStr for TriggerMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "level" => Ok(TriggerMode::Level),
            "edge" => Ok(TriggerMode::Edge),
            other => Err(format!("unknown trigger mode: '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertsConfig {
    pub rules_dir: PathBuf,
    pub trigger_mode: TriggerMode,
    /// Alert records kept by the host (newest first).
    pub max_alerts: usize,
    /// Notifications kept by the host (newest first).
    pub max_notifications: usize,
}

impl Default for AlertsConfig {
    fn default() -> Self {
        Self {
            rules_dir: PathBuf::from("data/rules"),
            trigger_mode: TriggerMode::Level,
            max_alerts: 100,
            max_notifications: 50,
        }
    }
}

impl AlertsConfig {
    fn from_env_profiled(p: &str) -> Self {
        let d = Self::default();
        Self {
            rules_dir: PathBuf::from(profiled_env_or(p, "RULES_DIR", "data/rules")),
            trigger_mode: profiled_env_parse(p, "TRIGGER_MODE", d.trigger_mode),
            max_alerts: profiled_env_parse(p, "MAX_ALERTS", d.max_alerts),
            max_notifications: profiled_env_parse(p, "MAX_NOTIFICATIONS", d.max_notifications),
        }
    }
}

// ── Analytics ─────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    pub z_threshold: f64,
    pub forecast_steps: usize,
    pub moving_average_window: usize,
    pub trend_slope_threshold: f64,
    /// Spacing between synthetic forecast timestamps. Defaults to the tick interval.
    pub forecast_interval_ms: u64,
    /// Run the analytics refresh every N ingestion ticks.
    pub refresh_every_ticks: u64,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            z_threshold: 2.5,
            forecast_steps: 5,
            moving_average_window: 5,
            trend_slope_threshold: 0.1,
            forecast_interval_ms: 2000,
            refresh_every_ticks: 5,
        }
    }
}

impl AnalyticsConfig {
    fn from_env_profiled(p: &str) -> Self {
        let d = Self::default();
        let tick: u64 = profiled_env_parse(p, "TICK_INTERVAL_MS", d.forecast_interval_ms);
        Self {
            z_threshold: profiled_env_parse(p, "Z_THRESHOLD", d.z_threshold),
            forecast_steps: profiled_env_parse(p, "FORECAST_STEPS", d.forecast_steps),
            moving_average_window: profiled_env_parse(p, "MOVING_AVERAGE_WINDOW", d.moving_average_window),
            trend_slope_threshold: profiled_env_parse(p, "TREND_SLOPE_THRESHOLD", d.trend_slope_threshold),
            forecast_interval_ms: profiled_env_parse(p, "FORECAST_INTERVAL_MS", tick),
            refresh_every_ticks: profiled_env_parse(p, "REFRESH_EVERY_TICKS", d.refresh_every_ticks).max(1),
        }
    }

    pub fn forecast_interval(&self) -> Duration {
        Duration::from_millis(self.forecast_interval_ms)
    }
}
