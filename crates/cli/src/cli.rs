use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Digital-twin alerting and analytics core.
///
/// Simulates a sensor feed, evaluates alert rules against it and runs
/// predictive analytics over the recorded history.
#[derive(Parser, Debug)]
#[command(name = "twin", version, about)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the simulated ingestion loop with live rule evaluation.
    Run(RunArgs),

    /// Print an analytics report for one reading key.
    Analyze(AnalyzeArgs),

    /// Inspect or initialize the rules directory.
    Rules {
        #[command(subcommand)]
        action: RulesAction,
    },

    /// Export a recorded history as JSON.
    Export(ExportArgs),
}

#[derive(clap::Args, Debug)]
pub struct RunArgs {
    /// Stop after this many ticks (runs until Ctrl-C when absent).
    #[arg(long)]
    pub ticks: Option<u64>,

    /// Seed for the simulator; omit for a random seed.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Device identifier stamped on snapshots and alerts.
    #[arg(long, env = "DEVICE_ID")]
    pub device: Option<String>,

    /// Rules directory (overrides RULES_DIR).
    #[arg(long)]
    pub rules_dir: Option<PathBuf>,

    /// History file (overrides HISTORY_PATH).
    #[arg(long)]
    pub history: Option<PathBuf>,

    /// Reload rules when files in the rules directory change.
    #[arg(long)]
    pub watch: bool,

    /// Tick interval in milliseconds (overrides TICK_INTERVAL_MS).
    #[arg(long)]
    pub interval_ms: Option<u64>,
}

#[derive(clap::Args, Debug)]
pub struct AnalyzeArgs {
    /// History file to analyze.
    #[arg(long)]
    pub history: PathBuf,

    /// Reading key, e.g. `temperature`.
    #[arg(long)]
    pub key: String,

    /// Baseline history to compare against.
    #[arg(long)]
    pub other: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum RulesAction {
    /// List the rules that would be loaded, in evaluation order.
    List {
        #[arg(long)]
        rules_dir: Option<PathBuf>,
    },
    /// Validate every rule file and report errors and warnings.
    Validate {
        #[arg(long)]
        rules_dir: Option<PathBuf>,
    },
    /// Write the default rules into the rules directory.
    Init {
        #[arg(long)]
        rules_dir: Option<PathBuf>,
    },
}

#[derive(clap::Args, Debug)]
pub struct ExportArgs {
    /// History file to export.
    #[arg(long)]
    pub history: PathBuf,

    /// Output file; stdout when absent.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_run_flags() {
        let args = CliArgs::try_parse_from([
            "twin", "run", "--ticks", "3", "--seed", "7", "--device", "press-1",
        ])
        .unwrap();
        match args.command {
            Command::Run(run) => {
                assert_eq!(run.ticks, Some(3));
                assert_eq!(run.seed, Some(7));
                assert_eq!(run.device.as_deref(), Some("press-1"));
                assert!(!run.watch);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn analyze_requires_key() {
        assert!(CliArgs::try_parse_from(["twin", "analyze", "--history", "h.json"]).is_err());
    }

    #[test]
    fn parses_rules_subcommands() {
        let args = CliArgs::try_parse_from(["twin", "rules", "init", "--rules-dir", "r"]).unwrap();
        assert!(matches!(
            args.command,
            Command::Rules {
                action: RulesAction::Init { .. }
            }
        ));
    }
}
