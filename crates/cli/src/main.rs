mod cli;
mod commands;
mod feed;
mod simulator;

use anyhow::Result;
use clap::Parser;

use twin_core::config::load_dotenv;
use twin_core::TwinConfig;

use crate::cli::{CliArgs, Command};

#[tokio::main]
async fn main() -> Result<()> {
    load_dotenv();

    // Logs go to stderr so JSON on stdout stays clean.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = CliArgs::parse();
    let config = TwinConfig::from_env();

    match args.command {
        Command::Run(run) => {
            config.log_summary();
            commands::run::run(run, &config).await
        }
        Command::Analyze(analyze) => commands::analyze::analyze(analyze, &config),
        Command::Rules { action } => commands::rules::rules(action, &config),
        Command::Export(export) => commands::export::export(export, &config),
    }
}
