//! Moorfeed CLI entry point.
//!
//! Run without arguments for usage; `moorfeed run` is the daily cron
//! entry point. Log verbosity follows `RUST_LOG`.

#![warn(clippy::all)]
#![forbid(unsafe_code)]

use anyhow::Result;
use clap::Parser;

use moorfeed_cli::cli::{Args, Command};
use moorfeed_cli::commands;
use moorfeed_cli::config::MoorfeedConfig;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,moorfeed=debug".into()),
        )
        .init();

    let args = Args::parse();

    if let Command::Config { action } = &args.command {
        return commands::handle_config(args.config.as_deref(), action);
    }

    let config = MoorfeedConfig::load(args.config.as_deref())?;
    match &args.command {
        Command::Ndbc { input } => commands::run_ndbc(&config, input, args.dry_run).await,
        Command::Sofs { since, year } => {
            commands::run_sofs(&config, since.as_deref(), *year, args.dry_run).await
        }
        Command::Run => commands::run_all(&config, args.dry_run).await,
        Command::Config { .. } => unreachable!("handled above"),
    }
}
