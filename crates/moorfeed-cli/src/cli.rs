//! Command-line definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Moorfeed — SST/SSS ingestion into the internal database.
#[derive(Parser, Debug)]
#[command(name = "moorfeed")]
#[command(about = "Ingest NDBC and SOFS sea-surface readings into the database", long_about = None)]
#[command(version)]
pub struct Args {
    /// Configuration file path (default: platform config dir)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Plan everything but write nothing (no database updates, no state
    /// file advance)
    #[arg(long, global = true)]
    pub dry_run: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Parse NDBC file-share drops and upload them
    Ndbc {
        /// Specific files to ingest; default is scanning the configured
        /// incoming directory
        #[arg(short, long)]
        input: Vec<PathBuf>,
    },
    /// Scrape the SOFS catalog and upload everything new
    Sofs {
        /// Override the starting upload date (ISO `YYYY-MM-DDThh:mm:ssZ`
        /// or `YYYY-MM-DD`); default is the state file
        #[arg(long)]
        since: Option<String>,
        /// Yearly catalog directory to scrape; default is the current year
        #[arg(long)]
        year: Option<i32>,
    },
    /// Run both feeds once (the daily cron entry point)
    Run,
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show the resolved config file path
    Path,
    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print a configuration value by dotted key (e.g. `sofs.station`)
    Get {
        /// Dotted key to look up
        key: String,
    },
}
