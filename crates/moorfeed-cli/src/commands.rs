//! Subcommand implementations.
//!
//! Each handler loads what it needs from [`MoorfeedConfig`] and reports
//! through `tracing`; errors bubble up as `anyhow` for a single top-level
//! exit path in `main`.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use moorfeed_db::Uploader;
use moorfeed_ndbc::{NdbcDrop, metadata_from_filename, parse_path, scan_incoming};
use moorfeed_sofs::{LastUploadFile, SofsClient, catalog::UPLOAD_DATE_FORMAT};

use crate::cli::ConfigAction;
use crate::config::MoorfeedConfig;

/// Ingests NDBC drops: the given files, or a scan of the configured
/// incoming directory when none are given.
pub async fn run_ndbc(
    config: &MoorfeedConfig,
    inputs: &[PathBuf],
    dry_run: bool,
) -> Result<()> {
    let drops = if inputs.is_empty() {
        scan_incoming(&config.ndbc.incoming_dir).with_context(|| {
            format!("scanning {}", config.ndbc.incoming_dir.display())
        })?
    } else {
        inputs
            .iter()
            .map(|path| {
                let (parameter, station) = metadata_from_filename(path)?;
                Ok(NdbcDrop {
                    path: path.clone(),
                    parameter,
                    station,
                })
            })
            .collect::<moorfeed_core::Result<Vec<_>>>()?
    };

    if drops.is_empty() {
        tracing::info!("no NDBC files to ingest");
        return Ok(());
    }
    tracing::info!(files = drops.len(), "ingesting NDBC drops");

    let uploader = Uploader::connect(&config.database.db_config(), dry_run).await?;
    for drop in &drops {
        let file = parse_path(&drop.path)
            .with_context(|| format!("parsing {}", drop.path.display()))?;
        let frame = file.to_frame(drop.parameter)?;
        if frame.is_empty() {
            tracing::warn!(path = %drop.path.display(), "file held no observations");
            continue;
        }
        let report = uploader
            .upload(&drop.station, &frame, &[drop.parameter])
            .await?;
        if let Ok(json) = serde_json::to_string(&report) {
            tracing::debug!(report = %json, "upload report");
        }
        tracing::info!(
            path = %drop.path.display(),
            station = %report.station,
            tables = report.tables.len(),
            rows = report.rows_updated,
            dry_run = report.dry_run,
            "NDBC file uploaded"
        );
    }
    Ok(())
}

/// Scrapes the SOFS catalog, uploads everything newer than the state
/// file, and advances the state file on a real run.
pub async fn run_sofs(
    config: &MoorfeedConfig,
    since: Option<&str>,
    year: Option<i32>,
    dry_run: bool,
) -> Result<()> {
    let year = year.unwrap_or_else(SofsClient::current_year);
    let state = LastUploadFile::new(&config.sofs.state_file);
    let since = match since {
        Some(raw) => parse_since(raw)?,
        None => match state.read()? {
            Some(datetime) => datetime,
            None => year_start(year)?,
        },
    };

    let client = SofsClient::new(config.sofs.sofs_config());
    let batch = client.fetch_since(year, since, None).await?;
    if batch.files.is_empty() {
        tracing::info!(year, %since, "no new SOFS files");
        return Ok(());
    }

    let station = moorfeed_core::Station::new(config.sofs.station.clone());
    let parameters = batch.frame.parameters();
    let uploader = Uploader::connect(&config.database.db_config(), dry_run).await?;
    let report = uploader.upload(&station, &batch.frame, &parameters).await?;
    if let Ok(json) = serde_json::to_string(&report) {
        tracing::debug!(report = %json, "upload report");
    }
    tracing::info!(
        files = batch.files.len(),
        tables = report.tables.len(),
        rows = report.rows_updated,
        dry_run = report.dry_run,
        "SOFS batch uploaded"
    );

    match state_advance(dry_run, batch.latest_upload) {
        Some(latest) => {
            state.write(latest)?;
            tracing::info!(%latest, path = %state.path().display(), "state file advanced");
        }
        None => {
            if let Some(latest) = batch.latest_upload {
                tracing::info!(%latest, "dry run: state file not advanced");
            }
        }
    }
    Ok(())
}

/// Decides whether the state file advances, and to which upload date.
///
/// Only a real run that delivered new files moves the marker; this is
/// evaluated after the upload has succeeded, so a failed upload never
/// reaches it.
fn state_advance(dry_run: bool, latest_upload: Option<NaiveDateTime>) -> Option<NaiveDateTime> {
    if dry_run { None } else { latest_upload }
}

/// Runs both feeds once. A failure in one feed does not stop the other;
/// the first error is returned after both have run.
pub async fn run_all(config: &MoorfeedConfig, dry_run: bool) -> Result<()> {
    let ndbc = run_ndbc(config, &[], dry_run).await;
    if let Err(err) = &ndbc {
        tracing::error!("NDBC feed failed: {err:#}");
    }
    let sofs = run_sofs(config, None, None, dry_run).await;
    if let Err(err) = &sofs {
        tracing::error!("SOFS feed failed: {err:#}");
    }
    ndbc.and(sofs)
}

/// Handles `moorfeed config <action>`.
pub fn handle_config(explicit: Option<&str>, action: &ConfigAction) -> Result<()> {
    let path = MoorfeedConfig::resolve_path(explicit)
        .context("no config directory available on this platform")?;
    match action {
        ConfigAction::Path => {
            println!("{}", path.display());
        }
        ConfigAction::Init { force } => {
            if path.exists() && !force {
                bail!(
                    "config file {} already exists (use --force to overwrite)",
                    path.display()
                );
            }
            MoorfeedConfig::default().write_file(&path)?;
            println!("wrote {}", path.display());
        }
        ConfigAction::Get { key } => {
            let config = MoorfeedConfig::load(explicit)?;
            println!("{}", config.get(key)?);
        }
    }
    Ok(())
}

/// Parses a `--since` override: a full upload timestamp or a bare date
/// (taken as midnight).
fn parse_since(raw: &str) -> Result<NaiveDateTime> {
    if let Ok(datetime) = NaiveDateTime::parse_from_str(raw, UPLOAD_DATE_FORMAT) {
        return Ok(datetime);
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .with_context(|| format!("'{raw}' is not {UPLOAD_DATE_FORMAT} or YYYY-MM-DD"))?;
    Ok(date.and_time(NaiveTime::MIN))
}

/// Midnight on 1 January of `year`, the fallback when no state exists.
fn year_start(year: i32) -> Result<NaiveDateTime> {
    NaiveDate::from_ymd_opt(year, 1, 1)
        .map(|d| d.and_time(NaiveTime::MIN))
        .with_context(|| format!("invalid year {year}"))
}
