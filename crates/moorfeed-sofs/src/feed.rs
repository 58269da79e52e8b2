//! The SOFS HTTP client: catalog scrape plus NetCDF download.

use backon::{ExponentialBuilder, Retryable};
use chrono::{Datelike, NaiveDateTime, Utc};

use moorfeed_core::ParameterFrame;

use crate::catalog::{self, CatalogEntry};
use crate::error::{Error, Result};
use crate::netcdf;

/// Where the feed publishes its yearly directories.
///
/// Both bases are extended with `<year>_daily/`; the catalog base serves the
/// HTML listing, the data base serves the NetCDF files themselves.
#[derive(Debug, Clone)]
pub struct SofsConfig {
    /// Base URL of the HTML catalog tree.
    pub catalog_base_url: String,
    /// Base URL of the NetCDF file tree.
    pub data_base_url: String,
}

/// The result of one scrape-and-download pass.
#[derive(Debug, Clone)]
pub struct SofsBatch {
    /// All extracted observations, time sorted.
    pub frame: ParameterFrame,
    /// Names of the files that were downloaded.
    pub files: Vec<String>,
    /// Newest upload date among the downloaded files. `None` when the
    /// catalog had nothing new.
    pub latest_upload: Option<NaiveDateTime>,
}

/// Async client for the SOFS near-real-time feed.
pub struct SofsClient {
    http: reqwest::Client,
    config: SofsConfig,
}

impl SofsClient {
    /// Creates a client for the configured catalog/data bases.
    pub fn new(config: SofsConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// The current calendar year, the default yearly directory.
    pub fn current_year() -> i32 {
        Utc::now().year()
    }

    /// URL of the catalog listing for a year.
    pub fn catalog_url(&self, year: i32) -> String {
        format!(
            "{}{year}_daily/catalog.html",
            with_trailing_slash(&self.config.catalog_base_url)
        )
    }

    /// URL of the data directory for a year.
    pub fn data_url(&self, year: i32) -> String {
        format!(
            "{}{year}_daily/",
            with_trailing_slash(&self.config.data_base_url)
        )
    }

    /// Scrapes the catalog listing for a year.
    pub async fn fetch_catalog(&self, year: i32) -> Result<Vec<CatalogEntry>> {
        let url = self.catalog_url(year);
        tracing::info!(%url, "fetching SOFS catalog");
        let html = self.get_with_retry(&url).await?;
        let html = String::from_utf8_lossy(&html).into_owned();
        catalog::parse_catalog(&html)
    }

    /// Downloads and decodes every file uploaded after `since` (and no
    /// later than `until`, when given), merged into one frame.
    pub async fn fetch_since(
        &self,
        year: i32,
        since: NaiveDateTime,
        until: Option<NaiveDateTime>,
    ) -> Result<SofsBatch> {
        let entries = self.fetch_catalog(year).await?;
        let selected = catalog::select_unprocessed(&entries, since, until);
        tracing::info!(
            total = entries.len(),
            new = selected.len(),
            %since,
            "selected catalog entries"
        );

        let data_url = self.data_url(year);
        let mut frame: Option<ParameterFrame> = None;
        let mut files = Vec::with_capacity(selected.len());
        for entry in &selected {
            let url = format!("{data_url}{}", entry.filename);
            tracing::debug!(file = %entry.filename, "downloading NetCDF");
            let bytes = self.get_with_retry(&url).await?;
            let decoded = netcdf::decode_bytes(&bytes, &entry.filename)?;
            match frame.as_mut() {
                Some(f) => f.merge(decoded)?,
                None => frame = Some(decoded),
            }
            files.push(entry.filename.clone());
        }

        Ok(SofsBatch {
            frame: frame.unwrap_or_default(),
            files,
            latest_upload: selected.iter().map(|e| e.uploaded).max(),
        })
    }

    /// GET with exponential backoff on transport failures.
    async fn get_with_retry(&self, url: &str) -> Result<Vec<u8>> {
        (|| async {
            let response = self.http.get(url).send().await?.error_for_status()?;
            Ok(response.bytes().await?.to_vec())
        })
        .retry(ExponentialBuilder::default())
        .when(Error::is_retryable)
        .notify(|err: &Error, dur| {
            tracing::warn!(%url, delay = ?dur, "retrying SOFS fetch: {err}");
        })
        .await
    }
}

fn with_trailing_slash(base: &str) -> String {
    if base.ends_with('/') {
        base.to_string()
    } else {
        format!("{base}/")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client(base: &str) -> SofsClient {
        SofsClient::new(SofsConfig {
            catalog_base_url: base.to_string(),
            data_base_url: base.to_string(),
        })
    }

    #[test]
    fn test_catalog_url_appends_year_directory() {
        let c = client("https://feed.example/Real-time/");
        assert_eq!(
            c.catalog_url(2024),
            "https://feed.example/Real-time/2024_daily/catalog.html"
        );
    }

    #[test]
    fn test_data_url_appends_year_directory() {
        let c = client("https://feed.example/Real-time");
        assert_eq!(c.data_url(2024), "https://feed.example/Real-time/2024_daily/");
    }

    #[test]
    fn test_urls_normalize_missing_slash() {
        let c = client("https://feed.example/base");
        assert!(c.catalog_url(2025).starts_with("https://feed.example/base/2025"));
    }
}
