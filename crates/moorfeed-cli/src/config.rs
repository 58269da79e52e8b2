//! Configuration file handling.
//!
//! The config lives in TOML under the platform config directory
//! (`~/.config/moorfeed/config.toml` on Linux) unless a path is given on
//! the command line. The database password can be kept out of the file and
//! supplied via `MOORFEED_DB_PASSWORD`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use moorfeed_db::DbConfig;
use moorfeed_sofs::SofsConfig;

/// Environment variable overriding `[database].password`.
pub const DB_PASSWORD_ENV: &str = "MOORFEED_DB_PASSWORD";

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct MoorfeedConfig {
    /// Target database connection settings.
    pub database: DatabaseSection,
    /// NDBC file-share feed settings.
    pub ndbc: NdbcSection,
    /// SOFS web feed settings.
    pub sofs: SofsSection,
}

/// `[database]` section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DatabaseSection {
    /// Database host.
    pub host: String,
    /// Database port.
    pub port: u16,
    /// Database name.
    pub name: String,
    /// Role to connect as.
    pub user: String,
    /// Password; prefer `MOORFEED_DB_PASSWORD` over the file.
    pub password: String,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            name: "database".to_string(),
            user: "user".to_string(),
            password: String::new(),
        }
    }
}

impl DatabaseSection {
    /// Builds the connection config, applying the env-var override.
    pub fn db_config(&self) -> DbConfig {
        let password = std::env::var(DB_PASSWORD_ENV).unwrap_or_else(|_| self.password.clone());
        DbConfig {
            host: self.host.clone(),
            port: self.port,
            database: self.name.clone(),
            user: self.user.clone(),
            password,
        }
    }
}

/// `[ndbc]` section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NdbcSection {
    /// Directory the partner drops files into.
    pub incoming_dir: PathBuf,
}

impl Default for NdbcSection {
    fn default() -> Self {
        Self {
            incoming_dir: PathBuf::from("/share/ndbc/incoming"),
        }
    }
}

/// `[sofs]` section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SofsSection {
    /// Station name the feed's observations belong to.
    pub station: String,
    /// Base URL of the HTML catalog tree.
    pub catalog_base_url: String,
    /// Base URL of the NetCDF file tree.
    pub data_base_url: String,
    /// Path of the last-upload-date state file.
    pub state_file: PathBuf,
}

impl Default for SofsSection {
    fn default() -> Self {
        Self {
            station: "SOFS".to_string(),
            catalog_base_url: String::new(),
            data_base_url: String::new(),
            state_file: PathBuf::from("sofs_last_upload.txt"),
        }
    }
}

impl SofsSection {
    /// Builds the scraper config for this section.
    pub fn sofs_config(&self) -> SofsConfig {
        SofsConfig {
            catalog_base_url: self.catalog_base_url.clone(),
            data_base_url: self.data_base_url.clone(),
        }
    }
}

impl MoorfeedConfig {
    /// Resolves the config file path: explicit flag, else the platform
    /// config directory. `None` when the platform has no config dir.
    pub fn resolve_path(explicit: Option<&str>) -> Option<PathBuf> {
        match explicit {
            Some(path) => Some(PathBuf::from(path)),
            None => dirs::config_dir().map(|d| d.join("moorfeed").join("config.toml")),
        }
    }

    /// Loads the config, falling back to defaults when no file exists and
    /// none was explicitly requested.
    pub fn load(explicit: Option<&str>) -> Result<Self> {
        let Some(path) = Self::resolve_path(explicit) else {
            return Ok(Self::default());
        };
        if !path.exists() {
            if explicit.is_some() {
                bail!("config file {} does not exist", path.display());
            }
            return Ok(Self::default());
        }
        Self::load_file(&path)
    }

    /// Loads and parses a specific config file.
    pub fn load_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))
    }

    /// Writes this config to a file, creating parent directories.
    pub fn write_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self).context("serializing config")?;
        std::fs::write(path, content).with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }

    /// Looks up a value by dotted key (`sofs.station`).
    pub fn get(&self, key: &str) -> Result<String> {
        let value = toml::Value::try_from(self).context("serializing config")?;
        let mut current = &value;
        for part in key.split('.') {
            current = current
                .get(part)
                .with_context(|| format!("key '{key}' not found in configuration"))?;
        }
        Ok(format_value(current))
    }
}

fn format_value(value: &toml::Value) -> String {
    match value {
        toml::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
[database]
host = "ourdb"
name = "obsdb"
user = "ingest"

[ndbc]
incoming_dir = "/share/in"

[sofs]
station = "SOFS"
catalog_base_url = "https://feed.example/files/"
data_base_url = "https://feed.example/data/"
state_file = "/var/lib/moorfeed/sofs_last_upload.txt"
"#;

    #[test]
    fn test_parse_sample() {
        let config: MoorfeedConfig = toml::from_str(SAMPLE).unwrap();
        assert_eq!(config.database.host, "ourdb");
        assert_eq!(config.database.port, 5432); // defaulted
        assert_eq!(config.sofs.station, "SOFS");
        assert_eq!(config.ndbc.incoming_dir, PathBuf::from("/share/in"));
    }

    #[test]
    fn test_defaults_when_sections_missing() {
        let config: MoorfeedConfig = toml::from_str("").unwrap();
        assert_eq!(config, MoorfeedConfig::default());
    }

    #[test]
    fn test_roundtrip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let config: MoorfeedConfig = toml::from_str(SAMPLE).unwrap();
        config.write_file(&path).unwrap();
        let loaded = MoorfeedConfig::load_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_get_dotted_key() {
        let config: MoorfeedConfig = toml::from_str(SAMPLE).unwrap();
        assert_eq!(config.get("sofs.station").unwrap(), "SOFS");
        assert_eq!(config.get("database.port").unwrap(), "5432");
        assert!(config.get("sofs.nope").is_err());
    }

    #[test]
    fn test_explicit_missing_file_errors() {
        assert!(MoorfeedConfig::load(Some("/nonexistent/moorfeed.toml")).is_err());
    }

    #[test]
    fn test_db_config_assembly() {
        let config: MoorfeedConfig = toml::from_str(SAMPLE).unwrap();
        let db = config.database.db_config();
        assert_eq!(db.host, "ourdb");
        assert_eq!(db.database, "obsdb");
    }
}
