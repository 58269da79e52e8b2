//! Statement builders for the `datasetinfo` lookups and the engineering
//! tables.
//!
//! Postgres cannot bind table names, so the engineering-table statements
//! interpolate the name into the SQL text. Every name is built by
//! [`engineering_table_name`] and checked by [`validate_table_name`] before
//! it reaches a statement, keeping the interpolation closed over
//! `[a-z0-9_]`.

use chrono::NaiveDate;

use moorfeed_core::{Parameter, Station};

use crate::error::{Error, Result};

/// One row of `datasetinfo`: a deployment of a station's instrument system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deployment {
    /// Instrument system number, zero-padded in table names.
    pub system_number: i32,
    /// Date the deployment started.
    pub start_date: NaiveDate,
}

/// Lookup of deployments by station and deployment number.
pub const DATASETINFO_BY_DEPLOYMENT: &str = "SELECT systemnum, startdate FROM datasetinfo \
     WHERE LOWER(location) = LOWER($1) AND deployment = $2";

/// Lookup of deployments whose instrument window overlaps a date range.
pub const DATASETINFO_BY_WINDOW: &str = "SELECT systemnum, startdate FROM datasetinfo \
     WHERE LOWER(location) = LOWER($1) \
     AND (mintime, maxtime) OVERLAPS ($2::date, $3::date) \
     ORDER BY startdate";

/// Existence probe for an engineering table.
///
/// Some historical deployments never got their table created, so every
/// resolved name is probed before use.
pub const TABLE_EXISTS: &str =
    "SELECT EXISTS (SELECT 1 FROM information_schema.tables WHERE table_name = $1)";

/// Builds an engineering table name: `eng_{system:04}_{station}_{YYYYMMDD}`.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use moorfeed_core::Station;
/// use moorfeed_db::engineering_table_name;
///
/// let name = engineering_table_name(
///     &Station::from("SOFS"),
///     7,
///     NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
/// );
/// assert_eq!(name, "eng_0007_sofs_20240315");
/// ```
pub fn engineering_table_name(
    station: &Station,
    system_number: i32,
    start_date: NaiveDate,
) -> String {
    format!(
        "eng_{system_number:04}_{}_{}",
        station.table_component(),
        start_date.format("%Y%m%d")
    )
}

/// Rejects anything that is not a well-formed engineering table name.
pub fn validate_table_name(name: &str) -> Result<()> {
    if !name.starts_with("eng_") {
        return Err(Error::invalid_table(name, "missing 'eng_' prefix"));
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
    {
        return Err(Error::invalid_table(
            name,
            "only lowercase alphanumerics and underscores allowed",
        ));
    }
    Ok(())
}

/// `SELECT hdrtime` over a window, ordered ascending.
///
/// Binds: `$1` window start, `$2` window end.
pub fn hdrtime_query(table: &str) -> Result<String> {
    validate_table_name(table)?;
    Ok(format!(
        "SELECT hdrtime FROM {table} WHERE hdrtime BETWEEN $1 AND $2 ORDER BY hdrtime"
    ))
}

/// `UPDATE` of one parameter value (and a cleared quality flag) at one
/// `hdrtime`.
///
/// Binds: `$1` value, `$2` hdrtime.
pub fn update_statement(table: &str, parameter: Parameter) -> Result<String> {
    validate_table_name(table)?;
    Ok(format!(
        "UPDATE {table} SET {column} = $1, {flag} = 0 WHERE hdrtime = $2",
        column = parameter.column(),
        flag = parameter.flag_column(),
    ))
}

/// Backfill statement that marks a parameter window as missing
/// (`-99` with flag `11`). Older tables used `0` for missing data; this
/// normalizes them before the first real upload.
///
/// Binds: `$1` window start, `$2` window end.
pub fn reset_statement(table: &str, parameter: Parameter) -> Result<String> {
    validate_table_name(table)?;
    Ok(format!(
        "UPDATE {table} SET {column} = -99, {flag} = 11 WHERE hdrtime BETWEEN $1 AND $2",
        column = parameter.column(),
        flag = parameter.flag_column(),
    ))
}
