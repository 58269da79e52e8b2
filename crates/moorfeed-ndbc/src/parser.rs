//! Line-oriented parsing of NDBC flat files.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use chrono::NaiveDateTime;
use flate2::read::GzDecoder;

use moorfeed_core::{Error, Parameter, ParameterFrame, Result};

/// One data line: a timestamp plus the remaining columns as floats
/// (`NaN` where a cell is not numeric).
#[derive(Debug, Clone, PartialEq)]
pub struct NdbcRow {
    /// Observation timestamp assembled from the first two fields.
    pub datetime: NaiveDateTime,
    /// Values of the remaining columns, in header order.
    pub values: Vec<f64>,
}

/// A parsed NDBC file: column names plus data rows.
///
/// `columns[0]` is always `"datetime"`; the remaining names come from the
/// header line, lowercased. Rows keep file order.
#[derive(Debug, Clone, PartialEq)]
pub struct NdbcFile {
    /// Column names: `datetime` followed by the lowercased header fields.
    pub columns: Vec<String>,
    /// Data rows in file order.
    pub rows: Vec<NdbcRow>,
}

impl NdbcFile {
    /// Index of a named column, case-insensitive.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c.eq_ignore_ascii_case(name))
    }

    /// Builds a single-parameter [`ParameterFrame`] from this file.
    ///
    /// The value column is looked up by the parameter's feed code first
    /// (`sst`/`sss`), then by its database spelling (`sal`). Duplicate
    /// timestamps keep the first row, as the feed occasionally re-sends
    /// lines.
    pub fn to_frame(&self, parameter: Parameter) -> Result<ParameterFrame> {
        let column = self
            .column_index(parameter.code())
            .or_else(|| self.column_index(parameter.column()))
            .ok_or_else(|| {
                Error::validation_field(
                    "column",
                    format!("file has no '{}' column", parameter.code()),
                )
            })?;
        // columns[0] is the synthesized datetime; values are offset by one.
        let value_index = column - 1;
        let rows = self
            .rows
            .iter()
            .map(|row| {
                let value = row.values.get(value_index).copied().unwrap_or(f64::NAN);
                (row.datetime, vec![value])
            })
            .collect();
        ParameterFrame::from_rows(&[parameter], rows)
    }
}

/// Parses an NDBC file from disk, transparently ungzipping `.gz` drops.
pub fn parse_path<P: AsRef<Path>>(path: P) -> Result<NdbcFile> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let is_gzip = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("gz"));
    log::debug!("parsing NDBC file {} (gzip: {is_gzip})", path.display());
    if is_gzip {
        parse_reader(BufReader::new(GzDecoder::new(file)))
    } else {
        parse_reader(BufReader::new(file))
    }
}

/// Parses NDBC content from any buffered reader.
///
/// Header detection: the first trimmed line starting with `YYYY`; its first
/// two fields are the date and time columns, collapsed into the synthetic
/// `datetime` column. Data detection: trimmed lines starting with `1` or
/// `2` (the leading year digit).
pub fn parse_reader<R: BufRead>(reader: R) -> Result<NdbcFile> {
    let mut columns: Vec<String> = Vec::new();
    let mut rows: Vec<NdbcRow> = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim_start();
        let line_number = index + 1;

        if line.starts_with('1') || line.starts_with('2') {
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() < 2 {
                return Err(Error::parse_at("data line has no time field", line_number));
            }
            let datetime = parse_timestamp(fields[0], fields[1]).map_err(|e| match e {
                Error::Parse { message, .. } => Error::parse_at(message, line_number),
                other => other,
            })?;
            let values = fields[2..]
                .iter()
                .map(|f| f.parse::<f64>().unwrap_or(f64::NAN))
                .collect();
            rows.push(NdbcRow { datetime, values });
        } else if columns.is_empty() && line.starts_with("YYYY") {
            columns = std::iter::once("datetime".to_string())
                .chain(
                    line.split_whitespace()
                        .skip(2)
                        .map(|f| f.to_lowercase()),
                )
                .collect();
        }
    }

    // The header must account for every cell of the first data row
    // (datetime collapses the two leading raw fields into one column).
    if !columns.is_empty()
        && let Some(first) = rows.first()
        && columns.len() != first.values.len() + 1
    {
        return Err(Error::parse(format!(
            "header has {} columns but data rows have {}",
            columns.len(),
            first.values.len() + 1
        )));
    }

    Ok(NdbcFile { columns, rows })
}

/// Parses the two leading timestamp fields, `YYYYMMDD` and `HHMMSS` (or the
/// older minute-precision `HHMM`).
pub fn parse_timestamp(date: &str, time: &str) -> Result<NaiveDateTime> {
    if date.len() != 8 {
        return Err(Error::parse(format!(
            "date field '{date}' is not YYYYMMDD"
        )));
    }
    let format = match time.len() {
        6 => "%Y%m%d %H%M%S",
        4 => "%Y%m%d %H%M",
        _ => {
            return Err(Error::parse(format!(
                "time field '{time}' is not HHMMSS or HHMM"
            )));
        }
    };
    NaiveDateTime::parse_from_str(&format!("{date} {time}"), format)
        .map_err(|e| Error::parse(format!("bad timestamp '{date} {time}': {e}")))
}
