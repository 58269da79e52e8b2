//! Decoding of SOFS near-real-time NetCDF files.
//!
//! The NRT files are NetCDF classic with a `TIME` axis (days since
//! 1950-01-01T00:00:00Z) and paired primary/secondary sensor variables:
//! `TEMP`/`TEMP_2` for sea surface temperature and `PSAL`/`PSAL_2` for
//! salinity. Gaps in the primary sensor are supplemented from the
//! secondary one before the series reaches the frame.

use std::io::Write;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use netcdf3::{DataVector, FileReader};

use moorfeed_core::{Parameter, ParameterFrame};

use crate::error::{Error, Result};

/// The feed's time base: days since 1950-01-01T00:00:00Z.
fn time_epoch() -> Option<NaiveDateTime> {
    NaiveDate::from_ymd_opt(1950, 1, 1)?.and_hms_opt(0, 0, 0)
}

/// Values at or above this magnitude are fill values, not readings.
///
/// Physical SST/SSS values sit well below 100; the feed's fill values are
/// `99999.0` or the NetCDF default (~9.97e36).
const FILL_THRESHOLD: f64 = 9.0e4;

/// Variable names extracted from the NRT files.
const TIME_VAR: &str = "TIME";
const TEMP_VARS: (&str, &str) = ("TEMP", "TEMP_2");
const PSAL_VARS: (&str, &str) = ("PSAL", "PSAL_2");

/// Decodes one downloaded NetCDF payload into a frame.
///
/// The payload is staged in a temporary file because the classic-format
/// reader is file based.
pub fn decode_bytes(bytes: &[u8], source_name: &str) -> Result<ParameterFrame> {
    let mut staged = tempfile::NamedTempFile::new()?;
    staged.write_all(bytes)?;
    staged.flush()?;
    decode_file(staged.path(), source_name)
}

/// Decodes a NetCDF classic file into a frame.
pub fn decode_file(path: &Path, source_name: &str) -> Result<ParameterFrame> {
    let mut reader =
        FileReader::open(path).map_err(|e| Error::netcdf(source_name, format!("{e:?}")))?;

    let time = read_variable(&mut reader, source_name, TIME_VAR)?
        .ok_or_else(|| Error::netcdf(source_name, "missing TIME variable"))?;
    let temp = read_variable(&mut reader, source_name, TEMP_VARS.0)?;
    let temp_2 = read_variable(&mut reader, source_name, TEMP_VARS.1)?;
    let psal = read_variable(&mut reader, source_name, PSAL_VARS.0)?;
    let psal_2 = read_variable(&mut reader, source_name, PSAL_VARS.1)?;

    frame_from_variables(source_name, &time, temp, temp_2, psal, psal_2)
}

/// Reads a variable as `f64`, widening whatever numeric type the file uses.
/// Returns `Ok(None)` when the variable is absent.
fn read_variable(
    reader: &mut FileReader,
    source_name: &str,
    name: &str,
) -> Result<Option<Vec<f64>>> {
    if reader.data_set().get_var(name).is_none() {
        return Ok(None);
    }
    let data = reader
        .read_var(name)
        .map_err(|e| Error::netcdf(source_name, format!("reading {name}: {e:?}")))?;
    Ok(Some(widen(data)))
}

/// Widens any NetCDF classic data vector to `f64`.
fn widen(data: DataVector) -> Vec<f64> {
    match data {
        DataVector::I8(v) => v.into_iter().map(f64::from).collect(),
        DataVector::U8(v) => v.into_iter().map(f64::from).collect(),
        DataVector::I16(v) => v.into_iter().map(f64::from).collect(),
        DataVector::I32(v) => v.into_iter().map(f64::from).collect(),
        DataVector::F32(v) => v.into_iter().map(f64::from).collect(),
        DataVector::F64(v) => v,
    }
}

/// `true` when a reading is real data rather than a fill value.
fn is_present(value: f64) -> bool {
    value.is_finite() && value.abs() < FILL_THRESHOLD
}

/// Fills gaps in the primary sensor series from the secondary one.
/// Either series may be absent; lengths are clamped to the time axis.
fn supplement(
    primary: Option<Vec<f64>>,
    secondary: Option<Vec<f64>>,
    len: usize,
) -> Vec<f64> {
    let mut out = vec![f64::NAN; len];
    let primary = primary.unwrap_or_default();
    let secondary = secondary.unwrap_or_default();
    for (i, slot) in out.iter_mut().enumerate() {
        let first = primary.get(i).copied().filter(|v| is_present(*v));
        let second = secondary.get(i).copied().filter(|v| is_present(*v));
        if let Some(v) = first.or(second) {
            *slot = v;
        }
    }
    out
}

/// Converts a days-since-1950 value to a timestamp (second precision).
fn time_from_days(days: f64) -> Option<NaiveDateTime> {
    if !days.is_finite() {
        return None;
    }
    let seconds = (days * 86_400.0).round();
    if seconds.abs() > i64::MAX as f64 {
        return None;
    }
    Some(time_epoch()? + TimeDelta::seconds(seconds as i64))
}

/// Assembles the extracted variables into an SST/SSS frame.
fn frame_from_variables(
    source_name: &str,
    time: &[f64],
    temp: Option<Vec<f64>>,
    temp_2: Option<Vec<f64>>,
    psal: Option<Vec<f64>>,
    psal_2: Option<Vec<f64>>,
) -> Result<ParameterFrame> {
    let sst = supplement(temp, temp_2, time.len());
    let sss = supplement(psal, psal_2, time.len());

    let mut rows = Vec::with_capacity(time.len());
    for (i, days) in time.iter().enumerate() {
        let Some(datetime) = time_from_days(*days) else {
            return Err(Error::netcdf(
                source_name,
                format!("unrepresentable TIME value {days} at index {i}"),
            ));
        };
        rows.push((datetime, vec![sst[i], sss[i]]));
    }

    ParameterFrame::from_rows(
        &[
            Parameter::SeaSurfaceTemperature,
            Parameter::SeaSurfaceSalinity,
        ],
        rows,
    )
    .map_err(Error::from)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const SST: Parameter = Parameter::SeaSurfaceTemperature;
    const SSS: Parameter = Parameter::SeaSurfaceSalinity;

    // -------------------------------------------------------------------------
    // time_from_days tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_time_epoch_origin() {
        let epoch = time_from_days(0.0).unwrap();
        assert_eq!(epoch.to_string(), "1950-01-01 00:00:00");
    }

    #[test]
    fn test_time_fractional_days() {
        let t = time_from_days(0.5).unwrap();
        assert_eq!(t.to_string(), "1950-01-01 12:00:00");
    }

    #[test]
    fn test_time_modern_date() {
        // 2024-06-01 is 27180 days after 1950-01-01.
        let t = time_from_days(27180.0).unwrap();
        assert_eq!(t.date().to_string(), "2024-06-01");
    }

    #[test]
    fn test_time_rejects_nan() {
        assert!(time_from_days(f64::NAN).is_none());
    }

    // -------------------------------------------------------------------------
    // supplement tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_supplement_prefers_primary() {
        let out = supplement(Some(vec![14.0, 15.0]), Some(vec![90.0, 91.0]), 2);
        assert_eq!(out, vec![14.0, 15.0]);
    }

    #[test]
    fn test_supplement_fills_gaps_from_secondary() {
        let out = supplement(Some(vec![14.0, 99999.0]), Some(vec![90.0, 15.5]), 2);
        assert_eq!(out, vec![14.0, 15.5]);
    }

    #[test]
    fn test_supplement_nan_counts_as_gap() {
        let out = supplement(Some(vec![f64::NAN]), Some(vec![15.5]), 1);
        assert_eq!(out, vec![15.5]);
    }

    #[test]
    fn test_supplement_both_missing_is_nan() {
        let out = supplement(Some(vec![99999.0]), None, 1);
        assert!(out[0].is_nan());
    }

    #[test]
    fn test_supplement_absent_series() {
        let out = supplement(None, None, 3);
        assert_eq!(out.len(), 3);
        assert!(out.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn test_supplement_short_series_padded() {
        let out = supplement(Some(vec![14.0]), None, 3);
        assert_eq!(out[0], 14.0);
        assert!(out[1].is_nan() && out[2].is_nan());
    }

    // -------------------------------------------------------------------------
    // frame_from_variables tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_frame_from_variables_basic() {
        let frame = frame_from_variables(
            "t.nc",
            &[27180.0, 27180.25],
            Some(vec![14.0, 14.5]),
            None,
            Some(vec![35.0, 99999.0]),
            Some(vec![35.2, 35.3]),
        )
        .unwrap();
        assert_eq!(frame.len(), 2);
        assert_eq!(frame.column(SST).unwrap(), &[14.0, 14.5]);
        // second PSAL reading supplemented from the backup sensor
        assert_eq!(frame.column(SSS).unwrap(), &[35.0, 35.3]);
    }

    #[test]
    fn test_frame_from_variables_sorts_time() {
        let frame = frame_from_variables(
            "t.nc",
            &[27181.0, 27180.0],
            Some(vec![15.0, 14.0]),
            None,
            None,
            None,
        )
        .unwrap();
        assert_eq!(frame.column(SST).unwrap(), &[14.0, 15.0]);
    }

    #[test]
    fn test_frame_from_variables_bad_time_errors() {
        let result = frame_from_variables("t.nc", &[f64::NAN], None, None, None, None);
        assert!(result.is_err());
    }

    #[test]
    fn test_frame_from_variables_empty() {
        let frame = frame_from_variables("t.nc", &[], None, None, None, None).unwrap();
        assert!(frame.is_empty());
    }

    // -------------------------------------------------------------------------
    // fill detection
    // -------------------------------------------------------------------------

    #[test]
    fn test_is_present_thresholds() {
        assert!(is_present(14.2));
        assert!(is_present(-1.8)); // polar water, valid
        assert!(!is_present(99999.0));
        assert!(!is_present(9.969_209_968_386_869e36));
        assert!(!is_present(f64::NAN));
        assert!(!is_present(f64::INFINITY));
    }
}
