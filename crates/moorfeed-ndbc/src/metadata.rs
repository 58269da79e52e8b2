//! File-name metadata and incoming-directory scanning.
//!
//! NDBC drops encode their metadata in the file name: the segment before
//! the first `_` is `<code><station>`, where `<code>` is the three-letter
//! parameter code. `SSSStation5_202406.txt.gz` is the salinity series for
//! station `Station5`.

use std::path::{Path, PathBuf};

use moorfeed_core::{Error, Parameter, Result, Station};

/// A recognized NDBC file waiting in the incoming directory.
#[derive(Debug, Clone, PartialEq)]
pub struct NdbcDrop {
    /// Full path to the drop.
    pub path: PathBuf,
    /// Parameter encoded in the file name.
    pub parameter: Parameter,
    /// Station encoded in the file name.
    pub station: Station,
}

/// Extracts `(parameter, station)` from an NDBC file name.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use moorfeed_ndbc::metadata_from_filename;
/// use moorfeed_core::Parameter;
///
/// let (parameter, station) =
///     metadata_from_filename(Path::new("/share/in/SSTStation5_202406.txt")).unwrap();
/// assert_eq!(parameter, Parameter::SeaSurfaceTemperature);
/// assert_eq!(station.as_str(), "Station5");
/// ```
pub fn metadata_from_filename(path: &Path) -> Result<(Parameter, Station)> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| Error::validation_field("filename", "path has no file name"))?;
    // Leading `_`-separated segment; tolerate underscore-less names by
    // stripping the extension chain instead.
    let head = name.split('_').next().unwrap_or(name);
    let head = head.split('.').next().unwrap_or(head);
    let code = head.get(..3).ok_or_else(|| {
        Error::validation_field("filename", format!("'{name}' is too short for a parameter code"))
    })?;
    let parameter = Parameter::from_code(code)?;
    let station = &head[3..];
    if station.is_empty() {
        return Err(Error::validation_field(
            "filename",
            format!("'{name}' carries no station name"),
        ));
    }
    Ok((parameter, Station::new(station)))
}

/// Scans an incoming directory for NDBC drops.
///
/// Only `.txt` and `.gz` files whose names parse as NDBC metadata are
/// returned; anything else is skipped with a debug log. Results are sorted
/// by path so runs are deterministic.
pub fn scan_incoming(dir: &Path) -> Result<Vec<NdbcDrop>> {
    let mut drops = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let wanted = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("txt") || e.eq_ignore_ascii_case("gz"));
        if !wanted {
            continue;
        }
        match metadata_from_filename(&path) {
            Ok((parameter, station)) => drops.push(NdbcDrop {
                path,
                parameter,
                station,
            }),
            Err(e) => {
                log::debug!("skipping {}: {e}", path.display());
            }
        }
    }
    drops.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(drops)
}
