//! Measured parameters and station identifiers.
//!
//! The external feeds label series with the codes `sst` and `sss`; the
//! engineering tables store them in columns named `sst` and `sal`. The
//! [`Parameter`] enum carries both namings so the mapping lives in exactly
//! one place.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A measured oceanographic parameter handled by the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Parameter {
    /// Sea Surface Temperature (feed code `sst`, database column `sst`).
    SeaSurfaceTemperature,
    /// Sea Surface Salinity (feed code `sss`, database column `sal`).
    SeaSurfaceSalinity,
}

impl Parameter {
    /// The code used by the external feeds (`"sst"` / `"sss"`).
    pub fn code(&self) -> &'static str {
        match self {
            Self::SeaSurfaceTemperature => "sst",
            Self::SeaSurfaceSalinity => "sss",
        }
    }

    /// The engineering-table column this parameter is written to.
    pub fn column(&self) -> &'static str {
        match self {
            Self::SeaSurfaceTemperature => "sst",
            Self::SeaSurfaceSalinity => "sal",
        }
    }

    /// The quality-flag column paired with [`Parameter::column`].
    pub fn flag_column(&self) -> &'static str {
        match self {
            Self::SeaSurfaceTemperature => "sstflag",
            Self::SeaSurfaceSalinity => "salflag",
        }
    }

    /// Parses a feed or database code, case-insensitively.
    ///
    /// Accepts `"sst"`, `"sss"`, and the database spelling `"sal"`.
    ///
    /// # Examples
    ///
    /// ```
    /// use moorfeed_core::Parameter;
    ///
    /// assert_eq!(
    ///     Parameter::from_code("SST").unwrap(),
    ///     Parameter::SeaSurfaceTemperature
    /// );
    /// assert_eq!(
    ///     Parameter::from_code("sal").unwrap(),
    ///     Parameter::SeaSurfaceSalinity
    /// );
    /// assert!(Parameter::from_code("wspd").is_err());
    /// ```
    pub fn from_code(code: &str) -> Result<Self> {
        match code.to_ascii_lowercase().as_str() {
            "sst" => Ok(Self::SeaSurfaceTemperature),
            "sss" | "sal" => Ok(Self::SeaSurfaceSalinity),
            other => Err(Error::validation_field(
                "parameter",
                format!("unknown parameter code '{other}'"),
            )),
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A mooring station name, as it appears in file names and the
/// `datasetinfo` table.
///
/// Station lookups in the database are case-insensitive, so equality here
/// is too; the original spelling is preserved for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Station(String);

impl Station {
    /// Creates a station from any string-like value.
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self(name.into())
    }

    /// The station name as provided.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The lowercase form used in engineering table names.
    pub fn table_component(&self) -> String {
        self.0.to_lowercase()
    }
}

impl PartialEq for Station {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl Eq for Station {}

impl fmt::Display for Station {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Station {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}
