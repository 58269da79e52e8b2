//! # moorfeed-ndbc
//!
//! Parser for the NDBC temperature and salinity files dropped daily on the
//! internal file share.
//!
//! The files are whitespace-separated ASCII, optionally gzipped, with a
//! header line starting with `YYYY` and data lines starting with the first
//! digit of the year. The file name carries the metadata: the first three
//! characters of the leading `_`-separated segment are the parameter code,
//! the rest is the station name (`SSTStation5_202406.txt` → `sst`,
//! `Station5`).
//!
//! # Modules
//!
//! - [`parser`]: file/line parsing into [`NdbcFile`]
//! - [`metadata`]: file-name metadata and incoming-directory scanning

#![warn(clippy::all)]

pub mod metadata;
pub mod parser;

pub use metadata::{NdbcDrop, metadata_from_filename, scan_incoming};
pub use parser::{NdbcFile, NdbcRow, parse_path, parse_reader};
