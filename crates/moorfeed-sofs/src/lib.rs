//! # moorfeed-sofs
//!
//! Ingestion of the SOFS near-real-time feed: the partner publishes daily
//! NetCDF files behind a THREDDS-style HTML catalog, one directory per
//! year. This crate scrapes the catalog for file names and upload dates,
//! downloads the files that appeared since the last delivered upload date,
//! and extracts sea surface temperature and salinity into a
//! [`ParameterFrame`](moorfeed_core::ParameterFrame).
//!
//! # Modules
//!
//! - [`error`]: Error types and Result alias
//! - [`catalog`]: catalog HTML extraction
//! - [`netcdf`]: NetCDF classic decoding into frames
//! - [`feed`]: the HTTP client tying scrape + download together
//! - [`state`]: the last-upload-date state file

#![warn(clippy::all)]

pub mod catalog;
pub mod error;
pub mod feed;
pub mod netcdf;
pub mod state;

pub use catalog::{CatalogEntry, parse_catalog};
pub use error::{Error, Result};
pub use feed::{SofsClient, SofsConfig};
pub use state::LastUploadFile;
