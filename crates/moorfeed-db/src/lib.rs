//! # moorfeed-db
//!
//! The database sink of the pipeline. Observations land in per-deployment
//! "engineering" tables; which tables a frame belongs to is resolved from
//! the `datasetinfo` table by station and time window, and values are
//! written to the row whose `hdrtime` lies closest to the observation
//! timestamp.
//!
//! # Modules
//!
//! - [`error`]: Error types and Result alias
//! - [`sql`]: statement builders and table-name construction
//! - [`uploader`]: the Postgres uploader

#![warn(clippy::all)]

pub mod error;
pub mod sql;
pub mod uploader;

pub use error::{Error, Result};
pub use sql::{Deployment, engineering_table_name};
pub use uploader::{DbConfig, UploadReport, Uploader};
