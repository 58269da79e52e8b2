//! Moorfeed ingestion pipeline — umbrella crate.
//!
//! Re-exports the component crates; use feature flags to pick the
//! pieces you need.

#![doc = include_str!("../README.md")]

pub use moorfeed_core as core;

#[cfg(feature = "ndbc")]
pub use moorfeed_ndbc as ndbc;

#[cfg(feature = "sofs")]
pub use moorfeed_sofs as sofs;

#[cfg(feature = "db")]
pub use moorfeed_db as db;
