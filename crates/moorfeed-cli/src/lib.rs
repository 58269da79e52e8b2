//! # moorfeed-cli
//!
//! The `moorfeed` binary: daily ingestion of the NDBC file-share drops and
//! the SOFS web feed into the internal database. Intended to run from
//! cron; each invocation processes whatever is new and exits.
//!
//! - `moorfeed ndbc` — parse and upload file-share drops
//! - `moorfeed sofs` — scrape, download, and upload the web feed
//! - `moorfeed run` — both feeds, NDBC first
//! - `moorfeed config` — config file management

#![warn(clippy::all)]

pub mod cli;
pub mod commands;
pub mod config;
