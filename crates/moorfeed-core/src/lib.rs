//! Moorfeed Core — shared types, errors, and time-series alignment.
//!
//! This crate provides the foundational types used across all moorfeed
//! crates. It has no internal moorfeed dependencies (dependency level 0).
//!
//! # Modules
//!
//! - [`error`]: Error types and Result alias
//! - [`parameter`]: Measured parameters and station identifiers
//! - [`frame`]: Columnar observation frames and date ranges
//! - [`align`]: Nearest-neighbour alignment of sorted time series

pub mod align;
pub mod error;
pub mod frame;
pub mod parameter;

// Re-export key types at crate root for convenience
pub use error::{Error, Result};
pub use frame::{DateRange, ParameterFrame};
pub use parameter::{Parameter, Station};
