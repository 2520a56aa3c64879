//! Core tracker infrastructure
//!
//! Logging macros and the crate-wide error type.

pub mod error;
pub mod logging;

pub use error::TrackerError;
