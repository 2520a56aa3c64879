//! Subsystems
//!
//! - `gps`: location acquisition
pub mod gps;
