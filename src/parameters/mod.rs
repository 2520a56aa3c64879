//! Tracker Parameters
//!
//! Timing constants for acquisition, radio arbitration and the main loop.
//! They are fixed at build time: nothing adjusts them at runtime. The only
//! build-time input is the publish event name (`TRACKER_EVENT_NAME`, see
//! `build.rs`).
//!
//! # Parameters
//!
//! - `poll_interval_ms` - Minimum spacing of location queries (15 s)
//! - `settle_ms` - Wait after every radio priority switch (1.5 s)
//! - `location_timeout_ms` - Location query timeout (1 s)
//! - `connect_backoff_ms` - Wait after a connectivity probe (1 s)
//! - `event_name` - Publish event name (default `gps`)

pub mod tracker;

pub use tracker::TrackerParams;
