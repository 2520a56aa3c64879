//! Tracker timing parameters

use crate::devices::modem::commands::GPS_LOCATION;

/// Minimum spacing between location queries (milliseconds)
pub const POLL_INTERVAL_MS: u64 = 15_000;

/// Settle time after a GNSS/WWAN priority switch (milliseconds)
pub const PRIORITY_SETTLE_MS: u32 = 1_500;

/// Location query timeout (milliseconds)
pub const LOCATION_TIMEOUT_MS: u32 = GPS_LOCATION.timeout_ms;

/// Backoff after probing a disconnected link (milliseconds)
pub const CONNECT_BACKOFF_MS: u32 = 1_000;

/// Publish event name, injected by build.rs
pub const EVENT_NAME: &str = env!("TRACKER_EVENT_NAME");

/// Tracker parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackerParams {
    /// Minimum spacing between location queries
    pub poll_interval_ms: u64,
    /// Settle time after a priority switch
    pub settle_ms: u32,
    /// Location query timeout
    pub location_timeout_ms: u32,
    /// Backoff after probing a disconnected link
    pub connect_backoff_ms: u32,
    /// Publish event name
    pub event_name: &'static str,
}

impl Default for TrackerParams {
    fn default() -> Self {
        Self {
            poll_interval_ms: POLL_INTERVAL_MS,
            settle_ms: PRIORITY_SETTLE_MS,
            location_timeout_ms: LOCATION_TIMEOUT_MS,
            connect_backoff_ms: CONNECT_BACKOFF_MS,
            event_name: EVENT_NAME,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = TrackerParams::default();
        assert_eq!(params.poll_interval_ms, 15_000);
        assert_eq!(params.settle_ms, 1_500);
        assert_eq!(params.location_timeout_ms, 1_000);
        assert_eq!(params.connect_backoff_ms, 1_000);
        assert!(!params.event_name.is_empty());
    }
}
