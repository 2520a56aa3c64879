//! Acquisition session data

use crate::devices::modem::Payload;

/// A captured location report
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Fix {
    /// Comma-separated fix fields exactly as the modem reported them
    pub raw_location: Payload,
    /// Monotonic capture time (milliseconds)
    pub captured_at: u64,
}

/// Acquisition session bookkeeping
///
/// Survives Idle/Polling transitions; only the poller mutates it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SessionState {
    /// Successful location queries since GNSS was last prioritized
    pub lock_count: u32,
    /// Time of the last location query (milliseconds)
    pub last_check_at: u64,
    /// Capture time of the pending fix, `None` when nothing is pending
    pub last_update_at: Option<u64>,
}

/// Triggers accepted by the acquisition state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    EnableGps,
    DisableGps,
}
