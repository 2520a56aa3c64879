//! Tracker error types
//!
//! Every failure the tracker can observe. None of them is fatal: the loop
//! logs the error and carries on with the next tick.

use core::fmt;

use crate::devices::pins::PinError;
use crate::platform::PlatformError;

/// Errors observed by the tracker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TrackerError {
    /// Modem did not answer (or answer fully) within the command timeout
    CommandTimeout,
    /// Modem reported an error; 0 when no numeric code was given
    ModemError(u16),
    /// Response buffer did not yet contain a complete match
    ParseIncomplete,
    /// Publish was negatively acknowledged
    PublishNack,
    /// Publish transport gave up before an acknowledgment arrived
    PublishTransportTimeout,
    /// Malformed or unsupported pin request
    InvalidPinRequest(PinError),
    /// Underlying platform failure (UART, GPIO, timer)
    Platform(PlatformError),
}

impl fmt::Display for TrackerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackerError::CommandTimeout => write!(f, "Modem command timed out"),
            TrackerError::ModemError(code) => write!(f, "Modem error (code {})", code),
            TrackerError::ParseIncomplete => write!(f, "Response incomplete"),
            TrackerError::PublishNack => write!(f, "Publish not acknowledged"),
            TrackerError::PublishTransportTimeout => write!(f, "Publish transport timed out"),
            TrackerError::InvalidPinRequest(e) => write!(f, "Invalid pin request: {}", e),
            TrackerError::Platform(e) => write!(f, "{}", e),
        }
    }
}

impl From<PlatformError> for TrackerError {
    fn from(e: PlatformError) -> Self {
        TrackerError::Platform(e)
    }
}

impl From<PinError> for TrackerError {
    fn from(e: PinError) -> Self {
        TrackerError::InvalidPinRequest(e)
    }
}
