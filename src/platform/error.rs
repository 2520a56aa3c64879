//! Platform error types
//!
//! Board backends map their HAL errors onto these before anything above the
//! platform layer sees them.

use core::fmt;

/// Result type for platform operations
pub type Result<T> = core::result::Result<T, PlatformError>;

/// Platform-level errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PlatformError {
    /// Modem UART failure
    Uart(UartError),
    /// Pin access failure
    Gpio(GpioError),
}

/// Modem UART errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UartError {
    /// Bytes could not be queued for transmission
    WriteFailed,
    /// Receive path reported a framing or parity fault
    ReadFailed,
    /// Receive FIFO overflowed before it was drained
    Overrun,
}

/// Pin errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GpioError {
    /// No such pin on this board
    InvalidPin,
    /// Pin is not configured for the requested operation
    InvalidMode,
}

impl fmt::Display for UartError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UartError::WriteFailed => write!(f, "write failed"),
            UartError::ReadFailed => write!(f, "read failed"),
            UartError::Overrun => write!(f, "receive overrun"),
        }
    }
}

impl fmt::Display for GpioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GpioError::InvalidPin => write!(f, "invalid pin"),
            GpioError::InvalidMode => write!(f, "wrong pin mode"),
        }
    }
}

impl fmt::Display for PlatformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlatformError::Uart(e) => write!(f, "Modem UART: {}", e),
            PlatformError::Gpio(e) => write!(f, "GPIO: {}", e),
        }
    }
}
