//! Mock platform implementation for testing
//!
//! This module provides mock implementations of platform traits that can be used
//! for unit testing without requiring actual hardware.
//!
//! # Feature Gate
//!
//! This module is available in two contexts:
//! - During test builds (`#[cfg(test)]`)
//! - When the `mock` feature is enabled
//!
//! # Example
//!
//! ```ignore
//! use cell_tracker::platform::mock::{MockTimer, MockUart};
//! use cell_tracker::platform::traits::UartInterface;
//!
//! let mut uart = MockUart::new(Default::default());
//! uart.reply_to("AT", "\r\nOK\r\n");
//! uart.write(b"AT\r\n").unwrap();
//! assert!(uart.available());
//! ```

#![cfg(any(test, feature = "mock"))]

mod gpio;
mod pins;
mod timer;
mod uart;

pub use gpio::MockGpio;
pub use pins::{MockPinDriver, PinCall};
pub use timer::MockTimer;
pub use uart::MockUart;
