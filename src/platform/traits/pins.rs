//! Board pin driver trait
//!
//! Addressable digital/analog I/O used by the remote pin command handlers.
//! Unlike [`GpioInterface`](super::GpioInterface), which owns one pin, a
//! `PinDriver` addresses the whole header by driver pin number.

use super::gpio::GpioMode;
use crate::platform::Result;

/// Board-level digital/analog pin driver
pub trait PinDriver {
    /// Configure the mode of a driver pin
    fn set_mode(&mut self, pin: u8, mode: GpioMode) -> Result<()>;

    /// Read the logic level of a driver pin
    fn digital_read(&mut self, pin: u8) -> bool;

    /// Drive a driver pin high or low
    fn digital_write(&mut self, pin: u8, high: bool) -> Result<()>;

    /// Sample an analog pin (12-bit, 0-4095)
    fn analog_read(&mut self, pin: u8) -> u16;

    /// Write a PWM duty value to a pin
    fn analog_write(&mut self, pin: u8, value: i32) -> Result<()>;
}
