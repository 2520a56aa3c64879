//! Mock board pin driver for testing

use crate::platform::{
    error::{GpioError, PlatformError},
    traits::{GpioMode, PinDriver},
    Result,
};
use std::vec::Vec;

/// Pins available on the mock header
const PIN_COUNT: usize = 32;

/// Driver call recorded by [`MockPinDriver`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinCall {
    SetMode(u8, GpioMode),
    DigitalRead(u8),
    DigitalWrite(u8, bool),
    AnalogRead(u8),
    AnalogWrite(u8, i32),
}

/// Mock pin driver
///
/// Records every driver call so tests can assert that rejected requests
/// never reach the hardware.
#[derive(Debug, Default)]
pub struct MockPinDriver {
    levels: [bool; PIN_COUNT],
    analog: [u16; PIN_COUNT],
    calls: Vec<PinCall>,
}

impl MockPinDriver {
    /// Create a driver with every pin low and every analog input at 0
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the level returned by `digital_read` for a pin
    pub fn set_level(&mut self, pin: u8, high: bool) {
        if let Some(level) = self.levels.get_mut(pin as usize) {
            *level = high;
        }
    }

    /// Set the sample returned by `analog_read` for a pin
    pub fn set_analog(&mut self, pin: u8, value: u16) {
        if let Some(sample) = self.analog.get_mut(pin as usize) {
            *sample = value;
        }
    }

    /// Current output level of a pin
    pub fn level(&self, pin: u8) -> bool {
        self.levels.get(pin as usize).copied().unwrap_or(false)
    }

    /// All driver calls made so far
    pub fn calls(&self) -> &[PinCall] {
        &self.calls
    }

    fn check(pin: u8) -> Result<()> {
        if (pin as usize) < PIN_COUNT {
            Ok(())
        } else {
            Err(PlatformError::Gpio(GpioError::InvalidPin))
        }
    }
}

impl PinDriver for MockPinDriver {
    fn set_mode(&mut self, pin: u8, mode: GpioMode) -> Result<()> {
        self.calls.push(PinCall::SetMode(pin, mode));
        Self::check(pin)
    }

    fn digital_read(&mut self, pin: u8) -> bool {
        self.calls.push(PinCall::DigitalRead(pin));
        self.level(pin)
    }

    fn digital_write(&mut self, pin: u8, high: bool) -> Result<()> {
        self.calls.push(PinCall::DigitalWrite(pin, high));
        Self::check(pin)?;
        self.set_level(pin, high);
        Ok(())
    }

    fn analog_read(&mut self, pin: u8) -> u16 {
        self.calls.push(PinCall::AnalogRead(pin));
        self.analog.get(pin as usize).copied().unwrap_or(0)
    }

    fn analog_write(&mut self, pin: u8, value: i32) -> Result<()> {
        self.calls.push(PinCall::AnalogWrite(pin, value));
        Self::check(pin)
    }
}
