//! Mock GPIO pin for testing

use crate::platform::{
    error::{GpioError, PlatformError},
    traits::{GpioInterface, GpioMode},
    Result,
};
use std::vec::Vec;

/// Mock GPIO pin
///
/// Keeps every level it was driven to, so tests can check both the final
/// indicator state and how often it was touched.
#[derive(Debug)]
pub struct MockGpio {
    mode: GpioMode,
    level: bool,
    history: Vec<bool>,
}

impl MockGpio {
    /// Output pin, initially low
    pub fn new_output() -> Self {
        Self::with_mode(GpioMode::OutputPushPull)
    }

    /// Floating input pin
    pub fn new_input() -> Self {
        Self::with_mode(GpioMode::Input)
    }

    fn with_mode(mode: GpioMode) -> Self {
        Self {
            mode,
            level: false,
            history: Vec::new(),
        }
    }

    /// Number of successful writes
    pub fn write_count(&self) -> usize {
        self.history.len()
    }

    /// Levels written so far, oldest first
    pub fn history(&self) -> &[bool] {
        &self.history
    }

    fn drive(&mut self, level: bool) -> Result<()> {
        if self.mode != GpioMode::OutputPushPull {
            return Err(PlatformError::Gpio(GpioError::InvalidMode));
        }
        self.level = level;
        self.history.push(level);
        Ok(())
    }
}

impl GpioInterface for MockGpio {
    fn set_high(&mut self) -> Result<()> {
        self.drive(true)
    }

    fn set_low(&mut self) -> Result<()> {
        self.drive(false)
    }

    fn read(&self) -> bool {
        self.level
    }

    fn set_mode(&mut self, mode: GpioMode) -> Result<()> {
        self.mode = mode;
        Ok(())
    }

    fn mode(&self) -> GpioMode {
        self.mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_records_levels() {
        let mut gpio = MockGpio::new_output();
        assert!(!gpio.read());

        gpio.set_high().unwrap();
        gpio.set_low().unwrap();
        gpio.set_high().unwrap();

        assert!(gpio.read());
        assert_eq!(gpio.history(), &[true, false, true]);
        assert_eq!(gpio.write_count(), 3);
    }

    #[test]
    fn test_input_rejects_writes() {
        let mut gpio = MockGpio::new_input();
        assert_eq!(
            gpio.set_high(),
            Err(PlatformError::Gpio(GpioError::InvalidMode))
        );
        assert_eq!(gpio.write_count(), 0);

        gpio.set_mode(GpioMode::OutputPushPull).unwrap();
        assert!(gpio.set_low().is_ok());
    }
}
