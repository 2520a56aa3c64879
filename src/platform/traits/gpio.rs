//! Single-pin GPIO
//!
//! Owned pin handle, used for the radio priority indicator. Header-wide
//! access for remote pin commands goes through [`PinDriver`](super::PinDriver).

use crate::platform::Result;

/// Pin mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GpioMode {
    /// Floating input
    Input,
    InputPullUp,
    InputPullDown,
    /// Push-pull output
    OutputPushPull,
}

/// Owned GPIO pin
///
/// One owner per physical pin.
pub trait GpioInterface {
    /// Drive the pin high
    ///
    /// # Errors
    ///
    /// `PlatformError::Gpio(GpioError::InvalidMode)` if the pin is not an output.
    fn set_high(&mut self) -> Result<()>;

    /// Drive the pin low
    ///
    /// # Errors
    ///
    /// `PlatformError::Gpio(GpioError::InvalidMode)` if the pin is not an output.
    fn set_low(&mut self) -> Result<()>;

    /// Current level (`true` = high)
    fn read(&self) -> bool;

    fn set_mode(&mut self, mode: GpioMode) -> Result<()>;

    fn mode(&self) -> GpioMode;
}
