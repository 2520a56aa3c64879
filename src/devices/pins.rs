//! Remote pin command handlers
//!
//! Four cloud-callable functions that read and drive header pins from a short
//! textual command: `<kind><index>[,<value>]`, e.g. `D7`, `D7,HIGH`, `A2,128`.
//!
//! - `kind` is `D` (digital header) or `A` (analog header)
//! - `index` is a single digit `0..=7`; analog pins sit at driver pin `index + 10`
//! - Handlers return `>= 0` on success and a negative code on failure
//!
//! Requests are fully validated before the driver is touched, so a rejected
//! request has no effect on hardware state.

use core::fmt;

use crate::platform::traits::{GpioMode, PinDriver};

/// Highest valid pin index on either header
pub const MAX_PIN_INDEX: u8 = 7;

/// Driver pin offset of the analog header
pub const ANALOG_PIN_OFFSET: u8 = 10;

/// Header a pin command addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinKind {
    Digital,
    Analog,
}

/// Reasons a pin command is rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinError {
    /// Index missing, not a digit, or outside `0..=7`
    InvalidPin,
    /// Kind is neither `D` nor `A`
    UnknownKind,
    /// Value is not `HIGH`/`LOW` (digital) or not an integer (analog)
    InvalidValue,
    /// Operation not available on this header (analog read of a `D` pin)
    Unsupported,
}

impl fmt::Display for PinError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PinError::InvalidPin => write!(f, "pin index out of range"),
            PinError::UnknownKind => write!(f, "unknown pin kind"),
            PinError::InvalidValue => write!(f, "malformed value"),
            PinError::Unsupported => write!(f, "operation not supported on pin kind"),
        }
    }
}

/// Pin operations exposed to the cloud
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinOp {
    DigitalRead,
    DigitalWrite,
    AnalogRead,
    AnalogWrite,
}

impl PinOp {
    /// Resolve a cloud function name
    pub fn from_function_name(name: &str) -> Option<Self> {
        match name {
            "digitalread" => Some(PinOp::DigitalRead),
            "digitalwrite" => Some(PinOp::DigitalWrite),
            "analogread" => Some(PinOp::AnalogRead),
            "analogwrite" => Some(PinOp::AnalogWrite),
            _ => None,
        }
    }

    /// Negative return code reported for `error` by this operation
    pub fn error_code(&self, error: PinError) -> i32 {
        match (self, error) {
            (_, PinError::InvalidPin) => -1,
            (PinOp::DigitalWrite, PinError::InvalidValue) => -2,
            (PinOp::DigitalWrite, PinError::UnknownKind) => -3,
            (_, PinError::Unsupported) => -3,
            (_, PinError::UnknownKind) | (_, PinError::InvalidValue) => -2,
        }
    }
}

/// Parsed `<kind><index>` pin address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinAddress {
    pub kind: PinKind,
    pub index: u8,
}

impl PinAddress {
    /// Driver pin number for this address
    pub fn driver_pin(&self) -> u8 {
        match self.kind {
            PinKind::Digital => self.index,
            PinKind::Analog => self.index + ANALOG_PIN_OFFSET,
        }
    }
}

fn parse_index(param: &str) -> Result<u8, PinError> {
    match param.as_bytes().get(1) {
        Some(c @ b'0'..=b'9') if c - b'0' <= MAX_PIN_INDEX => Ok(c - b'0'),
        _ => Err(PinError::InvalidPin),
    }
}

fn parse_kind(param: &str) -> Result<PinKind, PinError> {
    match param.as_bytes().first() {
        Some(b'D') => Ok(PinKind::Digital),
        Some(b'A') => Ok(PinKind::Analog),
        _ => Err(PinError::UnknownKind),
    }
}

/// Parse the pin part of a command
///
/// The index is checked before the kind, so `X9` reports `InvalidPin`.
fn parse_address(param: &str) -> Result<PinAddress, PinError> {
    let index = parse_index(param)?;
    let kind = parse_kind(param)?;
    Ok(PinAddress { kind, index })
}

/// Parse a read command; nothing may follow the pin
fn parse_read(param: &str) -> Result<PinAddress, PinError> {
    let address = parse_address(param)?;
    if param.len() != 2 {
        return Err(PinError::InvalidPin);
    }
    Ok(address)
}

/// Value part of a write command (everything after `<kind><index><sep>`)
fn write_value(param: &str) -> Option<&str> {
    param.get(3..).filter(|v| !v.is_empty())
}

fn parse_level(value: Option<&str>) -> Result<bool, PinError> {
    match value {
        Some("HIGH") => Ok(true),
        Some("LOW") => Ok(false),
        _ => Err(PinError::InvalidValue),
    }
}

fn parse_duty(value: Option<&str>) -> Result<i32, PinError> {
    value
        .and_then(|v| v.trim().parse::<i32>().ok())
        .ok_or(PinError::InvalidValue)
}

/// Pin command handlers bound to a board pin driver
pub struct PinCommands<D: PinDriver> {
    driver: D,
}

impl<D: PinDriver> PinCommands<D> {
    /// Create handlers over the given driver
    pub fn new(driver: D) -> Self {
        Self { driver }
    }

    /// Access the underlying driver
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Route a cloud function call by name
    ///
    /// Returns `None` if `function` is not one of the four pin functions.
    pub fn dispatch(&mut self, function: &str, param: &str) -> Option<i32> {
        let op = PinOp::from_function_name(function)?;
        Some(match op {
            PinOp::DigitalRead => self.digital_read(param),
            PinOp::DigitalWrite => self.digital_write(param),
            PinOp::AnalogRead => self.analog_read(param),
            PinOp::AnalogWrite => self.analog_write(param),
        })
    }

    /// Read the digital level of a pin: `D3`, `A1`
    ///
    /// Returns 0 or 1.
    pub fn digital_read(&mut self, param: &str) -> i32 {
        crate::log_info!("digitalRead: {}", param);
        self.run(PinOp::DigitalRead, || parse_read(param), |driver, address| {
            let pin = address.driver_pin();
            driver.set_mode(pin, GpioMode::InputPullDown)?;
            Ok(driver.digital_read(pin) as i32)
        })
    }

    /// Drive a pin high or low: `D3,HIGH`, `A1,LOW`
    ///
    /// Returns 1.
    pub fn digital_write(&mut self, param: &str) -> i32 {
        crate::log_info!("digitalWrite: {}", param);
        // Index, then level, then kind
        let request = || -> Result<_, PinError> {
            let index = parse_index(param)?;
            let level = parse_level(write_value(param))?;
            let kind = parse_kind(param)?;
            Ok((PinAddress { kind, index }, level))
        };
        self.run(PinOp::DigitalWrite, request, |driver, (address, level)| {
            let pin = address.driver_pin();
            driver.set_mode(pin, GpioMode::OutputPushPull)?;
            driver.digital_write(pin, level)?;
            Ok(1)
        })
    }

    /// Sample an analog pin: `A2`
    ///
    /// Returns the 12-bit sample (0-4095).
    pub fn analog_read(&mut self, param: &str) -> i32 {
        crate::log_info!("analogRead: {}", param);
        let request = || -> Result<_, PinError> {
            let address = parse_read(param)?;
            if address.kind == PinKind::Digital {
                return Err(PinError::Unsupported);
            }
            Ok(address)
        };
        self.run(PinOp::AnalogRead, request, |driver, address| {
            Ok(driver.analog_read(address.driver_pin()) as i32)
        })
    }

    /// Write a PWM value to a pin: `D3,128`, `A2,255`
    ///
    /// Returns 1.
    pub fn analog_write(&mut self, param: &str) -> i32 {
        crate::log_info!("analogWrite: {}", param);
        let request = || -> Result<_, PinError> {
            let address = parse_address(param)?;
            let duty = parse_duty(write_value(param))?;
            Ok((address, duty))
        };
        self.run(PinOp::AnalogWrite, request, |driver, (address, duty)| {
            let pin = address.driver_pin();
            driver.set_mode(pin, GpioMode::OutputPushPull)?;
            driver.analog_write(pin, duty)?;
            Ok(1)
        })
    }

    fn run<T, P, A>(&mut self, op: PinOp, parse: P, apply: A) -> i32
    where
        P: FnOnce() -> Result<T, PinError>,
        A: FnOnce(&mut D, T) -> crate::platform::Result<i32>,
    {
        let request = match parse() {
            Ok(request) => request,
            Err(e) => {
                crate::log_warn!("{:?} rejected: {}", op, e);
                return op.error_code(e);
            }
        };

        match apply(&mut self.driver, request) {
            Ok(value) => value,
            Err(_e) => {
                crate::log_error!("{:?} driver failure: {}", op, _e);
                op.error_code(PinError::InvalidPin)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::mock::{MockPinDriver, PinCall};

    fn commands() -> PinCommands<MockPinDriver> {
        PinCommands::new(MockPinDriver::new())
    }

    #[test]
    fn test_digital_read_maps_analog_offset() {
        let mut pins = commands();
        let mut driver = MockPinDriver::new();
        driver.set_level(13, true);
        pins.driver = driver;

        assert_eq!(pins.digital_read("A3"), 1);
        assert_eq!(pins.digital_read("D3"), 0);
        assert_eq!(
            pins.driver().calls()[..2],
            [
                PinCall::SetMode(13, GpioMode::InputPullDown),
                PinCall::DigitalRead(13)
            ]
        );
    }

    #[test]
    fn test_out_of_range_index_has_no_side_effect() {
        let mut pins = commands();
        assert_eq!(pins.digital_read("D8"), -1);
        assert_eq!(pins.digital_write("D9,HIGH"), -1);
        assert_eq!(pins.analog_read("A8"), -1);
        assert_eq!(pins.analog_write("A9,10"), -1);
        assert_eq!(pins.digital_read("D"), -1);
        assert_eq!(pins.digital_read(""), -1);
        assert_eq!(pins.digital_read("Dx"), -1);
        assert!(pins.driver().calls().is_empty());
    }

    #[test]
    fn test_unknown_kind_codes() {
        let mut pins = commands();
        assert_eq!(pins.digital_read("X1"), -2);
        assert_eq!(pins.digital_write("X1,HIGH"), -3);
        assert_eq!(pins.analog_read("X1"), -2);
        assert_eq!(pins.analog_write("X1,5"), -2);
        assert!(pins.driver().calls().is_empty());
    }

    #[test]
    fn test_digital_write() {
        let mut pins = commands();
        assert_eq!(pins.digital_write("D7,HIGH"), 1);
        assert!(pins.driver().level(7));

        assert_eq!(pins.digital_write("A0,LOW"), 1);
        assert_eq!(
            pins.driver().calls().last(),
            Some(&PinCall::DigitalWrite(10, false))
        );
    }

    #[test]
    fn test_digital_write_rejects_bad_level() {
        let mut pins = commands();
        assert_eq!(pins.digital_write("D7,ON"), -2);
        assert_eq!(pins.digital_write("D7"), -2);
        assert!(pins.driver().calls().is_empty());
    }

    #[test]
    fn test_digital_write_checks_level_before_kind() {
        let mut pins = commands();
        assert_eq!(pins.digital_write("X1,ON"), -2);
        assert_eq!(pins.digital_write("X1,HIGH"), -3);
        assert_eq!(pins.digital_write("X9,ON"), -1);
        assert!(pins.driver().calls().is_empty());
    }

    #[test]
    fn test_analog_read() {
        let mut pins = commands();
        let mut driver = MockPinDriver::new();
        driver.set_analog(12, 2048);
        pins.driver = driver;

        assert_eq!(pins.analog_read("A2"), 2048);
        assert_eq!(pins.analog_read("D2"), -3);
        assert_eq!(pins.driver().calls(), &[PinCall::AnalogRead(12)]);
    }

    #[test]
    fn test_analog_write() {
        let mut pins = commands();
        assert_eq!(pins.analog_write("D3,128"), 1);
        assert_eq!(pins.analog_write("A1,255"), 1);
        assert_eq!(pins.analog_write("A1,bright"), -2);
        assert_eq!(
            pins.driver().calls(),
            &[
                PinCall::SetMode(3, GpioMode::OutputPushPull),
                PinCall::AnalogWrite(3, 128),
                PinCall::SetMode(11, GpioMode::OutputPushPull),
                PinCall::AnalogWrite(11, 255),
            ]
        );
    }

    #[test]
    fn test_read_rejects_trailing_characters() {
        let mut pins = commands();
        assert_eq!(pins.digital_read("D10"), -1);
        assert!(pins.driver().calls().is_empty());
    }

    #[test]
    fn test_dispatch_by_function_name() {
        let mut pins = commands();
        assert_eq!(pins.dispatch("digitalwrite", "D1,HIGH"), Some(1));
        assert_eq!(pins.dispatch("digitalread", "D1"), Some(1));
        assert_eq!(pins.dispatch("reboot", "now"), None);
    }

    #[test]
    fn test_error_codes_per_operation() {
        assert_eq!(PinOp::DigitalRead.error_code(PinError::UnknownKind), -2);
        assert_eq!(PinOp::DigitalWrite.error_code(PinError::UnknownKind), -3);
        assert_eq!(PinOp::AnalogRead.error_code(PinError::Unsupported), -3);
        assert_eq!(PinOp::AnalogWrite.error_code(PinError::InvalidValue), -2);
    }
}
