//! AT command channel
//!
//! Synchronous request/response exchange with the modem over a UART.
//!
//! # Exchange
//!
//! 1. Discard anything left in the receive path (one command in flight)
//! 2. Write `<command>\r\n`
//! 3. Accumulate received bytes, feeding them to the matcher (if any)
//! 4. Stop at the first conclusive result or when the timeout expires
//!
//! The call blocks the caller for at most `timeout_ms` (plus one poll step).
//! There is no other cancellation: timeout is the only recovery from an
//! unresponsive modem.

use heapless::Vec;

use super::matcher::{CommandOutcome, Payload, ResponseMatcher};
use crate::platform::{
    error::{PlatformError, UartError},
    traits::{TimerInterface, UartInterface},
    Result,
};

/// Receive accumulation buffer size
pub const RX_BUFFER_SIZE: usize = 512;

/// Interval between receive polls while waiting for a response
pub const POLL_STEP_MS: u32 = 10;

/// Blocking AT command exchange
///
/// The channel also owns the board clock: every blocking wait in the
/// tracker (settle delays, backoff) goes through it, so one timer drives
/// both command timeouts and scheduling.
pub trait AtChannel {
    /// Send `command` and wait up to `timeout_ms` for its outcome
    ///
    /// - Without a matcher, any `OK` yields `Ok` with an empty payload.
    /// - With a matcher, only a matched line yields `Ok(payload)`; the wait
    ///   ends as soon as it appears.
    /// - `ERROR` / `+CME ERROR: <n>` yields `Error(code)`.
    /// - Anything else by the deadline yields `Timeout`.
    fn send(
        &mut self,
        command: &str,
        timeout_ms: u32,
        matcher: Option<&ResponseMatcher>,
    ) -> CommandOutcome;

    /// Block for `ms` milliseconds
    fn delay_ms(&mut self, ms: u32);

    /// Monotonic time in milliseconds
    fn now_ms(&self) -> u64;
}

/// Complete lines of `buffer` that are valid UTF-8, without terminators
///
/// Line noise only costs the line it lands on.
fn text_lines(buffer: &[u8]) -> impl Iterator<Item = &str> + '_ {
    let end = buffer
        .iter()
        .rposition(|&b| b == b'\n')
        .map_or(0, |i| i + 1);
    buffer[..end]
        .split(|&b| b == b'\n')
        .filter_map(|line| core::str::from_utf8(line.strip_suffix(b"\r").unwrap_or(line)).ok())
}

/// Classify the response received so far
///
/// Returns `None` while the exchange is still open.
fn classify(buffer: &[u8], matcher: Option<&ResponseMatcher>) -> Option<CommandOutcome> {
    if let Some(matcher) = matcher {
        if let Some(payload) = text_lines(buffer).find_map(|line| matcher.match_line(line)) {
            return Some(CommandOutcome::Ok(payload));
        }
    }

    for line in text_lines(buffer) {
        let line = line.trim();
        if line == "OK" {
            if matcher.is_none() {
                return Some(CommandOutcome::Ok(Payload::new()));
            }
        } else if line == "ERROR" {
            return Some(CommandOutcome::Error(0));
        } else if let Some(code) = line
            .strip_prefix("+CME ERROR:")
            .or_else(|| line.strip_prefix("+CMS ERROR:"))
        {
            return Some(CommandOutcome::Error(code.trim().parse().unwrap_or(0)));
        }
    }

    None
}

/// UART-backed AT command channel
pub struct CommandChannel<U: UartInterface, T: TimerInterface> {
    uart: U,
    timer: T,
    rx: Vec<u8, RX_BUFFER_SIZE>,
}

impl<U: UartInterface, T: TimerInterface> CommandChannel<U, T> {
    /// Create a channel over a modem UART and the board timer
    pub fn new(uart: U, timer: T) -> Self {
        Self {
            uart,
            timer,
            rx: Vec::new(),
        }
    }

    /// Access the modem UART
    pub fn uart(&self) -> &U {
        &self.uart
    }

    /// Mutable access to the modem UART
    pub fn uart_mut(&mut self) -> &mut U {
        &mut self.uart
    }

    /// Access the board timer
    pub fn timer(&self) -> &T {
        &self.timer
    }

    /// Mutable access to the board timer
    pub fn timer_mut(&mut self) -> &mut T {
        &mut self.timer
    }

    fn discard_stale(&mut self) {
        let mut scratch = [0u8; 64];
        let mut dropped = 0usize;
        while self.uart.available() {
            match self.uart.read(&mut scratch) {
                Ok(0) | Err(_) => break,
                Ok(n) => dropped += n,
            }
        }
        if dropped > 0 {
            crate::log_debug!("AT: discarded {} stale bytes", dropped);
        }
    }

    fn write_command(&mut self, command: &str) -> Result<()> {
        self.write_all(command.as_bytes())?;
        self.write_all(b"\r\n")?;
        self.uart.flush()
    }

    /// A short write leaves a truncated command on the wire
    fn write_all(&mut self, data: &[u8]) -> Result<()> {
        if self.uart.write(data)? < data.len() {
            return Err(PlatformError::Uart(UartError::WriteFailed));
        }
        Ok(())
    }

    fn pump(&mut self) -> Result<()> {
        let mut chunk = [0u8; 64];
        while self.uart.available() {
            let n = self.uart.read(&mut chunk)?;
            if n == 0 {
                break;
            }
            for &byte in &chunk[..n] {
                if self.rx.push(byte).is_err() {
                    crate::log_warn!("AT: receive buffer overflow, dropping response");
                    self.rx.clear();
                    // Cannot fail on an empty buffer
                    let _ = self.rx.push(byte);
                }
            }
        }
        Ok(())
    }
}

impl<U: UartInterface, T: TimerInterface> AtChannel for CommandChannel<U, T> {
    fn send(
        &mut self,
        command: &str,
        timeout_ms: u32,
        matcher: Option<&ResponseMatcher>,
    ) -> CommandOutcome {
        self.discard_stale();
        self.rx.clear();

        crate::log_trace!("AT > {}", command);
        if let Err(_e) = self.write_command(command) {
            crate::log_error!("AT: {} not sent: {}", command, _e);
            return CommandOutcome::Timeout;
        }

        let start_ms = self.timer.now_ms();
        loop {
            if let Err(_e) = self.pump() {
                crate::log_warn!("AT: read failed: {}", _e);
            }

            if let Some(outcome) = classify(&self.rx, matcher) {
                if let CommandOutcome::Error(_code) = outcome {
                    crate::log_debug!("AT: {} -> ERROR {}", command, _code);
                }
                return outcome;
            }

            if self.timer.now_ms().saturating_sub(start_ms) >= timeout_ms as u64 {
                crate::log_debug!("AT: {} timed out after {} ms", command, timeout_ms);
                return CommandOutcome::Timeout;
            }

            if let Err(_e) = self.timer.delay_ms(POLL_STEP_MS) {
                crate::log_warn!("AT: poll delay failed: {}", _e);
            }
        }
    }

    fn delay_ms(&mut self, ms: u32) {
        if let Err(_e) = self.timer.delay_ms(ms) {
            crate::log_warn!("Delay of {} ms failed: {}", ms, _e);
        }
    }

    fn now_ms(&self) -> u64 {
        self.timer.now_ms()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::mock::{MockTimer, MockUart};
    use crate::platform::traits::UartConfig;

    const LOCATION: ResponseMatcher = ResponseMatcher::new("+QGPSLOC:");

    fn channel() -> CommandChannel<MockUart, MockTimer> {
        CommandChannel::new(MockUart::new(UartConfig::default()), MockTimer::new())
    }

    #[test]
    fn test_ok_without_matcher() {
        let mut ch = channel();
        ch.uart_mut().reply_to("AT+QGPS=1", "\r\nOK\r\n");

        assert_eq!(ch.send("AT+QGPS=1", 1000, None), CommandOutcome::Ok(Payload::new()));
        assert_eq!(ch.uart().tx_buffer(), b"AT+QGPS=1\r\n");
        assert_eq!(ch.now_ms(), 0);
    }

    #[test]
    fn test_matcher_payload_ends_wait_early() {
        let mut ch = channel();
        ch.uart_mut().reply_to(
            "AT+QGPSLOC=2",
            "\r\n+QGPSLOC: 142008.000,37.87498,-122.29064,1.0,19.4,2,0.00,0.0,0.0,040821,06\r\n\r\nOK\r\n",
        );

        let outcome = ch.send("AT+QGPSLOC=2", 1000, Some(&LOCATION));
        assert_eq!(
            outcome,
            CommandOutcome::Ok(
                Payload::try_from("142008.000,37.87498,-122.29064,1.0,19.4,2,0.00,0.0,0.0,040821,06")
                    .unwrap()
            )
        );
        assert_eq!(ch.now_ms(), 0);
    }

    #[test]
    fn test_silence_times_out() {
        let mut ch = channel();
        assert_eq!(ch.send("AT+QGPSLOC=2", 1000, Some(&LOCATION)), CommandOutcome::Timeout);
        let elapsed = ch.now_ms();
        assert!((1000..1000 + POLL_STEP_MS as u64 + 1).contains(&elapsed));
    }

    #[test]
    fn test_ok_without_match_keeps_waiting() {
        let mut ch = channel();
        ch.uart_mut().reply_to("AT+QGPSLOC=2", "\r\nOK\r\n");
        assert_eq!(ch.send("AT+QGPSLOC=2", 1000, Some(&LOCATION)), CommandOutcome::Timeout);
    }

    #[test]
    fn test_modem_errors() {
        let mut ch = channel();
        ch.uart_mut().reply_to("AT+QGPSLOC=2", "\r\n+CME ERROR: 516\r\n");
        ch.uart_mut().reply_to("AT+BOGUS", "\r\nERROR\r\n");

        assert_eq!(ch.send("AT+QGPSLOC=2", 1000, Some(&LOCATION)), CommandOutcome::Error(516));
        assert_eq!(ch.send("AT+BOGUS", 1000, None), CommandOutcome::Error(0));
    }

    #[test]
    fn test_stale_bytes_discarded_before_send() {
        let mut ch = channel();
        ch.uart_mut().inject_rx_data(b"\r\nOK\r\n");
        // A stale OK must not complete the next exchange
        assert_eq!(ch.send("AT+QGPSEND", 200, None), CommandOutcome::Timeout);
    }

    #[test]
    fn test_write_failure_reports_timeout() {
        let mut ch = channel();
        ch.uart_mut().set_write_failure(true);
        assert_eq!(ch.send("AT", 1000, None), CommandOutcome::Timeout);
        assert_eq!(ch.now_ms(), 0);
    }

    #[test]
    fn test_delay_advances_clock() {
        let mut ch = channel();
        ch.delay_ms(1500);
        assert_eq!(ch.now_ms(), 1500);
        assert_eq!(ch.timer().now_ms(), 1500);
    }

    #[test]
    fn test_classify_ignores_echo_and_urcs() {
        assert_eq!(classify(b"AT\r\r\n+QIURC: \"pdpdeact\",1\r\n", None), None);
        assert_eq!(
            classify(b"AT\r\r\n\r\nOK\r\n", None),
            Some(CommandOutcome::Ok(Payload::new()))
        );
        assert_eq!(classify(b"\r\n+CMS ERROR: 500\r\n", None), Some(CommandOutcome::Error(500)));
    }

    #[test]
    fn test_line_noise_costs_only_its_line() {
        let rx = b"\r\n\xFF\r\n+QGPSLOC: 1,2,3\r\n\r\nOK\r\n";
        assert_eq!(
            classify(rx, Some(&LOCATION)),
            Some(CommandOutcome::Ok(Payload::try_from("1,2,3").unwrap()))
        );
        assert_eq!(
            classify(b"\xFE\xFF garbage\r\nOK\r\n", None),
            Some(CommandOutcome::Ok(Payload::new()))
        );
    }

    #[test]
    fn test_noise_before_location_reply() {
        let mut ch = channel();
        ch.uart_mut().reply_bytes_to(
            "AT+QGPSLOC=2",
            b"\r\n\xFF\x00\r\n+QGPSLOC: 142008.000,37.87498,-122.29064\r\n\r\nOK\r\n",
        );

        assert_eq!(
            ch.send("AT+QGPSLOC=2", 1000, Some(&LOCATION)),
            CommandOutcome::Ok(Payload::try_from("142008.000,37.87498,-122.29064").unwrap())
        );

        // Next exchange is unaffected
        ch.uart_mut().reply_to("AT+QGPSEND", "\r\nOK\r\n");
        assert_eq!(ch.send("AT+QGPSEND", 1000, None), CommandOutcome::Ok(Payload::new()));
    }

    #[test]
    fn test_short_write_reports_timeout() {
        let mut ch = channel();
        ch.uart_mut().set_write_limit(Some(7));

        assert_eq!(ch.send("AT+QGPS=1", 1000, None), CommandOutcome::Timeout);
        assert_eq!(ch.uart().tx_buffer(), b"AT+QGPS");
        assert_eq!(ch.now_ms(), 0);
    }
}
