//! Mock UART implementation for testing
//!
//! Stands in for the modem side of the AT link: every complete command line
//! written to the UART is recorded, and a scripted reply (if any) is queued on
//! the receive side.

use crate::platform::{
    error::{PlatformError, UartError},
    traits::{UartConfig, UartInterface},
    Result,
};
use core::cell::RefCell;
use std::string::String;
use std::vec::Vec;

/// Mock UART implementation
///
/// # Example
///
/// ```ignore
/// use cell_tracker::platform::mock::MockUart;
/// use cell_tracker::platform::traits::UartInterface;
///
/// let mut uart = MockUart::new(Default::default());
/// uart.reply_to("AT+QGPS=1", "\r\nOK\r\n");
///
/// uart.write(b"AT+QGPS=1\r\n").unwrap();
/// assert_eq!(uart.sent_commands(), vec!["AT+QGPS=1".to_string()]);
///
/// let mut buf = [0u8; 6];
/// let n = uart.read(&mut buf).unwrap();
/// assert_eq!(&buf[..n], b"\r\nOK\r\n");
/// ```
#[derive(Debug)]
pub struct MockUart {
    config: UartConfig,
    tx_buffer: RefCell<Vec<u8>>,
    rx_buffer: RefCell<Vec<u8>>,
    pending_line: Vec<u8>,
    commands: Vec<String>,
    replies: Vec<(String, Vec<u8>)>,
    fail_writes: bool,
    write_limit: Option<usize>,
}

impl MockUart {
    /// Create a new mock UART
    pub fn new(config: UartConfig) -> Self {
        Self {
            config,
            tx_buffer: RefCell::new(Vec::new()),
            rx_buffer: RefCell::new(Vec::new()),
            pending_line: Vec::new(),
            commands: Vec::new(),
            replies: Vec::new(),
            fail_writes: false,
            write_limit: None,
        }
    }

    /// Script the reply queued whenever `command` is written
    ///
    /// Replaces any reply previously scripted for the same command.
    pub fn reply_to(&mut self, command: &str, reply: &str) {
        self.reply_bytes_to(command, reply.as_bytes());
    }

    /// Script a raw reply, which may contain line noise
    pub fn reply_bytes_to(&mut self, command: &str, reply: &[u8]) {
        self.replies.retain(|(cmd, _)| cmd != command);
        self.replies.push((command.into(), reply.to_vec()));
    }

    /// Remove the scripted reply for `command` (the modem goes silent)
    pub fn clear_reply(&mut self, command: &str) {
        self.replies.retain(|(cmd, _)| cmd != command);
    }

    /// Make subsequent writes fail
    pub fn set_write_failure(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    /// Accept at most `limit` bytes per write call (`None`: no limit)
    pub fn set_write_limit(&mut self, limit: Option<usize>) {
        self.write_limit = limit;
    }

    /// Get transmitted data (for test verification)
    pub fn tx_buffer(&self) -> Vec<u8> {
        self.tx_buffer.borrow().clone()
    }

    /// Command lines written so far, without line terminators
    pub fn sent_commands(&self) -> Vec<String> {
        self.commands.clone()
    }

    /// Forget the recorded command history
    pub fn clear_sent_commands(&mut self) {
        self.commands.clear();
        self.tx_buffer.borrow_mut().clear();
    }

    /// Inject receive data (unsolicited output, stale bytes)
    pub fn inject_rx_data(&mut self, data: &[u8]) {
        self.rx_buffer.borrow_mut().extend_from_slice(data);
    }

    /// Get current baud rate
    pub fn baud_rate(&self) -> u32 {
        self.config.baud_rate
    }

    fn complete_line(&mut self) {
        let line = String::from_utf8_lossy(&self.pending_line)
            .trim_end_matches(['\r', '\n'])
            .to_string();
        self.pending_line.clear();

        if let Some((_, reply)) = self.replies.iter().find(|(cmd, _)| *cmd == line) {
            self.rx_buffer
                .borrow_mut()
                .extend_from_slice(reply);
        }
        self.commands.push(line);
    }
}

impl UartInterface for MockUart {
    fn write(&mut self, data: &[u8]) -> Result<usize> {
        if self.fail_writes {
            return Err(PlatformError::Uart(UartError::WriteFailed));
        }

        let data = match self.write_limit {
            Some(limit) => &data[..data.len().min(limit)],
            None => data,
        };

        self.tx_buffer.borrow_mut().extend_from_slice(data);
        for &byte in data {
            self.pending_line.push(byte);
            if byte == b'\n' {
                self.complete_line();
            }
        }
        Ok(data.len())
    }

    fn read(&mut self, buffer: &mut [u8]) -> Result<usize> {
        let mut rx = self.rx_buffer.borrow_mut();
        let to_read = core::cmp::min(buffer.len(), rx.len());

        buffer[..to_read].copy_from_slice(&rx[..to_read]);
        rx.drain(..to_read);

        Ok(to_read)
    }

    fn available(&self) -> bool {
        !self.rx_buffer.borrow().is_empty()
    }

    fn flush(&mut self) -> Result<()> {
        // Mock implementation - nothing to flush
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_uart_records_commands() {
        let mut uart = MockUart::new(UartConfig::default());
        uart.write(b"AT+QGPS").unwrap();
        assert!(uart.sent_commands().is_empty());

        uart.write(b"=1\r\n").unwrap();
        assert_eq!(uart.sent_commands(), vec!["AT+QGPS=1".to_string()]);
        assert_eq!(uart.tx_buffer(), b"AT+QGPS=1\r\n");
    }

    #[test]
    fn test_mock_uart_scripted_reply() {
        let mut uart = MockUart::new(UartConfig::default());
        uart.reply_to("ATI", "\r\nQuectel\r\nBG77\r\n\r\nOK\r\n");
        assert!(!uart.available());

        uart.write(b"ATI\r\n").unwrap();
        assert!(uart.available());

        let mut buffer = [0u8; 64];
        let read = uart.read(&mut buffer).unwrap();
        assert_eq!(&buffer[..read], b"\r\nQuectel\r\nBG77\r\n\r\nOK\r\n");
        assert!(!uart.available());
    }

    #[test]
    fn test_mock_uart_reply_replaced_and_cleared() {
        let mut uart = MockUart::new(UartConfig::default());
        uart.reply_to("AT", "\r\nERROR\r\n");
        uart.reply_to("AT", "\r\nOK\r\n");
        uart.write(b"AT\r\n").unwrap();

        let mut buffer = [0u8; 16];
        let read = uart.read(&mut buffer).unwrap();
        assert_eq!(&buffer[..read], b"\r\nOK\r\n");

        uart.clear_reply("AT");
        uart.write(b"AT\r\n").unwrap();
        assert!(!uart.available());
    }

    #[test]
    fn test_mock_uart_partial_read() {
        let mut uart = MockUart::new(UartConfig::default());
        uart.inject_rx_data(b"Test Data");

        let mut buffer = [0u8; 4];
        let read = uart.read(&mut buffer).unwrap();
        assert_eq!(read, 4);
        assert_eq!(&buffer, b"Test");

        let mut buffer2 = [0u8; 10];
        let read2 = uart.read(&mut buffer2).unwrap();
        assert_eq!(read2, 5);
        assert_eq!(&buffer2[..5], b" Data");
    }

    #[test]
    fn test_mock_uart_write_failure() {
        let mut uart = MockUart::new(UartConfig::default());
        uart.set_write_failure(true);
        assert_eq!(
            uart.write(b"AT\r\n"),
            Err(PlatformError::Uart(UartError::WriteFailed))
        );
        assert!(uart.sent_commands().is_empty());
        assert_eq!(uart.baud_rate(), 115200);
    }
}
