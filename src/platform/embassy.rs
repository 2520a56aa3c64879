//! Embassy-backed timer implementation
//!
//! Blocking delays and monotonic timestamps from the `embassy-time` driver.
//! The tracker loop is synchronous, so delays spin with
//! [`embassy_time::block_for`] instead of awaiting a timer.

use crate::platform::{traits::TimerInterface, Result};
use embassy_time::{block_for, Duration, Instant};

/// Timer using the embassy time driver
#[derive(Clone, Copy, Default)]
pub struct EmbassyTimer;

impl EmbassyTimer {
    /// Create a new embassy timer handle
    pub fn new() -> Self {
        Self
    }
}

impl TimerInterface for EmbassyTimer {
    fn delay_us(&mut self, us: u32) -> Result<()> {
        block_for(Duration::from_micros(us as u64));
        Ok(())
    }

    fn delay_ms(&mut self, ms: u32) -> Result<()> {
        block_for(Duration::from_millis(ms as u64));
        Ok(())
    }

    fn now_us(&self) -> u64 {
        Instant::now().as_micros()
    }

    fn now_ms(&self) -> u64 {
        Instant::now().as_millis()
    }
}
