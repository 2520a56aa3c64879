//! Mock Timer implementation for testing

use crate::platform::{traits::TimerInterface, Result};

/// Mock Timer implementation
///
/// Uses simulated time: every delay advances the clock instantly, so blocking
/// waits and timeouts complete without real sleeping.
#[derive(Debug)]
pub struct MockTimer {
    now_us: u64,
}

impl MockTimer {
    /// Create a new mock timer starting at time 0
    pub fn new() -> Self {
        Self { now_us: 0 }
    }

    /// Create a new mock timer starting at the given millisecond timestamp
    pub fn starting_at_ms(ms: u64) -> Self {
        Self {
            now_us: ms.saturating_mul(1000),
        }
    }

    /// Advance simulated time without going through a delay
    pub fn advance_ms(&mut self, ms: u64) {
        self.now_us = self.now_us.wrapping_add(ms.saturating_mul(1000));
    }
}

impl Default for MockTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl TimerInterface for MockTimer {
    fn delay_us(&mut self, us: u32) -> Result<()> {
        self.now_us = self.now_us.wrapping_add(us as u64);
        Ok(())
    }

    fn delay_ms(&mut self, ms: u32) -> Result<()> {
        self.now_us = self.now_us.wrapping_add(ms as u64 * 1000);
        Ok(())
    }

    fn now_us(&self) -> u64 {
        self.now_us
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_timer_delay_us() {
        let mut timer = MockTimer::new();
        assert_eq!(timer.now_us(), 0);

        timer.delay_us(1000).unwrap();
        assert_eq!(timer.now_us(), 1000);

        timer.delay_us(500).unwrap();
        assert_eq!(timer.now_us(), 1500);
    }

    #[test]
    fn test_mock_timer_delay_ms() {
        let mut timer = MockTimer::new();
        timer.delay_ms(1500).unwrap();
        assert_eq!(timer.now_ms(), 1500);

        // Longer than u32 microseconds would allow
        timer.delay_ms(15_000_000).unwrap();
        assert_eq!(timer.now_ms(), 15_001_500);
    }

    #[test]
    fn test_mock_timer_advance() {
        let mut timer = MockTimer::starting_at_ms(20);
        timer.advance_ms(5);
        assert_eq!(timer.now_ms(), 25);
    }
}
