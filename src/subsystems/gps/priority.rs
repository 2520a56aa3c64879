//! GNSS/WWAN radio priority arbitration
//!
//! GNSS and WWAN share one radio inside the modem. Every switch is followed
//! by a fixed settle delay before any dependent command (the radios have to
//! re-negotiate). A status indicator mirrors the GNSS-favored state.

use crate::devices::modem::{commands, AtChannel, CommandOutcome};
use crate::platform::traits::GpioInterface;

/// Which subsystem currently holds radio priority
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RadioPriority {
    Gnss,
    Wwan,
}

/// Radio priority switch with status indicator
pub struct PriorityArbiter<G: GpioInterface> {
    indicator: G,
    current: Option<RadioPriority>,
    settle_ms: u32,
}

impl<G: GpioInterface> PriorityArbiter<G> {
    /// Create an arbiter driving `indicator`, settling `settle_ms` after each switch
    pub fn new(indicator: G, settle_ms: u32) -> Self {
        Self {
            indicator,
            current: None,
            settle_ms,
        }
    }

    /// Priority requested by the last switch, `None` before the first
    pub fn current(&self) -> Option<RadioPriority> {
        self.current
    }

    /// Status indicator pin
    pub fn indicator(&self) -> &G {
        &self.indicator
    }

    /// Switch radio priority and wait for the radios to settle
    ///
    /// The command is issued unconditionally; callers avoid redundant
    /// switches. A failed command is logged and the settle delay still runs.
    pub fn set_priority<C: AtChannel>(&mut self, channel: &mut C, favor_gnss: bool) {
        let (step, priority) = if favor_gnss {
            (commands::PRIORITY_GNSS, RadioPriority::Gnss)
        } else {
            (commands::PRIORITY_WWAN, RadioPriority::Wwan)
        };

        match channel.send(step.command, step.timeout_ms, None) {
            CommandOutcome::Ok(_) => crate::log_debug!("Radio priority: {:?}", priority),
            _other => crate::log_warn!("Radio priority {:?} not confirmed: {:?}", priority, _other),
        }

        let indicator = if favor_gnss {
            self.indicator.set_high()
        } else {
            self.indicator.set_low()
        };
        if let Err(_e) = indicator {
            crate::log_warn!("Priority indicator: {}", _e);
        }

        self.current = Some(priority);
        channel.delay_ms(self.settle_ms);
    }
}
