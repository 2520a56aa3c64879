//! Modem identification
//!
//! The model is resolved once at startup and selects the antenna power
//! sequence. It never changes afterwards.

use heapless::String;

use super::channel::AtChannel;
use super::commands::{AtStep, ANTENNA_POWER_SEQUENCES, IDENTIFY, REVISION_MATCHER};
use super::matcher::CommandOutcome;

/// Capacity of the stored model string
pub const MODEL_CAPACITY: usize = 32;

/// Identity of the attached modem
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ModemIdentity {
    model_string: String<MODEL_CAPACITY>,
}

impl ModemIdentity {
    /// Build an identity from a model string, truncating to capacity
    pub fn from_model(model: &str) -> Self {
        let mut model_string = String::new();
        for c in model.chars() {
            if model_string.push(c).is_err() {
                break;
            }
        }
        Self { model_string }
    }

    /// Ask the modem who it is
    ///
    /// Identification failure is not fatal: the identity is left empty and
    /// no antenna sequence will match.
    pub fn identify<C: AtChannel>(channel: &mut C) -> Self {
        match channel.send(IDENTIFY.command, IDENTIFY.timeout_ms, Some(&REVISION_MATCHER)) {
            CommandOutcome::Ok(revision) => {
                crate::log_info!("Modem revision: {}", revision.as_str());
                Self::from_model(&revision)
            }
            _other => {
                crate::log_warn!("Modem identification failed: {:?}", _other);
                Self::default()
            }
        }
    }

    /// Model string as reported by the modem
    pub fn model(&self) -> &str {
        &self.model_string
    }

    /// Antenna power sequence for this model, if the model is known
    pub fn antenna_sequence(&self) -> Option<&'static [AtStep]> {
        ANTENNA_POWER_SEQUENCES
            .iter()
            .find(|(key, _)| self.model_string.contains(key))
            .map(|(_, steps)| *steps)
    }
}
