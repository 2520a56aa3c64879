//! AT command catalogue (Quectel BG77 / BG95)
//!
//! Command strings, response prefixes and per-command timeouts used by the
//! tracker, plus the per-model antenna power sequences.

use super::matcher::ResponseMatcher;

/// One command of a fire-and-forget sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AtStep {
    /// Command text, without line terminator
    pub command: &'static str,
    /// Timeout for this command (milliseconds)
    pub timeout_ms: u32,
}

impl AtStep {
    pub const fn new(command: &'static str, timeout_ms: u32) -> Self {
        Self {
            command,
            timeout_ms,
        }
    }
}

/// Default timeout for short configuration commands
pub const DEFAULT_TIMEOUT_MS: u32 = 1_000;

/// Start a GNSS session
pub const GPS_SESSION_BEGIN: AtStep = AtStep::new("AT+QGPS=1", 1_000);

/// Terminate the GNSS session
pub const GPS_SESSION_END: AtStep = AtStep::new("AT+QGPSEND", 1_000);

/// Query the current position (format 2: decimal degrees)
pub const GPS_LOCATION: AtStep = AtStep::new("AT+QGPSLOC=2", 1_000);

/// Matcher for the position report
pub const LOCATION_MATCHER: ResponseMatcher = ResponseMatcher::new("+QGPSLOC:");

/// Give GNSS priority over WWAN
pub const PRIORITY_GNSS: AtStep = AtStep::new("AT+QGPSCFG=\"priority\",0", 1_000);

/// Give WWAN priority over GNSS
pub const PRIORITY_WWAN: AtStep = AtStep::new("AT+QGPSCFG=\"priority\",1", 1_000);

/// Product identification
pub const IDENTIFY: AtStep = AtStep::new("ATI", 1_000);

/// Matcher for the firmware revision line of `ATI` (starts with the model)
pub const REVISION_MATCHER: ResponseMatcher = ResponseMatcher::new("Revision:");

/// Modem configuration issued once after identification
///
/// Assistance data, network time sync, then low-power timers off.
pub const MODEM_CONFIG_SEQUENCE: &[AtStep] = &[
    AtStep::new("AT+QGPSXTRA=1", 6_000),
    AtStep::new("AT+CTZU=1", 1_000),
    AtStep::new("AT+CPSMS=0", 1_000),
    AtStep::new("AT+CEDRXS=0", 1_000),
];

/// BG77: antenna LNA power on module GPIO 26
const BG77_ANTENNA_POWER: &[AtStep] = &[
    AtStep::new("AT+QCFG=\"gpio\",1,26,1,0,0,1", 1_000),
    AtStep::new("AT+QCFG=\"gpio\",3,26,1,1", 1_000),
];

/// BG95: antenna LNA power on module GPIO 64
const BG95_ANTENNA_POWER: &[AtStep] = &[
    AtStep::new("AT+QCFG=\"gpio\",1,64,1,0,0,1", 1_000),
    AtStep::new("AT+QCFG=\"gpio\",3,64,1,1", 1_000),
];

/// Antenna power sequences keyed by model identifier
///
/// A modem matches the first key its model string contains.
pub const ANTENNA_POWER_SEQUENCES: &[(&str, &[AtStep])] = &[
    ("BG77", BG77_ANTENNA_POWER),
    ("BG95", BG95_ANTENNA_POWER),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeouts_within_bounds() {
        let singles = [
            GPS_SESSION_BEGIN,
            GPS_SESSION_END,
            GPS_LOCATION,
            PRIORITY_GNSS,
            PRIORITY_WWAN,
            IDENTIFY,
        ];
        let sequences = ANTENNA_POWER_SEQUENCES
            .iter()
            .flat_map(|(_, steps)| steps.iter())
            .chain(MODEM_CONFIG_SEQUENCE.iter());

        for step in singles.iter().chain(sequences) {
            assert!(
                (1_000..=6_000).contains(&step.timeout_ms),
                "{} has timeout {}",
                step.command,
                step.timeout_ms
            );
        }
    }

    #[test]
    fn test_antenna_keys_unique() {
        for (i, (key, _)) in ANTENNA_POWER_SEQUENCES.iter().enumerate() {
            for (other, _) in &ANTENNA_POWER_SEQUENCES[i + 1..] {
                assert!(!other.contains(key) && !key.contains(other));
            }
        }
    }
}
