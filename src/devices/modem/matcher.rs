//! Response matching for AT command replies
//!
//! A [`ResponseMatcher`] looks for one line of the form `<prefix> <payload>`
//! in whatever the modem has sent so far. It is a pure function of the
//! buffer: the channel can feed it the growing receive buffer as often as it
//! likes and gets the same answer for the same bytes.

use heapless::String;

use crate::core::TrackerError;

/// Capacity of an extracted response payload
pub const PAYLOAD_CAPACITY: usize = 128;

/// Text extracted from a modem response
pub type Payload = String<PAYLOAD_CAPACITY>;

/// Result of a command exchange (or of feeding a matcher)
///
/// `Wait` only comes out of [`ResponseMatcher::feed`]; the channel keeps
/// waiting on it and never returns it to callers.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandOutcome {
    /// Command accepted; carries the matched payload (empty without a matcher)
    Ok(Payload),
    /// No complete match yet
    Wait,
    /// Modem reported an error; 0 when it gave no numeric code
    Error(u16),
    /// Nothing conclusive arrived within the timeout
    Timeout,
}

impl CommandOutcome {
    /// `true` for [`CommandOutcome::Ok`]
    pub fn is_ok(&self) -> bool {
        matches!(self, CommandOutcome::Ok(_))
    }

    /// Convert into a `Result` for `?`-style handling
    pub fn into_result(self) -> Result<Payload, TrackerError> {
        match self {
            CommandOutcome::Ok(payload) => Ok(payload),
            CommandOutcome::Wait => Err(TrackerError::ParseIncomplete),
            CommandOutcome::Error(code) => Err(TrackerError::ModemError(code)),
            CommandOutcome::Timeout => Err(TrackerError::CommandTimeout),
        }
    }
}

/// Newline-terminated lines of `buffer`, without terminators
///
/// A trailing partial line is not yielded.
pub(crate) fn complete_lines(buffer: &str) -> core::str::Lines<'_> {
    let end = buffer.rfind('\n').map(|i| i + 1).unwrap_or(0);
    buffer[..end].lines()
}

/// Prefix matcher for a single response line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseMatcher {
    prefix: &'static str,
}

impl ResponseMatcher {
    /// Match lines starting with `prefix` followed by whitespace
    pub const fn new(prefix: &'static str) -> Self {
        Self { prefix }
    }

    /// Prefix this matcher looks for
    pub fn prefix(&self) -> &'static str {
        self.prefix
    }

    /// Scan `buffer` for a complete matching line
    ///
    /// Returns `Ok(payload)` with the first whitespace-delimited token after
    /// the prefix, unmodified, or `Wait` if there is no complete match (no
    /// such line, a line cut short, an empty payload, or a payload too long
    /// to hold).
    pub fn feed(&self, buffer: &str) -> CommandOutcome {
        complete_lines(buffer)
            .find_map(|line| self.match_line(line))
            .map(CommandOutcome::Ok)
            .unwrap_or(CommandOutcome::Wait)
    }

    /// Payload of `line` if it is a match
    pub(crate) fn match_line(&self, line: &str) -> Option<Payload> {
        let rest = line.strip_prefix(self.prefix)?;
        if !rest.starts_with(|c: char| c.is_whitespace()) {
            return None;
        }
        let token = rest.split_whitespace().next()?;
        Payload::try_from(token).ok()
    }
}
