//! Acknowledgment-gated location publish
//!
//! ## Payload
//!
//! ```text
//! {"time":<captured_at>,"gpsloc":"<raw fix fields>"}
//! ```
//!
//! `time` is the fix capture time in monotonic milliseconds; `gpsloc` is
//! the modem's comma-separated fix text, unmodified.
//!
//! ## Outcome handling
//!
//! - `Acked`: the fix is dropped and acquisition restarts (`EnableGps`)
//! - `Nacked` / `Unavailable`: the fix is discarded, the session is
//!   aborted (`DisableGps` plus session end) and a fresh cycle starts later

use heapless::String;
use serde::Serialize;

use crate::core::TrackerError;
use crate::devices::modem::AtChannel;
use crate::platform::traits::GpioInterface;
use crate::subsystems::gps::{Fix, GpsPoller};

/// Capacity of an encoded publish payload
pub const PUBLISH_PAYLOAD_CAPACITY: usize = 192;

/// Encoded publish payload
pub type PublishPayload = String<PUBLISH_PAYLOAD_CAPACITY>;

/// Event publish transport
pub trait Publisher {
    /// Publish `data` under `event` and wait for the acknowledgment
    ///
    /// Blocks until the remote side acknowledges or the transport gives up.
    ///
    /// # Errors
    ///
    /// - `TrackerError::PublishNack` if the remote side rejected the event
    /// - `TrackerError::PublishTransportTimeout` if no acknowledgment arrived
    fn publish_with_ack(&mut self, event: &str, data: &str) -> Result<(), TrackerError>;
}

/// Result of a publish attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PublishOutcome {
    /// Remote side acknowledged the event
    Acked,
    /// Remote side rejected the event, or it could not be built
    Nacked,
    /// Transport gave up without an answer
    Unavailable,
}

#[derive(Serialize)]
struct LocationReport<'a> {
    time: u64,
    gpsloc: &'a str,
}

/// Encode the publish payload for `fix`
///
/// Returns `None` if the encoded report does not fit the payload buffer.
pub fn encode_payload(fix: &Fix) -> Option<PublishPayload> {
    let report = LocationReport {
        time: fix.captured_at,
        gpsloc: fix.raw_location.as_str(),
    };

    let mut buf = [0u8; PUBLISH_PAYLOAD_CAPACITY];
    let len = serde_json_core::to_slice(&report, &mut buf).ok()?;
    let text = core::str::from_utf8(&buf[..len]).ok()?;

    let mut payload = PublishPayload::new();
    payload.push_str(text).ok()?;
    Some(payload)
}

/// Builds and publishes location reports
pub struct PublishGateway<P: Publisher> {
    publisher: P,
    event_name: &'static str,
}

impl<P: Publisher> PublishGateway<P> {
    /// Create a gateway publishing under `event_name`
    pub fn new(publisher: P, event_name: &'static str) -> Self {
        Self {
            publisher,
            event_name,
        }
    }

    pub fn publisher(&self) -> &P {
        &self.publisher
    }

    pub fn publisher_mut(&mut self) -> &mut P {
        &mut self.publisher
    }

    pub fn event_name(&self) -> &'static str {
        self.event_name
    }

    /// Publish `fix` and wait for the outcome
    pub fn try_publish(&mut self, fix: &Fix) -> PublishOutcome {
        let Some(payload) = encode_payload(fix) else {
            crate::log_error!("Publish: payload does not fit {} bytes", PUBLISH_PAYLOAD_CAPACITY);
            return PublishOutcome::Nacked;
        };

        crate::log_debug!("Publish {}: {}", self.event_name, payload.as_str());
        match self.publisher.publish_with_ack(self.event_name, &payload) {
            Ok(()) => {
                crate::log_info!("Publish acknowledged");
                PublishOutcome::Acked
            }
            Err(TrackerError::PublishNack) => {
                crate::log_warn!("Publish rejected");
                PublishOutcome::Nacked
            }
            Err(_e) => {
                crate::log_warn!("Publish failed: {}", _e);
                PublishOutcome::Unavailable
            }
        }
    }

    /// Publish the poller's pending fix and apply the outcome to the poller
    ///
    /// Returns `None` (and does nothing) when no fix is pending.
    pub fn publish_pending<C: AtChannel, G: GpioInterface>(
        &mut self,
        poller: &mut GpsPoller<G>,
        channel: &mut C,
    ) -> Option<PublishOutcome> {
        let outcome = self.try_publish(poller.pending_fix()?);

        match outcome {
            PublishOutcome::Acked => poller.complete_publish(channel),
            PublishOutcome::Nacked | PublishOutcome::Unavailable => poller.abort_session(channel),
        }
        Some(outcome)
    }
}
