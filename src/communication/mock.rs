//! Mock collaborators for testing

#![cfg(any(test, feature = "mock"))]

use std::collections::VecDeque;
use std::string::String;
use std::vec::Vec;

use super::{Connectivity, Publisher};
use crate::core::TrackerError;

/// Mock publish transport
///
/// Answers with queued results in order, then acknowledges everything.
/// Every attempt is recorded as `(event, data)`.
#[derive(Debug, Default)]
pub struct MockPublisher {
    responses: VecDeque<Result<(), TrackerError>>,
    published: Vec<(String, String)>,
}

impl MockPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the result of a future publish attempt
    pub fn queue(&mut self, response: Result<(), TrackerError>) {
        self.responses.push_back(response);
    }

    /// All publish attempts so far
    pub fn published(&self) -> &[(String, String)] {
        &self.published
    }
}

impl Publisher for MockPublisher {
    fn publish_with_ack(&mut self, event: &str, data: &str) -> Result<(), TrackerError> {
        self.published.push((event.into(), data.into()));
        self.responses.pop_front().unwrap_or(Ok(()))
    }
}

/// Mock connectivity provider
#[derive(Debug, Default)]
pub struct MockConnectivity {
    connected: bool,
    probes: usize,
}

impl MockConnectivity {
    pub fn new(connected: bool) -> Self {
        Self {
            connected,
            probes: 0,
        }
    }

    pub fn set_connected(&mut self, connected: bool) {
        self.connected = connected;
    }

    /// Number of probes issued
    pub fn probe_count(&self) -> usize {
        self.probes
    }
}

impl Connectivity for MockConnectivity {
    fn is_connected(&mut self) -> bool {
        self.connected
    }

    fn probe(&mut self) {
        self.probes += 1;
    }
}
