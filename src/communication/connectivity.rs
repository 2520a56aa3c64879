//! Connectivity provider
//!
//! Registration with the cellular network and the cloud endpoint happens
//! elsewhere; the tracker only asks whether the link is up.

/// Cloud link status
pub trait Connectivity {
    /// `true` once the device can publish
    fn is_connected(&mut self) -> bool;

    /// Issue a lightweight status request while disconnected
    ///
    /// Gives the provider a chance to make progress; it never blocks for
    /// longer than the provider's own status round-trip.
    fn probe(&mut self);
}
