//! Cloud communication
//!
//! The tracker reaches its remote service through two collaborators it does
//! not implement itself:
//!
//! - [`Connectivity`]: link status and a lightweight probe
//! - [`Publisher`]: acknowledgment-gated event publish
//!
//! [`PublishGateway`] turns a captured fix into a publish and feeds the
//! outcome back into the acquisition state machine.

pub mod connectivity;
pub mod publish;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use connectivity::Connectivity;
pub use publish::{PublishGateway, PublishOutcome, Publisher};
