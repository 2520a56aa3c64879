//! Cellular modem (AT command interface)
//!
//! - `channel`: blocking command/response exchange ([`AtChannel`])
//! - `matcher`: incremental response parsing ([`ResponseMatcher`])
//! - `commands`: command catalogue, timeouts, per-model antenna sequences
//! - `identity`: modem model resolution

pub mod channel;
pub mod commands;
pub mod identity;
pub mod matcher;

pub use channel::{AtChannel, CommandChannel};
pub use commands::AtStep;
pub use identity::ModemIdentity;
pub use matcher::{CommandOutcome, Payload, ResponseMatcher};
