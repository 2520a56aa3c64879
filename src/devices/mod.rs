//! Device drivers
//!
//! ## Modules
//!
//! - `modem`: cellular modem AT command channel, response parsing, identity
//! - `pins`: remote pin command handlers over a board pin driver

pub mod modem;
pub mod pins;
