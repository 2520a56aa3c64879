//! GPS acquisition subsystem
//!
//! - `session`: fix and session bookkeeping
//! - `priority`: GNSS/WWAN radio priority arbitration
//! - `poller`: Idle/Polling state machine

pub mod poller;
pub mod priority;
pub mod session;

pub use poller::{GpsPoller, PollStateId};
pub use priority::{PriorityArbiter, RadioPriority};
pub use session::{Event, Fix, SessionState};
