//! Platform abstraction layer
//!
//! This module provides hardware abstraction for the tracker board.
//! All platform-specific code must be isolated to this module.

pub mod error;
pub mod traits;

#[cfg(feature = "embassy")]
pub mod embassy;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

// Re-export commonly used types
pub use error::{PlatformError, Result};
pub use traits::{GpioInterface, PinDriver, TimerInterface, UartInterface};
