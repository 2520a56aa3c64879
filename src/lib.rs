#![cfg_attr(not(any(test, feature = "mock")), no_std)]

//! cell_tracker - GPS tracker control logic for Quectel BG77/BG95 cellular modems
//!
//! Periodically acquires a location fix through the modem's AT command
//! interface, arbitrates radio priority between GNSS and WWAN, and publishes
//! each fix to a remote service with acknowledgment-based retry.

// Platform abstraction layer (UART, timer, GPIO, pin driver)
pub mod platform;

// Modem and pin drivers built on the platform layer
pub mod devices;

// Logging and error types
pub mod core;

// GPS acquisition
pub mod subsystems;

// Cloud publish and connectivity
pub mod communication;

// Fixed timing configuration
pub mod parameters;

// Main loop
pub mod tracker;

pub use tracker::{TickReport, Tracker};
