//! Board-agnostic core logic for the Matrixclock display
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Collaborator traits (display surface, light sensor, time source, transport)
//! - Shared display state and the colon animation phase
//! - Cooperative periodic task scheduler
//! - Task bodies (clock, blink, sensor, time sync)
//! - Frame rendering and palette selection
//! - Inbound telemetry handling
//! - Broker connection supervision and the application run loop
//! - Configuration type definitions

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

#[macro_use]
mod fmt;

pub mod app;
pub mod config;
pub mod inbound;
pub mod link;
pub mod render;
pub mod scheduler;
pub mod state;
pub mod tasks;
pub mod traits;

#[cfg(test)]
mod testing;

pub use app::{App, ServiceReport};
pub use config::DisplayConfig;
pub use state::SharedState;
