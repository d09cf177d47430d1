//! Shared display state
//!
//! One [`SharedState`] record is owned by the application and handed by
//! `&mut` to each task body and to the inbound handler in turn.

pub mod colon;
pub mod shared;

pub use colon::{ColonPhase, MAX_STEP, MIN_STEP};
pub use shared::{DebugText, HvacMode, SharedState, WallClock, DEBUG_TEXT_CAPACITY};
