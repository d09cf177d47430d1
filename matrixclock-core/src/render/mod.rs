//! Frame rendering
//!
//! Stateless drawing routines. Everything they paint is a function of the
//! [`SharedState`](crate::state::SharedState) passed in and the palette it
//! selects.

pub mod color;
pub mod frame;

pub use color::{Palette, Rgb, COLD_BELOW_C, WARM_ABOVE_C};
pub use frame::{draw_frame, draw_separator, draw_status, Region, SEPARATOR_REGION};
