//! Full redraw task

use crate::render::draw_frame;
use crate::state::SharedState;
use crate::traits::{DisplayError, DisplaySurface, TimeSource};

/// Refreshes the wall clock and redraws the frame
#[derive(Debug, Default)]
pub struct ClockTask {
    last_error: Option<DisplayError>,
}

impl ClockTask {
    pub const fn new() -> Self {
        Self { last_error: None }
    }

    /// Error from the most recent redraw, if it failed
    pub fn last_error(&self) -> Option<DisplayError> {
        self.last_error
    }

    pub fn run<D, T>(&mut self, state: &mut SharedState, display: &mut D, time: &mut T)
    where
        D: DisplaySurface,
        T: TimeSource,
    {
        match time.local_time() {
            Ok(now) => state.wall_clock = now.into(),
            // Keep showing the last known time
            Err(err) => debug!("local time unavailable: {}", err),
        }

        self.last_error = draw_frame(display, state).err();
        if let Some(err) = self.last_error {
            warn!("frame draw failed: {}", err);
        }
    }
}
