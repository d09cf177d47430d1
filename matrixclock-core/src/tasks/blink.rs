//! Separator fade task

use crate::render::{draw_separator, Palette};
use crate::state::SharedState;
use crate::traits::{Color565, DisplayError, DisplaySurface};

/// Steps the separator glyph through its fade
#[derive(Debug, Default)]
pub struct BlinkTask {
    last_error: Option<DisplayError>,
}

impl BlinkTask {
    pub const fn new() -> Self {
        Self { last_error: None }
    }

    /// Error from the most recent run, if it failed
    pub fn last_error(&self) -> Option<DisplayError> {
        self.last_error
    }

    pub fn run<D: DisplaySurface>(&mut self, state: &mut SharedState, display: &mut D) {
        state.colon.advance();

        let base = Palette::select(state).clock;
        let color = Color565::from_rgb(
            state.colon.scale(base.r),
            state.colon.scale(base.g),
            state.colon.scale(base.b),
        );

        self.last_error = draw_separator(display, color).err();
        if let Some(err) = self.last_error {
            warn!("separator draw failed: {}", err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::MAX_STEP;
    use crate::testing::MockDisplay;
    use crate::traits::Font;

    #[test]
    fn test_advances_and_draws_separator_only() {
        let mut state = SharedState::default();
        let mut display = MockDisplay::new();
        let mut task = BlinkTask::new();

        task.run(&mut state, &mut display);

        assert_eq!(state.colon().value(), 2);
        assert_eq!(display.clears, 0);
        assert_eq!(display.texts.len(), 1);
        let glyph = &display.texts[0];
        assert_eq!(glyph.text, ":");
        assert_eq!((glyph.x, glyph.y), (29, 14));
        assert_eq!(glyph.font, Font::Large);
    }

    #[test]
    fn test_colour_follows_palette() {
        let mut display = MockDisplay::new();
        let mut task = BlinkTask::new();

        // Walk to the top of the fade so the colour equals the base hue
        let mut night = SharedState::default();
        while night.colon().value() < MAX_STEP {
            task.run(&mut night, &mut display);
        }
        assert_eq!(
            display.texts.last().unwrap().color,
            Color565::from_rgb(255, 30, 0)
        );

        let mut day = SharedState::default();
        day.ambient_light = 10.0;
        while day.colon().value() < MAX_STEP {
            task.run(&mut day, &mut display);
        }
        assert_eq!(
            display.texts.last().unwrap().color,
            Color565::from_rgb(255, 100, 0)
        );
    }

    #[test]
    fn test_draw_error_recorded() {
        let mut state = SharedState::default();
        let mut display = MockDisplay::new();
        display.fail_text = true;
        let mut task = BlinkTask::new();

        task.run(&mut state, &mut display);
        assert_eq!(task.last_error(), Some(DisplayError::Bus));

        display.fail_text = false;
        task.run(&mut state, &mut display);
        assert_eq!(task.last_error(), None);
    }
}
