//! Frame layout for the 64x32 panel
//!
//! ```text
//!  0         29   36                63
//!  ┌──────────┬────┬─────────────────┐
//!  │  HH      │ :  │   MM            │  large font, baseline y=16
//!  ├─┬────────┤    │                 │  separator region y 0..19
//!  │▲│ debug  │    │                 │  HVAC glyph y 19..23, debug y=23
//!  │ tIn°C tOut°C                    │  small font, baseline y=32
//!  └─────────────────────────────────┘
//! ```

use core::fmt::Write;

use heapless::String;

use super::color::{Palette, CLOCK_NIGHT, LIGHT_BLUE, ORANGE};
use crate::state::{HvacMode, SharedState};
use crate::traits::{Color565, DisplayError, DisplaySurface, Font};

/// Axis-aligned pixel rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Region {
    pub x: i16,
    pub y: i16,
    pub width: u16,
    pub height: u16,
}

impl Region {
    /// Check if a pixel lies inside the region
    pub const fn contains(&self, x: i16, y: i16) -> bool {
        self.covers_row(y) && x >= self.x && x < self.x + self.width as i16
    }

    const fn covers_row(&self, y: i16) -> bool {
        y >= self.y && y < self.y + self.height as i16
    }

    const fn right(&self) -> i16 {
        self.x + self.width as i16
    }
}

/// Pixels owned by the separator glyph
///
/// The full redraw never touches them, so a separator drawn earlier in the
/// same pass survives.
pub const SEPARATOR_REGION: Region = Region {
    x: 29,
    y: 0,
    width: 7,
    height: 19,
};

const CLOCK_BASELINE: i16 = 16;
const HOUR_X: i16 = 3;
const MINUTE_X: i16 = 36;
const SEPARATOR_CURSOR: (i16, i16) = (29, 14);

const HVAC_AREA: Region = Region {
    x: 0,
    y: 19,
    width: 8,
    height: 4,
};
/// (x, y, width) runs of the heating glyph
const HEATING_RUNS: [(i16, i16, u16); 4] = [(3, 19, 2), (2, 20, 4), (1, 21, 6), (0, 22, 8)];
/// (x, y, width) runs of the cooling glyph
const COOLING_RUNS: [(i16, i16, u16); 4] = [(0, 19, 8), (1, 20, 6), (2, 21, 4), (3, 22, 2)];

const TEMPERATURE_CURSOR: (i16, i16) = (0, 32);
const DEBUG_CURSOR: (i16, i16) = (5, 23);
const STATUS_CURSOR: (i16, i16) = (0, 10);

/// Redraw the whole frame except the separator
pub fn draw_frame<D>(display: &mut D, state: &SharedState) -> Result<(), DisplayError>
where
    D: DisplaySurface + ?Sized,
{
    let palette = Palette::select(state);

    clear_background(display);

    let clock = state.wall_clock();
    display.set_font(Font::Large);
    display.set_text_color(palette.clock.to_565());
    draw_two_digits(display, HOUR_X, clock.hour)?;
    draw_two_digits(display, MINUTE_X, clock.minute)?;

    draw_hvac(display, state.hvac_mode());

    let mut line: String<48> = String::new();
    display.set_font(Font::Small);
    display.set_cursor(TEMPERATURE_CURSOR.0, TEMPERATURE_CURSOR.1);
    display.set_text_color(palette.neutral);
    write!(line, "{:.1}°C ", state.temp_in()).map_err(|_| DisplayError::TextOverflow)?;
    display.draw_text(&line)?;

    line.clear();
    display.set_text_color(palette.outside(state.temp_out()));
    write!(line, "{:.1}°C", state.temp_out()).map_err(|_| DisplayError::TextOverflow)?;
    display.draw_text(&line)?;

    if state.debug_enabled() {
        display.set_font(Font::Tiny);
        display.set_text_color(CLOCK_NIGHT.to_565());
        display.set_cursor(DEBUG_CURSOR.0, DEBUG_CURSOR.1);
        display.draw_text(state.debug_text().as_str())?;
    }

    Ok(())
}

/// Draw the separator glyph without clearing anything
pub fn draw_separator<D>(display: &mut D, color: Color565) -> Result<(), DisplayError>
where
    D: DisplaySurface + ?Sized,
{
    display.set_font(Font::Large);
    display.set_text_color(color);
    display.set_cursor(SEPARATOR_CURSOR.0, SEPARATOR_CURSOR.1);
    display.draw_text(":")
}

/// Replace the screen with a one-line status message
pub fn draw_status<D>(display: &mut D, text: &str) -> Result<(), DisplayError>
where
    D: DisplaySurface + ?Sized,
{
    display.clear();
    display.set_text_color(LIGHT_BLUE.to_565());
    display.set_font(Font::Tiny);
    display.set_cursor(STATUS_CURSOR.0, STATUS_CURSOR.1);
    display.draw_text(text)
}

/// Black out every row, skipping the separator region
fn clear_background<D>(display: &mut D)
where
    D: DisplaySurface + ?Sized,
{
    let (width, height) = display.dimensions();
    let sep = SEPARATOR_REGION;

    for y in 0..height as i16 {
        if sep.covers_row(y) {
            display.draw_hline(0, y, sep.x as u16, Color565::BLACK);
            let rest = width.saturating_sub(sep.right() as u16);
            display.draw_hline(sep.right(), y, rest, Color565::BLACK);
        } else {
            display.draw_hline(0, y, width, Color565::BLACK);
        }
    }
}

fn draw_two_digits<D>(display: &mut D, x: i16, value: u8) -> Result<(), DisplayError>
where
    D: DisplaySurface + ?Sized,
{
    let mut digits: String<4> = String::new();
    write!(digits, "{:02}", value).map_err(|_| DisplayError::TextOverflow)?;
    display.set_cursor(x, CLOCK_BASELINE);
    display.draw_text(&digits)
}

fn draw_hvac<D>(display: &mut D, mode: HvacMode)
where
    D: DisplaySurface + ?Sized,
{
    match mode {
        HvacMode::Off => {
            for row in 0..HVAC_AREA.height as i16 {
                display.draw_hline(
                    HVAC_AREA.x,
                    HVAC_AREA.y + row,
                    HVAC_AREA.width,
                    Color565::BLACK,
                );
            }
        }
        HvacMode::Heating => {
            for (x, y, width) in HEATING_RUNS {
                display.draw_hline(x, y, width, ORANGE.to_565());
            }
        }
        HvacMode::Cooling => {
            for (x, y, width) in COOLING_RUNS {
                display.draw_hline(x, y, width, LIGHT_BLUE.to_565());
            }
        }
    }
}
