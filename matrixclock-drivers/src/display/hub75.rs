//! HUB75 RGB matrix row scanner
//!
//! Drives a 1/16-scan panel by shifting out one pair of rows at a time
//! (row `n` on the upper data lines, row `n + H/2` on the lower ones).
//! Colour depth is one bit per channel: a channel is lit when its top
//! bit is set. Brightness is applied as output-enable on-time per row.
//!
//! One scan step:
//!
//! ```text
//!  shift W columns ─► OE high ─► address row ─► latch ─► OE low ─► wait on-time
//! ```

use embedded_hal::digital::{OutputPin, PinState};
use matrixclock_core::traits::Color565;

use super::Framebuffer;

/// Row on-time at full brightness (microseconds)
pub const MAX_ON_TIME_US: u32 = 80;

/// Panel connector pins
pub struct Hub75Pins<P> {
    pub r1: P,
    pub g1: P,
    pub b1: P,
    pub r2: P,
    pub g2: P,
    pub b2: P,
    pub a: P,
    pub b: P,
    pub c: P,
    pub d: P,
    pub clk: P,
    pub lat: P,
    pub oe: P,
}

fn state(on: bool) -> PinState {
    if on {
        PinState::High
    } else {
        PinState::Low
    }
}

/// On-time for a row at the given brightness
pub fn on_time_us(brightness: u8) -> u32 {
    MAX_ON_TIME_US * u32::from(brightness) / 255
}

/// Row-pair scanner
pub struct Hub75<P> {
    pins: Hub75Pins<P>,
    row: usize,
}

impl<P: OutputPin> Hub75<P> {
    pub fn new(pins: Hub75Pins<P>) -> Self {
        Self { pins, row: 0 }
    }

    /// Row pair that the next scan will drive
    pub fn next_row(&self) -> usize {
        self.row
    }

    /// Shift out and latch the next row pair
    ///
    /// The panel is left blanked; call [`Hub75::enable`] to show the row.
    /// Returns the on-time for the frame's brightness.
    pub fn scan_row<const W: usize, const H: usize>(
        &mut self,
        frame: &Framebuffer<W, H>,
    ) -> Result<u32, P::Error> {
        let half = H / 2;
        let row = self.row;

        if let (Some(upper), Some(lower)) = (frame.row(row), frame.row(row + half)) {
            for (top, bottom) in upper.iter().zip(lower.iter()) {
                self.shift_pixel(*top, *bottom)?;
            }
        }

        self.pins.oe.set_high()?;
        self.pins.a.set_state(state(row & 0x1 != 0))?;
        self.pins.b.set_state(state(row & 0x2 != 0))?;
        self.pins.c.set_state(state(row & 0x4 != 0))?;
        self.pins.d.set_state(state(row & 0x8 != 0))?;
        self.pins.lat.set_high()?;
        self.pins.lat.set_low()?;

        self.row = if half == 0 { 0 } else { (row + 1) % half };
        Ok(on_time_us(frame.brightness()))
    }

    /// Light the latched row
    pub fn enable(&mut self) -> Result<(), P::Error> {
        self.pins.oe.set_low()
    }

    /// Blank the panel
    pub fn disable(&mut self) -> Result<(), P::Error> {
        self.pins.oe.set_high()
    }

    fn shift_pixel(&mut self, top: Color565, bottom: Color565) -> Result<(), P::Error> {
        self.pins.r1.set_state(state(top.r5() & 0x10 != 0))?;
        self.pins.g1.set_state(state(top.g6() & 0x20 != 0))?;
        self.pins.b1.set_state(state(top.b5() & 0x10 != 0))?;
        self.pins.r2.set_state(state(bottom.r5() & 0x10 != 0))?;
        self.pins.g2.set_state(state(bottom.g6() & 0x20 != 0))?;
        self.pins.b2.set_state(state(bottom.b5() & 0x10 != 0))?;
        self.pins.clk.set_high()?;
        self.pins.clk.set_low()
    }
}
