//! Day and night palettes

use crate::state::SharedState;
use crate::traits::Color565;

/// Outside temperatures above this use the warm accent (°C)
pub const WARM_ABOVE_C: f32 = 23.0;

/// Outside temperatures below this use the cold accent (°C)
pub const COLD_BELOW_C: f32 = 2.0;

/// 8-bit RGB triple
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn to_565(self) -> Color565 {
        Color565::from_rgb(self.r, self.g, self.b)
    }
}

pub const ORANGE: Rgb = Rgb::new(255, 100, 0);
pub const LIGHT_BLUE: Rgb = Rgb::new(30, 144, 255);
pub const CLOCK_NIGHT: Rgb = Rgb::new(255, 30, 0);

/// Colour set for one lighting condition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    /// Clock digits and the separator base hue
    pub clock: Rgb,
    /// Inside temperature and mild outside temperature
    pub neutral: Color565,
    /// Outside temperature above [`WARM_ABOVE_C`]
    pub warm: Color565,
    /// Outside temperature below [`COLD_BELOW_C`]
    pub cold: Color565,
}

impl Palette {
    pub const DAY: Palette = Palette {
        clock: ORANGE,
        neutral: Color565::WHITE,
        warm: ORANGE.to_565(),
        cold: LIGHT_BLUE.to_565(),
    };

    pub const NIGHT: Palette = Palette {
        clock: CLOCK_NIGHT,
        neutral: ORANGE.to_565(),
        warm: ORANGE.to_565(),
        cold: Color565::from_rgb(40, 60, 160),
    };

    /// Pick the palette for the current light level
    pub fn select(state: &SharedState) -> &'static Palette {
        if state.is_night() {
            &Self::NIGHT
        } else {
            &Self::DAY
        }
    }

    /// Colour for an outside temperature reading
    ///
    /// Thresholds are strict: exactly 23 °C and exactly 2 °C are neutral.
    pub fn outside(&self, temp_c: f32) -> Color565 {
        if temp_c > WARM_ABOVE_C {
            self.warm
        } else if temp_c < COLD_BELOW_C {
            self.cold
        } else {
            self.neutral
        }
    }
}
