//! The shared state record

use core::fmt::{self, Write};

use heapless::String;

use super::colon::ColonPhase;
use crate::config::DEFAULT_MINIMAL_BRIGHTNESS;
use crate::traits::LocalTime;

/// Debug text capacity in bytes, excluding the terminator
pub const DEBUG_TEXT_CAPACITY: usize = 19;

/// Displayed hour and minute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WallClock {
    pub hour: u8,
    pub minute: u8,
}

impl From<LocalTime> for WallClock {
    fn from(time: LocalTime) -> Self {
        Self {
            hour: time.hour,
            minute: time.minute,
        }
    }
}

/// HVAC indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HvacMode {
    #[default]
    Off,
    Heating,
    Cooling,
}

/// Bounded on-screen debug line
///
/// Holds at most [`DEBUG_TEXT_CAPACITY`] bytes; longer writes are
/// truncated on a character boundary instead of failing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DebugText(String<DEBUG_TEXT_CAPACITY>);

impl DebugText {
    pub const fn new() -> Self {
        Self(String::new())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Replace the contents with formatted text
    pub fn set_fmt(&mut self, args: fmt::Arguments<'_>) {
        self.0.clear();
        // Truncation is reported as Ok by write_str
        let _ = self.write_fmt(args);
    }

    /// NUL-terminated copy for C-style consumers
    pub fn to_c_bytes(&self) -> [u8; DEBUG_TEXT_CAPACITY + 1] {
        let mut out = [0u8; DEBUG_TEXT_CAPACITY + 1];
        let bytes = self.0.as_bytes();
        out[..bytes.len()].copy_from_slice(bytes);
        out
    }
}

impl Write for DebugText {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for ch in s.chars() {
            if self.0.push(ch).is_err() {
                break;
            }
        }
        Ok(())
    }
}

/// Display state shared by tasks and the inbound handler
///
/// Each field has a single writer except `brightness`, which the sensor
/// task and the brightness topic both set; whichever runs last wins.
#[derive(Debug, Clone)]
pub struct SharedState {
    pub(crate) wall_clock: WallClock,
    pub(crate) ambient_light: f32,
    pub(crate) brightness: u8,
    pub(crate) minimal_brightness: i32,
    pub(crate) temp_in: f32,
    pub(crate) temp_out: f32,
    pub(crate) hvac_mode: HvacMode,
    pub(crate) colon: ColonPhase,
    pub(crate) debug_text: DebugText,
    pub(crate) debug_enabled: bool,
    pub(crate) sensor_available: bool,
    pub(crate) sensor_valid: bool,
}

impl Default for SharedState {
    fn default() -> Self {
        Self::new(DEFAULT_MINIMAL_BRIGHTNESS)
    }
}

impl SharedState {
    /// Create the state with every field at its default
    pub fn new(minimal_brightness: i32) -> Self {
        Self {
            wall_clock: WallClock::default(),
            ambient_light: 0.0,
            brightness: 0,
            minimal_brightness,
            temp_in: 0.0,
            temp_out: 0.0,
            hvac_mode: HvacMode::Off,
            colon: ColonPhase::new(),
            debug_text: DebugText::new(),
            debug_enabled: false,
            sensor_available: false,
            sensor_valid: false,
        }
    }

    /// Night mode: the light sensor reads exactly zero
    ///
    /// This is the only input to palette selection.
    pub fn is_night(&self) -> bool {
        self.ambient_light == 0.0
    }

    pub fn wall_clock(&self) -> WallClock {
        self.wall_clock
    }

    /// Last ambient light reading in lux
    pub fn ambient_light(&self) -> f32 {
        self.ambient_light
    }

    pub fn brightness(&self) -> u8 {
        self.brightness
    }

    pub fn minimal_brightness(&self) -> i32 {
        self.minimal_brightness
    }

    /// Inside temperature (°C)
    pub fn temp_in(&self) -> f32 {
        self.temp_in
    }

    /// Outside temperature (°C)
    pub fn temp_out(&self) -> f32 {
        self.temp_out
    }

    pub fn hvac_mode(&self) -> HvacMode {
        self.hvac_mode
    }

    pub fn colon(&self) -> ColonPhase {
        self.colon
    }

    pub fn debug_text(&self) -> &DebugText {
        &self.debug_text
    }

    pub fn debug_enabled(&self) -> bool {
        self.debug_enabled
    }

    /// Sensor passed its startup probe
    pub fn sensor_available(&self) -> bool {
        self.sensor_available
    }

    /// Last sensor read succeeded
    pub fn sensor_valid(&self) -> bool {
        self.sensor_valid
    }
}
