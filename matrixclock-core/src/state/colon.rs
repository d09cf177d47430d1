//! Separator glyph fade animation

/// Lowest fade step
pub const MIN_STEP: u8 = 1;

/// Highest fade step
pub const MAX_STEP: u8 = 50;

/// Fade phase of the blinking separator
///
/// Bounces within `[MIN_STEP, MAX_STEP]`, reversing exactly at each bound:
/// 1, 2, .., 50, 49, .., 1, 2, ..
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ColonPhase {
    value: u8,
    rising: bool,
}

impl Default for ColonPhase {
    fn default() -> Self {
        Self::new()
    }
}

impl ColonPhase {
    /// Start at the lowest step, rising
    pub const fn new() -> Self {
        Self {
            value: MIN_STEP,
            rising: true,
        }
    }

    /// Current step
    pub const fn value(&self) -> u8 {
        self.value
    }

    /// Check if the phase is currently rising
    pub const fn is_rising(&self) -> bool {
        self.rising
    }

    /// Move one step and return the new value
    pub fn advance(&mut self) -> u8 {
        if self.rising && self.value >= MAX_STEP {
            self.rising = false;
        } else if !self.rising && self.value <= MIN_STEP {
            self.rising = true;
        }

        if self.rising {
            self.value += 1;
        } else {
            self.value -= 1;
        }
        self.value
    }

    /// Scale an 8-bit colour channel by the current step
    pub const fn scale(&self, channel: u8) -> u8 {
        (channel as u16 * self.value as u16 / MAX_STEP as u16) as u8
    }
}
