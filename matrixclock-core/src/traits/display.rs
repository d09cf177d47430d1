//! Display surface trait for the RGB matrix

/// Errors that can occur while drawing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Text did not fit the formatting buffer
    TextOverflow,
    /// Glyph not available in the selected font
    UnsupportedGlyph,
    /// Panel or bus failure
    Bus,
}

/// 16-bit RGB-565 packed colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Color565(pub u16);

impl Color565 {
    pub const BLACK: Self = Self(0);
    pub const WHITE: Self = Self::from_rgb(255, 255, 255);

    /// Pack 8-bit channels, dropping the low bits
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self((((r & 0xF8) as u16) << 8) | (((g & 0xFC) as u16) << 3) | ((b >> 3) as u16))
    }

    /// Red channel (5 bits)
    pub const fn r5(self) -> u8 {
        (self.0 >> 11) as u8
    }

    /// Green channel (6 bits)
    pub const fn g6(self) -> u8 {
        ((self.0 >> 5) & 0x3F) as u8
    }

    /// Blue channel (5 bits)
    pub const fn b5(self) -> u8 {
        (self.0 & 0x1F) as u8
    }
}

/// Text fonts available on the surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Font {
    /// Clock digits and separator
    Large,
    /// Temperature line
    Small,
    /// Status and debug text
    Tiny,
}

impl Font {
    /// Horizontal cursor advance per character in pixels
    pub const fn advance(self) -> i16 {
        match self {
            Font::Large => 9,
            Font::Small => 6,
            Font::Tiny => 4,
        }
    }
}

/// Trait for a fixed-size addressable bitmap
///
/// Text is positioned by its baseline: `set_cursor` selects the left end
/// of the baseline and `draw_text` advances the cursor past the drawn text.
/// Drawing outside the surface is clipped silently.
pub trait DisplaySurface {
    /// Fill the whole surface with black
    fn clear(&mut self);

    /// Move the text cursor
    fn set_cursor(&mut self, x: i16, y: i16);

    /// Select the text foreground colour
    fn set_text_color(&mut self, color: Color565);

    /// Select the text font
    fn set_font(&mut self, font: Font);

    /// Draw text at the cursor and advance it
    fn draw_text(&mut self, text: &str) -> Result<(), DisplayError>;

    /// Draw a horizontal run of `width` pixels starting at (`x`, `y`)
    fn draw_hline(&mut self, x: i16, y: i16, width: u16, color: Color565);

    /// Set the global panel brightness
    fn set_brightness(&mut self, level: u8);

    /// Surface size as (width, height)
    fn dimensions(&self) -> (u16, u16);
}
