//! RGB-565 framebuffer
//!
//! Holds one full frame for the panel scanner and implements both the
//! core [`DisplaySurface`] and `embedded-graphics` [`DrawTarget`], so text
//! goes through the `embedded-graphics` mono fonts.

use core::convert::Infallible;

use embedded_graphics::mono_font::iso_8859_1::{FONT_4X6, FONT_6X10, FONT_9X15};
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::raw::RawU16;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use embedded_graphics::text::{Baseline, Text};
use matrixclock_core::traits::{Color565, DisplayError, DisplaySurface, Font};

/// Mono font backing each core font size
fn mono_font(font: Font) -> &'static MonoFont<'static> {
    match font {
        Font::Large => &FONT_9X15,
        Font::Small => &FONT_6X10,
        Font::Tiny => &FONT_4X6,
    }
}

fn to_rgb565(color: Color565) -> Rgb565 {
    Rgb565::from(RawU16::new(color.0))
}

/// In-memory frame of `W` x `H` pixels
pub struct Framebuffer<const W: usize, const H: usize> {
    pixels: [[Color565; W]; H],
    cursor: Point,
    text_color: Color565,
    font: Font,
    brightness: u8,
}

impl<const W: usize, const H: usize> Framebuffer<W, H> {
    pub const fn new() -> Self {
        Self {
            pixels: [[Color565::BLACK; W]; H],
            cursor: Point::zero(),
            text_color: Color565::WHITE,
            font: Font::Small,
            brightness: 0,
        }
    }

    /// Pixel at (x, y), or `None` outside the frame
    pub fn pixel(&self, x: usize, y: usize) -> Option<Color565> {
        self.pixels.get(y).and_then(|row| row.get(x)).copied()
    }

    /// One row of pixels, for the panel scanner
    pub fn row(&self, y: usize) -> Option<&[Color565; W]> {
        self.pixels.get(y)
    }

    pub fn brightness(&self) -> u8 {
        self.brightness
    }

    /// Current text cursor
    pub fn cursor(&self) -> (i16, i16) {
        (self.cursor.x as i16, self.cursor.y as i16)
    }

    fn put(&mut self, x: i32, y: i32, color: Color565) {
        if x < 0 || y < 0 {
            return;
        }
        if let Some(px) = self
            .pixels
            .get_mut(y as usize)
            .and_then(|row| row.get_mut(x as usize))
        {
            *px = color;
        }
    }
}

impl<const W: usize, const H: usize> Default for Framebuffer<W, H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const W: usize, const H: usize> OriginDimensions for Framebuffer<W, H> {
    fn size(&self) -> Size {
        Size::new(W as u32, H as u32)
    }
}

impl<const W: usize, const H: usize> DrawTarget for Framebuffer<W, H> {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            self.put(point.x, point.y, Color565(RawU16::from(color).into_inner()));
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        let area = area.intersection(&self.bounding_box());
        let Some(bottom_right) = area.bottom_right() else {
            return Ok(());
        };
        let raw = Color565(RawU16::from(color).into_inner());
        for y in area.top_left.y..=bottom_right.y {
            for x in area.top_left.x..=bottom_right.x {
                self.put(x, y, raw);
            }
        }
        Ok(())
    }
}

impl<const W: usize, const H: usize> DisplaySurface for Framebuffer<W, H> {
    fn clear(&mut self) {
        self.pixels = [[Color565::BLACK; W]; H];
        self.cursor = Point::zero();
    }

    fn set_cursor(&mut self, x: i16, y: i16) {
        self.cursor = Point::new(i32::from(x), i32::from(y));
    }

    fn set_text_color(&mut self, color: Color565) {
        self.text_color = color;
    }

    fn set_font(&mut self, font: Font) {
        self.font = font;
    }

    fn draw_text(&mut self, text: &str) -> Result<(), DisplayError> {
        let style = MonoTextStyle::new(mono_font(self.font), to_rgb565(self.text_color));
        match Text::with_baseline(text, self.cursor, style, Baseline::Alphabetic).draw(self) {
            Ok(next) => self.cursor = next,
            Err(never) => match never {},
        }
        Ok(())
    }

    fn draw_hline(&mut self, x: i16, y: i16, width: u16, color: Color565) {
        let (x, y) = (i32::from(x), i32::from(y));
        for dx in 0..i32::from(width) {
            self.put(x + dx, y, color);
        }
    }

    fn set_brightness(&mut self, level: u8) {
        self.brightness = level;
    }

    fn dimensions(&self) -> (u16, u16) {
        (W as u16, H as u16)
    }
}
