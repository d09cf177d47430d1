//! Shared panel framebuffer
//!
//! The application draws into [`FRAMEBUFFER`] through [`SharedPanel`];
//! the panel task scans it out row by row. Each access holds the lock
//! only for one drawing call.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;

use matrixclock_core::traits::{Color565, DisplayError, DisplaySurface, Font};
use matrixclock_drivers::display::Framebuffer;

/// Panel width in pixels
pub const PANEL_WIDTH: usize = 64;

/// Panel height in pixels
pub const PANEL_HEIGHT: usize = 32;

pub type PanelBuffer = Framebuffer<PANEL_WIDTH, PANEL_HEIGHT>;

/// Frame shown on the panel
pub static FRAMEBUFFER: Mutex<CriticalSectionRawMutex, RefCell<PanelBuffer>> =
    Mutex::new(RefCell::new(Framebuffer::new()));

/// Drawing handle for the shared framebuffer
#[derive(Debug, Default, Clone, Copy)]
pub struct SharedPanel;

impl SharedPanel {
    fn with<R>(&self, f: impl FnOnce(&mut PanelBuffer) -> R) -> R {
        FRAMEBUFFER.lock(|fb| f(&mut fb.borrow_mut()))
    }
}

impl DisplaySurface for SharedPanel {
    fn clear(&mut self) {
        self.with(|fb| fb.clear())
    }

    fn set_cursor(&mut self, x: i16, y: i16) {
        self.with(|fb| fb.set_cursor(x, y))
    }

    fn set_text_color(&mut self, color: Color565) {
        self.with(|fb| fb.set_text_color(color))
    }

    fn set_font(&mut self, font: Font) {
        self.with(|fb| fb.set_font(font))
    }

    fn draw_text(&mut self, text: &str) -> Result<(), DisplayError> {
        self.with(|fb| fb.draw_text(text))
    }

    fn draw_hline(&mut self, x: i16, y: i16, width: u16, color: Color565) {
        self.with(|fb| fb.draw_hline(x, y, width, color))
    }

    fn set_brightness(&mut self, level: u8) {
        self.with(|fb| fb.set_brightness(level))
    }

    fn dimensions(&self) -> (u16, u16) {
        (PANEL_WIDTH as u16, PANEL_HEIGHT as u16)
    }
}
