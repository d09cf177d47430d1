//! Display drivers

pub mod framebuffer;
pub mod hub75;

pub use framebuffer::Framebuffer;
pub use hub75::{Hub75, Hub75Pins};
