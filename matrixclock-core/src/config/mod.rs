//! Configuration types
//!
//! Board-agnostic configuration structures, plus the parser the firmware
//! uses for its embedded `display.toml`.

pub mod parse;
pub mod types;

pub use parse::parse_config;
pub use types::*;
