//! Configuration loading
//!
//! The configuration is compiled in from `display.toml` (validated by the
//! build script) and parsed once at boot.

use defmt::*;

use matrixclock_core::config::{parse_config, DisplayConfig};

/// Embedded configuration
/// Edit display.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../display.toml");

/// Parse the embedded configuration, falling back to defaults
pub fn load_config() -> DisplayConfig {
    match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => {
            info!("Parsed embedded configuration successfully");
            config
        }
        Err(e) => {
            error!("Failed to parse embedded config: {:?}", e);
            error!("Using built-in defaults");
            DisplayConfig::default()
        }
    }
}
