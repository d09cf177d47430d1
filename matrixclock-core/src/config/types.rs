//! Configuration type definitions

use heapless::String;
use matrixclock_protocol::TopicMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum client id prefix length
pub const MAX_CLIENT_PREFIX_LEN: usize = 16;

/// Default floor for light-derived brightness
pub const DEFAULT_MINIMAL_BRIGHTNESS: i32 = 4;

/// Errors that can occur loading or validating configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// A task period or delay is zero
    ZeroPeriod,
    /// Malformed line
    Syntax,
    /// Key not recognized
    UnknownKey,
    /// Value has the wrong type or is out of range
    InvalidValue,
    /// String value longer than its field
    TooLong,
}

/// Display configuration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DisplayConfig {
    /// Full redraw period (ms)
    pub clock_period_ms: u32,
    /// Separator fade step period (ms)
    pub blink_period_ms: u32,
    /// Light sensor sampling period (ms)
    pub sensor_period_ms: u32,
    /// Network time resync period (ms)
    pub time_sync_period_ms: u32,
    /// Initial floor for light-derived brightness
    pub minimal_brightness: i32,
    /// Brightness applied at startup when the sensor is present
    pub startup_brightness: u8,
    /// Topic names
    pub topics: TopicMap,
    /// Broker client id prefix, followed by a hex suffix
    pub client_id_prefix: String<MAX_CLIENT_PREFIX_LEN>,
    /// Pause before each connection attempt (ms)
    pub connect_delay_ms: u32,
    /// Give up on a pending connection attempt after this long (ms)
    pub connect_timeout_ms: u32,
    /// Pause between connecting and subscribing (ms)
    pub subscribe_delay_ms: u32,
    /// Backoff after a failed attempt (ms)
    pub retry_delay_ms: u32,
    /// Publish a status message after each time sync request
    pub report_time_sync: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        let mut client_id_prefix = String::new();
        let _ = client_id_prefix.push_str("iotdisplay-");

        Self {
            clock_period_ms: 2_000,
            blink_period_ms: 20,
            sensor_period_ms: 5_000,
            time_sync_period_ms: 4 * 60 * 60 * 1_000,
            minimal_brightness: DEFAULT_MINIMAL_BRIGHTNESS,
            startup_brightness: 255,
            topics: TopicMap::default(),
            client_id_prefix,
            connect_delay_ms: 1_000,
            connect_timeout_ms: 10_000,
            subscribe_delay_ms: 1_000,
            retry_delay_ms: 5_000,
            report_time_sync: false,
        }
    }
}

impl DisplayConfig {
    /// Check that every period and delay is usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        let periods = [
            self.clock_period_ms,
            self.blink_period_ms,
            self.sensor_period_ms,
            self.time_sync_period_ms,
            self.connect_timeout_ms,
        ];
        if periods.contains(&0) {
            return Err(ConfigError::ZeroPeriod);
        }
        Ok(())
    }
}
