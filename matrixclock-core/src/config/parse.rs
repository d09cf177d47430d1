//! Minimal TOML subset parser for the display configuration
//!
//! Handles only what `display.toml` needs:
//! - `[section]` headers
//! - `key = value` pairs (string, integer, boolean)
//! - `#` comments, whole-line or trailing
//!
//! Keys not present keep their default values. Unknown sections or keys
//! are rejected so that typos do not go unnoticed.

use heapless::String;
use matrixclock_protocol::{Topic, TopicName};

use super::types::{ConfigError, DisplayConfig, MAX_CLIENT_PREFIX_LEN};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Tasks,
    Brightness,
    Mqtt,
    Topics,
}

/// Parse configuration text over the defaults and validate the result
pub fn parse_config(input: &str) -> Result<DisplayConfig, ConfigError> {
    let mut config = DisplayConfig::default();
    let mut section = Section::Root;

    for line in input.lines() {
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some(header) = line.strip_prefix('[') {
            let header = strip_comment(header);
            let header = header.strip_suffix(']').ok_or(ConfigError::Syntax)?;
            section = parse_section_header(header)?;
            continue;
        }

        let (key, value) = parse_key_value(line).ok_or(ConfigError::Syntax)?;
        apply_value(&mut config, section, key, value)?;
    }

    config.validate()?;
    Ok(config)
}

fn parse_section_header(header: &str) -> Result<Section, ConfigError> {
    match header.trim() {
        "tasks" => Ok(Section::Tasks),
        "brightness" => Ok(Section::Brightness),
        "mqtt" => Ok(Section::Mqtt),
        "topics" => Ok(Section::Topics),
        _ => Err(ConfigError::UnknownKey),
    }
}

/// Drop a trailing comment that is not inside a string
fn strip_comment(text: &str) -> &str {
    let mut in_string = false;
    for (pos, ch) in text.char_indices() {
        match ch {
            '"' => in_string = !in_string,
            '#' if !in_string => return text[..pos].trim_end(),
            _ => {}
        }
    }
    text.trim_end()
}

fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once('=')?;
    let key = key.trim();
    let value = strip_comment(value.trim());

    if key.is_empty() || value.is_empty() {
        return None;
    }
    Some((key, value))
}

fn parse_string(value: &str) -> Result<&str, ConfigError> {
    value
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .ok_or(ConfigError::InvalidValue)
}

fn parse_int<T: core::str::FromStr>(value: &str) -> Result<T, ConfigError> {
    // TOML allows underscores as digit separators
    let mut digits: String<24> = String::new();
    for ch in value.chars().filter(|&ch| ch != '_') {
        digits.push(ch).map_err(|_| ConfigError::InvalidValue)?;
    }
    digits.parse().map_err(|_| ConfigError::InvalidValue)
}

fn parse_bool(value: &str) -> Result<bool, ConfigError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ConfigError::InvalidValue),
    }
}

fn parse_topic(value: &str) -> Result<TopicName, ConfigError> {
    let name = parse_string(value)?;
    if name.is_empty() {
        return Err(ConfigError::InvalidValue);
    }
    TopicName::try_from(name).map_err(|_| ConfigError::TooLong)
}

fn apply_value(
    config: &mut DisplayConfig,
    section: Section,
    key: &str,
    value: &str,
) -> Result<(), ConfigError> {
    match (section, key) {
        (Section::Tasks, "clock_period_ms") => config.clock_period_ms = parse_int(value)?,
        (Section::Tasks, "blink_period_ms") => config.blink_period_ms = parse_int(value)?,
        (Section::Tasks, "sensor_period_ms") => config.sensor_period_ms = parse_int(value)?,
        (Section::Tasks, "time_sync_period_ms") => {
            config.time_sync_period_ms = parse_int(value)?
        }

        (Section::Brightness, "minimal") => config.minimal_brightness = parse_int(value)?,
        (Section::Brightness, "startup") => config.startup_brightness = parse_int(value)?,

        (Section::Mqtt, "client_id_prefix") => {
            config.client_id_prefix = String::<MAX_CLIENT_PREFIX_LEN>::try_from(
                parse_string(value)?,
            )
            .map_err(|_| ConfigError::TooLong)?;
        }
        (Section::Mqtt, "connect_delay_ms") => config.connect_delay_ms = parse_int(value)?,
        (Section::Mqtt, "connect_timeout_ms") => config.connect_timeout_ms = parse_int(value)?,
        (Section::Mqtt, "subscribe_delay_ms") => config.subscribe_delay_ms = parse_int(value)?,
        (Section::Mqtt, "retry_delay_ms") => config.retry_delay_ms = parse_int(value)?,
        (Section::Mqtt, "report_time_sync") => config.report_time_sync = parse_bool(value)?,

        (Section::Topics, "light") => config.topics.light = parse_topic(value)?,
        (Section::Topics, "status") => config.topics.status = parse_topic(value)?,
        (Section::Topics, key) => {
            let topic = topic_for_key(key).ok_or(ConfigError::UnknownKey)?;
            let name = parse_topic(value)?;
            config.topics.set_name(topic, name.as_str());
        }

        _ => return Err(ConfigError::UnknownKey),
    }
    Ok(())
}

fn topic_for_key(key: &str) -> Option<Topic> {
    match key {
        "temp_in" => Some(Topic::TempIn),
        "temp_out" => Some(Topic::TempOut),
        "brightness" => Some(Topic::Brightness),
        "minimal_brightness" => Some(Topic::MinimalBrightness),
        "cool" => Some(Topic::Cool),
        "heat" => Some(Topic::Heat),
        "debug" => Some(Topic::Debug),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_empty_input_gives_defaults() {
        assert_eq!(parse_config(""), Ok(DisplayConfig::default()));
        assert_eq!(
            parse_config("# nothing here\n\n"),
            Ok(DisplayConfig::default())
        );
    }

    #[test]
    fn test_full_config() {
        let input = r#"
# Matrixclock display configuration

[tasks]
clock_period_ms = 1_000
blink_period_ms = 25      # separator fade
sensor_period_ms = 10000
time_sync_period_ms = 3600000

[brightness]
minimal = -2
startup = 128

[mqtt]
client_id_prefix = "hall-"
connect_delay_ms = 500
connect_timeout_ms = 8000
subscribe_delay_ms = 250
retry_delay_ms = 3000
report_time_sync = true

[topics]
temp_out = "weather/outside"
debug = "hall/#debug"
light = "hall/light"
"#;

        let config = parse_config(input).unwrap();
        assert_eq!(config.clock_period_ms, 1_000);
        assert_eq!(config.blink_period_ms, 25);
        assert_eq!(config.sensor_period_ms, 10_000);
        assert_eq!(config.time_sync_period_ms, 3_600_000);
        assert_eq!(config.minimal_brightness, -2);
        assert_eq!(config.startup_brightness, 128);
        assert_eq!(config.client_id_prefix.as_str(), "hall-");
        assert_eq!(config.connect_delay_ms, 500);
        assert_eq!(config.connect_timeout_ms, 8_000);
        assert_eq!(config.subscribe_delay_ms, 250);
        assert_eq!(config.retry_delay_ms, 3_000);
        assert!(config.report_time_sync);
        assert_eq!(config.topics.name(Topic::TempOut), "weather/outside");
        assert_eq!(config.topics.name(Topic::Debug), "hall/#debug");
        assert_eq!(config.topics.name(Topic::TempIn), "home/display/tempIn");
        assert_eq!(config.topics.light.as_str(), "hall/light");
        assert_eq!(config.topics.status.as_str(), "home/display/status");
    }

    #[test]
    fn test_unknown_section_and_key() {
        assert_eq!(parse_config("[wifi]\n"), Err(ConfigError::UnknownKey));
        assert_eq!(
            parse_config("[tasks]\nclock_period = 5\n"),
            Err(ConfigError::UnknownKey)
        );
        assert_eq!(
            parse_config("clock_period_ms = 5\n"),
            Err(ConfigError::UnknownKey)
        );
        assert_eq!(
            parse_config("[topics]\nhumidity = \"x\"\n"),
            Err(ConfigError::UnknownKey)
        );
    }

    #[test]
    fn test_malformed_lines() {
        assert_eq!(parse_config("[tasks\n"), Err(ConfigError::Syntax));
        assert_eq!(parse_config("[tasks]\nblink_period_ms\n"), Err(ConfigError::Syntax));
        assert_eq!(parse_config("[tasks]\nblink_period_ms =\n"), Err(ConfigError::Syntax));
    }

    #[test]
    fn test_invalid_values() {
        assert_eq!(
            parse_config("[tasks]\nblink_period_ms = fast\n"),
            Err(ConfigError::InvalidValue)
        );
        assert_eq!(
            parse_config("[tasks]\nblink_period_ms = -1\n"),
            Err(ConfigError::InvalidValue)
        );
        assert_eq!(
            parse_config("[brightness]\nstartup = 300\n"),
            Err(ConfigError::InvalidValue)
        );
        assert_eq!(
            parse_config("[mqtt]\nreport_time_sync = yes\n"),
            Err(ConfigError::InvalidValue)
        );
        assert_eq!(
            parse_config("[topics]\nheat = home/heat\n"),
            Err(ConfigError::InvalidValue)
        );
        assert_eq!(
            parse_config("[topics]\nheat = \"\"\n"),
            Err(ConfigError::InvalidValue)
        );
    }

    #[test]
    fn test_too_long_strings() {
        assert_eq!(
            parse_config("[mqtt]\nclient_id_prefix = \"a-very-long-client-prefix\"\n"),
            Err(ConfigError::TooLong)
        );
        let long_topic = format!("[topics]\ncool = \"{}\"\n", "t".repeat(49));
        assert_eq!(parse_config(&long_topic), Err(ConfigError::TooLong));
    }

    #[test]
    fn test_zero_period_rejected_after_parse() {
        assert_eq!(
            parse_config("[tasks]\nclock_period_ms = 0\n"),
            Err(ConfigError::ZeroPeriod)
        );
    }

    #[test]
    fn test_strip_comment_respects_strings() {
        assert_eq!(strip_comment("\"a#b\" # note"), "\"a#b\"");
        assert_eq!(strip_comment("42 # note"), "42");
        assert_eq!(strip_comment("42"), "42");
    }

    proptest! {
        #[test]
        fn parse_never_panics(input in "[\\[\\]a-z_=\"#0-9 \n-]{0,200}") {
            let _ = parse_config(&input);
        }

        #[test]
        fn periods_round_trip(clock in 1u32..=u32::MAX, blink in 1u32..100_000) {
            let input = format!(
                "[tasks]\nclock_period_ms = {}\nblink_period_ms = {}\n",
                clock, blink
            );
            let config = parse_config(&input).unwrap();
            prop_assert_eq!(config.clock_period_ms, clock);
            prop_assert_eq!(config.blink_period_ms, blink);
        }
    }
}
