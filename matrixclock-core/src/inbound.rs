//! Inbound telemetry handling
//!
//! Messages are delivered one at a time and each runs to completion
//! before the next. Topic lookup is exact; unknown topics are dropped
//! without comment. Numeric payloads follow the parse-or-default policy
//! from [`matrixclock_protocol::payload`], so a malformed value becomes
//! zero instead of leaving the previous one in place.

use matrixclock_protocol::{
    is_switch_on, parse_f32_or_default, parse_i32_or_default, PayloadSwitch, Topic, TopicMap,
};

use crate::state::{HvacMode, SharedState};
use crate::traits::DisplaySurface;

/// Apply one inbound message to the shared state
///
/// Returns the topic the message was recognized as.
pub fn handle<D>(
    state: &mut SharedState,
    display: &mut D,
    topics: &TopicMap,
    topic: &str,
    payload: &[u8],
) -> Option<Topic>
where
    D: DisplaySurface + ?Sized,
{
    let resolved = topics.resolve(topic)?;

    match resolved {
        Topic::TempIn => state.temp_in = parse_f32_or_default(payload),
        Topic::TempOut => state.temp_out = parse_f32_or_default(payload),
        Topic::Brightness => {
            let level = parse_i32_or_default(payload).clamp(0, 255) as u8;
            state.brightness = level;
            display.set_brightness(level);
        }
        Topic::MinimalBrightness => state.minimal_brightness = parse_i32_or_default(payload),
        Topic::Cool => {
            state.hvac_mode = if is_switch_on(payload, PayloadSwitch::OnWord) {
                HvacMode::Cooling
            } else {
                HvacMode::Off
            };
        }
        Topic::Heat => {
            state.hvac_mode = if is_switch_on(payload, PayloadSwitch::One) {
                HvacMode::Heating
            } else {
                HvacMode::Off
            };
        }
        Topic::Debug => state.debug_enabled = is_switch_on(payload, PayloadSwitch::Lenient),
    }

    trace!("inbound {}", resolved);
    Some(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockDisplay;

    fn deliver(state: &mut SharedState, topic: &str, payload: &[u8]) -> Option<Topic> {
        let mut display = MockDisplay::new();
        handle(state, &mut display, &TopicMap::default(), topic, payload)
    }

    #[test]
    fn test_temperatures() {
        let mut state = SharedState::default();
        deliver(&mut state, "home/display/tempIn", b"21.5");
        deliver(&mut state, "home/display/tempOut", b"-7.25");
        assert_eq!(state.temp_in(), 21.5);
        assert_eq!(state.temp_out(), -7.25);
    }

    #[test]
    fn test_malformed_temperature_is_zero() {
        let mut state = SharedState::default();
        state.temp_out = 15.0;
        deliver(&mut state, "home/display/tempOut", b"");
        assert_eq!(state.temp_out(), 0.0);

        state.temp_out = 15.0;
        deliver(&mut state, "home/display/tempOut", b"warm");
        assert_eq!(state.temp_out(), 0.0);
    }

    #[test]
    fn test_cool_topic() {
        let mut state = SharedState::default();
        deliver(&mut state, "home/display/cool", b"On");
        assert_eq!(state.hvac_mode(), HvacMode::Cooling);

        for payload in [&b"Off"[..], b"on", b"1", b""] {
            state.hvac_mode = HvacMode::Cooling;
            deliver(&mut state, "home/display/cool", payload);
            assert_eq!(state.hvac_mode(), HvacMode::Off);
        }
    }

    #[test]
    fn test_heat_topic() {
        let mut state = SharedState::default();
        deliver(&mut state, "home/display/heat", b"1");
        assert_eq!(state.hvac_mode(), HvacMode::Heating);

        for payload in [&b"0"[..], b"On", b"true", b""] {
            state.hvac_mode = HvacMode::Heating;
            deliver(&mut state, "home/display/heat", payload);
            assert_eq!(state.hvac_mode(), HvacMode::Off);
        }
    }

    #[test]
    fn test_last_hvac_message_wins() {
        let mut state = SharedState::default();
        deliver(&mut state, "home/display/heat", b"1");
        deliver(&mut state, "home/display/cool", b"On");
        assert_eq!(state.hvac_mode(), HvacMode::Cooling);

        deliver(&mut state, "home/display/heat", b"1");
        assert_eq!(state.hvac_mode(), HvacMode::Heating);

        deliver(&mut state, "home/display/cool", b"Off");
        assert_eq!(state.hvac_mode(), HvacMode::Off);
    }

    #[test]
    fn test_brightness_clamped_and_applied() {
        let mut state = SharedState::default();
        let mut display = MockDisplay::new();
        let topics = TopicMap::default();

        handle(&mut state, &mut display, &topics, "home/display/brightness", b"128");
        assert_eq!(state.brightness(), 128);

        handle(&mut state, &mut display, &topics, "home/display/brightness", b"999");
        assert_eq!(state.brightness(), 255);

        handle(&mut state, &mut display, &topics, "home/display/brightness", b"-4");
        assert_eq!(state.brightness(), 0);

        assert_eq!(display.brightness, vec![128, 255, 0]);
    }

    #[test]
    fn test_minimal_brightness() {
        let mut state = SharedState::default();
        deliver(&mut state, "home/display/minimalBrightness", b"20");
        assert_eq!(state.minimal_brightness(), 20);

        deliver(&mut state, "home/display/minimalBrightness", b"x");
        assert_eq!(state.minimal_brightness(), 0);
    }

    #[test]
    fn test_debug_switch_sets_not_toggles() {
        let mut state = SharedState::default();
        deliver(&mut state, "home/display/debug", b"1");
        assert!(state.debug_enabled());
        deliver(&mut state, "home/display/debug", b"On");
        assert!(state.debug_enabled());
        deliver(&mut state, "home/display/debug", b"0");
        assert!(!state.debug_enabled());
    }

    #[test]
    fn test_unknown_topic_ignored() {
        let mut state = SharedState::default();
        let mut display = MockDisplay::new();
        let before = state.clone();

        let resolved = handle(
            &mut state,
            &mut display,
            &TopicMap::default(),
            "home/display/tempOut/extra",
            b"30",
        );

        assert_eq!(resolved, None);
        assert_eq!(state.temp_out(), before.temp_out());
        assert!(display.brightness.is_empty());
    }

    #[test]
    fn test_custom_topic_names() {
        let mut topics = TopicMap::default();
        assert!(topics.set_name(Topic::TempOut, "weather/outside"));
        let mut state = SharedState::default();
        let mut display = MockDisplay::new();

        let resolved = handle(&mut state, &mut display, &topics, "weather/outside", b"3.5");
        assert_eq!(resolved, Some(Topic::TempOut));
        assert_eq!(state.temp_out(), 3.5);

        assert_eq!(
            handle(&mut state, &mut display, &topics, "home/display/tempOut", b"9"),
            None
        );
    }
}
