//! Ambient light task
//!
//! Samples the light sensor, publishes the reading, and derives the panel
//! brightness from it. The derived value overwrites any brightness set from
//! the network since the previous sample.

use core::fmt::Write;

use heapless::String;
use matrixclock_protocol::TopicMap;

use crate::state::SharedState;
use crate::traits::{DisplaySurface, LightSensor, SensorError, Transport};

/// Brightness gained per lux
const BRIGHTNESS_PER_LUX: f32 = 5.0;

/// Brightness derived from a light reading
///
/// `minimal + lux * 5`, clamped to 0..=255 with the fraction dropped.
pub fn brightness_from_light(minimal: i32, lux: f32) -> u8 {
    (minimal as f32 + lux * BRIGHTNESS_PER_LUX).clamp(0.0, 255.0) as u8
}

/// Fixed brightness used when no sensor is present
pub fn fallback_brightness(minimal: i32) -> u8 {
    minimal.clamp(0, 255) as u8
}

/// Samples the light sensor
#[derive(Debug, Default)]
pub struct SensorTask {
    last_error: Option<SensorError>,
}

impl SensorTask {
    pub const fn new() -> Self {
        Self { last_error: None }
    }

    /// Error from the most recent read, if it failed
    pub fn last_error(&self) -> Option<SensorError> {
        self.last_error
    }

    pub fn run<S, D, N>(
        &mut self,
        state: &mut SharedState,
        sensor: &mut S,
        display: &mut D,
        transport: &mut N,
        topics: &TopicMap,
    ) where
        S: LightSensor,
        D: DisplaySurface,
        N: Transport,
    {
        if !state.sensor_available {
            return;
        }

        let lux = match sensor.read_lux() {
            Ok(lux) => lux,
            Err(err) => {
                warn!("light sensor read failed: {}", err);
                self.last_error = Some(err);
                state.sensor_valid = false;
                return;
            }
        };
        self.last_error = None;
        state.sensor_valid = true;
        state.ambient_light = lux;

        let mut reading: String<48> = String::new();
        if write!(reading, "{:4.2}", lux).is_ok() {
            if let Err(err) = transport.publish(topics.light.as_str(), reading.as_bytes()) {
                trace!("light reading not published: {}", err);
            }
        }

        let brightness = brightness_from_light(state.minimal_brightness, lux);
        state.brightness = brightness;
        display.set_brightness(brightness);

        state
            .debug_text
            .set_fmt(format_args!("Light: {} B:{}", reading.as_str(), brightness));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockDisplay, MockSensor, MockTransport};
    use crate::traits::TransportError;

    fn available_state() -> SharedState {
        let mut state = SharedState::default();
        state.sensor_available = true;
        state
    }

    #[test]
    fn test_brightness_derivation() {
        assert_eq!(brightness_from_light(4, 60.0), 255);
        assert_eq!(brightness_from_light(4, 10.0), 54);
        assert_eq!(brightness_from_light(4, 0.0), 4);
        assert_eq!(brightness_from_light(-50, 2.0), 0);
        assert_eq!(brightness_from_light(0, 10.39), 51);
    }

    #[test]
    fn test_fallback_brightness() {
        assert_eq!(fallback_brightness(4), 4);
        assert_eq!(fallback_brightness(-3), 0);
        assert_eq!(fallback_brightness(900), 255);
    }

    #[test]
    fn test_sample_updates_state_and_display() {
        let mut state = available_state();
        let mut sensor = MockSensor::new(true).with_readings(&[Ok(10.0)]);
        let mut display = MockDisplay::new();
        let mut transport = MockTransport::new();
        let mut task = SensorTask::new();

        task.run(
            &mut state,
            &mut sensor,
            &mut display,
            &mut transport,
            &TopicMap::default(),
        );

        assert_eq!(state.ambient_light(), 10.0);
        assert_eq!(state.brightness(), 54);
        assert!(state.sensor_valid());
        assert_eq!(display.last_brightness(), Some(54));
        assert_eq!(
            transport.published,
            vec![("home/display/light".to_string(), b"10.00".to_vec())]
        );
        assert_eq!(state.debug_text().as_str(), "Light: 10.00 B:54");
    }

    #[test]
    fn test_short_reading_is_padded() {
        let mut state = available_state();
        let mut sensor = MockSensor::new(true).with_readings(&[Ok(0.5)]);
        let mut display = MockDisplay::new();
        let mut transport = MockTransport::new();

        SensorTask::new().run(
            &mut state,
            &mut sensor,
            &mut display,
            &mut transport,
            &TopicMap::default(),
        );

        assert_eq!(transport.published[0].1, b"0.50".to_vec());
    }

    #[test]
    fn test_publish_failure_ignored() {
        let mut state = available_state();
        let mut sensor = MockSensor::new(true).with_readings(&[Ok(60.0)]);
        let mut display = MockDisplay::new();
        let mut transport = MockTransport::new();
        transport.publish_result = Err(TransportError::NotConnected);

        SensorTask::new().run(
            &mut state,
            &mut sensor,
            &mut display,
            &mut transport,
            &TopicMap::default(),
        );

        assert_eq!(state.brightness(), 255);
        assert_eq!(display.last_brightness(), Some(255));
    }

    #[test]
    fn test_read_failure_keeps_previous_light() {
        let mut state = available_state();
        let mut sensor =
            MockSensor::new(true).with_readings(&[Ok(12.0), Err(SensorError::Bus)]);
        let mut display = MockDisplay::new();
        let mut transport = MockTransport::new();
        let mut task = SensorTask::new();
        let topics = TopicMap::default();

        task.run(&mut state, &mut sensor, &mut display, &mut transport, &topics);
        task.run(&mut state, &mut sensor, &mut display, &mut transport, &topics);

        assert_eq!(task.last_error(), Some(SensorError::Bus));
        assert!(!state.sensor_valid());
        assert_eq!(state.ambient_light(), 12.0);
        assert_eq!(display.brightness.len(), 1);
        assert_eq!(transport.published.len(), 1);
    }

    #[test]
    fn test_unavailable_sensor_is_never_read() {
        let mut state = SharedState::default();
        let mut sensor = MockSensor::new(false).with_readings(&[Ok(5.0)]);
        let mut display = MockDisplay::new();
        let mut transport = MockTransport::new();

        SensorTask::new().run(
            &mut state,
            &mut sensor,
            &mut display,
            &mut transport,
            &TopicMap::default(),
        );

        assert_eq!(sensor.reads, 0);
        assert!(display.brightness.is_empty());
        assert!(transport.published.is_empty());
    }

    #[test]
    fn test_overwrites_network_brightness() {
        let mut state = available_state();
        state.brightness = 200;
        let mut sensor = MockSensor::new(true).with_readings(&[Ok(1.0)]);
        let mut display = MockDisplay::new();
        let mut transport = MockTransport::new();

        SensorTask::new().run(
            &mut state,
            &mut sensor,
            &mut display,
            &mut transport,
            &TopicMap::default(),
        );

        assert_eq!(state.brightness(), 9);
    }
}
