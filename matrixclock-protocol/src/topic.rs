//! MQTT topics consumed by the display
//!
//! Topic names are deployment specific, so they live in configuration.
//! [`TopicMap`] resolves an incoming topic string to a [`Topic`] by exact
//! comparison; there is no wildcard matching.

use heapless::String;

#[cfg(feature = "defmt")]
use defmt::Format;
use serde::{Deserialize, Serialize};

/// Maximum topic name length
pub const MAX_TOPIC_LEN: usize = 48;

/// Owned topic name
pub type TopicName = String<MAX_TOPIC_LEN>;

/// Inbound topics the display subscribes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(Format))]
pub enum Topic {
    /// Inside temperature (°C, decimal text)
    TempIn,
    /// Outside temperature (°C, decimal text)
    TempOut,
    /// Explicit display brightness override (0-255)
    Brightness,
    /// Floor added to the light-derived brightness
    MinimalBrightness,
    /// Cooling state, "On" means cooling
    Cool,
    /// Heating state, "1" means heating
    Heat,
    /// On-screen debug text visibility
    Debug,
}

impl Topic {
    /// Every inbound topic, in subscription order
    pub const ALL: [Topic; 7] = [
        Topic::TempOut,
        Topic::TempIn,
        Topic::Heat,
        Topic::Cool,
        Topic::Brightness,
        Topic::MinimalBrightness,
        Topic::Debug,
    ];

    /// Default topic name
    pub const fn default_name(self) -> &'static str {
        match self {
            Topic::TempIn => "home/display/tempIn",
            Topic::TempOut => "home/display/tempOut",
            Topic::Brightness => "home/display/brightness",
            Topic::MinimalBrightness => "home/display/minimalBrightness",
            Topic::Cool => "home/display/cool",
            Topic::Heat => "home/display/heat",
            Topic::Debug => "home/display/debug",
        }
    }

    const fn index(self) -> usize {
        match self {
            Topic::TempIn => 0,
            Topic::TempOut => 1,
            Topic::Brightness => 2,
            Topic::MinimalBrightness => 3,
            Topic::Cool => 4,
            Topic::Heat => 5,
            Topic::Debug => 6,
        }
    }
}

/// Configured topic names
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicMap {
    inbound: [TopicName; 7],
    /// Published ambient light readings
    pub light: TopicName,
    /// Published status reports (time sync completion)
    pub status: TopicName,
}

impl Default for TopicMap {
    fn default() -> Self {
        let mut inbound: [TopicName; 7] = Default::default();
        for topic in Topic::ALL {
            inbound[topic.index()] = truncated(topic.default_name());
        }

        Self {
            inbound,
            light: truncated("home/display/light"),
            status: truncated("home/display/status"),
        }
    }
}

impl TopicMap {
    /// Name configured for an inbound topic
    pub fn name(&self, topic: Topic) -> &str {
        self.inbound[topic.index()].as_str()
    }

    /// Configure the name of an inbound topic
    ///
    /// Returns `false` (leaving the old name) if `name` is empty or longer
    /// than [`MAX_TOPIC_LEN`].
    pub fn set_name(&mut self, topic: Topic, name: &str) -> bool {
        match TopicName::try_from(name) {
            Ok(value) if !value.is_empty() => {
                self.inbound[topic.index()] = value;
                true
            }
            _ => false,
        }
    }

    /// Resolve an incoming topic string
    ///
    /// Comparison is exact and case sensitive.
    pub fn resolve(&self, name: &str) -> Option<Topic> {
        Topic::ALL
            .into_iter()
            .find(|topic| self.inbound[topic.index()].as_str() == name)
    }

    /// Inbound topics with their configured names, in subscription order
    pub fn subscriptions(&self) -> impl Iterator<Item = (Topic, &str)> {
        Topic::ALL
            .into_iter()
            .map(move |topic| (topic, self.name(topic)))
    }
}

fn truncated(name: &str) -> TopicName {
    let mut out = TopicName::new();
    for ch in name.chars() {
        if out.push(ch).is_err() {
            break;
        }
    }
    out
}
