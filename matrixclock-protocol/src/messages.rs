//! Message types for the bridge link
//!
//! Message types are divided into two directions:
//! - Bridge → controller: [`BridgeEvent`] (broker messages, link status, time)
//! - Controller → bridge: [`ControllerRequest`] (connect, subscribe, publish)
//!
//! Both are postcard-encoded into a [`Frame`] payload. Borrowed variants
//! point into the frame they were decoded from; [`InboundMessage`] is the
//! owned copy that crosses task boundaries.

use crate::frame::{Frame, FrameError, MAX_FRAME_PAYLOAD};
use crate::topic::TopicName;
use heapless::Vec;
use serde::{Deserialize, Serialize};

/// Maximum inbound payload kept per message
///
/// Telemetry values are short decimal strings; anything longer is cut.
pub const MAX_MESSAGE_PAYLOAD: usize = 64;

/// Local calendar time as reported by the bridge's NTP client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LocalDateTime {
    pub year: u16,
    /// 1-12
    pub month: u8,
    /// 1-31
    pub day: u8,
    /// 0 = Monday
    pub weekday: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

/// Events from the bridge to the controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BridgeEvent<'a> {
    /// A message arrived on a subscribed topic
    Message { topic: &'a str, payload: &'a [u8] },
    /// Broker session established
    Connected,
    /// Connection attempt was rejected or timed out
    ConnectFailed,
    /// Broker session lost
    Disconnected,
    /// Network time after a sync request
    Time(LocalDateTime),
}

/// Requests from the controller to the bridge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ControllerRequest<'a> {
    /// Open a broker session with this client id
    Connect { client_id: &'a str },
    /// Subscribe to a topic
    Subscribe { topic: &'a str },
    /// Publish a payload on a topic
    Publish { topic: &'a str, payload: &'a [u8] },
    /// Ask for a network time sync
    SyncTime,
}

impl<'a> BridgeEvent<'a> {
    /// Encode this event into a frame
    pub fn to_frame(&self) -> Result<Frame, FrameError> {
        encode(Frame::EVENT, self)
    }

    /// Decode an event from a frame
    pub fn from_frame(frame: &'a Frame) -> Result<Self, FrameError> {
        decode(Frame::EVENT, frame)
    }
}

impl<'a> ControllerRequest<'a> {
    /// Encode this request into a frame
    pub fn to_frame(&self) -> Result<Frame, FrameError> {
        encode(Frame::REQUEST, self)
    }

    /// Decode a request from a frame
    pub fn from_frame(frame: &'a Frame) -> Result<Self, FrameError> {
        decode(Frame::REQUEST, frame)
    }
}

fn encode<T: Serialize>(kind: u8, value: &T) -> Result<Frame, FrameError> {
    let mut buf = [0u8; MAX_FRAME_PAYLOAD];
    let used = postcard::to_slice(value, &mut buf).map_err(|_| FrameError::PayloadTooLarge)?;
    Frame::new(kind, used)
}

fn decode<'a, T: Deserialize<'a>>(kind: u8, frame: &'a Frame) -> Result<T, FrameError> {
    if frame.kind != kind {
        return Err(FrameError::Codec);
    }
    postcard::from_bytes(&frame.payload).map_err(|_| FrameError::Codec)
}

/// Owned broker message
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InboundMessage {
    pub topic: TopicName,
    pub payload: Vec<u8, MAX_MESSAGE_PAYLOAD>,
}

impl InboundMessage {
    /// Copy a borrowed message
    ///
    /// Returns `None` if the topic is longer than any configurable topic
    /// name (it cannot match one). Oversized payloads are truncated.
    pub fn new(topic: &str, payload: &[u8]) -> Option<Self> {
        let topic = TopicName::try_from(topic).ok()?;
        let keep = payload.len().min(MAX_MESSAGE_PAYLOAD);
        let payload = Vec::from_slice(&payload[..keep]).ok()?;
        Some(Self { topic, payload })
    }

    /// Topic string
    pub fn topic(&self) -> &str {
        self.topic.as_str()
    }

    /// Payload bytes
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }
}
