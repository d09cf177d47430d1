//! Matrixclock messaging protocol
//!
//! Everything the display exchanges with the outside world:
//!
//! - [`topic`]: the fixed set of MQTT topics the display consumes and the
//!   exact-match table that maps configured topic names onto them
//! - [`payload`]: the permissive "parse-or-default" policy for inbound
//!   payloads
//! - [`frame`] and [`messages`]: the UART link to the Wi-Fi bridge that owns
//!   the actual broker connection
//!
//! # Bridge link
//!
//! ```text
//! ┌───────┬──────┬──────────┬──────────────┬────────────┐
//! │ START │ TYPE │ LENGTH   │ PAYLOAD      │ FLETCHER16 │
//! │ 1B    │ 1B   │ 2B (LE)  │ 0–300B       │ 2B (LE)    │
//! └───────┴──────┴──────────┴──────────────┴────────────┘
//! ```
//!
//! Payloads are postcard-encoded [`BridgeEvent`] (bridge → controller) or
//! [`ControllerRequest`] (controller → bridge) values.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod frame;
pub mod messages;
pub mod payload;
pub mod topic;

pub use frame::{Frame, FrameDecoder, FrameError, FRAME_START, MAX_FRAME_PAYLOAD, MAX_FRAME_SIZE};
pub use messages::{
    BridgeEvent, ControllerRequest, InboundMessage, LocalDateTime, MAX_MESSAGE_PAYLOAD,
};
pub use payload::{is_switch_on, parse_f32_or_default, parse_i32_or_default, PayloadSwitch};
pub use topic::{Topic, TopicMap, TopicName, MAX_TOPIC_LEN};
