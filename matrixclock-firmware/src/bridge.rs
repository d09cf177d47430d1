//! Broker transport over the bridge link
//!
//! The Wi-Fi bridge owns the MQTT session. [`BridgeTransport`] implements
//! the core [`Transport`] trait by queueing [`Outbound`] requests for the
//! TX task and draining broker messages collected by the RX task.

use core::sync::atomic::Ordering;

use heapless::{String, Vec};

use matrixclock_core::traits::{ConnectProgress, Transport, TransportError};
use matrixclock_protocol::{ControllerRequest, InboundMessage, TopicName, MAX_MESSAGE_PAYLOAD};

use crate::channels::{CONNECT_RESULT, INBOUND_CHANNEL, LINK_UP, OUTBOUND_CHANNEL};

/// Longest client id sent to the bridge
pub const MAX_CLIENT_ID_LEN: usize = 20;

/// Owned request queued for the TX task
#[derive(Debug, Clone)]
pub enum Outbound {
    Connect(String<MAX_CLIENT_ID_LEN>),
    Subscribe(TopicName),
    Publish(TopicName, Vec<u8, MAX_MESSAGE_PAYLOAD>),
    SyncTime,
}

impl Outbound {
    /// Borrow as a wire request
    pub fn request(&self) -> ControllerRequest<'_> {
        match self {
            Outbound::Connect(client_id) => ControllerRequest::Connect {
                client_id: client_id.as_str(),
            },
            Outbound::Subscribe(topic) => ControllerRequest::Subscribe {
                topic: topic.as_str(),
            },
            Outbound::Publish(topic, payload) => ControllerRequest::Publish {
                topic: topic.as_str(),
                payload,
            },
            Outbound::SyncTime => ControllerRequest::SyncTime,
        }
    }
}

/// Queue a request for the TX task
pub fn enqueue(request: Outbound) -> Result<(), TransportError> {
    OUTBOUND_CHANNEL
        .try_send(request)
        .map_err(|_| TransportError::QueueFull)
}

/// Transport backed by the bridge link
#[derive(Debug, Default)]
pub struct BridgeTransport {
    attempt_pending: bool,
}

impl BridgeTransport {
    pub const fn new() -> Self {
        Self {
            attempt_pending: false,
        }
    }

    fn topic(topic: &str) -> Result<TopicName, TransportError> {
        TopicName::try_from(topic).map_err(|_| TransportError::TooLarge)
    }
}

impl Transport for BridgeTransport {
    fn is_connected(&self) -> bool {
        LINK_UP.load(Ordering::Acquire)
    }

    fn connect(&mut self, client_id: &str) -> Result<ConnectProgress, TransportError> {
        if !self.attempt_pending {
            let client_id = String::try_from(client_id).map_err(|_| TransportError::TooLarge)?;
            CONNECT_RESULT.reset();
            enqueue(Outbound::Connect(client_id))?;
            self.attempt_pending = true;
            return Ok(ConnectProgress::Pending);
        }

        match CONNECT_RESULT.try_take() {
            Some(true) => {
                self.attempt_pending = false;
                Ok(ConnectProgress::Connected)
            }
            Some(false) => {
                self.attempt_pending = false;
                Err(TransportError::Rejected)
            }
            None => Ok(ConnectProgress::Pending),
        }
    }

    fn subscribe(&mut self, topic: &str) -> Result<(), TransportError> {
        if !self.is_connected() {
            return Err(TransportError::NotConnected);
        }
        enqueue(Outbound::Subscribe(Self::topic(topic)?))
    }

    fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), TransportError> {
        if !self.is_connected() {
            return Err(TransportError::NotConnected);
        }
        let payload = Vec::from_slice(payload).map_err(|_| TransportError::TooLarge)?;
        enqueue(Outbound::Publish(Self::topic(topic)?, payload))
    }

    fn poll(&mut self) -> Option<InboundMessage> {
        INBOUND_CHANNEL.try_receive().ok()
    }
}
