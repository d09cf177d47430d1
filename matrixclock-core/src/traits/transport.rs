//! Message broker transport trait

use matrixclock_protocol::InboundMessage;

/// Errors that can occur on the broker transport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransportError {
    /// No broker session
    NotConnected,
    /// Broker refused the connection
    Rejected,
    /// Outbound queue is full
    QueueFull,
    /// Topic or payload does not fit a frame
    TooLarge,
}

/// Progress of a connection attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConnectProgress {
    /// Session established
    Connected,
    /// Attempt in flight, call `connect` again later
    Pending,
}

/// Trait for the publish/subscribe transport
///
/// All calls are non-blocking. `connect` is polled: the first call starts
/// an attempt, later calls report its outcome.
pub trait Transport {
    /// Check if a broker session is up
    fn is_connected(&self) -> bool;

    /// Start or poll a connection attempt
    fn connect(&mut self, client_id: &str) -> Result<ConnectProgress, TransportError>;

    /// Subscribe to a topic
    fn subscribe(&mut self, topic: &str) -> Result<(), TransportError>;

    /// Publish a payload on a topic
    fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), TransportError>;

    /// Take the next received message, if any
    fn poll(&mut self) -> Option<InboundMessage>;
}
