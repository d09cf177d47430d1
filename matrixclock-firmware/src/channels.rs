//! Inter-task communication channels
//!
//! Defines the static channels used between the application loop and the
//! bridge UART tasks. Uses embassy-sync primitives for safe async
//! communication.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;
use portable_atomic::AtomicBool;

use matrixclock_protocol::{InboundMessage, LocalDateTime};

use crate::bridge::Outbound;

/// Channel capacity for broker messages from the bridge
const INBOUND_CHANNEL_SIZE: usize = 16;

/// Channel capacity for requests to the bridge
const OUTBOUND_CHANNEL_SIZE: usize = 16;

/// Broker messages received by the bridge, in arrival order
pub static INBOUND_CHANNEL: Channel<CriticalSectionRawMutex, InboundMessage, INBOUND_CHANNEL_SIZE> =
    Channel::new();

/// Requests waiting to be framed and sent to the bridge
pub static OUTBOUND_CHANNEL: Channel<CriticalSectionRawMutex, Outbound, OUTBOUND_CHANNEL_SIZE> =
    Channel::new();

/// Outcome of the latest connection attempt (true = connected)
pub static CONNECT_RESULT: Signal<CriticalSectionRawMutex, bool> = Signal::new();

/// Network time reported by the bridge
pub static TIME_UPDATE: Signal<CriticalSectionRawMutex, LocalDateTime> = Signal::new();

/// Broker session state as last reported by the bridge
pub static LINK_UP: AtomicBool = AtomicBool::new(false);
