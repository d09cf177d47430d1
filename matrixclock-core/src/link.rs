//! Broker connection supervisor
//!
//! Non-blocking state machine that brings the broker session up and keeps
//! it up:
//!
//! ```text
//!  Down ──► Waiting ──(connect_delay)──► Connecting ──ok──► Subscribing
//!             ▲                              │                  │
//!             │                            fail           (subscribe_delay)
//!             │                              ▼                  ▼
//!             └──────(retry_delay)────── Backoff              Online
//!                                                               │
//!  Waiting ◄──────────────────── session lost ──────────────────┘
//! ```
//!
//! [`Connection::poll`] is called from the run loop with the current time
//! and returns a [`LinkStatus`] whenever there is something to tell the
//! user.

use core::fmt::Write;

use heapless::String;

use crate::config::{DisplayConfig, MAX_CLIENT_PREFIX_LEN};
use crate::traits::{ConnectProgress, Transport};

/// Client id capacity: prefix plus up to four hex digits
const MAX_CLIENT_ID_LEN: usize = MAX_CLIENT_PREFIX_LEN + 4;

/// User-visible connection milestones
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkStatus {
    Connecting,
    Connected,
    Subscribed,
    Failed,
}

impl LinkStatus {
    /// Status line shown on the panel
    pub const fn text(self) -> &'static str {
        match self {
            LinkStatus::Connecting => "MQTT connecting ...",
            LinkStatus::Connected => "MQTT connected",
            LinkStatus::Subscribed => "MQTT subscribed",
            LinkStatus::Failed => "MQTT failed, retrying...",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Not started
    Down,
    /// Pausing before an attempt
    Waiting { since: u32 },
    /// Attempt in flight
    Connecting { since: u32 },
    /// Session up, pausing before subscribing
    Subscribing { since: u32 },
    /// Subscribed and delivering
    Online,
    /// Pausing after a failure
    Backoff { since: u32 },
}

/// Broker connection supervisor
#[derive(Debug)]
pub struct Connection {
    phase: Phase,
    client_id: String<MAX_CLIENT_ID_LEN>,
}

impl Connection {
    /// Create a supervisor using `prefix` followed by `suffix` in hex as the
    /// client id
    pub fn new(prefix: &str, suffix: u16) -> Self {
        let mut client_id = String::new();
        for ch in prefix.chars().take(MAX_CLIENT_PREFIX_LEN) {
            if client_id.push(ch).is_err() {
                break;
            }
        }
        // Four hex digits always fit after a bounded prefix
        let _ = write!(client_id, "{:x}", suffix);

        Self {
            phase: Phase::Down,
            client_id,
        }
    }

    pub fn client_id(&self) -> &str {
        self.client_id.as_str()
    }

    /// Check if the session is up and subscribed
    pub fn is_online(&self) -> bool {
        self.phase == Phase::Online
    }

    /// Advance the state machine
    pub fn poll<N: Transport>(
        &mut self,
        transport: &mut N,
        config: &DisplayConfig,
        now_ms: u32,
    ) -> Option<LinkStatus> {
        match self.phase {
            Phase::Down => self.restart(now_ms),
            Phase::Online => {
                if transport.is_connected() {
                    None
                } else {
                    warn!("broker session lost");
                    self.restart(now_ms)
                }
            }
            Phase::Waiting { since } => {
                if now_ms.wrapping_sub(since) < config.connect_delay_ms {
                    return None;
                }
                info!("connecting as {}", self.client_id.as_str());
                self.attempt(transport, now_ms, now_ms)
            }
            Phase::Connecting { since } => {
                if now_ms.wrapping_sub(since) >= config.connect_timeout_ms {
                    warn!("connection attempt timed out");
                    return self.fail(now_ms);
                }
                self.attempt(transport, since, now_ms)
            }
            Phase::Subscribing { since } => {
                if !transport.is_connected() {
                    return self.fail(now_ms);
                }
                if now_ms.wrapping_sub(since) < config.subscribe_delay_ms {
                    return None;
                }
                for (topic, name) in config.topics.subscriptions() {
                    if let Err(err) = transport.subscribe(name) {
                        warn!("subscribe {} failed: {}", topic, err);
                    }
                }
                info!("broker session ready");
                self.phase = Phase::Online;
                Some(LinkStatus::Subscribed)
            }
            Phase::Backoff { since } => {
                if now_ms.wrapping_sub(since) < config.retry_delay_ms {
                    return None;
                }
                self.restart(now_ms)
            }
        }
    }

    fn restart(&mut self, now_ms: u32) -> Option<LinkStatus> {
        self.phase = Phase::Waiting { since: now_ms };
        Some(LinkStatus::Connecting)
    }

    fn attempt<N: Transport>(
        &mut self,
        transport: &mut N,
        started: u32,
        now_ms: u32,
    ) -> Option<LinkStatus> {
        match transport.connect(self.client_id.as_str()) {
            Ok(ConnectProgress::Connected) => {
                self.phase = Phase::Subscribing { since: now_ms };
                Some(LinkStatus::Connected)
            }
            Ok(ConnectProgress::Pending) => {
                self.phase = Phase::Connecting { since: started };
                None
            }
            Err(err) => {
                warn!("connect failed: {}", err);
                self.fail(now_ms)
            }
        }
    }

    fn fail(&mut self, now_ms: u32) -> Option<LinkStatus> {
        self.phase = Phase::Backoff { since: now_ms };
        Some(LinkStatus::Failed)
    }
}
