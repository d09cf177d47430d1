//! Bridge UART receive task
//!
//! Receives frames from the Wi-Fi bridge and dispatches events.

use core::sync::atomic::Ordering;

use defmt::*;
use embassy_rp::uart::BufferedUartRx;
use embedded_io_async::Read;

use matrixclock_protocol::{BridgeEvent, FrameDecoder, InboundMessage};

use crate::channels::{CONNECT_RESULT, INBOUND_CHANNEL, LINK_UP, TIME_UPDATE};

/// Buffer size for UART receive
const RX_BUF_SIZE: usize = 64;

/// Bridge RX task - receives and decodes frames from the bridge
#[embassy_executor::task]
pub async fn bridge_rx_task(mut rx: BufferedUartRx) {
    info!("Bridge RX task started");

    let mut decoder = FrameDecoder::new();
    let mut buf = [0u8; RX_BUF_SIZE];

    loop {
        match rx.read(&mut buf).await {
            Ok(n) if n > 0 => {
                trace!("RX: {} bytes", n);

                for &byte in &buf[..n] {
                    match decoder.push(byte) {
                        Ok(Some(frame)) => match BridgeEvent::from_frame(&frame) {
                            Ok(event) => handle_event(event),
                            Err(e) => warn!("Failed to decode bridge event: {:?}", e),
                        },
                        Ok(None) => {}
                        Err(e) => warn!("Frame error: {:?}", e),
                    }
                }
            }
            Ok(_) => {}
            Err(e) => {
                warn!("UART read error: {:?}", e);
            }
        }
    }
}

/// Handle a decoded bridge event
fn handle_event(event: BridgeEvent<'_>) {
    match event {
        BridgeEvent::Message { topic, payload } => {
            let Some(msg) = InboundMessage::new(topic, payload) else {
                debug!("Dropping message on oversized topic");
                return;
            };
            if INBOUND_CHANNEL.try_send(msg).is_err() {
                warn!("Inbound channel full, dropping message");
            }
        }
        BridgeEvent::Connected => {
            debug!("Bridge connected to broker");
            LINK_UP.store(true, Ordering::Release);
            CONNECT_RESULT.signal(true);
        }
        BridgeEvent::ConnectFailed => {
            debug!("Bridge connection attempt failed");
            LINK_UP.store(false, Ordering::Release);
            CONNECT_RESULT.signal(false);
        }
        BridgeEvent::Disconnected => {
            warn!("Bridge lost broker session");
            LINK_UP.store(false, Ordering::Release);
        }
        BridgeEvent::Time(time) => {
            debug!("Network time: {}", time);
            TIME_UPDATE.signal(time);
        }
    }
}
