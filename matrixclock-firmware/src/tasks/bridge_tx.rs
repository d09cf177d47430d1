//! Bridge UART transmit task
//!
//! Frames queued requests and writes them to the bridge.

use defmt::*;
use embassy_rp::uart::BufferedUartTx;
use embedded_io_async::Write;

use matrixclock_protocol::MAX_FRAME_SIZE;

use crate::bridge::Outbound;
use crate::channels::OUTBOUND_CHANNEL;

/// Bridge TX task - sends requests to the bridge in queue order
#[embassy_executor::task]
pub async fn bridge_tx_task(mut tx: BufferedUartTx) {
    info!("Bridge TX task started");

    let mut buf = [0u8; MAX_FRAME_SIZE];

    loop {
        let request = OUTBOUND_CHANNEL.receive().await;
        send_request(&mut tx, &request, &mut buf).await;
    }
}

/// Encode and write one request
async fn send_request(tx: &mut BufferedUartTx, request: &Outbound, buf: &mut [u8]) {
    let frame = match request.request().to_frame() {
        Ok(frame) => frame,
        Err(e) => {
            warn!("Failed to encode request: {:?}", e);
            return;
        }
    };

    match frame.encode(buf) {
        Ok(len) => {
            if let Err(e) = tx.write_all(&buf[..len]).await {
                warn!("Failed to send frame: {:?}", e);
            } else {
                trace!("TX: {} bytes", len);
            }
        }
        Err(e) => warn!("Failed to frame request: {:?}", e),
    }
}
