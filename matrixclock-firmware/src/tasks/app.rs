//! Application loop task
//!
//! Drives [`App::service`] from a fast ticker. The scheduler inside the
//! app decides which display tasks are due on each pass.

use defmt::*;
use embassy_rp::i2c::{Blocking, I2c};
use embassy_rp::peripherals::I2C0;
use embassy_time::{Duration, Instant, Ticker};

use matrixclock_core::App;
use matrixclock_drivers::sensor::Bh1750;

use crate::bridge::BridgeTransport;
use crate::clock::RtcTimeSource;
use crate::panel::SharedPanel;

/// Outer loop period in milliseconds
pub const SERVICE_INTERVAL_MS: u64 = 5;

/// Application type wired to the board's collaborators
pub type DisplayApp =
    App<SharedPanel, Bh1750<I2c<'static, I2C0, Blocking>>, RtcTimeSource, BridgeTransport>;

fn now_ms() -> u32 {
    // Wraps after ~49 days; the scheduler uses wrapping arithmetic
    Instant::now().as_millis() as u32
}

/// App task - starts the application and services it forever
#[embassy_executor::task]
pub async fn app_task(mut app: DisplayApp) {
    info!("App task started");

    app.start(now_ms());

    let mut ticker = Ticker::every(Duration::from_millis(SERVICE_INTERVAL_MS));

    loop {
        let report = app.service(now_ms());

        if let Some(status) = report.link {
            info!("Link: {}", status.text());
        }
        if !report.tasks.is_empty() || report.messages > 0 {
            trace!("Ran {} tasks, {} messages", report.tasks.len(), report.messages);
        }

        ticker.next().await;
    }
}
