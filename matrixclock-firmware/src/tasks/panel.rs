//! HUB75 panel refresh task
//!
//! Scans the shared framebuffer out one row pair at a time. Each row is lit
//! for an on-time proportional to the frame brightness.

use defmt::*;
use embassy_rp::gpio::Output;
use embassy_time::Timer;

use matrixclock_drivers::display::Hub75;

use crate::panel::FRAMEBUFFER;

/// Panel task - refreshes the panel forever
#[embassy_executor::task]
pub async fn panel_task(mut hub: Hub75<Output<'static>>) {
    info!("Panel task started");

    loop {
        let on_time_us = FRAMEBUFFER
            .lock(|fb| hub.scan_row(&*fb.borrow()))
            .unwrap_or(0);

        if on_time_us > 0 {
            let _ = hub.enable();
            Timer::after_micros(u64::from(on_time_us)).await;
            let _ = hub.disable();
        } else {
            // Panel dark; still yield between rows
            Timer::after_micros(1).await;
        }
    }
}
