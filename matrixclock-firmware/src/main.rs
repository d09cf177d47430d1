//! Matrixclock - Ambient Dot-Matrix Clock Firmware
//!
//! Main firmware binary for an RP2040 driving a 64x32 HUB75 RGB panel.
//! Shows the time, inside/outside temperature and HVAC state received
//! over MQTT through a Wi-Fi bridge on UART0, and follows the ambient
//! light level with a BH1750 on I2C0.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::i2c::{Config as I2cConfig, I2c};
use embassy_rp::peripherals::UART0;
use embassy_rp::rtc::{InterruptHandler as RtcInterruptHandler, Rtc};
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use matrixclock_core::App;
use matrixclock_drivers::display::{Hub75, Hub75Pins};
use matrixclock_drivers::sensor::Bh1750;

use crate::bridge::BridgeTransport;
use crate::clock::RtcTimeSource;
use crate::config::load_config;
use crate::panel::SharedPanel;

mod bridge;
mod channels;
mod clock;
mod config;
mod panel;
mod tasks;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
    RTC_IRQ => RtcInterruptHandler;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 512]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 512]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Matrixclock firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = load_config();

    // Bridge UART (GPIO0 TX, GPIO1 RX), 115200 baud default
    let tx_buf = TX_BUF.init([0u8; 512]);
    let rx_buf = RX_BUF.init([0u8; 512]);

    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, UartConfig::default());
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (tx, rx) = uart.split();

    info!("UART initialized for bridge communication");

    // Light sensor on I2C0 (GPIO5 SCL, GPIO4 SDA)
    let i2c = I2c::new_blocking(p.I2C0, p.PIN_5, p.PIN_4, I2cConfig::default());
    let sensor = Bh1750::new(i2c);

    let time = RtcTimeSource::new(Rtc::new(p.RTC, Irqs));

    // HUB75 connector on GPIO6-18
    let hub = Hub75::new(Hub75Pins {
        r1: Output::new(p.PIN_6, Level::Low),
        g1: Output::new(p.PIN_7, Level::Low),
        b1: Output::new(p.PIN_8, Level::Low),
        r2: Output::new(p.PIN_9, Level::Low),
        g2: Output::new(p.PIN_10, Level::Low),
        b2: Output::new(p.PIN_11, Level::Low),
        a: Output::new(p.PIN_12, Level::Low),
        b: Output::new(p.PIN_13, Level::Low),
        c: Output::new(p.PIN_14, Level::Low),
        d: Output::new(p.PIN_15, Level::Low),
        clk: Output::new(p.PIN_16, Level::Low),
        lat: Output::new(p.PIN_17, Level::Low),
        oe: Output::new(p.PIN_18, Level::High),
    });

    info!("Panel pins initialized");

    let app = match App::new(
        config,
        SharedPanel,
        sensor,
        time,
        BridgeTransport::new(),
        client_suffix(),
    ) {
        Ok(app) => app,
        Err(e) => {
            error!("Failed to register display tasks: {:?}", e);
            return;
        }
    };

    // Spawn tasks
    spawner.spawn(tasks::bridge_rx_task(rx)).unwrap();
    spawner.spawn(tasks::bridge_tx_task(tx)).unwrap();
    spawner.spawn(tasks::panel_task(hub)).unwrap();
    spawner.spawn(tasks::app_task(app)).unwrap();

    info!("All tasks spawned, firmware running");
}

/// Random 16-bit client id suffix from the ring oscillator
fn client_suffix() -> u16 {
    let rosc = embassy_rp::pac::ROSC;
    (0..16).fold(0u16, |acc, _| {
        (acc << 1) | u16::from(rosc.randombit().read().randombit())
    })
}
