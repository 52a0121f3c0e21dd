//! Keybus master firmware
//!
//! Polls DSC-style alarm keypads over the two-wire keybus from an
//! RP2040 board. The board-agnostic bus logic lives in keybus-core;
//! this binary wires it to real pins, the time driver, and a console
//! UART that plays the byte-stream device boundary.
//!
//! Startup order matters: acquire the bus lines, start the poll
//! scheduler, then register the console.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::peripherals::UART1;
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use embassy_sync::mutex::Mutex;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use keybus_core::bus::LineDriver;
use keybus_core::cycle::CycleEngine;
use keybus_core::gateway::ChannelGateway;
use keybus_core::queue::ByteQueue;
use keybus_hal_rp2040::{pin_bank, BusyWait, ClockPin, DataPin};

mod channels;
mod config;
mod tasks;

/// Embedded configuration (validated by build.rs on the host)
/// Edit keybus.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../keybus.toml");

bind_interrupts!(struct Irqs {
    UART1_IRQ => BufferedInterruptHandler<UART1>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Keybus master firmware starting...");

    let p = embassy_rp::init(Default::default());

    // Parse the embedded configuration
    let config = match config::parse_config(EMBEDDED_CONFIG) {
        Ok(config) => config,
        Err(e) => {
            error!("Embedded configuration is invalid: {:?}", e);
            return;
        }
    };
    if let Err(e) = config.validate() {
        error!("Bus configuration rejected: {:?}", e);
        return;
    }
    info!(
        "Configured: clock=GPIO{}, data=GPIO{}, period={} ms, command={:?}",
        config.lines.clock_pin, config.lines.data_pin, config.poll_period_ms, config.command
    );

    // GPIOs routed to the keybus header on this board
    let mut bank = pin_bank! {
        0 => p.PIN_0,
        1 => p.PIN_1,
        2 => p.PIN_2,
        3 => p.PIN_3,
        4 => p.PIN_4,
        5 => p.PIN_5,
        6 => p.PIN_6,
        7 => p.PIN_7,
    };

    // Acquire both bus lines; failure is fatal and reported exactly once
    let clock = match bank.take(config.lines.clock_pin) {
        Ok(pin) => ClockPin::new(pin),
        Err(e) => {
            error!(
                "Failed to acquire clock line GPIO{}: {:?}",
                config.lines.clock_pin, e
            );
            return;
        }
    };
    let data = match bank.take(config.lines.data_pin) {
        Ok(pin) => DataPin::new(pin),
        Err(e) => {
            error!(
                "Failed to acquire data line GPIO{}: {:?}",
                config.lines.data_pin, e
            );
            return;
        }
    };
    info!("Bus lines acquired, both driven idle-high");

    // Queues bridging the bus task and the console
    let (in_producer, in_consumer) = channels::INBOUND_QUEUE.init(ByteQueue::new()).split();
    let (out_producer, out_consumer) = channels::OUTBOUND_QUEUE.init(ByteQueue::new()).split();

    let driver = LineDriver::new(clock, data, BusyWait);
    let engine = CycleEngine::new(driver, config.command, config.compat, in_producer, out_consumer);
    let gateway: &'static channels::GatewayMutex =
        channels::GATEWAY.init(Mutex::new(ChannelGateway::new(
            in_consumer,
            out_producer,
            config.compat,
        )));

    // Console UART (the byte-stream device boundary)
    let uart_config = UartConfig::default(); // 115200 baud default
    let tx_buf = TX_BUF.init([0u8; 256]);
    let rx_buf = RX_BUF.init([0u8; 256]);
    let uart = Uart::new_blocking(p.UART1, p.PIN_8, p.PIN_9, uart_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (tx, rx) = uart.split();

    // Scheduler first, console second
    spawner
        .spawn(tasks::bus::bus_task(engine, config.period_us()))
        .unwrap();
    spawner
        .spawn(tasks::console_rx::console_rx_task(rx, gateway))
        .unwrap();
    spawner
        .spawn(tasks::console_tx::console_tx_task(tx, gateway))
        .unwrap();

    info!("Keybus master ready");
}
