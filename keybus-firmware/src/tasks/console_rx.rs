//! Console receive task
//!
//! Owns the session: opens the gateway once at startup and feeds bytes
//! arriving on the console UART into the outbound queue. The queue is
//! reserved for command injection and is not drained by the engine
//! unless the compat switch enables it.

use defmt::*;
use embassy_rp::uart::BufferedUartRx;
use embedded_io_async::Read;

use crate::channels::GatewayMutex;

/// Buffer size for UART receive
const RX_BUF_SIZE: usize = 64;

#[embassy_executor::task]
pub async fn console_rx_task(mut rx: BufferedUartRx<'static>, gateway: &'static GatewayMutex) {
    info!("Console RX task started");

    match gateway.lock().await.open() {
        Ok(()) => info!("Console session opened"),
        Err(e) => {
            // A second console cannot exist in this firmware; treat as fatal
            error!("Console session unavailable: {:?}", e);
            return;
        }
    }

    let mut buf = [0u8; RX_BUF_SIZE];

    loop {
        match rx.read(&mut buf).await {
            Ok(n) if n > 0 => {
                let result = gateway.lock().await.write(&buf[..n]);
                match result {
                    Ok(accepted) if accepted < n => {
                        warn!("Outbound queue full, dropped {} bytes", n - accepted);
                    }
                    Ok(_) => {}
                    Err(e) => warn!("Console write rejected: {:?}", e),
                }
            }
            Ok(_) => {
                // No bytes read, continue
            }
            Err(e) => {
                warn!("UART read error: {:?}", e);
            }
        }
    }
}
