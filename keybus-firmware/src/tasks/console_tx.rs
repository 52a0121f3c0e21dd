//! Console transmit task
//!
//! Drains keypad responses from the gateway on a short ticker and sends
//! them out the console UART. A delivery buffer smaller than the pending
//! data reproduces the deployed driver's short-transfer behavior: the
//! gateway truncates, reports the loss, and this task logs it.

use defmt::*;
use embassy_rp::uart::BufferedUartTx;
use embassy_time::{Duration, Ticker};
use embedded_io_async::Write;

use crate::channels::GatewayMutex;

/// How often to check for pending responses
const DRAIN_INTERVAL_MS: u64 = 50;

/// Delivery buffer size per read
const TX_BUF_SIZE: usize = 64;

#[embassy_executor::task]
pub async fn console_tx_task(mut tx: BufferedUartTx<'static>, gateway: &'static GatewayMutex) {
    info!("Console TX task started");

    let mut ticker = Ticker::every(Duration::from_millis(DRAIN_INTERVAL_MS));
    let mut buf = [0u8; TX_BUF_SIZE];

    loop {
        ticker.next().await;

        loop {
            let outcome = match gateway.lock().await.read(&mut buf) {
                Ok(outcome) => outcome,
                // Session not open yet; try again next tick
                Err(_) => break,
            };

            if outcome.discarded > 0 {
                warn!("Short transfer: dropped {} pending bytes", outcome.discarded);
            }
            if outcome.returned == 0 {
                break;
            }

            if let Err(e) = tx.write_all(&buf[..outcome.returned]).await {
                warn!("UART write error: {:?}", e);
                break;
            }
        }
    }
}
