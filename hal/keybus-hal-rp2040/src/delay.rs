//! Blocking busy-wait delay
//!
//! Bit phases run inside the poll-tick context; an async timer here
//! would hand the core to the executor mid-bit and stretch the phase by
//! an unbounded amount. `block_for` spins on the hardware timebase.

use embassy_time::Duration;
use keybus_hal::DelayUs;

/// Busy-wait on the embassy time driver
#[derive(Debug, Clone, Copy, Default)]
pub struct BusyWait;

impl DelayUs for BusyWait {
    fn delay_us(&mut self, us: u32) {
        embassy_time::block_for(Duration::from_micros(u64::from(us)));
    }
}
