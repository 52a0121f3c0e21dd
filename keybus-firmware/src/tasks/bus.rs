//! Periodic bus poll task
//!
//! Sleeps until the next absolute deadline, runs one poll cycle to
//! completion, then rearms from the previous deadline so execution
//! jitter cannot accumulate into schedule drift. Cycles never overlap:
//! the next sleep only starts once the engine has returned.

use defmt::*;
use embassy_time::{Instant, Timer};

use keybus_core::cycle::{CycleEngine, CycleOutcome};
use keybus_core::schedule::PollSchedule;
use keybus_hal_rp2040::{BusyWait, ClockPin, DataPin};

/// The one concrete engine type this firmware drives
pub type BusEngine = CycleEngine<'static, ClockPin, DataPin, BusyWait>;

#[embassy_executor::task]
pub async fn bus_task(mut engine: BusEngine, period_us: u64) {
    info!("Bus poll task started, period {} us", period_us);

    engine.start();
    let mut schedule = PollSchedule::new(period_us, Instant::now().as_micros());

    loop {
        Timer::at(Instant::from_micros(schedule.deadline_us())).await;

        match engine.poll_cycle() {
            CycleOutcome::Response(byte) => {
                debug!("Keypad response: {=u8:#x}", byte);
            }
            CycleOutcome::ResponseDropped(byte) => {
                warn!("Inbound queue full, dropped response {=u8:#x}", byte);
            }
            CycleOutcome::NoResponse => {
                info!("No keypad response this cycle");
            }
        }

        let missed = schedule.advance_past(Instant::now().as_micros());
        if missed > 0 {
            warn!("Poll cycle overran, skipped {} ticks", missed);
        }
    }
}
