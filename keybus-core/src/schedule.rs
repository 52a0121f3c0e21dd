//! Drift-free poll schedule
//!
//! Deadline arithmetic for the periodic poll. Each rearm computes the
//! next deadline from the previous deadline plus the fixed period, never
//! from "now", so execution jitter inside a cycle cannot accumulate into
//! schedule drift. The owner (the firmware bus task) sleeps until
//! [`deadline_us`](PollSchedule::deadline_us), runs one cycle to
//! completion, then rearms; cycles never overlap.

/// Absolute-deadline schedule for the poll cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PollSchedule {
    period_us: u64,
    deadline_us: u64,
}

impl PollSchedule {
    /// Arm the schedule: first deadline is one period from `now_us`
    pub fn new(period_us: u64, now_us: u64) -> Self {
        Self {
            period_us,
            deadline_us: now_us + period_us,
        }
    }

    /// Absolute deadline of the next tick, in microseconds
    pub fn deadline_us(&self) -> u64 {
        self.deadline_us
    }

    pub fn period_us(&self) -> u64 {
        self.period_us
    }

    /// Rearm for the next tick: previous deadline plus one period
    pub fn advance(&mut self) -> u64 {
        self.deadline_us += self.period_us;
        self.deadline_us
    }

    /// Rearm, walking the deadline past `now_us` if the cycle overran
    ///
    /// Returns the number of ticks skipped; 0 on the normal path.
    pub fn advance_past(&mut self, now_us: u64) -> u32 {
        self.deadline_us += self.period_us;
        let mut missed = 0;
        while self.deadline_us <= now_us {
            self.deadline_us += self.period_us;
            missed += 1;
        }
        missed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PERIOD: u64 = 1_000_000;

    #[test]
    fn deadlines_follow_the_arithmetic_schedule() {
        let mut schedule = PollSchedule::new(PERIOD, 500);
        assert_eq!(schedule.deadline_us(), PERIOD + 500);
        for k in 2..=10 {
            assert_eq!(schedule.advance(), k * PERIOD + 500);
        }
    }

    #[test]
    fn execution_jitter_does_not_accumulate() {
        // Simulate 50 cycles whose execution finishes at varying offsets
        // past the deadline; every deadline must stay on the ideal grid.
        let start = 123_456;
        let mut schedule = PollSchedule::new(PERIOD, start);
        let jitter = [0u64, 31_000, 7_500, 90_000, 411, 64_999];

        for k in 0..50u64 {
            let deadline = schedule.deadline_us();
            assert_eq!(deadline, start + (k + 1) * PERIOD);

            let finished_at = deadline + jitter[(k as usize) % jitter.len()];
            assert_eq!(schedule.advance_past(finished_at), 0);
        }
    }

    #[test]
    fn overrun_skips_whole_periods_and_reports_them() {
        let mut schedule = PollSchedule::new(PERIOD, 0);
        // Cycle finishes 2.5 periods late
        let missed = schedule.advance_past(PERIOD + 2 * PERIOD + PERIOD / 2);
        assert_eq!(missed, 2);
        // Deadline is back on the grid, in the future
        assert_eq!(schedule.deadline_us(), 4 * PERIOD);
    }
}
