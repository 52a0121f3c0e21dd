//! Protocol-mandated bus timing
//!
//! All values are fixed by the keypad protocol. Each bit, written or
//! read, occupies exactly 1 ms on the wire.

/// Clock-low setup before the data line is asserted (write)
pub const WRITE_SETUP_US: u32 = 20;

/// Data hold after assertion, before the peripheral sample window (write)
pub const WRITE_HOLD_US: u32 = 430;

/// Window in which the peripheral samples the data line (write)
pub const WRITE_SAMPLE_WINDOW_US: u32 = 60;

/// Clock-high recovery after a written bit
pub const WRITE_RECOVERY_US: u32 = 490;

/// Clock-low setup before the master samples the data line (read)
pub const READ_SETUP_US: u32 = 200;

/// Data hold after the master sample (read)
pub const READ_HOLD_US: u32 = 300;

/// Clock-high recovery after a read bit
pub const READ_RECOVERY_US: u32 = 500;

/// Idle-high hold between poll cycles
pub const CYCLE_RECOVERY_MS: u32 = 2;

/// Total wire time of one written bit
pub const WRITE_BIT_US: u32 =
    WRITE_SETUP_US + WRITE_HOLD_US + WRITE_SAMPLE_WINDOW_US + WRITE_RECOVERY_US;

/// Total wire time of one read bit
pub const READ_BIT_US: u32 = READ_SETUP_US + READ_HOLD_US + READ_RECOVERY_US;

/// Worst-case wire time of one full poll cycle: 8 command bits out,
/// 2 ack bits in, 8 response bits in, plus the idle-high recovery hold.
pub const WORST_CASE_CYCLE_US: u32 =
    8 * WRITE_BIT_US + 2 * READ_BIT_US + 8 * READ_BIT_US + CYCLE_RECOVERY_MS * 1000;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bit_phases_sum_to_one_millisecond() {
        assert_eq!(WRITE_BIT_US, 1000);
        assert_eq!(READ_BIT_US, 1000);
    }

    #[test]
    fn worst_case_cycle_is_twenty_milliseconds() {
        assert_eq!(WORST_CASE_CYCLE_US, 20_000);
    }
}
