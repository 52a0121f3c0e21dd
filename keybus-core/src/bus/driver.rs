//! Line driver
//!
//! Generic over the HAL pin and delay traits so host tests can drive it
//! with mock lines and a virtual clock.

use keybus_hal::{DelayUs, IoPin, OutputPin};

use super::timing;

/// Master-side driver for the two keybus signal lines
///
/// Owns the clock pin (always master-driven), the bidirectional data pin
/// and the busy-wait delay. The cycle engine is the only caller during a
/// transaction; the pins are never touched from another context.
pub struct LineDriver<C, D, T> {
    clock: C,
    data: D,
    delay: T,
}

impl<C: OutputPin, D: IoPin, T: DelayUs> LineDriver<C, D, T> {
    pub fn new(clock: C, data: D, delay: T) -> Self {
        Self { clock, data, delay }
    }

    /// Drive both lines to the bus-idle convention (high)
    pub fn idle(&mut self) {
        self.clock.set_high();
        self.data.set_high();
    }

    /// Park both lines low
    ///
    /// Teardown convention: call only after the poll schedule has stopped.
    pub fn release(&mut self) {
        self.clock.set_low();
        self.data.set_low();
    }

    /// Clock one bit out to the peripheral
    pub fn write_bit(&mut self, bit: bool) {
        self.clock.set_low();
        self.delay.delay_us(timing::WRITE_SETUP_US);
        self.data.set_level(bit);
        self.delay.delay_us(timing::WRITE_HOLD_US);
        // Peripheral samples the data line here
        self.delay.delay_us(timing::WRITE_SAMPLE_WINDOW_US);
        self.clock.set_high();
        self.delay.delay_us(timing::WRITE_RECOVERY_US);
    }

    /// Clock one bit in from the peripheral
    pub fn read_bit(&mut self) -> bool {
        self.clock.set_low();
        self.delay.delay_us(timing::READ_SETUP_US);
        let bit = self.data.is_high();
        self.delay.delay_us(timing::READ_HOLD_US);
        self.clock.set_high();
        self.delay.delay_us(timing::READ_RECOVERY_US);
        bit
    }

    /// Transmit one byte, most significant bit first
    pub fn write_byte(&mut self, value: u8) {
        for shift in (0..8).rev() {
            self.write_bit((value >> shift) & 1 != 0);
        }
    }

    /// Receive one byte, most significant bit first
    pub fn read_byte(&mut self) -> u8 {
        let mut value = 0u8;
        for _ in 0..8 {
            value = (value << 1) | u8::from(self.read_bit());
        }
        value
    }

    /// Force idle-high and hold the inter-cycle recovery period
    pub fn recover(&mut self) {
        self.idle();
        self.delay.delay_ms(timing::CYCLE_RECOVERY_MS);
    }
}

#[cfg(test)]
impl<C, D, T> LineDriver<C, D, T> {
    pub(crate) fn clock(&self) -> &C {
        &self.clock
    }

    pub(crate) fn data(&self) -> &D {
        &self.data
    }

    pub(crate) fn delay(&self) -> &T {
        &self.delay
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{LoopbackPin, RecordingPin, ScriptedPin, VirtualClock};
    use proptest::prelude::*;

    #[test]
    fn write_bit_phases_are_protocol_exact() {
        let mut driver = LineDriver::new(RecordingPin::new(), RecordingPin::new(), VirtualClock::new());
        driver.write_bit(true);
        let clock = driver.delay.delays();
        assert_eq!(clock, &[20, 430, 60, 490]);
        assert_eq!(driver.delay.elapsed_us(), 1000);
    }

    #[test]
    fn read_bit_phases_are_protocol_exact() {
        let mut driver =
            LineDriver::new(RecordingPin::new(), ScriptedPin::new(&[true]), VirtualClock::new());
        assert!(driver.read_bit());
        let clock = driver.delay.delays();
        assert_eq!(clock, &[200, 300, 500]);
        assert_eq!(driver.delay.elapsed_us(), 1000);
    }

    #[test]
    fn write_byte_is_msb_first() {
        let mut driver = LineDriver::new(RecordingPin::new(), RecordingPin::new(), VirtualClock::new());
        driver.write_byte(0x05);
        let bits = driver.data.levels();
        assert_eq!(
            bits,
            &[false, false, false, false, false, true, false, true]
        );
    }

    #[test]
    fn read_byte_is_msb_first() {
        // 0xA5 = 1010_0101
        let script = [true, false, true, false, false, true, false, true];
        let mut driver =
            LineDriver::new(RecordingPin::new(), ScriptedPin::new(&script), VirtualClock::new());
        assert_eq!(driver.read_byte(), 0xA5);
    }

    #[test]
    fn idle_and_release_drive_both_lines() {
        let mut driver = LineDriver::new(RecordingPin::new(), RecordingPin::new(), VirtualClock::new());
        driver.idle();
        assert!(driver.clock.level());
        assert!(driver.data.level());
        driver.release();
        assert!(!driver.clock.level());
        assert!(!driver.data.level());
    }

    proptest! {
        #[test]
        fn codec_round_trips_over_loopback(value: u8) {
            let mut driver =
                LineDriver::new(RecordingPin::new(), LoopbackPin::new(), VirtualClock::new());
            driver.write_byte(value);
            prop_assert_eq!(driver.read_byte(), value);
        }
    }
}
