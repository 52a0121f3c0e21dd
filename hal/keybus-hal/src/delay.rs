//! Busy-wait timing primitive
//!
//! The keybus bit phases are defined in microseconds and are driven from
//! inside the timer-tick context, so the delay implementation must spin:
//! yielding to an executor or sleeping would stretch a bit phase by an
//! unbounded amount and corrupt the transaction.

/// Blocking microsecond delay
///
/// Contract: `delay_us(n)` busy-waits for `n` microseconds and must not
/// yield, sleep, or otherwise allow rescheduling.
///
/// Host tests implement this with a virtual clock that records the
/// requested delays instead of spinning.
pub trait DelayUs {
    /// Busy-wait for `us` microseconds
    fn delay_us(&mut self, us: u32);

    /// Busy-wait for `ms` milliseconds
    fn delay_ms(&mut self, ms: u32) {
        self.delay_us(ms.saturating_mul(1000));
    }
}

// Allow passing a `&mut` reference where an owned delay is expected
impl<T: DelayUs + ?Sized> DelayUs for &mut T {
    fn delay_us(&mut self, us: u32) {
        T::delay_us(self, us);
    }
}
