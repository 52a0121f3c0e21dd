//! Bus configuration types

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::bus::timing;
use crate::command::Command;

/// Default poll period in milliseconds
pub const DEFAULT_POLL_PERIOD_MS: u32 = 1000;

/// GPIO assignment for the two bus lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LineAssignment {
    pub clock_pin: u8,
    pub data_pin: u8,
}

impl Default for LineAssignment {
    fn default() -> Self {
        // Deployed wiring: clock on GPIO 5, data on GPIO 0
        Self {
            clock_pin: 5,
            data_pin: 0,
        }
    }
}

/// Switches reproducing observed driver behavior
///
/// Three behaviors of the deployed driver look accidental but are kept
/// reproducible: the discarded bit in front of the ack, the short read
/// that drops the rest of the pending data, and the outbound queue that
/// fills but is never consumed. Each is gated here instead of silently
/// corrected; defaults match the wire behavior of the deployed driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CompatConfig {
    /// WaitAck reads and discards one bit before the real ack bit
    pub leading_ack_discard: bool,
    /// A short read drops the rest of the pending data instead of
    /// keeping it queued
    pub discard_read_remainder: bool,
    /// `write` reports bytes accepted before any overflow drop
    pub lossy_write_accounting: bool,
    /// The engine pops one outbound byte per cycle and transmits it as
    /// the command (command injection); off means the outbound queue is
    /// fillable but never drained
    pub drain_outbound: bool,
}

impl Default for CompatConfig {
    fn default() -> Self {
        Self {
            leading_ack_discard: true,
            discard_read_remainder: true,
            lossy_write_accounting: true,
            drain_outbound: false,
        }
    }
}

/// Errors detected by configuration validation
///
/// All of these are fatal at startup and never retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Clock and data assigned to the same GPIO
    PinConflict,
    /// Poll period shorter than the worst-case cycle wire time
    PeriodTooShort { min_ms: u32 },
}

/// Top-level bus master configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BusConfig {
    pub lines: LineAssignment,
    /// Poll period in milliseconds
    pub poll_period_ms: u32,
    /// Command transmitted each cycle
    pub command: Command,
    pub compat: CompatConfig,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            lines: LineAssignment::default(),
            poll_period_ms: DEFAULT_POLL_PERIOD_MS,
            command: Command::default(),
            compat: CompatConfig::default(),
        }
    }
}

impl BusConfig {
    /// Minimum allowed poll period in milliseconds
    pub const fn min_period_ms() -> u32 {
        timing::WORST_CASE_CYCLE_US.div_ceil(1000)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lines.clock_pin == self.lines.data_pin {
            return Err(ConfigError::PinConflict);
        }
        if self.poll_period_ms < Self::min_period_ms() {
            return Err(ConfigError::PeriodTooShort {
                min_ms: Self::min_period_ms(),
            });
        }
        Ok(())
    }

    pub fn period_us(&self) -> u64 {
        u64::from(self.poll_period_ms) * 1000
    }
}
