//! Poll-cycle engine
//!
//! Executes one full transaction per invocation, entirely busy-waiting
//! inside the caller's tick context. There is no cancellation path: a
//! started cycle always runs to completion (microsecond-to-millisecond
//! scale), which is what keeps the bus state consistent.

use keybus_hal::{DelayUs, IoPin, OutputPin};

use crate::bus::LineDriver;
use crate::command::Command;
use crate::config::CompatConfig;
use crate::cycle::machine::{CycleEvent, CycleState};
use crate::queue::{QueueConsumer, QueueProducer};

/// Result of one poll transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CycleOutcome {
    /// Keypad acknowledged and the response byte was queued
    Response(u8),
    /// Keypad acknowledged but the inbound queue was full; byte dropped
    ResponseDropped(u8),
    /// Keypad did not acknowledge; a valid outcome, not an error
    NoResponse,
}

/// Lifetime counters for observability
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CycleStats {
    pub cycles: u32,
    pub responses: u32,
    pub no_responses: u32,
    pub dropped: u32,
}

/// The bus master's transaction executor
///
/// Owns the line driver (and with it both pins), the inbound-queue
/// producer and the outbound-queue consumer. Exactly one engine exists
/// per bus, and only the scheduler context calls into it, so at most one
/// transaction is ever in flight.
pub struct CycleEngine<'a, C, D, T> {
    bus: LineDriver<C, D, T>,
    command: Command,
    compat: CompatConfig,
    state: CycleState,
    inbound: QueueProducer<'a>,
    outbound: QueueConsumer<'a>,
    stats: CycleStats,
}

impl<'a, C: OutputPin, D: IoPin, T: DelayUs> CycleEngine<'a, C, D, T> {
    pub fn new(
        bus: LineDriver<C, D, T>,
        command: Command,
        compat: CompatConfig,
        inbound: QueueProducer<'a>,
        outbound: QueueConsumer<'a>,
    ) -> Self {
        Self {
            bus,
            command,
            compat,
            state: CycleState::Idle,
            inbound,
            outbound,
            stats: CycleStats::default(),
        }
    }

    /// Drive both lines to idle-high; call once before the first cycle
    pub fn start(&mut self) {
        self.bus.idle();
    }

    pub fn state(&self) -> CycleState {
        self.state
    }

    pub fn stats(&self) -> CycleStats {
        self.stats
    }

    /// Execute one full poll transaction, synchronously to completion
    pub fn poll_cycle(&mut self) -> CycleOutcome {
        debug_assert!(!self.state.in_transaction());
        self.stats.cycles = self.stats.cycles.saturating_add(1);

        // Idle -> SendCommand: bus to the idle-high convention first
        self.bus.idle();
        self.step(CycleEvent::TickStarted);

        let command = self.next_command();
        self.bus.write_byte(command);
        self.step(CycleEvent::CommandSent);

        // WaitAck: the deployed driver clocks in one extra bit in front
        // of the ack and throws it away
        if self.compat.leading_ack_discard {
            let _ = self.bus.read_bit();
        }
        let acked = !self.bus.read_bit();

        let outcome = if acked {
            self.step(CycleEvent::AckAsserted);
            let response = self.bus.read_byte();
            match self.inbound.push_byte(response) {
                Ok(()) => {
                    self.stats.responses = self.stats.responses.saturating_add(1);
                    self.step(CycleEvent::ResponseQueued);
                    CycleOutcome::Response(response)
                }
                Err(_) => {
                    self.stats.dropped = self.stats.dropped.saturating_add(1);
                    self.step(CycleEvent::ResponseDropped);
                    CycleOutcome::ResponseDropped(response)
                }
            }
        } else {
            self.step(CycleEvent::AckMissing);
            self.stats.no_responses = self.stats.no_responses.saturating_add(1);
            self.step(CycleEvent::NoResponseRecorded);
            CycleOutcome::NoResponse
        };

        // DriveIdleHigh: force both lines high, hold the recovery delay
        self.bus.recover();
        self.step(CycleEvent::BusReleased);

        outcome
    }

    /// Park both lines low
    ///
    /// Teardown: the caller must stop the schedule first so no further
    /// cycle can start.
    pub fn shutdown(&mut self) {
        self.bus.release();
    }

    // Command injection is gated: with `drain_outbound` off the outbound
    // queue fills but is never consumed
    fn next_command(&mut self) -> u8 {
        if self.compat.drain_outbound {
            self.outbound.pop_byte().unwrap_or(self.command.byte())
        } else {
            self.command.byte()
        }
    }

    fn step(&mut self, event: CycleEvent) {
        self.state = self.state.transition(event);
    }
}
