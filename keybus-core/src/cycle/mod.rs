//! Protocol poll cycle
//!
//! One poll transaction per scheduler tick: command out, ack in,
//! optional response in, bus back to idle. The transition logic is a
//! pure function of (state, event); the engine executes the hardware
//! side and feeds it events.

mod engine;
mod machine;

pub use engine::{CycleEngine, CycleOutcome, CycleStats};
pub use machine::{CycleEvent, CycleState};
