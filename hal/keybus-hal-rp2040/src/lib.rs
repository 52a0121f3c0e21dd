//! RP2040 implementation of the keybus HAL
//!
//! Binds the `keybus-hal` traits to embassy-rp: runtime pin allocation
//! for config-driven line assignment, push-pull and bidirectional line
//! wrappers, and a blocking busy-wait delay on the hardware timebase.

#![no_std]

pub mod delay;
pub mod gpio;
pub mod pins;

// Re-export the commonly used types at crate root
pub use delay::BusyWait;
pub use gpio::{ClockPin, DataPin};
pub use pins::{PinBank, PinError};
