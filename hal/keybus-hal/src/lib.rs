//! Keybus Hardware Abstraction Layer
//!
//! This crate defines the hardware abstraction traits that can be
//! implemented by chip-specific HALs (RP2040, etc.). This enables the
//! same bus-master logic to run on different hardware platforms - and,
//! just as importantly, against mock lines and a virtual clock in host
//! tests.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Bus master (keybus-core, firmware)     │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  keybus-hal (this crate - traits)       │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │  keybus-hal-  │       │  test mocks   │
//! │    rp2040     │       │  (host tests) │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`], [`gpio::InputPin`], [`gpio::IoPin`] - Digital I/O
//! - [`delay::DelayUs`] - Busy-wait timing primitive

#![no_std]
#![deny(unsafe_code)]

pub mod delay;
pub mod gpio;

// Re-export key traits at crate root for convenience
pub use delay::DelayUs;
pub use gpio::{InputPin, IoPin, OutputPin};
