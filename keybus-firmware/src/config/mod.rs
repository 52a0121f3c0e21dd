//! Embedded configuration
//!
//! The configuration is compiled into the firmware image from
//! keybus.toml and parsed once at boot. build.rs validates the same
//! file on the host with the full toml crate.

mod toml;

pub use toml::{parse_config, ParseError};
