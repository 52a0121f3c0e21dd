//! Configuration type definitions
//!
//! These are plain data types; parsing lives with whatever loads the
//! configuration (the firmware embeds and parses a TOML file).

mod types;

pub use types::{
    BusConfig, CompatConfig, ConfigError, LineAssignment, DEFAULT_POLL_PERIOD_MS,
};
