//! Simple TOML parser for the bus configuration
//!
//! This is a minimal TOML parser that handles only the subset needed
//! for the keybus configuration. It does NOT support the full TOML
//! spec.
//!
//! Supported features:
//! - Key = value pairs (integer, hex integer, boolean)
//! - [section] headers
//! - Comments (# ...), including trailing comments
//!
//! NOT supported:
//! - Strings, arrays, inline tables
//! - Dotted keys and nested sections
//! - Multi-line anything

use keybus_core::command::Command;
use keybus_core::config::BusConfig;

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Unrecognized section header
    InvalidSection,
    /// Value failed to parse or is out of range
    InvalidValue,
    /// Key not known in its section
    UnknownKey,
}

/// Current parsing context
#[derive(Debug, Clone, Copy)]
enum Section {
    Root,
    Bus,
    Compat,
}

/// Parse TOML configuration into a [`BusConfig`]
///
/// Missing keys keep their defaults, so a partial file is valid.
pub fn parse_config(input: &str) -> Result<BusConfig, ParseError> {
    let mut config = BusConfig::default();
    let mut section = Section::Root;

    for line in input.lines() {
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        // Check for section header
        if line.starts_with('[') && line.ends_with(']') {
            section = match &line[1..line.len() - 1] {
                "bus" => Section::Bus,
                "compat" => Section::Compat,
                _ => return Err(ParseError::InvalidSection),
            };
            continue;
        }

        // Parse key = value
        if let Some((key, value)) = parse_key_value(line) {
            apply_value(&mut config, section, key, value)?;
        }
    }

    Ok(config)
}

/// Split a "key = value" line, stripping a trailing comment
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once('=')?;
    let value = match value.split_once('#') {
        Some((before, _)) => before,
        None => value,
    };
    Some((key.trim(), value.trim()))
}

fn apply_value(
    config: &mut BusConfig,
    section: Section,
    key: &str,
    value: &str,
) -> Result<(), ParseError> {
    match section {
        Section::Bus => match key {
            "clock_pin" => config.lines.clock_pin = parse_u8(value)?,
            "data_pin" => config.lines.data_pin = parse_u8(value)?,
            "poll_period_ms" => config.poll_period_ms = parse_u32(value)?,
            "command" => {
                config.command =
                    Command::from_byte(parse_u8(value)?).ok_or(ParseError::InvalidValue)?;
            }
            _ => return Err(ParseError::UnknownKey),
        },
        Section::Compat => match key {
            "leading_ack_discard" => config.compat.leading_ack_discard = parse_bool(value)?,
            "discard_read_remainder" => {
                config.compat.discard_read_remainder = parse_bool(value)?;
            }
            "lossy_write_accounting" => {
                config.compat.lossy_write_accounting = parse_bool(value)?;
            }
            "drain_outbound" => config.compat.drain_outbound = parse_bool(value)?,
            _ => return Err(ParseError::UnknownKey),
        },
        Section::Root => return Err(ParseError::UnknownKey),
    }
    Ok(())
}

fn parse_u32(value: &str) -> Result<u32, ParseError> {
    match value.strip_prefix("0x") {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => value.parse(),
    }
    .map_err(|_| ParseError::InvalidValue)
}

fn parse_u8(value: &str) -> Result<u8, ParseError> {
    let number = parse_u32(value)?;
    u8::try_from(number).map_err(|_| ParseError::InvalidValue)
}

fn parse_bool(value: &str) -> Result<bool, ParseError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ParseError::InvalidValue),
    }
}
