//! Keybus command catalog
//!
//! Command bytes observed on DSC-style panels. The cycle engine only
//! ever transmits one of these per poll; the catalog exists so a
//! config-selected or injected command is still a known quantity.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Panel-to-keypad command bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum Command {
    /// Poll a keypad for partition status and pending key presses
    #[default]
    PartitionStatus = 0x05,
    /// Ask the keypad to report its zone LED state
    ZoneLights = 0x0A,
    /// Zone open/closed status broadcast
    ZoneStatus = 0x27,
    /// Bus supervision query
    KeybusQuery = 0x4C,
    /// Date/time broadcast
    DateTime = 0xA5,
}

impl Command {
    /// Wire representation
    pub const fn byte(self) -> u8 {
        self as u8
    }

    /// Decode a wire byte; `None` for bytes outside the catalog
    pub const fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x05 => Some(Command::PartitionStatus),
            0x0A => Some(Command::ZoneLights),
            0x27 => Some(Command::ZoneStatus),
            0x4C => Some(Command::KeybusQuery),
            0xA5 => Some(Command::DateTime),
            _ => None,
        }
    }
}
