//! Runtime pin allocation for config-driven line assignment
//!
//! The bus lines are assigned by GPIO number in the configuration file,
//! not hardcoded, so the firmware registers the header GPIOs it routes
//! into a [`PinBank`] and takes lines out by number at startup. A failed
//! take is the fatal hardware-acquisition error: it is reported once at
//! startup and never retried.

use embassy_rp::gpio::AnyPin;
use embassy_rp::Peri;

/// Number of GPIOs on the RP2040
pub const BANK_SIZE: usize = 30;

/// Errors when requesting a line from the bank
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinError {
    /// GPIO number out of range (0-29 valid)
    InvalidPin,
    /// GPIO exists but is not routed to the bus header
    NotRouted,
    /// GPIO was already taken by an earlier request
    AlreadyTaken,
}

/// Holder of the header GPIOs, handed out by number
pub struct PinBank {
    pins: [Option<Peri<'static, AnyPin>>; BANK_SIZE],
    routed: [bool; BANK_SIZE],
}

impl PinBank {
    /// Create a bank with no GPIOs registered
    pub fn empty() -> Self {
        Self {
            pins: [const { None }; BANK_SIZE],
            routed: [false; BANK_SIZE],
        }
    }

    /// Register a GPIO under its number
    ///
    /// Usually invoked through the [`pin_bank!`](crate::pin_bank) macro.
    pub fn register(&mut self, pin_num: u8, pin: Peri<'static, AnyPin>) {
        let index = usize::from(pin_num);
        debug_assert!(index < BANK_SIZE);
        debug_assert!(!self.routed[index]);
        self.pins[index] = Some(pin);
        self.routed[index] = true;
    }

    /// Take a GPIO by number
    pub fn take(&mut self, pin_num: u8) -> Result<Peri<'static, AnyPin>, PinError> {
        let index = usize::from(pin_num);
        if index >= BANK_SIZE {
            return Err(PinError::InvalidPin);
        }
        if !self.routed[index] {
            return Err(PinError::NotRouted);
        }
        self.pins[index].take().ok_or(PinError::AlreadyTaken)
    }

    /// Return a previously taken GPIO to the bank
    pub fn put_back(&mut self, pin_num: u8, pin: Peri<'static, AnyPin>) {
        let index = usize::from(pin_num);
        debug_assert!(index < BANK_SIZE && self.routed[index]);
        self.pins[index] = Some(pin);
    }
}

/// Build a [`PinBank`] from the GPIOs routed on this board
///
/// Usage:
/// ```ignore
/// let mut bank = pin_bank! {
///     0 => p.PIN_0,
///     5 => p.PIN_5,
/// };
/// ```
#[macro_export]
macro_rules! pin_bank {
    ($($num:literal => $pin:expr),+ $(,)?) => {{
        let mut bank = $crate::pins::PinBank::empty();
        $(
            bank.register(
                $num,
                embassy_rp::Peri::<embassy_rp::gpio::AnyPin>::from($pin),
            );
        )+
        bank
    }};
}
