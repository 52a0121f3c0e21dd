//! GPIO wrappers implementing the keybus-hal pin traits

use embassy_rp::gpio::{AnyPin, Flex, Level, Output, Pull};
use embassy_rp::Peri;
use keybus_hal::gpio::{InputPin, OutputPin};

/// The clock line: master-driven push-pull, never read back
///
/// Driven high at construction; the bus idles high.
pub struct ClockPin {
    inner: Output<'static>,
}

impl ClockPin {
    pub fn new(pin: Peri<'static, AnyPin>) -> Self {
        Self {
            inner: Output::new(pin, Level::High),
        }
    }
}

impl OutputPin for ClockPin {
    fn set_high(&mut self) {
        self.inner.set_high();
    }

    fn set_low(&mut self) {
        self.inner.set_low();
    }

    fn is_set_high(&mut self) -> bool {
        self.inner.is_set_high()
    }
}

/// The data line: driven while clocking a bit out, released and sampled
/// while clocking a bit in
///
/// The keypad side is open collector, so the line carries a pull-up and
/// reads high when nobody pulls it down.
pub struct DataPin {
    inner: Flex<'static>,
}

impl DataPin {
    pub fn new(pin: Peri<'static, AnyPin>) -> Self {
        let mut inner = Flex::new(pin);
        inner.set_pull(Pull::Up);
        inner.set_high();
        inner.set_as_output();
        Self { inner }
    }
}

impl OutputPin for DataPin {
    fn set_high(&mut self) {
        self.inner.set_high();
        self.inner.set_as_output();
    }

    fn set_low(&mut self) {
        self.inner.set_low();
        self.inner.set_as_output();
    }

    fn is_set_high(&mut self) -> bool {
        self.inner.is_set_high()
    }
}

impl InputPin for DataPin {
    fn is_high(&mut self) -> bool {
        self.inner.set_as_input();
        self.inner.is_high()
    }
}
