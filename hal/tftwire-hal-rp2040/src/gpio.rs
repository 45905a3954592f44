//! GPIO outputs

use embassy_rp::gpio::Output;
use tftwire_hal::OutputPin;

/// `embassy-rp` output driven through [`tftwire_hal::OutputPin`]
pub struct Rp2040Output<'d> {
    pin: Output<'d>,
}

impl<'d> Rp2040Output<'d> {
    pub fn new(pin: Output<'d>) -> Self {
        Self { pin }
    }
}

impl OutputPin for Rp2040Output<'_> {
    fn set_high(&mut self) {
        self.pin.set_high();
    }

    fn set_low(&mut self) {
        self.pin.set_low();
    }

    fn is_set_high(&self) -> bool {
        self.pin.is_set_high()
    }
}
