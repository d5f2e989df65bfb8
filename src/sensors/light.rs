//! Light-dependent-resistor comparator input.
//!
//! The LDR module has an on-board comparator, so the pin is a plain
//! digital input with no pulls.  The level is reported as-is (0 or 1).

use embedded_hal::digital::PinState;

use crate::app::ports::{Direction, DigitalIo, InterruptTrigger, PinConfig, PinId, Pull};
use crate::error::GpioError;

const LDR_INPUT: PinConfig = PinConfig {
    direction: Direction::Input,
    pull: Pull::None,
    interrupt: InterruptTrigger::Disabled,
};

#[derive(Debug, Clone, Copy)]
pub struct LightSensor {
    pin: PinId,
}

impl LightSensor {
    pub const fn new(pin: PinId) -> Self {
        Self { pin }
    }

    pub fn init(&self, io: &mut impl DigitalIo) -> Result<(), GpioError> {
        io.configure(self.pin, LDR_INPUT)
    }

    pub fn read(&self, io: &mut impl DigitalIo) -> u8 {
        match io.read(self.pin) {
            PinState::High => 1,
            PinState::Low => 0,
        }
    }
}
