//! Mode and link indicator LEDs.
//!
//! One discrete LED per mode (exactly one lit at a time) plus a pair
//! showing whether the broker session is up.  Write failures are logged
//! and otherwise ignored; an LED is never worth stopping for.

use embedded_hal::digital::PinState;
use log::warn;

use crate::app::ports::{DigitalIo, IndicatorPort, PinConfig, PinId};
use crate::error::GpioError;
use crate::fsm::Mode;
use crate::pins;

const MODE_LEDS: [(Mode, PinId); 3] = [
    (Mode::Performance, pins::LED_GREEN_GPIO),
    (Mode::Configuration, pins::LED_YELLOW_GPIO),
    (Mode::Idle, pins::LED_RED_GPIO),
];

pub struct StatusLeds<IO> {
    io: IO,
}

impl<IO: DigitalIo> StatusLeds<IO> {
    pub fn new(io: IO) -> Self {
        Self { io }
    }

    /// Configure every indicator as an output, all off.
    pub fn init(&mut self) -> Result<(), GpioError> {
        let link = [pins::CONNECTED_LED_GPIO, pins::CONNECTING_LED_GPIO];
        for pin in MODE_LEDS.iter().map(|(_, p)| *p).chain(link) {
            self.io.configure(pin, PinConfig::OUTPUT)?;
            self.io.write(pin, PinState::Low)?;
        }
        Ok(())
    }

    pub fn show_link(&mut self, up: bool) {
        self.set(pins::CONNECTED_LED_GPIO, up);
        self.set(pins::CONNECTING_LED_GPIO, !up);
    }

    pub fn io(&self) -> &IO {
        &self.io
    }

    fn set(&mut self, pin: PinId, on: bool) {
        if let Err(e) = self.io.write(pin, PinState::from(on)) {
            warn!("LED {} write failed: {}", pin, e);
        }
    }
}

impl<IO: DigitalIo> IndicatorPort for StatusLeds<IO> {
    fn show_mode(&mut self, mode: Mode) {
        for (m, pin) in MODE_LEDS {
            self.set(pin, m == mode);
        }
    }
}
