//! Mode indicator follower.
//!
//! Polls the control state and drives the [`IndicatorPort`] only when the
//! mode actually changed.

use embedded_hal::delay::DelayNs;

use crate::fsm::Mode;
use crate::fsm::context::ControlReader;

use super::ports::IndicatorPort;

pub struct IndicatorSync<'a> {
    control: ControlReader<'a>,
    shown: Option<Mode>,
}

impl<'a> IndicatorSync<'a> {
    pub fn new(control: ControlReader<'a>) -> Self {
        Self { control, shown: None }
    }

    /// Returns `true` if the port was updated.
    pub fn sync(&mut self, port: &mut impl IndicatorPort) -> bool {
        let mode = self.control.mode();
        if self.shown == Some(mode) {
            return false;
        }
        port.show_mode(mode);
        self.shown = Some(mode);
        true
    }

    pub fn run(&mut self, port: &mut impl IndicatorPort, delay: &mut impl DelayNs, refresh_ms: u32) -> ! {
        loop {
            self.sync(port);
            delay.delay_ms(refresh_ms);
        }
    }
}
