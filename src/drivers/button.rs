//! Mode and off push-buttons.
//!
//! ## Hardware
//!
//! Active-low momentary switches on internal pull-ups.  Each GPIO fires
//! on the falling edge; the ISR does nothing but post an [`InputEvent`]
//! into [`BUTTON_EVENTS`].  The `btn-evt` task drains that queue, runs
//! each press through a per-button [`Debouncer`] and forwards survivors
//! to the control inbox.
//!
//! | Button | GPIO | Event        |
//! |--------|------|--------------|
//! | Mode   | 26   | `ModeToggle` |
//! | Off    | 27   | `ForceIdle`  |

use crate::app::commands::ControlMsg;
use crate::app::ports::{DigitalIo, PinConfig};
use crate::error::GpioError;
use crate::events::{BUTTON_EVENTS, DeferredQueue, InputEvent};
use crate::pins;

pub const DEBOUNCE_MS: u32 = 50;

/// ISR handler for the mode button.  Interrupt-safe: one non-blocking post.
pub fn mode_button_isr() {
    BUTTON_EVENTS.post(InputEvent::ModeToggle);
}

/// ISR handler for the off button.
pub fn off_button_isr() {
    BUTTON_EVENTS.post(InputEvent::ForceIdle);
}

/// Configure both buttons and attach their ISRs.
pub fn init_buttons(io: &mut impl DigitalIo) -> Result<(), GpioError> {
    let buttons: [(i32, fn()); 2] = [
        (pins::MODE_BUTTON_GPIO, mode_button_isr),
        (pins::OFF_BUTTON_GPIO, off_button_isr),
    ];
    for (pin, isr) in buttons {
        io.configure(pin, PinConfig::BUTTON)?;
        io.register_interrupt(pin, isr)?;
    }
    Ok(())
}

/// Drops presses that arrive within `window_ms` of the last accepted
/// press of the same button.
pub struct Debouncer {
    window_ms: u32,
    last_ms: [Option<u32>; 2],
}

impl Debouncer {
    pub fn new(window_ms: u32) -> Self {
        Self { window_ms, last_ms: [None; 2] }
    }

    /// `now_ms` is monotonic milliseconds, wrapping.
    pub fn accept(&mut self, event: InputEvent, now_ms: u32) -> bool {
        let slot = &mut self.last_ms[event as usize];
        match *slot {
            Some(last) if now_ms.wrapping_sub(last) < self.window_ms => false,
            _ => {
                *slot = Some(now_ms);
                true
            }
        }
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEBOUNCE_MS)
    }
}

/// `btn-evt` callback body: debounce, then hand to the control task.
pub struct ButtonForwarder<'q, const N: usize> {
    debouncer: Debouncer,
    inbox: &'q DeferredQueue<ControlMsg, N>,
}

impl<'q, const N: usize> ButtonForwarder<'q, N> {
    pub fn new(debouncer: Debouncer, inbox: &'q DeferredQueue<ControlMsg, N>) -> Self {
        Self { debouncer, inbox }
    }

    /// Returns `true` if the press reached the inbox.
    pub fn forward(&mut self, event: InputEvent, now_ms: u32) -> bool {
        if !self.debouncer.accept(event, now_ms) {
            log::debug!("Bounce on {} suppressed", event.name());
            return false;
        }
        self.inbox.post(ControlMsg::Input(event))
    }
}
