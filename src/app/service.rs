//! Control service: the single writer of the device mode.
//!
//! [`ControlService`] owns the FSM and with it the only
//! [`ControlWriter`].  Button presses and remote commands are funnelled
//! into one inbox and applied here, one at a time, so read-modify-write
//! sequences on the mode are never interleaved.
//!
//! ```text
//!  btn-evt task ──Input──▶ ┌──────────────────┐
//!                          │  CONTROL_INBOX   │──▶ ControlService ──▶ EventSink
//!  MQTT callback ─Remote──▶│  (DeferredQueue) │      (FSM)
//!                ─Malformed▶└─────────────────┘
//! ```

use log::{info, warn};

use crate::events::DeferredQueue;
use crate::fsm::context::{ControlWriter, SampleInterval};
use crate::fsm::states::build_state_table;
use crate::fsm::{Effect, Fsm, Mode, Transition};

use super::commands::ControlMsg;
use super::events::NodeEvent;
use super::ports::EventSink;

// ───────────────────────────────────────────────────────────────
// ControlService
// ───────────────────────────────────────────────────────────────

pub struct ControlService<'a> {
    fsm: Fsm<'a>,
    handled: u32,
    rejected: u32,
}

impl<'a> ControlService<'a> {
    /// Take ownership of the writer and apply the boot-time interval.
    pub fn new(mut control: ControlWriter<'a>, initial_interval: SampleInterval) -> Self {
        control.set_interval(initial_interval);
        Self {
            fsm: Fsm::new(build_state_table(), control),
            handled: 0,
            rejected: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    pub fn start(&mut self, sink: &mut impl EventSink) {
        let mode = self.fsm.current();
        sink.emit(&NodeEvent::Started(mode));
        info!(
            "ControlService started in {:?} (interval {}ms)",
            mode,
            self.fsm.interval().as_ms()
        );
    }

    /// Block on `inbox` forever, handling each message in order.
    pub fn run<const N: usize>(
        &mut self,
        inbox: &DeferredQueue<ControlMsg, N>,
        sink: &mut impl EventSink,
    ) -> ! {
        inbox.run(|msg| self.handle(msg, sink))
    }

    // ── Message handling ──────────────────────────────────────

    pub fn handle(&mut self, msg: ControlMsg, sink: &mut impl EventSink) {
        self.handled = self.handled.wrapping_add(1);
        match msg {
            ControlMsg::Input(event) => {
                let t = self.fsm.handle_input(event);
                emit_transition(t, sink);
            }
            ControlMsg::Remote(cmd) => match self.fsm.handle_command(cmd) {
                Ok(Effect::Mode(t)) => emit_transition(t, sink),
                Ok(Effect::Interval { previous, current }) => {
                    sink.emit(&NodeEvent::IntervalChanged {
                        from_ms: previous.as_ms(),
                        to_ms: current.as_ms(),
                    });
                }
                Err(e) => {
                    warn!("Command {:?} rejected: {}", cmd, e);
                    self.reject(e.reason(), sink);
                }
            },
            ControlMsg::Malformed(e) => {
                warn!("Malformed remote message: {}", e);
                self.reject(e.reason(), sink);
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn mode(&self) -> Mode {
        self.fsm.current()
    }

    pub fn interval(&self) -> SampleInterval {
        self.fsm.interval()
    }

    /// Messages handled since startup.
    pub fn handled(&self) -> u32 {
        self.handled
    }

    /// Messages that ended in a rejection.
    pub fn rejected(&self) -> u32 {
        self.rejected
    }

    // ── Internal ──────────────────────────────────────────────

    fn reject(&mut self, reason: crate::error::ReasonCode, sink: &mut impl EventSink) {
        self.rejected = self.rejected.wrapping_add(1);
        sink.emit(&NodeEvent::CommandRejected(reason));
    }
}

fn emit_transition(t: Transition, sink: &mut impl EventSink) {
    if t.is_change() {
        sink.emit(&NodeEvent::ModeChanged { from: t.from, to: t.to });
    }
}
