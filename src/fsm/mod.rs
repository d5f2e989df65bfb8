//! Function-pointer finite state machine for the device mode.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  StateTable                                              │
//! │  ┌───────────────┬──────────────────┬──────────────────┐ │
//! │  │ Mode          │ on_input         │ accepts_interval │ │
//! │  ├───────────────┼──────────────────┼──────────────────┤ │
//! │  │ Performance   │ fn(ev) -> Mode   │ false            │ │
//! │  │ Configuration │ fn(ev) -> Mode   │ true             │ │
//! │  │ Idle          │ fn(ev) -> Mode   │ false            │ │
//! │  └───────────────┴──────────────────┴──────────────────┘ │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Local input events are resolved by the current row's `on_input`.
//! Remote mode commands jump straight to the named mode.  The only state
//! the engine mutates is the [`ControlCell`](context::ControlCell), through
//! the single [`ControlWriter`]; entering a mode has no side effects of its
//! own.  The sampler and the indicator task observe the new mode.

pub mod context;
pub mod states;

use log::info;

use crate::app::commands::RemoteCommand;
use crate::error::CommandError;
use crate::events::InputEvent;
use context::{ControlWriter, SampleInterval};

// ---------------------------------------------------------------------------
// Mode
// ---------------------------------------------------------------------------

/// Operating regime of the node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Mode {
    /// Periodic sensor reads published to the broker.
    Performance = 0,
    /// Sampling paused; the sample interval may be changed.
    Configuration = 1,
    /// No sensor reads.
    Idle = 2,
}

impl Mode {
    /// Total number of modes: used to size the table array.
    pub const COUNT: usize = 3;

    /// Convert a stored discriminant back to `Mode`.  Out-of-range values
    /// fall back to `Idle`.
    pub fn from_u8(raw: u8) -> Self {
        match raw {
            0 => Self::Performance,
            1 => Self::Configuration,
            2 => Self::Idle,
            _ => {
                debug_assert!(false, "invalid mode discriminant: {raw}");
                Self::Idle
            }
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Performance => "Performance",
            Self::Configuration => "Configuration",
            Self::Idle => "Idle",
        }
    }
}

// ---------------------------------------------------------------------------
// State descriptor
// ---------------------------------------------------------------------------

/// Resolves a local input event to the next mode.
pub type StateInputFn = fn(InputEvent) -> Mode;

/// Static descriptor for one mode.  Stored in a fixed-size array.
pub struct StateDescriptor {
    pub id: Mode,
    pub name: &'static str,
    pub on_input: StateInputFn,
    /// Whether `SetInterval` is accepted while in this mode.
    pub accepts_interval: bool,
}

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: Mode,
    pub to: Mode,
}

impl Transition {
    pub fn is_change(&self) -> bool {
        self.from != self.to
    }
}

/// What an accepted command changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    Mode(Transition),
    Interval {
        previous: SampleInterval,
        current: SampleInterval,
    },
}

// ---------------------------------------------------------------------------
// FSM engine
// ---------------------------------------------------------------------------

pub struct Fsm<'a> {
    /// Fixed-size table indexed by `Mode as usize`.
    table: [StateDescriptor; Mode::COUNT],
    control: ControlWriter<'a>,
}

impl<'a> Fsm<'a> {
    pub fn new(table: [StateDescriptor; Mode::COUNT], control: ControlWriter<'a>) -> Self {
        debug_assert!(
            table.iter().enumerate().all(|(i, d)| d.id as usize == i),
            "state table out of order"
        );
        Self { table, control }
    }

    pub fn current(&self) -> Mode {
        self.control.mode()
    }

    pub fn interval(&self) -> SampleInterval {
        self.control.interval()
    }

    /// Apply a local input event (button).
    pub fn handle_input(&mut self, event: InputEvent) -> Transition {
        let from = self.current();
        let to = (self.table[from as usize].on_input)(event);
        self.enter(from, to)
    }

    /// Apply a remote command.  Rejections leave the cell untouched.
    pub fn handle_command(&mut self, cmd: RemoteCommand) -> Result<Effect, CommandError> {
        let from = self.current();
        let to = match cmd {
            RemoteCommand::SetPerformance => Mode::Performance,
            RemoteCommand::SetConfiguration => Mode::Configuration,
            RemoteCommand::SetIdle => Mode::Idle,
            RemoteCommand::SetInterval(ms) => return self.set_interval(from, ms),
        };
        Ok(Effect::Mode(self.enter(from, to)))
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    fn set_interval(&mut self, mode: Mode, requested_ms: u32) -> Result<Effect, CommandError> {
        if !self.table[mode as usize].accepts_interval {
            return Err(CommandError::ModeViolation { mode });
        }
        let current = SampleInterval::from_ms(requested_ms).ok_or(CommandError::BelowMinimum {
            requested_ms,
            minimum_ms: SampleInterval::MIN_MS,
        })?;
        let previous = self.control.interval();
        self.control.set_interval(current);
        info!("FSM interval: {}ms -> {}ms", previous.as_ms(), current.as_ms());
        Ok(Effect::Interval { previous, current })
    }

    fn enter(&mut self, from: Mode, to: Mode) -> Transition {
        if from != to {
            info!(
                "FSM transition: {} -> {}",
                self.table[from as usize].name, self.table[to as usize].name
            );
            self.control.set_mode(to);
        }
        Transition { from, to }
    }
}
