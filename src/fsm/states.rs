//! Concrete per-mode input handlers and table builder.
//!
//! ```text
//!                 ┌──────[toggle]──────┐
//!                 ▼                    │
//!  IDLE ──[toggle]──▶ PERFORMANCE ──[toggle]──▶ CONFIGURATION
//!    ▲                     │                         │
//!    └─────[off button]────┴─────────[off button]────┘
//! ```
//!
//! Toggle only alternates between the two active modes; from Idle it is
//! the way back into Performance.

use super::{Mode, StateDescriptor};
use crate::events::InputEvent;

/// Build the static state table.  Called once at startup.
pub fn build_state_table() -> [StateDescriptor; Mode::COUNT] {
    [
        // Index 0: Performance
        StateDescriptor {
            id: Mode::Performance,
            name: "Performance",
            on_input: performance_input,
            accepts_interval: false,
        },
        // Index 1: Configuration
        StateDescriptor {
            id: Mode::Configuration,
            name: "Configuration",
            on_input: configuration_input,
            accepts_interval: true,
        },
        // Index 2: Idle
        StateDescriptor {
            id: Mode::Idle,
            name: "Idle",
            on_input: idle_input,
            accepts_interval: false,
        },
    ]
}

fn performance_input(event: InputEvent) -> Mode {
    match event {
        InputEvent::ModeToggle => Mode::Configuration,
        InputEvent::ForceIdle => Mode::Idle,
    }
}

fn configuration_input(event: InputEvent) -> Mode {
    match event {
        InputEvent::ModeToggle => Mode::Performance,
        InputEvent::ForceIdle => Mode::Idle,
    }
}

fn idle_input(event: InputEvent) -> Mode {
    match event {
        InputEvent::ModeToggle => Mode::Performance,
        InputEvent::ForceIdle => Mode::Idle,
    }
}
