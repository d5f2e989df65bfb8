//! Inbound commands to the control service.
//!
//! Remote commands arrive on the broker and are decoded by the
//! [`Router`](crate::remote::router::Router).  The control task receives
//! them, together with debounced button events, as [`ControlMsg`]s.

use crate::error::RoutingError;
use crate::events::InputEvent;

/// Commands the remote operator can issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteCommand {
    /// Enter Performance mode (`config/ON`).
    SetPerformance,
    /// Enter Configuration mode (`config/CONFIG`).
    SetConfiguration,
    /// Enter Idle mode (`config/SLEEP`).
    SetIdle,
    /// Change the sample interval, in milliseconds (`config/delay`).
    /// Accepted only in Configuration mode.
    SetInterval(u32),
}

/// Everything the single-writer control task consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlMsg {
    /// Debounced local button press.
    Input(InputEvent),
    /// Well-formed remote command.
    Remote(RemoteCommand),
    /// Remote message on a known topic that failed to parse.
    Malformed(RoutingError),
}
