//! Outbound application events.
//!
//! The control service and the sampler emit these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them: log to serial, publish over MQTT.

use crate::error::{DecodeError, ReasonCode};
use crate::fsm::Mode;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeEvent {
    /// The control service has started (carries initial mode).
    Started(Mode),

    /// The FSM moved between modes.
    ModeChanged { from: Mode, to: Mode },

    /// Sample interval was changed by a remote command.
    IntervalChanged { from_ms: u32, to_ms: u32 },

    /// A remote command was refused.
    CommandRejected(ReasonCode),

    /// A sampling cycle produced a valid reading.
    Telemetry(TelemetrySample),

    /// A sampling cycle failed; nothing was published.
    SampleDropped(DecodeError),
}

/// One cycle's worth of measurements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TelemetrySample {
    /// Light sensor digital level (0 or 1).
    pub light: u8,
    /// Integral degrees Celsius.
    pub temperature: u8,
    /// Integral percent relative humidity.
    pub humidity: u8,
}
