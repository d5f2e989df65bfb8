//! Unified error types for the EnvNode firmware.
//!
//! Every subsystem owns a small `Copy` error enum implementing
//! `core::error::Error`, so bootstrap code can propagate any of them
//! through `anyhow` with `?`.
//! Only the three command-path errors ever leave the device, and they do
//! so as a [`ReasonCode`] on the outbound error topic.

use core::fmt;

use crate::fsm::Mode;

// ---------------------------------------------------------------------------
// GPIO facade errors
// ---------------------------------------------------------------------------

/// Errors reported by a [`DigitalIo`](crate::app::ports::DigitalIo) backend.
/// The `i32` payloads carry the raw `esp_err_t`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GpioError {
    ConfigFailed(i32),
    WriteFailed(i32),
    IsrInstallFailed(i32),
    IsrRegisterFailed(i32),
}

impl fmt::Display for GpioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigFailed(rc) => write!(f, "pin config failed (rc={})", rc),
            Self::WriteFailed(rc) => write!(f, "pin write failed (rc={})", rc),
            Self::IsrInstallFailed(rc) => write!(f, "ISR service install failed (rc={})", rc),
            Self::IsrRegisterFailed(rc) => write!(f, "ISR handler add failed (rc={})", rc),
        }
    }
}

impl core::error::Error for GpioError {}

// ---------------------------------------------------------------------------
// Single-wire decoder errors
// ---------------------------------------------------------------------------

/// Which part of the exchange a line-level timeout happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for the sensor's low/high acknowledgement.
    Response,
    /// Inside the 40-pulse sampling window.
    Data,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// The data line could not be driven or switched back to input.
    Configuration(GpioError),
    /// The line did not change level in time.
    Timeout(Phase),
    /// Trailing byte does not match the sum of the four data bytes.
    Checksum { received: u8, computed: u8 },
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration(e) => write!(f, "line setup failed ({e})"),
            Self::Timeout(Phase::Response) => write!(f, "no response from sensor"),
            Self::Timeout(Phase::Data) => write!(f, "timed out inside data window"),
            Self::Checksum { received, computed } => write!(
                f,
                "checksum mismatch (received 0x{:02X}, computed 0x{:02X})",
                received, computed
            ),
        }
    }
}

impl From<GpioError> for DecodeError {
    fn from(e: GpioError) -> Self {
        Self::Configuration(e)
    }
}

impl core::error::Error for DecodeError {}

// ---------------------------------------------------------------------------
// State machine command rejections
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandError {
    /// Interval changes are only accepted in Configuration mode.
    ModeViolation { mode: Mode },
    /// Requested interval is shorter than the sensor recovery time.
    BelowMinimum { requested_ms: u32, minimum_ms: u32 },
}

impl CommandError {
    pub const fn reason(self) -> ReasonCode {
        match self {
            Self::ModeViolation { .. } => ReasonCode::IncorrectMode,
            Self::BelowMinimum { .. } => ReasonCode::IncorrectDelay,
        }
    }
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ModeViolation { mode } => {
                write!(f, "interval change refused in {} mode", mode.name())
            }
            Self::BelowMinimum { requested_ms, minimum_ms } => {
                write!(f, "interval {}ms below minimum {}ms", requested_ms, minimum_ms)
            }
        }
    }
}

impl core::error::Error for CommandError {}

// ---------------------------------------------------------------------------
// Remote routing errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseFailure {
    /// Payload is not a JSON object.
    InvalidJson,
    /// `delay` is absent or not an integer.
    MissingField,
    /// `delay` does not fit in 32 bits.
    OutOfRange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutingError {
    Parse(ParseFailure),
}

impl RoutingError {
    pub const fn reason(self) -> ReasonCode {
        match self {
            Self::Parse(_) => ReasonCode::InvalidPayload,
        }
    }
}

impl fmt::Display for RoutingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(ParseFailure::InvalidJson) => write!(f, "payload is not valid JSON"),
            Self::Parse(ParseFailure::MissingField) => write!(f, "missing integer 'delay' field"),
            Self::Parse(ParseFailure::OutOfRange) => write!(f, "'delay' out of range"),
        }
    }
}

impl core::error::Error for RoutingError {}

// ---------------------------------------------------------------------------
// Operator-visible reason codes
// ---------------------------------------------------------------------------

/// Machine-readable reason published on the error topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReasonCode {
    /// Malformed `config/delay` payload.
    InvalidPayload,
    /// `config/delay` received outside Configuration mode.
    IncorrectMode,
    /// `config/delay` below the minimum interval.
    IncorrectDelay,
}

impl ReasonCode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidPayload => "INVALID PAYLOAD",
            Self::IncorrectMode => "INCORRECT MODE",
            Self::IncorrectDelay => "INCORRECT DELAY",
        }
    }
}

impl fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Publisher errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishError {
    /// Client not connected or its lock is poisoned.
    Unavailable,
    /// Transport refused the message (raw `esp_err_t`).
    Rejected(i32),
    /// Payload could not be serialised.
    Encode,
}

impl fmt::Display for PublishError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable => write!(f, "client unavailable"),
            Self::Rejected(rc) => write!(f, "enqueue rejected (rc={})", rc),
            Self::Encode => write!(f, "payload encoding failed"),
        }
    }
}

impl core::error::Error for PublishError {}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Override blob failed to deserialize.
    Corrupted,
    /// A field failed range validation; names the field and why.
    ValidationFailed(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
        }
    }
}

impl core::error::Error for ConfigError {}
