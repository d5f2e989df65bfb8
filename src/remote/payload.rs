//! JSON bodies exchanged with the broker.
//!
//! Inbound:  `{"delay": <integer ms>}`
//! Outbound: `{"id": 1, "temperature": 23, "unidad": "Celsius"}` (one per
//! quantity) and `{"id": 1, "error": "INCORRECT MODE"}`.

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;

use crate::error::{ParseFailure, PublishError, ReasonCode};

use super::topics::Quantity;

// ── Inbound ───────────────────────────────────────────────────

/// Extract the requested interval from a `config/delay` body.
///
/// Negative values map to 0 so they fail the minimum-interval check like
/// any other too-short value.  Values past `u32::MAX` are rejected here.
pub fn parse_delay(payload: &[u8]) -> Result<u32, ParseFailure> {
    // Some clients send C strings.
    let end = payload.iter().rposition(|b| *b != 0).map_or(0, |i| i + 1);
    let value: Value = serde_json::from_slice(&payload[..end]).map_err(|_| ParseFailure::InvalidJson)?;
    let delay = value
        .as_object()
        .ok_or(ParseFailure::InvalidJson)?
        .get("delay")
        .ok_or(ParseFailure::MissingField)?;

    if let Some(v) = delay.as_i64() {
        if v < 0 {
            return Ok(0);
        }
        return u32::try_from(v).map_err(|_| ParseFailure::OutOfRange);
    }
    if delay.as_u64().is_some() {
        return Err(ParseFailure::OutOfRange);
    }
    Err(ParseFailure::MissingField)
}

// ── Outbound ──────────────────────────────────────────────────

/// One telemetry message.  Serialises as a three-key object whose middle
/// key is the quantity's field name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TelemetryPayload {
    pub id: u32,
    pub quantity: Quantity,
    pub value: u8,
}

impl Serialize for TelemetryPayload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(3))?;
        map.serialize_entry("id", &self.id)?;
        map.serialize_entry(self.quantity.field(), &self.value)?;
        map.serialize_entry("unidad", self.quantity.unit())?;
        map.end()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct ErrorPayload {
    pub id: u32,
    pub error: &'static str,
}

impl ErrorPayload {
    pub fn new(id: u32, reason: ReasonCode) -> Self {
        Self { id, error: reason.as_str() }
    }
}

pub fn encode<T: Serialize>(payload: &T) -> Result<Vec<u8>, PublishError> {
    serde_json::to_vec(payload).map_err(|_| PublishError::Encode)
}
