//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ ControlService / Sampler / Dht11 (domain)
//! ```
//!
//! Driven adapters (GPIO, clock, sensors, publishers, event sinks)
//! implement these traits.  The domain consumes them via generics, so the
//! core never touches hardware directly.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::PinState;

use crate::error::{DecodeError, GpioError, PublishError};
use crate::fsm::Mode;
use crate::sensors::dht11::RawReading;

/// GPIO number as used by the underlying SDK.
pub type PinId = i32;

// ───────────────────────────────────────────────────────────────
// Digital I/O facade (driven adapter: domain ↔ pins)
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Input,
    Output,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pull {
    None,
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterruptTrigger {
    Disabled,
    RisingEdge,
    FallingEdge,
    AnyEdge,
    LowLevel,
    HighLevel,
}

/// Full electrical configuration for one pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinConfig {
    pub direction: Direction,
    pub pull: Pull,
    pub interrupt: InterruptTrigger,
}

impl PinConfig {
    pub const OUTPUT: Self = Self {
        direction: Direction::Output,
        pull: Pull::None,
        interrupt: InterruptTrigger::Disabled,
    };

    pub const INPUT_PULLUP: Self = Self {
        direction: Direction::Input,
        pull: Pull::Up,
        interrupt: InterruptTrigger::Disabled,
    };

    /// Active-low push-button: pull-up, interrupt on press.
    pub const BUTTON: Self = Self {
        direction: Direction::Input,
        pull: Pull::Up,
        interrupt: InterruptTrigger::FallingEdge,
    };
}

/// Pin configuration, level access and interrupt registration.
///
/// `read` is infallible: the single-wire decoder calls it in a tight
/// polling loop with interrupts masked.
pub trait DigitalIo {
    fn configure(&mut self, pin: PinId, config: PinConfig) -> Result<(), GpioError>;

    fn read(&mut self, pin: PinId) -> PinState;

    fn write(&mut self, pin: PinId, level: PinState) -> Result<(), GpioError>;

    /// Attach `handler` to the pin's interrupt.  The handler runs in ISR
    /// context and must not block, allocate or log.
    fn register_interrupt(&mut self, pin: PinId, handler: fn()) -> Result<(), GpioError>;
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Monotonic microsecond clock with blocking delays.
pub trait MonotonicClock: DelayNs {
    /// Microseconds since an arbitrary fixed origin.  Never goes backwards.
    fn now_us(&self) -> u64;

    /// Block until `now_us() >= deadline_us`.  Returns at once if the
    /// deadline has passed.
    fn sleep_until_us(&mut self, deadline_us: u64) {
        let now = self.now_us();
        if deadline_us > now {
            let mut remaining = deadline_us - now;
            while remaining > 0 {
                let chunk = remaining.min(u64::from(u32::MAX));
                self.delay_us(chunk as u32);
                remaining -= chunk;
            }
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port the sampler calls once per cycle.
pub trait SensorPort {
    /// One complete single-wire exchange with the climate sensor.
    fn read_climate(&mut self) -> Result<RawReading, DecodeError>;

    /// Current light-sensor level, 0 or 1.
    fn read_light(&mut self) -> u8;
}

// ───────────────────────────────────────────────────────────────
// Indicator port (domain → LEDs)
// ───────────────────────────────────────────────────────────────

pub trait IndicatorPort {
    /// Light exactly the indicator for `mode`.
    fn show_mode(&mut self, mode: Mode);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`NodeEvent`](super::events::NodeEvent)s
/// through this port.  Adapters decide where they go (serial log, MQTT).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::NodeEvent);
}

/// Fan out to two sinks, e.g. log + MQTT.
impl<A: EventSink, B: EventSink> EventSink for (A, B) {
    fn emit(&mut self, event: &super::events::NodeEvent) {
        self.0.emit(event);
        self.1.emit(event);
    }
}

// ───────────────────────────────────────────────────────────────
// Publisher port (domain → pub/sub client)
// ───────────────────────────────────────────────────────────────

/// Fire-and-forget publication.  Delivery guarantees are the transport's.
pub trait Publisher {
    fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), PublishError>;
}
