//! Mock hardware adapters for integration tests.
//!
//! Everything shares one virtual microsecond clock.  Delays advance it by
//! their length and every pin read advances it by 1 µs, so the DHT11
//! decoder's polling loops measure scripted pulse widths exactly.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::PinState;

use envnode::app::events::NodeEvent;
use envnode::app::ports::{Direction, DigitalIo, EventSink, MonotonicClock, PinConfig, PinId, Publisher};
use envnode::error::{GpioError, PublishError};

// ── Virtual time ──────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct MockClock {
    now: Rc<Cell<u64>>,
}

#[allow(dead_code)]
impl MockClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, us: u64) {
        self.now.set(self.now.get() + us);
    }

    pub fn now(&self) -> u64 {
        self.now.get()
    }
}

impl DelayNs for MockClock {
    fn delay_ns(&mut self, ns: u32) {
        self.advance(u64::from(ns.div_ceil(1_000)));
    }

    fn delay_us(&mut self, us: u32) {
        self.advance(u64::from(us));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.advance(u64::from(ms) * 1_000);
    }
}

impl MonotonicClock for MockClock {
    fn now_us(&self) -> u64 {
        self.now.get()
    }
}

// ── Scripted single-wire line ─────────────────────────────────

pub const ZERO_HIGH_US: u64 = 27;
pub const ONE_HIGH_US: u64 = 70;

/// What the sensor drives onto the line once the host releases it.
#[derive(Debug, Clone)]
pub struct Waveform {
    segments: Vec<(PinState, u64)>,
    tail: PinState,
}

#[allow(dead_code)]
impl Waveform {
    /// Nobody answers: the pull-up holds the line high.
    pub fn silent() -> Self {
        Self { segments: Vec::new(), tail: PinState::High }
    }

    /// A complete, well-timed transmission of `bytes`.
    pub fn frame(bytes: [u8; 5]) -> Self {
        let mut w = Self::preamble();
        w.push_bits(bytes, 40);
        w.segments.push((PinState::Low, 50));
        w
    }

    /// A transmission whose sensor pulls the line low and never lets go
    /// after `bits` data bits.
    pub fn stalled_after(bytes: [u8; 5], bits: usize) -> Self {
        let mut w = Self::preamble();
        w.push_bits(bytes, bits);
        w.tail = PinState::Low;
        w
    }

    /// Every edge arrives in time but the bits are `high_us` wide, so the
    /// frame as a whole drags on.
    pub fn dragging(high_us: u64) -> Self {
        let mut w = Self::preamble();
        for _ in 0..40 {
            w.segments.push((PinState::Low, 50));
            w.segments.push((PinState::High, high_us));
        }
        w.segments.push((PinState::Low, 50));
        w
    }

    /// Sensor pulls low for its acknowledgement and never releases.
    pub fn stuck_low() -> Self {
        Self {
            segments: vec![(PinState::High, 30)],
            tail: PinState::Low,
        }
    }

    fn preamble() -> Self {
        Self {
            segments: vec![(PinState::High, 30), (PinState::Low, 80), (PinState::High, 80)],
            tail: PinState::High,
        }
    }

    fn push_bits(&mut self, bytes: [u8; 5], bits: usize) {
        let frame = bytes.iter().fold(0u64, |acc, &b| (acc << 8) | u64::from(b));
        for i in 0..bits.min(40) {
            let one = (frame >> (39 - i)) & 1 == 1;
            self.segments.push((PinState::Low, 50));
            self.segments
                .push((PinState::High, if one { ONE_HIGH_US } else { ZERO_HIGH_US }));
        }
    }

    fn level_at(&self, mut t: u64) -> PinState {
        for &(level, len) in &self.segments {
            if t < len {
                return level;
            }
            t -= len;
        }
        self.tail
    }
}

/// Build a valid DHT11 frame, checksum included.
pub fn dht_bytes(humidity: u8, temperature: u8) -> [u8; 5] {
    [humidity, 0, temperature, 0, humidity.wrapping_add(temperature)]
}

// ── MockIo ────────────────────────────────────────────────────

pub struct MockIo {
    clock: MockClock,
    dht_pin: PinId,
    exchanges: VecDeque<Waveform>,
    active: Option<(u64, Waveform)>,
    pub levels: HashMap<PinId, PinState>,
    pub configs: HashMap<PinId, PinConfig>,
    pub writes: Vec<(PinId, PinState)>,
    pub interrupts: HashMap<PinId, fn()>,
    pub fail_configure: Option<PinId>,
}

#[allow(dead_code)]
impl MockIo {
    pub fn new(clock: MockClock, dht_pin: PinId) -> Self {
        Self {
            clock,
            dht_pin,
            exchanges: VecDeque::new(),
            active: None,
            levels: HashMap::new(),
            configs: HashMap::new(),
            writes: Vec::new(),
            interrupts: HashMap::new(),
            fail_configure: None,
        }
    }

    /// Queue the waveform for the next exchange.  Exchanges with nothing
    /// queued see a silent line.
    pub fn script(&mut self, waveform: Waveform) {
        self.exchanges.push_back(waveform);
    }

    pub fn set_level(&mut self, pin: PinId, level: PinState) {
        self.levels.insert(pin, level);
    }

    pub fn level_written(&self, pin: PinId) -> Option<PinState> {
        self.writes.iter().rev().find(|(p, _)| *p == pin).map(|(_, l)| *l)
    }

    pub fn fire(&self, pin: PinId) {
        if let Some(isr) = self.interrupts.get(&pin) {
            isr();
        }
    }
}

impl DigitalIo for MockIo {
    fn configure(&mut self, pin: PinId, config: PinConfig) -> Result<(), GpioError> {
        if self.fail_configure == Some(pin) {
            return Err(GpioError::ConfigFailed(-1));
        }
        self.configs.insert(pin, config);
        if pin == self.dht_pin {
            self.active = match config.direction {
                Direction::Input => {
                    let w = self.exchanges.pop_front().unwrap_or_else(Waveform::silent);
                    Some((self.clock.now(), w))
                }
                Direction::Output => None,
            };
        }
        Ok(())
    }

    fn read(&mut self, pin: PinId) -> PinState {
        let now = self.clock.now();
        self.clock.advance(1);
        if pin == self.dht_pin {
            return match &self.active {
                Some((start, w)) => w.level_at(now - start),
                None => self.level_written(pin).unwrap_or(PinState::High),
            };
        }
        self.levels.get(&pin).copied().unwrap_or(PinState::High)
    }

    fn write(&mut self, pin: PinId, level: PinState) -> Result<(), GpioError> {
        self.writes.push((pin, level));
        Ok(())
    }

    fn register_interrupt(&mut self, pin: PinId, handler: fn()) -> Result<(), GpioError> {
        self.interrupts.insert(pin, handler);
        Ok(())
    }
}

// ── Publisher / sink recorders ────────────────────────────────

/// Cloneable publisher; all clones append to the same log.
#[derive(Debug, Clone, Default)]
pub struct RecordingPublisher {
    pub sent: Rc<RefCell<Vec<(String, String)>>>,
    pub offline: Rc<Cell<bool>>,
}

#[allow(dead_code)]
impl RecordingPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<(String, String)> {
        self.sent.borrow().clone()
    }

    pub fn on_topic(&self, topic: &str) -> Vec<String> {
        self.sent
            .borrow()
            .iter()
            .filter(|(t, _)| t == topic)
            .map(|(_, p)| p.clone())
            .collect()
    }

    pub fn clear(&self) {
        self.sent.borrow_mut().clear();
    }
}

impl Publisher for RecordingPublisher {
    fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), PublishError> {
        if self.offline.get() {
            return Err(PublishError::Unavailable);
        }
        self.sent
            .borrow_mut()
            .push((topic.to_owned(), String::from_utf8_lossy(payload).into_owned()));
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct RecordingSink {
    pub events: Vec<NodeEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<&NodeEvent> {
        self.events.last()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &NodeEvent) {
        self.events.push(*event);
    }
}
