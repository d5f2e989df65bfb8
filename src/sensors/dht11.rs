//! DHT11 single-wire temperature / humidity decoder.
//!
//! ## Exchange
//!
//! ```text
//!  host   ‾‾‾\________ 18 ms ________/‾‾‾ (release, pull-up)
//!  sensor                              \__80us__/‾‾80us‾‾\  ack
//!  bit              \__50us__/‾‾ 26-28us ‾‾\      → 0
//!                   \__50us__/‾‾‾‾‾ 70us ‾‾‾‾‾\   → 1
//! ```
//!
//! 40 bits, MSB first:
//! humidity-int, humidity-dec, temperature-int, temperature-dec, checksum.
//! The checksum is the low byte of the sum of the first four.
//!
//! The 40-pulse window runs inside a critical section bounded by
//! [`WINDOW_TIMEOUT_US`]; pulse widths are only stored there and
//! classified afterwards.  Two reads must be at
//! least [`SampleInterval::MIN_MS`](crate::fsm::context::SampleInterval::MIN_MS)
//! apart; the decoder itself never retries.

use embedded_hal::digital::PinState;

use crate::app::ports::{DigitalIo, MonotonicClock, PinConfig, PinId};
use crate::error::{DecodeError, Phase};

/// Host start signal length.
pub const WAKE_PULSE_MS: u32 = 18;
/// Bound on each edge of the sensor acknowledgement.
pub const RESPONSE_TIMEOUT_US: u64 = 1_000_000;
/// Bound on each edge inside the data window.  The longest legal level is
/// 80 µs, so anything past 1 ms means the sensor stopped talking.
pub const BIT_EDGE_TIMEOUT_US: u64 = 1_000;
/// Bound on the whole 40-pulse window, which is where interrupts are
/// masked.  A frame of all ones lasts about 4.9 ms.
pub const WINDOW_TIMEOUT_US: u64 = 6_000;
/// High pulses strictly longer than this are a `1`.
pub const BIT_ONE_THRESHOLD_US: u32 = 50;
pub const FRAME_BITS: usize = 40;

/// One decoded frame.  Only ever constructed with a valid checksum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawReading {
    pub humidity_int: u8,
    pub humidity_dec: u8,
    pub temperature_int: u8,
    pub temperature_dec: u8,
    pub checksum: u8,
}

impl RawReading {
    /// Split and validate a 40-bit frame (low 40 bits of `frame`).
    pub fn from_frame(frame: u64) -> Result<Self, DecodeError> {
        let byte = |shift: u32| (frame >> shift) as u8;
        let data = [byte(32), byte(24), byte(16), byte(8)];
        let received = byte(0);
        let computed = Self::checksum_of(data);
        if received != computed {
            return Err(DecodeError::Checksum { received, computed });
        }
        Ok(Self {
            humidity_int: data[0],
            humidity_dec: data[1],
            temperature_int: data[2],
            temperature_dec: data[3],
            checksum: received,
        })
    }

    /// Wrapping 8-bit sum of the four data bytes.
    pub fn checksum_of(data: [u8; 4]) -> u8 {
        data.iter().fold(0u8, |acc, b| acc.wrapping_add(*b))
    }
}

/// Bit value for one measured high-pulse width.
pub const fn classify_pulse(high_us: u32) -> bool {
    high_us > BIT_ONE_THRESHOLD_US
}

/// Pack 40 pulse widths into a frame, first pulse in the MSB.
pub fn assemble_frame(pulses: &[u32; FRAME_BITS]) -> u64 {
    pulses
        .iter()
        .fold(0u64, |acc, &w| (acc << 1) | u64::from(classify_pulse(w)))
}

/// Decoder bound to one data pin.
#[derive(Debug, Clone, Copy)]
pub struct Dht11 {
    pin: PinId,
}

impl Dht11 {
    pub const fn new(pin: PinId) -> Self {
        Self { pin }
    }

    /// Run one complete exchange.
    pub fn read<IO, C>(&self, io: &mut IO, clock: &mut C) -> Result<RawReading, DecodeError>
    where
        IO: DigitalIo,
        C: MonotonicClock,
    {
        self.wake(io, clock)?;

        // Acknowledge: low, then high.
        wait_while(io, clock, self.pin, PinState::High, RESPONSE_TIMEOUT_US)
            .ok_or(DecodeError::Timeout(Phase::Response))?;
        wait_while(io, clock, self.pin, PinState::Low, RESPONSE_TIMEOUT_US)
            .ok_or(DecodeError::Timeout(Phase::Response))?;

        let mut pulses = [0u32; FRAME_BITS];
        critical_section::with(|_| self.sample_window(io, clock, &mut pulses))
            .ok_or(DecodeError::Timeout(Phase::Data))?;

        RawReading::from_frame(assemble_frame(&pulses))
    }

    fn wake<IO: DigitalIo, C: MonotonicClock>(&self, io: &mut IO, clock: &mut C) -> Result<(), DecodeError> {
        io.configure(self.pin, PinConfig::OUTPUT)?;
        io.write(self.pin, PinState::Low)?;
        clock.delay_ms(WAKE_PULSE_MS);
        io.write(self.pin, PinState::High)?;
        io.configure(self.pin, PinConfig::INPUT_PULLUP)?;
        Ok(())
    }

    /// Measure 40 high-pulse widths.  `None` if any edge overran or the
    /// window as a whole outlived [`WINDOW_TIMEOUT_US`].
    fn sample_window<IO: DigitalIo, C: MonotonicClock>(
        &self,
        io: &mut IO,
        clock: &mut C,
        pulses: &mut [u32; FRAME_BITS],
    ) -> Option<()> {
        let deadline = clock.now_us().saturating_add(WINDOW_TIMEOUT_US);
        let edge = |io: &mut IO, level: PinState| {
            let left = deadline.checked_sub(clock.now_us()).filter(|t| *t > 0)?;
            wait_while(io, clock, self.pin, level, left.min(BIT_EDGE_TIMEOUT_US))
        };
        for slot in pulses.iter_mut() {
            // Tail of the ack (first bit) or of the previous bit.
            edge(io, PinState::High)?;
            // 50 µs low lead-in.
            edge(io, PinState::Low)?;
            let width = edge(io, PinState::High)?;
            *slot = width.min(u64::from(u32::MAX)) as u32;
        }
        Some(())
    }
}

/// Spin while the line reads `level`.  Returns how long it stayed there,
/// or `None` once `timeout_us` has elapsed.
fn wait_while<IO: DigitalIo, C: MonotonicClock>(
    io: &mut IO,
    clock: &C,
    pin: PinId,
    level: PinState,
    timeout_us: u64,
) -> Option<u64> {
    let start = clock.now_us();
    loop {
        let elapsed = clock.now_us().saturating_sub(start);
        if io.read(pin) != level {
            return Some(elapsed);
        }
        if elapsed > timeout_us {
            return None;
        }
    }
}
