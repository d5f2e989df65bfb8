//! Shared control state: the current [`Mode`] and [`SampleInterval`].
//!
//! Both values live in a [`ControlCell`] made of two aligned atomics, so
//! readers never need a lock.  The cell hands out exactly one
//! [`ControlWriter`]; every multi-step read-modify sequence (toggle logic,
//! interval validation) runs on the task that holds it.  Everyone else gets
//! a `Copy` [`ControlReader`].

use core::sync::atomic::{AtomicBool, AtomicU32, AtomicU8, Ordering};

use super::Mode;

// ---------------------------------------------------------------------------
// SampleInterval
// ---------------------------------------------------------------------------

/// Delay between two sensor reads, in milliseconds.  Never below
/// [`SampleInterval::MIN_MS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SampleInterval(u32);

impl SampleInterval {
    /// DHT11 recovery time: two reads closer than 2 s return stale data.
    pub const MIN_MS: u32 = 2000;
    pub const MIN: Self = Self(Self::MIN_MS);

    /// `None` if `ms` is below the minimum.
    pub const fn from_ms(ms: u32) -> Option<Self> {
        if ms >= Self::MIN_MS { Some(Self(ms)) } else { None }
    }

    pub const fn as_ms(self) -> u32 {
        self.0
    }

    pub const fn as_us(self) -> u64 {
        self.0 as u64 * 1000
    }
}

impl Default for SampleInterval {
    fn default() -> Self {
        Self::MIN
    }
}

// ---------------------------------------------------------------------------
// ControlCell
// ---------------------------------------------------------------------------

/// Storage for the control state.  `const`-constructible so it can live in
/// a `static` shared by every task.
pub struct ControlCell {
    mode: AtomicU8,
    interval_ms: AtomicU32,
    writer_taken: AtomicBool,
}

impl ControlCell {
    /// Idle, minimum interval.
    pub const fn new() -> Self {
        Self {
            mode: AtomicU8::new(Mode::Idle as u8),
            interval_ms: AtomicU32::new(SampleInterval::MIN_MS),
            writer_taken: AtomicBool::new(false),
        }
    }

    /// Claim the single writable handle.  Returns `None` once it has been
    /// claimed.
    pub fn writer(&self) -> Option<ControlWriter<'_>> {
        if self.writer_taken.swap(true, Ordering::AcqRel) {
            return None;
        }
        Some(ControlWriter { cell: self })
    }

    pub fn reader(&self) -> ControlReader<'_> {
        ControlReader { cell: self }
    }

    fn load_mode(&self) -> Mode {
        Mode::from_u8(self.mode.load(Ordering::Acquire))
    }

    fn load_interval(&self) -> SampleInterval {
        // Only ever stored from a validated SampleInterval.
        SampleInterval(self.interval_ms.load(Ordering::Acquire))
    }
}

impl Default for ControlCell {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Handles
// ---------------------------------------------------------------------------

/// Point-in-time copy of the control state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlSnapshot {
    pub mode: Mode,
    pub interval: SampleInterval,
}

/// Read-only accessor.  Each field is one atomic load.
#[derive(Clone, Copy)]
pub struct ControlReader<'a> {
    cell: &'a ControlCell,
}

impl ControlReader<'_> {
    pub fn mode(&self) -> Mode {
        self.cell.load_mode()
    }

    pub fn interval(&self) -> SampleInterval {
        self.cell.load_interval()
    }

    pub fn snapshot(&self) -> ControlSnapshot {
        ControlSnapshot {
            mode: self.mode(),
            interval: self.interval(),
        }
    }
}

/// The only handle that can mutate the cell.  Not `Clone`.
pub struct ControlWriter<'a> {
    cell: &'a ControlCell,
}

impl<'a> ControlWriter<'a> {
    pub fn mode(&self) -> Mode {
        self.cell.load_mode()
    }

    pub fn interval(&self) -> SampleInterval {
        self.cell.load_interval()
    }

    pub(crate) fn set_mode(&mut self, mode: Mode) {
        self.cell.mode.store(mode as u8, Ordering::Release);
    }

    pub(crate) fn set_interval(&mut self, interval: SampleInterval) {
        self.cell.interval_ms.store(interval.as_ms(), Ordering::Release);
    }
}
