//! Interrupt-deferral bridge and connectivity gate.
//!
//! Events are produced by:
//! - GPIO ISRs (mode button, off button)
//! - The MQTT event callback (routed remote commands)
//!
//! Each producer posts into a bounded [`DeferredQueue`]; a dedicated task
//! blocks on the queue and runs the handler in thread context.
//!
//! ```text
//! ┌─────────────┐  post()  ┌──────────────┐  next_blocking()  ┌──────────────┐
//! │ Button ISR  │────────▶│ DeferredQueue │─────────────────▶│ Consumer task │
//! │ MQTT cb     │────────▶│  (bounded)   │                   │  (callback)   │
//! └─────────────┘          └──────────────┘                   └──────────────┘
//! ```
//!
//! `post` never blocks and never allocates.  When the queue is full the
//! event is dropped and counted.

use core::future::Future;
use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;

/// Pending mode-button and off-button presses.
pub const BUTTON_QUEUE_DEPTH: usize = 10;

/// Local input events raised by the two push-buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum InputEvent {
    /// Mode-change button.
    ModeToggle = 0,
    /// Off button.
    ForceIdle = 1,
}

impl InputEvent {
    pub const fn name(self) -> &'static str {
        match self {
            Self::ModeToggle => "mode-toggle",
            Self::ForceIdle => "force-idle",
        }
    }
}

/// Button ISRs post here; the `btn-evt` task drains it.
pub static BUTTON_EVENTS: DeferredQueue<InputEvent, BUTTON_QUEUE_DEPTH> = DeferredQueue::new();

// ── Blocking executor ─────────────────────────────────────────
//
// The consumer side parks on a channel future.  On ESP-IDF the waker must
// be usable from an ISR, so we use esp-idf-hal's task-notification based
// executor; on the host futures-lite is enough.

#[cfg(target_os = "espidf")]
fn block_on<F: Future>(fut: F) -> F::Output {
    esp_idf_hal::task::block_on(fut)
}

#[cfg(not(target_os = "espidf"))]
fn block_on<F: Future>(fut: F) -> F::Output {
    futures_lite::future::block_on(fut)
}

// ───────────────────────────────────────────────────────────────
// DeferredQueue
// ───────────────────────────────────────────────────────────────

/// Bounded MPMC queue with an ISR-safe producer side.
pub struct DeferredQueue<T, const N: usize> {
    channel: Channel<CriticalSectionRawMutex, T, N>,
    dropped: AtomicU32,
}

impl<T: Copy, const N: usize> DeferredQueue<T, N> {
    pub const fn new() -> Self {
        Self {
            channel: Channel::new(),
            dropped: AtomicU32::new(0),
        }
    }

    /// Enqueue without blocking.  Safe from ISR context.
    ///
    /// Returns `false` if the queue was full; the event is discarded and
    /// the drop counter incremented.
    pub fn post(&self, event: T) -> bool {
        if self.channel.try_send(event).is_ok() {
            true
        } else {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            false
        }
    }

    /// Block the calling thread until an event is available.
    pub fn next_blocking(&self) -> T {
        block_on(self.channel.receive())
    }

    /// Dequeue if something is pending.
    pub fn try_next(&self) -> Option<T> {
        self.channel.try_receive().ok()
    }

    /// Consumer loop: wait, dequeue, invoke `handler`, repeat.
    ///
    /// Intended as the body of a dedicated task.  Handlers run one at a
    /// time, in arrival order.
    pub fn run(&self, mut handler: impl FnMut(T)) -> ! {
        loop {
            let event = self.next_blocking();
            handler(event);
        }
    }

    /// Events discarded because the queue was full, since boot.
    pub fn dropped(&self) -> u32 {
        self.dropped.load(Ordering::Relaxed)
    }

    pub fn len(&self) -> usize {
        self.channel.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channel.is_empty()
    }

    pub const fn capacity(&self) -> usize {
        N
    }
}

impl<T: Copy, const N: usize> Default for DeferredQueue<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

// ───────────────────────────────────────────────────────────────
// LinkGate
// ───────────────────────────────────────────────────────────────

/// Broker-connection flag with a blocking wait.
///
/// The transport callback calls [`set`](Self::set) on connect and
/// disconnect.  A single consumer may block in [`wait_for`](Self::wait_for)
/// without spinning.
pub struct LinkGate {
    up: AtomicBool,
    changed: Signal<CriticalSectionRawMutex, bool>,
}

impl LinkGate {
    pub const fn new() -> Self {
        Self {
            up: AtomicBool::new(false),
            changed: Signal::new(),
        }
    }

    pub fn set(&self, up: bool) {
        self.up.store(up, Ordering::Release);
        self.changed.signal(up);
    }

    pub fn is_up(&self) -> bool {
        self.up.load(Ordering::Acquire)
    }

    /// Block until the link reaches `want`.  Returns immediately if it
    /// already has.
    pub fn wait_for(&self, want: bool) {
        // Stale signals are harmless: every wake rechecks the flag.
        while self.is_up() != want {
            block_on(self.changed.wait());
        }
    }
}

impl Default for LinkGate {
    fn default() -> Self {
        Self::new()
    }
}
