//! ESP32 time adapter.
//!
//! Provides the monotonic clock and blocking delays the decoder, the
//! sampler and the button debouncer run on.
//!
//! - **`target_os = "espidf"`**: wraps `esp_timer_get_time()` from the
//!   ESP-IDF high-resolution timer (microsecond precision, monotonic).
//!   Delays below [`BUSY_WAIT_LIMIT_US`] spin on the ROM delay so the
//!   DHT11 wake pulse is not stretched to a FreeRTOS tick; longer ones
//!   yield to the scheduler.
//! - **`not(target_os = "espidf")`**: uses `std::time::Instant` for
//!   host-side testing and simulation.

use embedded_hal::delay::DelayNs;

use crate::app::ports::MonotonicClock;

/// Longest delay served by busy-waiting.
pub const BUSY_WAIT_LIMIT_US: u32 = 20_000;

/// Time adapter for the ESP32 platform.  Cheap to construct; every
/// instance reads the same hardware timer.
#[derive(Clone, Copy)]
pub struct Esp32TimeAdapter {
    #[cfg(not(target_os = "espidf"))]
    start: std::time::Instant,
}

impl Default for Esp32TimeAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl Esp32TimeAdapter {
    pub fn new() -> Self {
        Self {
            #[cfg(not(target_os = "espidf"))]
            start: std::time::Instant::now(),
        }
    }

    /// Milliseconds since boot, truncated to u32 (wraps after ~49 days).
    pub fn uptime_ms(&self) -> u32 {
        (self.now_us() / 1_000) as u32
    }
}

impl MonotonicClock for Esp32TimeAdapter {
    /// Microseconds since boot (monotonic).
    #[cfg(target_os = "espidf")]
    fn now_us(&self) -> u64 {
        // SAFETY: read-only access to the high-resolution timer.
        (unsafe { esp_idf_svc::sys::esp_timer_get_time() }) as u64
    }

    #[cfg(not(target_os = "espidf"))]
    fn now_us(&self) -> u64 {
        self.start.elapsed().as_micros() as u64
    }
}

impl DelayNs for Esp32TimeAdapter {
    #[cfg(target_os = "espidf")]
    fn delay_ns(&mut self, ns: u32) {
        use esp_idf_hal::delay::{Ets, FreeRtos};

        let us = ns.div_ceil(1_000);
        if us <= BUSY_WAIT_LIMIT_US {
            Ets::delay_us(us);
        } else {
            FreeRtos::delay_ms(us / 1_000);
            Ets::delay_us(us % 1_000);
        }
    }

    #[cfg(not(target_os = "espidf"))]
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(std::time::Duration::from_nanos(u64::from(ns)));
    }

    #[cfg(target_os = "espidf")]
    fn delay_ms(&mut self, ms: u32) {
        use esp_idf_hal::delay::{Ets, FreeRtos};

        if ms.saturating_mul(1_000) <= BUSY_WAIT_LIMIT_US {
            Ets::delay_us(ms * 1_000);
        } else {
            FreeRtos::delay_ms(ms);
        }
    }
}
