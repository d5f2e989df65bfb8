//! Periodic sampling coordinator.
//!
//! Each cycle reads the mode; outside Performance nothing is touched.
//! In Performance one climate read and one light read are made and the
//! result is emitted as telemetry.  A failed read drops the cycle; the
//! next attempt is a full interval later, which also respects the
//! sensor's recovery time.
//!
//! Cycles are scheduled against absolute deadlines so the period does not
//! drift by the time the read itself takes.

use log::{debug, warn};

use crate::error::DecodeError;
use crate::fsm::Mode;
use crate::fsm::context::{ControlReader, ControlSnapshot};

use super::events::{NodeEvent, TelemetrySample};
use super::ports::{EventSink, MonotonicClock, SensorPort};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Not in Performance mode; sensors untouched.
    Skipped(Mode),
    Published(TelemetrySample),
    Dropped(DecodeError),
}

pub struct Sampler<'a> {
    control: ControlReader<'a>,
    cycles: u32,
    published: u32,
    dropped: u32,
}

impl<'a> Sampler<'a> {
    pub fn new(control: ControlReader<'a>) -> Self {
        Self {
            control,
            cycles: 0,
            published: 0,
            dropped: 0,
        }
    }

    /// One sampling cycle, no waiting.
    pub fn run_cycle(
        &mut self,
        sensors: &mut impl SensorPort,
        sink: &mut impl EventSink,
    ) -> CycleOutcome {
        let mode = self.control.mode();
        self.cycle(mode, sensors, sink)
    }

    /// Run the cycle due at `deadline_us`, then sleep until the next one.
    /// Returns the next deadline.
    ///
    /// Mode and interval come from one snapshot taken at the start of the
    /// cycle.  Outside Performance the cycle is skipped but the loop still
    /// sleeps a full interval, so after a switch to Performance the first
    /// sample can be up to one interval away.
    pub fn step(
        &mut self,
        deadline_us: u64,
        sensors: &mut impl SensorPort,
        clock: &mut impl MonotonicClock,
        sink: &mut impl EventSink,
    ) -> u64 {
        let ControlSnapshot { mode, interval } = self.control.snapshot();
        self.cycle(mode, sensors, sink);

        let interval_us = interval.as_us();
        let mut next = deadline_us.saturating_add(interval_us);
        let now = clock.now_us();
        if next <= now {
            debug!("Sampler overran by {}us, resynchronising", now - next);
            next = now.saturating_add(interval_us);
        }
        clock.sleep_until_us(next);
        next
    }

    /// Sampling task body.
    pub fn run(
        &mut self,
        sensors: &mut impl SensorPort,
        clock: &mut impl MonotonicClock,
        sink: &mut impl EventSink,
    ) -> ! {
        let mut deadline = clock.now_us();
        loop {
            deadline = self.step(deadline, sensors, clock, sink);
        }
    }

    fn cycle(
        &mut self,
        mode: Mode,
        sensors: &mut impl SensorPort,
        sink: &mut impl EventSink,
    ) -> CycleOutcome {
        self.cycles = self.cycles.wrapping_add(1);
        if mode != Mode::Performance {
            return CycleOutcome::Skipped(mode);
        }

        match sensors.read_climate() {
            Ok(reading) => {
                let sample = TelemetrySample {
                    light: sensors.read_light(),
                    temperature: reading.temperature_int,
                    humidity: reading.humidity_int,
                };
                self.published = self.published.wrapping_add(1);
                sink.emit(&NodeEvent::Telemetry(sample));
                CycleOutcome::Published(sample)
            }
            Err(e) => {
                self.dropped = self.dropped.wrapping_add(1);
                warn!("Sample dropped: {}", e);
                sink.emit(&NodeEvent::SampleDropped(e));
                CycleOutcome::Dropped(e)
            }
        }
    }

    pub fn cycles(&self) -> u32 {
        self.cycles
    }

    pub fn published(&self) -> u32 {
        self.published
    }

    pub fn dropped(&self) -> u32 {
        self.dropped
    }
}
