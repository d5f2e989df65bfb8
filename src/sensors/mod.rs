//! Sensor subsystem: individual drivers and the aggregating [`SensorHub`].
//!
//! The hub owns the GPIO backend and the clock the single-wire decoder
//! needs, and exposes both sensors through [`SensorPort`].

pub mod dht11;
pub mod light;

use log::debug;

use crate::app::ports::{DigitalIo, MonotonicClock, SensorPort};
use crate::error::{DecodeError, GpioError};
use dht11::{Dht11, RawReading};
use light::LightSensor;

/// Aggregates the climate and light sensors behind one port.
pub struct SensorHub<IO, C> {
    io: IO,
    clock: C,
    climate: Dht11,
    light: LightSensor,
}

impl<IO: DigitalIo, C: MonotonicClock> SensorHub<IO, C> {
    pub fn new(io: IO, clock: C, climate: Dht11, light: LightSensor) -> Self {
        Self {
            io,
            clock,
            climate,
            light,
        }
    }

    /// Configure the light input.  The DHT11 line is configured on every
    /// read.
    pub fn init(&mut self) -> Result<(), GpioError> {
        self.light.init(&mut self.io)
    }

    pub fn io_mut(&mut self) -> &mut IO {
        &mut self.io
    }
}

impl<IO: DigitalIo, C: MonotonicClock> SensorPort for SensorHub<IO, C> {
    fn read_climate(&mut self) -> Result<RawReading, DecodeError> {
        let reading = self.climate.read(&mut self.io, &mut self.clock)?;
        debug!(
            "dht11: rh={}.{} t={}.{}",
            reading.humidity_int, reading.humidity_dec, reading.temperature_int, reading.temperature_dec
        );
        Ok(reading)
    }

    fn read_light(&mut self) -> u8 {
        self.light.read(&mut self.io)
    }
}
