//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured node events to the
//! ESP-IDF logger (which goes to UART in production).  The MQTT sink
//! implements the same trait; `main` fans out to both.

use log::{info, warn};

use crate::app::events::NodeEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`NodeEvent`] to the serial console.
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &NodeEvent) {
        match event {
            NodeEvent::Telemetry(t) => {
                info!(
                    "TELEM | T={}\u{00b0}C | RH={}% | light={}",
                    t.temperature, t.humidity, t.light
                );
            }
            NodeEvent::ModeChanged { from, to } => {
                info!("MODE | {:?} -> {:?}", from, to);
            }
            NodeEvent::IntervalChanged { from_ms, to_ms } => {
                info!("MODE | interval {}ms -> {}ms", from_ms, to_ms);
            }
            NodeEvent::CommandRejected(reason) => {
                warn!("REJECT | {}", reason);
            }
            NodeEvent::SampleDropped(e) => {
                warn!("DROP | {}", e);
            }
            NodeEvent::Started(mode) => {
                info!("START | initial_mode={:?}", mode);
            }
        }
    }
}
