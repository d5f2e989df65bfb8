//! Broker-facing event sink.
//!
//! Turns telemetry and rejections into publishes on the node's topics.
//! Everything else is left to the log sink.  A failed publish is logged
//! and counted; the event is not retried.

use log::warn;

use crate::app::events::NodeEvent;
use crate::app::ports::{EventSink, Publisher};
use crate::error::PublishError;
use crate::remote::payload::{ErrorPayload, TelemetryPayload, encode};
use crate::remote::topics::{Quantity, TopicSet};

pub struct MqttEventSink<P> {
    publisher: P,
    topics: TopicSet,
    device_id: u32,
    failures: u32,
}

impl<P: Publisher> MqttEventSink<P> {
    pub fn new(publisher: P, topics: TopicSet, device_id: u32) -> Self {
        Self {
            publisher,
            topics,
            device_id,
            failures: 0,
        }
    }

    /// Publishes that did not make it to the transport.
    pub fn failures(&self) -> u32 {
        self.failures
    }

    pub fn publisher(&self) -> &P {
        &self.publisher
    }

    fn send(&mut self, topic_of: Topic, body: Result<Vec<u8>, PublishError>) {
        let topic = match topic_of {
            Topic::Telemetry(q) => self.topics.telemetry(q),
            Topic::Error => self.topics.error(),
        };
        let result = body.and_then(|b| self.publisher.publish(topic, &b));
        if let Err(e) = result {
            self.failures = self.failures.wrapping_add(1);
            warn!("publish to {} failed: {}", topic, e);
        }
    }
}

#[derive(Clone, Copy)]
enum Topic {
    Telemetry(Quantity),
    Error,
}

impl<P: Publisher> EventSink for MqttEventSink<P> {
    fn emit(&mut self, event: &NodeEvent) {
        match event {
            NodeEvent::Telemetry(sample) => {
                for quantity in Quantity::ALL {
                    let value = match quantity {
                        Quantity::Temperature => sample.temperature,
                        Quantity::Humidity => sample.humidity,
                        Quantity::Light => sample.light,
                    };
                    let body = encode(&TelemetryPayload {
                        id: self.device_id,
                        quantity,
                        value,
                    });
                    self.send(Topic::Telemetry(quantity), body);
                }
            }
            NodeEvent::CommandRejected(reason) => {
                let body = encode(&ErrorPayload::new(self.device_id, *reason));
                self.send(Topic::Error, body);
            }
            NodeEvent::Started(_)
            | NodeEvent::ModeChanged { .. }
            | NodeEvent::IntervalChanged { .. }
            | NodeEvent::SampleDropped(_) => {}
        }
    }
}
