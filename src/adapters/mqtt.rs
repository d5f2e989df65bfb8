//! ESP-IDF MQTT client adapter.
//!
//! The client callback runs on the MQTT task.  It does three things only:
//! flip the [`LinkGate`], route inbound data into the control inbox, and
//! log.  Subscriptions are (re)issued by `main` each time the gate opens.

use std::sync::{Arc, Mutex};

use esp_idf_svc::mqtt::client::{EspMqttClient, EventPayload, MqttClientConfiguration, QoS};
use esp_idf_svc::sys::EspError;
use log::{info, warn};

use crate::app::ports::Publisher;
use crate::error::PublishError;
use crate::events::LinkGate;
use crate::remote::inbox;
use crate::remote::router::Router;
use crate::remote::topics::TopicSet;

pub type SharedClient = Arc<Mutex<EspMqttClient<'static>>>;

/// Start the client.  `link` tracks the broker session.
pub fn start(
    broker_uri: &str,
    client_id: &str,
    router: Router,
    link: &'static LinkGate,
) -> Result<SharedClient, EspError> {
    let conf = MqttClientConfiguration {
        client_id: Some(client_id),
        ..Default::default()
    };

    let client = EspMqttClient::new_cb(broker_uri, &conf, move |event| match event.payload() {
        EventPayload::Connected(_) => {
            info!("MQTT connected");
            link.set(true);
        }
        EventPayload::Disconnected => {
            warn!("MQTT disconnected");
            link.set(false);
        }
        EventPayload::Received { topic: Some(topic), data, .. } => {
            inbox::on_message(&router, topic, data);
        }
        EventPayload::Error(e) => warn!("MQTT error: {:?}", e),
        _ => {}
    })?;

    Ok(Arc::new(Mutex::new(client)))
}

/// Subscribe to every command topic at QoS 0.
pub fn subscribe_all(client: &SharedClient, topics: &TopicSet) -> Result<(), PublishError> {
    let mut guard = client.lock().map_err(|_| PublishError::Unavailable)?;
    for topic in topics.subscriptions() {
        guard
            .subscribe(topic, QoS::AtMostOnce)
            .map_err(|e| PublishError::Rejected(e.code()))?;
        info!("MQTT subscribed to {}", topic);
    }
    Ok(())
}

/// [`Publisher`] over a shared client.  QoS 0, not retained.
#[derive(Clone)]
pub struct MqttPublisher {
    client: SharedClient,
    link: &'static LinkGate,
}

impl MqttPublisher {
    pub fn new(client: SharedClient, link: &'static LinkGate) -> Self {
        Self { client, link }
    }
}

impl Publisher for MqttPublisher {
    fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), PublishError> {
        if !self.link.is_up() {
            return Err(PublishError::Unavailable);
        }
        let mut guard = self.client.lock().map_err(|_| PublishError::Unavailable)?;
        guard
            .enqueue(topic, QoS::AtMostOnce, false, payload)
            .map(|_| ())
            .map_err(|e| PublishError::Rejected(e.code()))
    }
}
