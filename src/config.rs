//! Node configuration parameters
//!
//! All tunable parameters for the sensing node.  Defaults match the board
//! as shipped; a JSON override can be baked in at build time through the
//! `ENVNODE_CONFIG` environment variable.  Nothing is persisted at runtime.

use core::fmt::Write;

use heapless::String;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::fsm::context::SampleInterval;
use crate::remote::topics::PREFIX_CAP;

/// Core node configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    // --- Identity ---
    /// First topic segment.
    pub device_name: String<16>,
    /// Second topic segment and the `id` field of every outbound payload.
    pub device_id: u32,

    // --- Timing ---
    /// Sample interval applied at boot (milliseconds, >= 2000)
    pub initial_sample_interval_ms: u32,
    /// Indicator LED refresh period (milliseconds)
    pub indicator_refresh_ms: u32,
    /// Button debounce window (milliseconds)
    pub button_debounce_ms: u32,

    // --- Broker ---
    pub broker_uri: String<64>,
}

impl Default for NodeConfig {
    fn default() -> Self {
        let mut device_name = String::new();
        let _ = device_name.push_str("ESP32");
        let mut broker_uri = String::new();
        let _ = broker_uri.push_str("mqtt://192.168.1.10:1883");
        Self {
            device_name,
            device_id: 1,

            initial_sample_interval_ms: SampleInterval::MIN_MS,
            indicator_refresh_ms: 100,
            button_debounce_ms: 50,

            broker_uri,
        }
    }
}

impl NodeConfig {
    /// Parse and validate a JSON override.  Missing fields take defaults.
    pub fn from_json(bytes: &[u8]) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_slice(bytes).map_err(|_| ConfigError::Corrupted)?;
        config.validate()?;
        Ok(config)
    }

    /// Build-time override if present and valid, defaults otherwise.
    pub fn load() -> Self {
        match option_env!("ENVNODE_CONFIG") {
            Some(json) => Self::from_json(json.as_bytes()).unwrap_or_else(|e| {
                warn!("ENVNODE_CONFIG ignored: {}", e);
                Self::default()
            }),
            None => Self::default(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.device_name.is_empty() || self.device_name.contains('/') {
            return Err(ConfigError::ValidationFailed("device_name must be a single topic segment"));
        }
        if self.initial_sample_interval_ms < SampleInterval::MIN_MS {
            return Err(ConfigError::ValidationFailed("initial_sample_interval_ms below 2000"));
        }
        if self.indicator_refresh_ms == 0 {
            return Err(ConfigError::ValidationFailed("indicator_refresh_ms must be > 0"));
        }
        if self.broker_uri.is_empty() {
            return Err(ConfigError::ValidationFailed("broker_uri is empty"));
        }
        Ok(())
    }

    /// `<device_name>/<device_id>`
    pub fn topic_prefix(&self) -> Result<String<PREFIX_CAP>, ConfigError> {
        let mut prefix = String::new();
        write!(prefix, "{}/{}", self.device_name, self.device_id)
            .map_err(|_| ConfigError::ValidationFailed("topic prefix too long"))?;
        Ok(prefix)
    }

    pub fn initial_interval(&self) -> SampleInterval {
        SampleInterval::from_ms(self.initial_sample_interval_ms).unwrap_or_default()
    }
}
