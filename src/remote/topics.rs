//! Topic layout.
//!
//! ```text
//! <device_name>/<device_id>/config/{ON,SLEEP,CONFIG,delay}   inbound
//! <device_name>/<device_id>/telemetry/{temperature,humidity,light}
//! <device_name>/<device_id>/error
//! ```

use heapless::String;

use crate::error::ConfigError;

/// Longest accepted `<device_name>/<device_id>` prefix.
pub const PREFIX_CAP: usize = 32;
/// Enough for the prefix plus the longest suffix.
pub const TOPIC_CAP: usize = 64;

pub type Topic = String<TOPIC_CAP>;

pub const SUFFIX_ON: &str = "config/ON";
pub const SUFFIX_SLEEP: &str = "config/SLEEP";
pub const SUFFIX_CONFIG: &str = "config/CONFIG";
pub const SUFFIX_DELAY: &str = "config/delay";
pub const SUFFIX_ERROR: &str = "error";

/// Measured quantities and their telemetry metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantity {
    Temperature,
    Humidity,
    Light,
}

impl Quantity {
    pub const ALL: [Self; 3] = [Self::Temperature, Self::Humidity, Self::Light];

    /// JSON field name, also the last topic segment.
    pub const fn field(self) -> &'static str {
        match self {
            Self::Temperature => "temperature",
            Self::Humidity => "humidity",
            Self::Light => "light",
        }
    }

    pub const fn unit(self) -> &'static str {
        match self {
            Self::Temperature => "Celsius",
            Self::Humidity => "percentage",
            Self::Light => "bool",
        }
    }
}

/// Validate a prefix and copy it into fixed storage.
pub fn prefix_from(prefix: &str) -> Result<String<PREFIX_CAP>, ConfigError> {
    if prefix.is_empty() || prefix.ends_with('/') {
        return Err(ConfigError::ValidationFailed("topic prefix must be non-empty without trailing '/'"));
    }
    let mut out = String::new();
    out.push_str(prefix)
        .map_err(|()| ConfigError::ValidationFailed("topic prefix too long"))?;
    Ok(out)
}

/// Every topic the node uses, built once at startup.
#[derive(Debug, Clone)]
pub struct TopicSet {
    prefix: String<PREFIX_CAP>,
    subscriptions: [Topic; 4],
    telemetry: [Topic; 3],
    error: Topic,
}

impl TopicSet {
    pub fn new(prefix: &str) -> Result<Self, ConfigError> {
        let prefix = prefix_from(prefix)?;
        let join = |suffix: &str| -> Result<Topic, ConfigError> {
            let mut t = Topic::new();
            t.push_str(&prefix)
                .and_then(|()| t.push('/'))
                .and_then(|()| t.push_str(suffix))
                .map_err(|()| ConfigError::ValidationFailed("topic too long"))?;
            Ok(t)
        };
        let telemetry_suffix = |q: Quantity| -> Result<Topic, ConfigError> {
            let mut s: String<32> = String::new();
            s.push_str("telemetry/")
                .and_then(|()| s.push_str(q.field()))
                .map_err(|()| ConfigError::ValidationFailed("topic too long"))?;
            join(&s)
        };
        let telemetry = [
            telemetry_suffix(Quantity::Temperature)?,
            telemetry_suffix(Quantity::Humidity)?,
            telemetry_suffix(Quantity::Light)?,
        ];
        Ok(Self {
            subscriptions: [
                join(SUFFIX_ON)?,
                join(SUFFIX_SLEEP)?,
                join(SUFFIX_CONFIG)?,
                join(SUFFIX_DELAY)?,
            ],
            telemetry,
            error: join(SUFFIX_ERROR)?,
            prefix,
        })
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Inbound command topics, in subscription order.
    pub fn subscriptions(&self) -> impl Iterator<Item = &str> {
        self.subscriptions.iter().map(String::as_str)
    }

    pub fn telemetry(&self, quantity: Quantity) -> &str {
        let idx = match quantity {
            Quantity::Temperature => 0,
            Quantity::Humidity => 1,
            Quantity::Light => 2,
        };
        &self.telemetry[idx]
    }

    pub fn error(&self) -> &str {
        &self.error
    }
}
