//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter     | Implements             | Connects to              |
//! |-------------|------------------------|--------------------------|
//! | `gpio`      | DigitalIo              | ESP-IDF GPIO driver      |
//! | `time`      | MonotonicClock/DelayNs | ESP32 high-res timer     |
//! | `log_sink`  | EventSink              | Serial log output        |
//! | `mqtt_sink` | EventSink              | any `Publisher`          |
//! | `mqtt`      | Publisher              | ESP-IDF MQTT client      |
//! | `wifi`      | —                      | ESP-IDF WiFi STA         |

#[cfg(target_os = "espidf")]
pub mod gpio;
pub mod log_sink;
#[cfg(target_os = "espidf")]
pub mod mqtt;
pub mod mqtt_sink;
pub mod time;
pub mod wifi;
