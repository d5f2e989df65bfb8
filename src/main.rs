//! EnvNode Firmware: Main Entry Point
//!
//! Hexagonal architecture with deferred interrupt handling and a single
//! writer for the device mode.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  EspGpio       Esp32Time       LogEventSink   MqttEventSink    │
//! │  (DigitalIo)   (Clock/Delay)   (EventSink)    (EventSink)      │
//! │  MQTT client callback ──▶ remote::inbox ──▶ CONTROL_INBOX      │
//! │  Button ISRs ──▶ BUTTON_EVENTS ──▶ btn-evt ──▶ CONTROL_INBOX   │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │  ControlService (FSM, sole writer)  ·  Sampler  ·       │    │
//! │  │  IndicatorSync          ← ControlCell (atomics) →       │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::{Result, anyhow};
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::hal::peripherals::Peripherals;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use log::{error, info, warn};

use envnode::adapters::gpio::EspGpio;
use envnode::adapters::log_sink::LogEventSink;
use envnode::adapters::mqtt::{self, MqttPublisher};
use envnode::adapters::mqtt_sink::MqttEventSink;
use envnode::adapters::time::Esp32TimeAdapter;
use envnode::adapters::wifi::{self, WifiCredentials};
use envnode::app::indicator::IndicatorSync;
use envnode::app::sampler::Sampler;
use envnode::app::service::ControlService;
use envnode::config::NodeConfig;
use envnode::drivers::button::{ButtonForwarder, Debouncer, init_buttons};
use envnode::drivers::status_led::StatusLeds;
use envnode::drivers::task_pin::{Core, spawn_on_core};
use envnode::events::{BUTTON_EVENTS, LinkGate};
use envnode::fsm::context::ControlCell;
use envnode::pins;
use envnode::remote::inbox::CONTROL_INBOX;
use envnode::remote::router::Router;
use envnode::remote::topics::TopicSet;
use envnode::sensors::SensorHub;
use envnode::sensors::dht11::Dht11;
use envnode::sensors::light::LightSensor;

/// Mode and sample interval, shared by every task.
static CONTROL: ControlCell = ControlCell::new();

/// Broker session state, driven by the MQTT callback.
static LINK: LinkGate = LinkGate::new();

// ── Task layout ───────────────────────────────────────────────
//
// | Task      | Core | Pri | Stack |
// |-----------|------|-----|-------|
// | btn-evt   | App  | 7   | 4 KB  |
// | control   | App  | 6   | 8 KB  |
// | sampler   | App  | 5   | 8 KB  |
// | indicator | App  | 2   | 3 KB  |
// | main      | Pro  | —   | —     |   (re)subscribe on every connect

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  EnvNode v{}                        ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration ──────────────────────────────────────
    let config = NodeConfig::load();
    let prefix = config.topic_prefix()?;
    let topics = TopicSet::new(&prefix)?;
    let router = Router::new(&prefix)?;
    info!("Config: prefix={} interval={}ms", prefix, config.initial_sample_interval_ms);

    // ── 3. Board I/O ──────────────────────────────────────────
    let mut gpio = EspGpio;
    let mut mode_leds = StatusLeds::new(gpio);
    mode_leds.init()?;
    let mut link_leds = StatusLeds::new(gpio);
    link_leds.show_link(false);
    init_buttons(&mut gpio)?;

    let mut hub = SensorHub::new(
        EspGpio,
        Esp32TimeAdapter::new(),
        Dht11::new(pins::DHT11_GPIO),
        LightSensor::new(pins::LDR_GPIO),
    );
    hub.init()?;

    // ── 4. Network ────────────────────────────────────────────
    let peripherals = Peripherals::take()?;
    let sysloop = EspSystemEventLoop::take()?;
    let nvs = EspDefaultNvsPartition::take()?;
    let creds = WifiCredentials::from_build_env()?;
    let _wifi = wifi::connect(peripherals.modem, sysloop, nvs, &creds)?;

    let client = mqtt::start(&config.broker_uri, &config.device_name, router, &LINK)?;
    let publisher = MqttPublisher::new(client.clone(), &LINK);

    // ── 5. Tasks ──────────────────────────────────────────────
    let writer = CONTROL
        .writer()
        .ok_or_else(|| anyhow!("control writer already claimed"))?;
    let mut service = ControlService::new(writer, config.initial_interval());
    let mut control_sink = (
        LogEventSink::new(),
        MqttEventSink::new(publisher.clone(), topics.clone(), config.device_id),
    );
    spawn_on_core(Core::App, 6, 8, "control\0", move || {
        service.start(&mut control_sink);
        service.run(&CONTROL_INBOX, &mut control_sink)
    })?;

    let debouncer = Debouncer::new(config.button_debounce_ms);
    spawn_on_core(Core::App, 7, 4, "btn-evt\0", move || {
        let clock = Esp32TimeAdapter::new();
        let mut forwarder = ButtonForwarder::new(debouncer, &CONTROL_INBOX);
        BUTTON_EVENTS.run(|event| {
            forwarder.forward(event, clock.uptime_ms());
        })
    })?;

    let mut sampler_sink = (
        LogEventSink::new(),
        MqttEventSink::new(publisher, topics.clone(), config.device_id),
    );
    spawn_on_core(Core::App, 5, 8, "sampler\0", move || {
        let mut sampler = Sampler::new(CONTROL.reader());
        let mut clock = Esp32TimeAdapter::new();
        sampler.run(&mut hub, &mut clock, &mut sampler_sink)
    })?;

    let refresh_ms = config.indicator_refresh_ms;
    spawn_on_core(Core::App, 2, 3, "indicator\0", move || {
        let mut sync = IndicatorSync::new(CONTROL.reader());
        let mut delay = Esp32TimeAdapter::new();
        sync.run(&mut mode_leds, &mut delay, refresh_ms)
    })?;

    // ── 6. Link supervision ───────────────────────────────────
    loop {
        LINK.wait_for(true);
        link_leds.show_link(true);
        match mqtt::subscribe_all(&client, &topics) {
            Ok(()) => info!("Subscribed under {}", topics.prefix()),
            Err(e) => error!("Subscribe failed: {}", e),
        }
        LINK.wait_for(false);
        link_leds.show_link(false);
        warn!(
            "Broker link lost (button drops={}, inbox drops={})",
            BUTTON_EVENTS.dropped(),
            CONTROL_INBOX.dropped()
        );
    }
}
