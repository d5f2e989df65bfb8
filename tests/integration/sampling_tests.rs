//! Sampler → SensorHub → MQTT sink, on virtual time.

use embedded_hal::digital::PinState;

use envnode::adapters::mqtt_sink::MqttEventSink;
use envnode::app::commands::{ControlMsg, RemoteCommand};
use envnode::app::events::{NodeEvent, TelemetrySample};
use envnode::app::ports::{MonotonicClock, SensorPort};
use envnode::app::sampler::{CycleOutcome, Sampler};
use envnode::app::service::ControlService;
use envnode::error::DecodeError;
use envnode::events::InputEvent;
use envnode::fsm::Mode;
use envnode::fsm::context::{ControlCell, SampleInterval};
use envnode::pins::{DHT11_GPIO, LDR_GPIO};
use envnode::remote::topics::TopicSet;
use envnode::sensors::SensorHub;
use envnode::sensors::dht11::{Dht11, RawReading};
use envnode::sensors::light::LightSensor;

use crate::mock_hw::{MockClock, MockIo, RecordingPublisher, RecordingSink, Waveform, dht_bytes};

type Hub = SensorHub<MockIo, MockClock>;

fn hub(clock: &MockClock) -> Hub {
    let mut hub = SensorHub::new(
        MockIo::new(clock.clone(), DHT11_GPIO),
        clock.clone(),
        Dht11::new(DHT11_GPIO),
        LightSensor::new(LDR_GPIO),
    );
    hub.init().unwrap();
    hub
}

fn mqtt(publisher: &RecordingPublisher) -> MqttEventSink<RecordingPublisher> {
    MqttEventSink::new(publisher.clone(), TopicSet::new("ESP32/1").unwrap(), 1)
}

#[test]
fn idle_node_never_touches_the_sensor() {
    let cell = ControlCell::new();
    let clock = MockClock::new();
    let mut hub = hub(&clock);
    let mut sampler = Sampler::new(cell.reader());
    let mut sink = RecordingSink::new();

    assert_eq!(sampler.run_cycle(&mut hub, &mut sink), CycleOutcome::Skipped(Mode::Idle));
    assert!(hub.io_mut().writes.is_empty());
    assert!(sink.events.is_empty());
    assert_eq!(sampler.cycles(), 1);
}

#[test]
fn button_press_starts_publishing_telemetry() {
    let cell = ControlCell::new();
    let mut svc = ControlService::new(cell.writer().unwrap(), SampleInterval::MIN);
    let clock = MockClock::new();
    let mut hub = hub(&clock);
    let publisher = RecordingPublisher::new();
    let mut sink = mqtt(&publisher);
    let mut sampler = Sampler::new(cell.reader());

    svc.handle(ControlMsg::Input(InputEvent::ModeToggle), &mut RecordingSink::new());
    assert_eq!(svc.mode(), Mode::Performance);

    hub.io_mut().script(Waveform::frame(dht_bytes(45, 23)));
    hub.io_mut().set_level(LDR_GPIO, PinState::High);

    let outcome = sampler.run_cycle(&mut hub, &mut sink);
    assert_eq!(
        outcome,
        CycleOutcome::Published(TelemetrySample { light: 1, temperature: 23, humidity: 45 })
    );
    assert_eq!(
        publisher.messages(),
        vec![
            (
                "ESP32/1/telemetry/temperature".to_owned(),
                r#"{"id":1,"temperature":23,"unidad":"Celsius"}"#.to_owned()
            ),
            (
                "ESP32/1/telemetry/humidity".to_owned(),
                r#"{"id":1,"humidity":45,"unidad":"percentage"}"#.to_owned()
            ),
            (
                "ESP32/1/telemetry/light".to_owned(),
                r#"{"id":1,"light":1,"unidad":"bool"}"#.to_owned()
            ),
        ]
    );
}

#[test]
fn failed_read_drops_the_cycle_and_recovers() {
    let cell = ControlCell::new();
    let mut svc = ControlService::new(cell.writer().unwrap(), SampleInterval::MIN);
    svc.handle(ControlMsg::Remote(RemoteCommand::SetPerformance), &mut RecordingSink::new());

    let clock = MockClock::new();
    let mut hub = hub(&clock);
    let publisher = RecordingPublisher::new();
    let mut sink = (RecordingSink::new(), mqtt(&publisher));
    let mut sampler = Sampler::new(cell.reader());

    let mut bad = dht_bytes(45, 23);
    bad[4] ^= 0x01;
    hub.io_mut().script(Waveform::frame(bad));
    hub.io_mut().script(Waveform::frame(dht_bytes(46, 24)));

    let first = sampler.run_cycle(&mut hub, &mut sink);
    assert!(matches!(first, CycleOutcome::Dropped(DecodeError::Checksum { .. })));
    assert!(publisher.messages().is_empty());
    assert!(matches!(sink.0.last(), Some(NodeEvent::SampleDropped(_))));

    let second = sampler.run_cycle(&mut hub, &mut sink);
    assert!(matches!(second, CycleOutcome::Published(s) if s.humidity == 46));
    assert_eq!(publisher.messages().len(), 3);
    assert_eq!((sampler.published(), sampler.dropped()), (1, 1));
}

#[test]
fn cycles_follow_absolute_deadlines() {
    let cell = ControlCell::new();
    let mut svc = ControlService::new(cell.writer().unwrap(), SampleInterval::MIN);
    svc.handle(ControlMsg::Remote(RemoteCommand::SetPerformance), &mut RecordingSink::new());

    let mut clock = MockClock::new();
    let mut hub = hub(&clock);
    for _ in 0..3 {
        hub.io_mut().script(Waveform::frame(dht_bytes(45, 23)));
    }
    let mut sink = RecordingSink::new();
    let mut sampler = Sampler::new(cell.reader());

    let interval = SampleInterval::MIN.as_us();
    let mut deadline = clock.now_us();
    for n in 1..=3 {
        deadline = sampler.step(deadline, &mut hub, &mut clock, &mut sink);
        // The read itself takes ~20 ms but does not push the schedule back.
        assert_eq!(deadline, n * interval);
        assert_eq!(clock.now(), deadline);
    }
    assert_eq!(sampler.published(), 3);
}

#[test]
fn new_interval_applies_from_the_next_cycle() {
    let cell = ControlCell::new();
    let mut svc = ControlService::new(cell.writer().unwrap(), SampleInterval::MIN);
    let mut events = RecordingSink::new();
    svc.handle(ControlMsg::Remote(RemoteCommand::SetConfiguration), &mut events);
    svc.handle(ControlMsg::Remote(RemoteCommand::SetInterval(5000)), &mut events);
    assert_eq!(
        events.last(),
        Some(&NodeEvent::IntervalChanged { from_ms: 2000, to_ms: 5000 })
    );

    let mut clock = MockClock::new();
    let mut hub = hub(&clock);
    let mut sampler = Sampler::new(cell.reader());
    let mut sink = RecordingSink::new();

    // Configuration mode: skipped, but still paced by the new interval.
    let next = sampler.step(0, &mut hub, &mut clock, &mut sink);
    assert_eq!(next, 5_000_000);
    assert!(sink.events.is_empty());
}

#[test]
fn first_sample_after_leaving_idle_waits_for_the_next_deadline() {
    let cell = ControlCell::new();
    let mut svc = ControlService::new(cell.writer().unwrap(), SampleInterval::MIN);
    let mut clock = MockClock::new();
    let mut hub = hub(&clock);
    hub.io_mut().script(Waveform::frame(dht_bytes(45, 23)));
    let publisher = RecordingPublisher::new();
    let mut sink = mqtt(&publisher);
    let mut sampler = Sampler::new(cell.reader());

    let next = sampler.step(0, &mut hub, &mut clock, &mut sink);
    assert_eq!(next, SampleInterval::MIN.as_us());
    assert_eq!(clock.now(), next);
    assert!(publisher.messages().is_empty());

    // The switch lands mid-sleep; nothing is sampled ahead of the deadline.
    svc.handle(ControlMsg::Input(InputEvent::ModeToggle), &mut RecordingSink::new());
    assert!(publisher.messages().is_empty());

    let after = sampler.step(next, &mut hub, &mut clock, &mut sink);
    assert_eq!(after, 2 * SampleInterval::MIN.as_us());
    assert_eq!(publisher.messages().len(), 3);
    assert_eq!((sampler.cycles(), sampler.published()), (2, 1));
}

/// Sensor whose reads take longer than the sampling interval.
struct SlowSensor {
    clock: MockClock,
    cost_us: u64,
}

impl SensorPort for SlowSensor {
    fn read_climate(&mut self) -> Result<RawReading, DecodeError> {
        self.clock.advance(self.cost_us);
        RawReading::from_frame(0)
    }

    fn read_light(&mut self) -> u8 {
        0
    }
}

#[test]
fn overrun_resynchronises_instead_of_bursting() {
    let cell = ControlCell::new();
    let mut svc = ControlService::new(cell.writer().unwrap(), SampleInterval::MIN);
    svc.handle(ControlMsg::Remote(RemoteCommand::SetPerformance), &mut RecordingSink::new());

    let mut clock = MockClock::new();
    let mut sensor = SlowSensor { clock: clock.clone(), cost_us: 3_000_000 };
    let mut sink = RecordingSink::new();
    let mut sampler = Sampler::new(cell.reader());

    let next = sampler.step(0, &mut sensor, &mut clock, &mut sink);
    assert_eq!(next, 3_000_000 + SampleInterval::MIN.as_us());
    assert_eq!(clock.now(), next);
    assert_eq!(sampler.published(), 1);
}
