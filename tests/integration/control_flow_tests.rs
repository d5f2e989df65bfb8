//! Buttons and LEDs around the control service.

use embedded_hal::digital::PinState;

use envnode::app::commands::ControlMsg;
use envnode::app::events::NodeEvent;
use envnode::app::indicator::IndicatorSync;
use envnode::app::ports::PinConfig;
use envnode::app::service::ControlService;
use envnode::drivers::button::{ButtonForwarder, Debouncer, init_buttons};
use envnode::drivers::status_led::StatusLeds;
use envnode::events::{BUTTON_EVENTS, DeferredQueue, InputEvent};
use envnode::fsm::Mode;
use envnode::fsm::context::{ControlCell, SampleInterval};
use envnode::pins;

use crate::mock_hw::{MockClock, MockIo, RecordingSink};

fn drain(svc: &mut ControlService<'_>, inbox: &DeferredQueue<ControlMsg, 10>, sink: &mut RecordingSink) {
    while let Some(msg) = inbox.try_next() {
        svc.handle(msg, sink);
    }
}

// The only test that touches the global button queue.
#[test]
fn button_isrs_reach_the_fsm_through_the_bridge() {
    let clock = MockClock::new();
    let mut io = MockIo::new(clock, pins::DHT11_GPIO);
    init_buttons(&mut io).unwrap();
    assert_eq!(io.configs[&pins::MODE_BUTTON_GPIO], PinConfig::BUTTON);
    assert_eq!(io.configs[&pins::OFF_BUTTON_GPIO], PinConfig::BUTTON);

    io.fire(pins::MODE_BUTTON_GPIO);
    io.fire(pins::MODE_BUTTON_GPIO); // bounce
    io.fire(pins::OFF_BUTTON_GPIO);

    let inbox: DeferredQueue<ControlMsg, 10> = DeferredQueue::new();
    let mut fwd = ButtonForwarder::new(Debouncer::new(50), &inbox);
    let mut now_ms = 1_000;
    while let Some(event) = BUTTON_EVENTS.try_next() {
        fwd.forward(event, now_ms);
        now_ms += 5;
    }

    let cell = ControlCell::new();
    let mut svc = ControlService::new(cell.writer().unwrap(), SampleInterval::MIN);
    let mut sink = RecordingSink::new();
    drain(&mut svc, &inbox, &mut sink);

    assert_eq!(
        sink.events,
        vec![
            NodeEvent::ModeChanged { from: Mode::Idle, to: Mode::Performance },
            NodeEvent::ModeChanged { from: Mode::Performance, to: Mode::Idle },
        ]
    );
}

#[test]
fn mode_button_cycles_performance_and_configuration() {
    let inbox: DeferredQueue<ControlMsg, 10> = DeferredQueue::new();
    let cell = ControlCell::new();
    let mut svc = ControlService::new(cell.writer().unwrap(), SampleInterval::MIN);
    let mut sink = RecordingSink::new();
    let mut fwd = ButtonForwarder::new(Debouncer::new(50), &inbox);

    let mut seen = Vec::new();
    for press in 0..4u32 {
        fwd.forward(InputEvent::ModeToggle, press * 1_000);
        drain(&mut svc, &inbox, &mut sink);
        seen.push(svc.mode());
    }
    assert_eq!(
        seen,
        [Mode::Performance, Mode::Configuration, Mode::Performance, Mode::Configuration]
    );

    fwd.forward(InputEvent::ForceIdle, 10_000);
    drain(&mut svc, &inbox, &mut sink);
    assert_eq!(svc.mode(), Mode::Idle);
}

#[test]
fn off_button_in_idle_changes_nothing() {
    let inbox: DeferredQueue<ControlMsg, 10> = DeferredQueue::new();
    let cell = ControlCell::new();
    let mut svc = ControlService::new(cell.writer().unwrap(), SampleInterval::MIN);
    let mut sink = RecordingSink::new();

    inbox.post(ControlMsg::Input(InputEvent::ForceIdle));
    drain(&mut svc, &inbox, &mut sink);
    assert_eq!(svc.mode(), Mode::Idle);
    assert!(sink.events.is_empty());
}

#[test]
fn full_inbox_drops_newest_press() {
    let inbox: DeferredQueue<ControlMsg, 10> = DeferredQueue::new();
    for _ in 0..inbox.capacity() {
        assert!(inbox.post(ControlMsg::Input(InputEvent::ModeToggle)));
    }
    assert!(!inbox.post(ControlMsg::Input(InputEvent::ForceIdle)));
    assert_eq!(inbox.dropped(), 1);

    let cell = ControlCell::new();
    let mut svc = ControlService::new(cell.writer().unwrap(), SampleInterval::MIN);
    let mut sink = RecordingSink::new();
    drain(&mut svc, &inbox, &mut sink);
    // Ten toggles from Idle: P, C, P, C, ... ends in Configuration.
    assert_eq!(svc.mode(), Mode::Configuration);
    assert_eq!(svc.handled(), 10);
}

#[test]
fn indicator_lights_exactly_one_mode_led() {
    let cell = ControlCell::new();
    let mut svc = ControlService::new(cell.writer().unwrap(), SampleInterval::MIN);
    let mut leds = StatusLeds::new(MockIo::new(MockClock::new(), pins::DHT11_GPIO));
    leds.init().unwrap();
    let mut sync = IndicatorSync::new(cell.reader());

    let lit = |leds: &StatusLeds<MockIo>| {
        [pins::LED_GREEN_GPIO, pins::LED_YELLOW_GPIO, pins::LED_RED_GPIO]
            .map(|p| leds.io().level_written(p) == Some(PinState::High))
    };

    assert!(sync.sync(&mut leds));
    assert_eq!(lit(&leds), [false, false, true]);

    svc.handle(ControlMsg::Input(InputEvent::ModeToggle), &mut RecordingSink::new());
    assert!(sync.sync(&mut leds));
    assert_eq!(lit(&leds), [true, false, false]);

    svc.handle(ControlMsg::Input(InputEvent::ModeToggle), &mut RecordingSink::new());
    assert!(sync.sync(&mut leds));
    assert_eq!(lit(&leds), [false, true, false]);
    assert!(!sync.sync(&mut leds));
}

#[test]
fn link_leds_are_mutually_exclusive() {
    let mut leds = StatusLeds::new(MockIo::new(MockClock::new(), pins::DHT11_GPIO));
    leds.init().unwrap();

    leds.show_link(false);
    assert_eq!(leds.io().level_written(pins::CONNECTED_LED_GPIO), Some(PinState::Low));
    assert_eq!(leds.io().level_written(pins::CONNECTING_LED_GPIO), Some(PinState::High));

    leds.show_link(true);
    assert_eq!(leds.io().level_written(pins::CONNECTED_LED_GPIO), Some(PinState::High));
    assert_eq!(leds.io().level_written(pins::CONNECTING_LED_GPIO), Some(PinState::Low));
}
