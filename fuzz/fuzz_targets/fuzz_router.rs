//! Fuzz target: `Router::route`
//!
//! The first byte picks a command topic, the rest is the payload.  Routing
//! must never panic, and a decoded delay must be what the JSON said.
//!
//! cargo fuzz run fuzz_router

#![no_main]

use envnode::app::commands::RemoteCommand;
use envnode::remote::payload::parse_delay;
use envnode::remote::router::Router;
use libfuzzer_sys::fuzz_target;

const TOPICS: [&str; 6] = [
    "ESP32/1/config/ON",
    "ESP32/1/config/SLEEP",
    "ESP32/1/config/CONFIG",
    "ESP32/1/config/delay",
    "ESP32/1/config/DELAY",
    "ESP32/2/config/delay",
];

fuzz_target!(|data: &[u8]| {
    let Some((&pick, payload)) = data.split_first() else {
        return;
    };
    let Ok(router) = Router::new("ESP32/1") else {
        return;
    };
    let topic = TOPICS[usize::from(pick) % TOPICS.len()];

    match router.route(topic, payload) {
        Ok(Some(RemoteCommand::SetInterval(ms))) => {
            assert_eq!(parse_delay(payload), Ok(ms));
        }
        Ok(None) => assert!(topic.starts_with("ESP32/2")),
        Ok(Some(_)) | Err(_) => {}
    }

    // Arbitrary topics as well.
    if let Ok(topic) = core::str::from_utf8(payload) {
        let _ = router.route(topic, b"");
    }
});
