//! Fuzz target: DHT11 frame assembly and validation
//!
//! Interprets the input as up to 40 pulse widths and checks that a frame
//! is accepted exactly when its checksum byte matches.
//!
//! cargo fuzz run fuzz_dht_frame

#![no_main]

use envnode::sensors::dht11::{FRAME_BITS, RawReading, assemble_frame};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut pulses = [0u32; FRAME_BITS];
    for (slot, &b) in pulses.iter_mut().zip(data) {
        *slot = u32::from(b);
    }

    let frame = assemble_frame(&pulses);
    assert!(frame < 1 << FRAME_BITS, "frame has more than 40 bits");

    let bytes = frame.to_be_bytes();
    let data_bytes = [bytes[3], bytes[4], bytes[5], bytes[6]];
    let matches = RawReading::checksum_of(data_bytes) == bytes[7];
    assert_eq!(RawReading::from_frame(frame).is_ok(), matches);
});
