//! Frame builders shared by unit tests and benches.

#![cfg(any(test, feature = "benchmark"))]

use crate::protocol::{constants::DEFAULT_ADDRESS, encode_frame};

/// Bytes preceding the value digits in score and clock payloads.
const PREFIX: [u8; 3] = [b'0', 0x80, b'1'];

fn digits(value: u8) -> [u8; 2] {
    [b'0' + (value / 10) % 10, b'0' + value % 10]
}

fn payload(kind: u8, first: u8, second: u8) -> Vec<u8> {
    let mut payload = vec![b'G', kind];
    payload.extend_from_slice(&PREFIX);
    payload.extend_from_slice(&digits(first));
    payload.extend_from_slice(&digits(second));
    payload.push(b'0');
    payload
}

/// 10-byte score payload with `home` at offsets 5-6 and `guest` at 7-8.
pub fn score_payload(home: u8, guest: u8) -> Vec<u8> {
    payload(b'6', home, guest)
}

/// 10-byte clock payload with minutes at offsets 5-6 and seconds at 7-8.
pub fn clock_payload(minutes: u8, seconds: u8) -> Vec<u8> {
    payload(b'7', minutes, seconds)
}

/// Payload of the unknown-type capture used in decoder tests.
pub fn generic_scenario_payload() -> Vec<u8> {
    vec![0x47, 0x31, 0x06, 0x80, 0x37, 0x20, 0x34, 0x30, 0x37, 0x20, 0x30, 0x31]
}

pub fn score_frame(home: u8, guest: u8) -> Vec<u8> {
    encode_frame(DEFAULT_ADDRESS, &score_payload(home, guest))
}

pub fn clock_frame(minutes: u8, seconds: u8) -> Vec<u8> {
    encode_frame(DEFAULT_ADDRESS, &clock_payload(minutes, seconds))
}

/// Flip the checksum byte so the frame fails LRC but stays structurally valid.
pub fn with_bad_checksum(mut frame: Vec<u8>) -> Vec<u8> {
    if let Some(last) = frame.last_mut() {
        *last ^= 0xFF;
    }
    frame
}

/// A mixed stream of scores and clocks for throughput measurements.
pub fn sample_stream(frames: usize) -> Vec<u8> {
    let mut stream = Vec::new();
    for i in 0..frames {
        let n = (i % 100) as u8;
        if i % 2 == 0 {
            stream.extend(score_frame(n, 99 - n));
        } else {
            stream.extend(clock_frame(n % 60, (n * 7) % 60));
        }
    }
    stream
}
