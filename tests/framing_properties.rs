//! Property tests for the framing layer, through the public API.

use proptest::prelude::*;
use scorelink::protocol::{FrameAssembler, FrameValidator, RejectReason, encode_frame, lrc};
use scorelink::{GameTime, MessageDecoder, MessageEvent, ScoreLine};

/// Payload bytes that never collide with the frame delimiters.
fn payload_byte() -> impl Strategy<Value = u8> {
    any::<u8>().prop_filter("delimiter", |b| !matches!(b, 0x01 | 0x03))
}

fn value_payload(kind: u8, first: u8, second: u8) -> Vec<u8> {
    vec![
        b'G', kind, b'0', 0x80, b'1',
        b'0' + first / 10, b'0' + first % 10,
        b'0' + second / 10, b'0' + second % 10,
        b'0',
    ]
}

fn score_payload(home: u8, guest: u8) -> Vec<u8> {
    value_payload(b'6', home, guest)
}

fn clock_payload(minutes: u8, seconds: u8) -> Vec<u8> {
    value_payload(b'7', minutes, seconds)
}

fn decode_stream(bytes: &[u8]) -> Vec<MessageEvent> {
    let mut assembler = FrameAssembler::new();
    let validator = FrameValidator::default();
    let decoder = MessageDecoder::default();
    assembler
        .feed(bytes)
        .iter()
        .filter_map(|candidate| validator.validate(candidate).ok())
        .map(|frame| decoder.decode(&frame))
        .collect()
}

proptest! {
    #[test]
    fn any_split_yields_same_frames(
        payloads in prop::collection::vec(prop::collection::vec(payload_byte(), 0..24), 1..6),
        split in 1usize..16,
    ) {
        let mut stream = Vec::new();
        for payload in &payloads {
            stream.extend(encode_frame(0x7F, payload));
        }

        let mut whole = FrameAssembler::new();
        let expected = whole.feed(&stream);

        let mut pieces = FrameAssembler::new();
        let got: Vec<_> = stream.chunks(split).flat_map(|chunk| pieces.feed(chunk)).collect();

        prop_assert_eq!(got, expected);
    }

    #[test]
    fn encoded_frames_validate_with_their_payload(
        payload in prop::collection::vec(payload_byte(), 0..64),
        address in any::<u8>(),
    ) {
        let bytes = encode_frame(address, &payload);
        let frame = FrameValidator::new(address).validate(&bytes).unwrap();
        prop_assert!(frame.checksum_valid);
        prop_assert_eq!(frame.payload.as_ref(), payload.as_slice());
        prop_assert_eq!(frame.checksum, lrc(&bytes[1..bytes.len() - 1]));
    }

    #[test]
    fn scores_survive_the_whole_path(home in 0u8..100, guest in 0u8..100) {
        let bytes = encode_frame(0x7F, &score_payload(home, guest));
        let mut assembler = FrameAssembler::new();
        let candidates = assembler.feed(&bytes);
        prop_assert_eq!(candidates.len(), 1);

        let frame = FrameValidator::default().validate(&candidates[0]).unwrap();
        let event = MessageDecoder::default().decode(&frame);
        prop_assert_eq!(event, MessageEvent::Score(Some(ScoreLine::new(home, guest))));
    }

    #[test]
    fn clocks_survive_the_whole_path(minutes in 0u8..100, seconds in 0u8..100, split in 1usize..14) {
        let bytes = encode_frame(0x7F, &clock_payload(minutes, seconds));
        let mut assembler = FrameAssembler::new();
        let candidates: Vec<_> = bytes.chunks(split).flat_map(|chunk| assembler.feed(chunk)).collect();
        prop_assert_eq!(candidates.len(), 1);

        let frame = FrameValidator::default().validate(&candidates[0]).unwrap();
        prop_assert!(frame.checksum_valid);
        let event = MessageDecoder::default().decode(&frame);
        prop_assert_eq!(event, MessageEvent::Clock(Some(GameTime::new(minutes, seconds))));
    }

    #[test]
    fn mixed_stream_decodes_in_order(home in 0u8..100, guest in 0u8..100, minutes in 0u8..100, seconds in 0u8..100) {
        let mut stream = encode_frame(0x7F, &clock_payload(minutes, seconds));
        stream.extend(encode_frame(0x7F, &score_payload(home, guest)));

        prop_assert_eq!(
            decode_stream(&stream),
            vec![
                MessageEvent::Clock(Some(GameTime::new(minutes, seconds))),
                MessageEvent::Score(Some(ScoreLine::new(home, guest))),
            ]
        );
    }

    #[test]
    fn truncated_frames_never_validate(
        payload in prop::collection::vec(payload_byte(), 0..16),
        cut in 1usize..5,
    ) {
        let bytes = encode_frame(0x7F, &payload);
        let truncated = &bytes[..bytes.len().saturating_sub(cut)];
        let result = FrameValidator::default().validate(truncated);
        prop_assert!(result.is_err());
        if truncated.len() >= 5 && cut == 1 {
            prop_assert_eq!(result.unwrap_err(), RejectReason::MissingChecksum);
        }
    }
}
