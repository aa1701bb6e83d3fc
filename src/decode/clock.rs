//! Clock messages (type byte `'7'`).

use super::{PayloadDecoder, ascii_digit, digit_or_zero};
use crate::types::{GameTime, MessageEvent};

/// Shortest payload carrying a clock reading; the seconds ones digit may be cut off.
const MIN_LEN: usize = 8;
const MINUTES_TENS: usize = 5;
const SECONDS_TENS: usize = 7;

/// Reads the game clock as `MM` at offsets 5-6 and `SS` at offsets 7-8.
///
/// Unlike scores, a non-digit minutes tens byte yields no clock reading at
/// all, leaving the published time untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClockDecoder;

impl PayloadDecoder for ClockDecoder {
    fn name(&self) -> &'static str {
        "clock"
    }

    fn decode(&self, payload: &[u8]) -> MessageEvent {
        if payload.len() < MIN_LEN {
            return MessageEvent::Clock(None);
        }

        let Some(minutes_tens) = ascii_digit(payload[MINUTES_TENS]) else {
            return MessageEvent::Clock(None);
        };

        let minutes = minutes_tens * 10 + digit_or_zero(payload, MINUTES_TENS + 1);
        let seconds =
            digit_or_zero(payload, SECONDS_TENS) * 10 + digit_or_zero(payload, SECONDS_TENS + 1);

        MessageEvent::Clock(Some(GameTime::new(minutes, seconds)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::clock_payload;

    #[test]
    fn reads_minutes_and_seconds() {
        assert_eq!(
            ClockDecoder.decode(&clock_payload(12, 34)),
            MessageEvent::Clock(Some(GameTime::new(12, 34)))
        );
        assert_eq!(
            ClockDecoder.decode(&clock_payload(0, 5)),
            MessageEvent::Clock(Some(GameTime::new(0, 5)))
        );
    }

    #[test]
    fn eight_byte_payload_reads_missing_ones_as_zero() {
        let payload = clock_payload(20, 45);
        assert_eq!(
            ClockDecoder.decode(&payload[..8]),
            MessageEvent::Clock(Some(GameTime::new(20, 40)))
        );
    }

    #[test]
    fn short_payload_carries_no_time() {
        assert_eq!(ClockDecoder.decode(b"G70\x8012"), MessageEvent::Clock(None));
    }

    #[test]
    fn invalid_minutes_tens_drops_update() {
        let mut payload = clock_payload(12, 34);
        payload[5] = b' ';
        assert_eq!(ClockDecoder.decode(&payload), MessageEvent::Clock(None));
    }

    #[test]
    fn invalid_seconds_digits_count_as_zero() {
        let mut payload = clock_payload(12, 34);
        payload[7] = b' ';
        assert_eq!(
            ClockDecoder.decode(&payload),
            MessageEvent::Clock(Some(GameTime::new(12, 4)))
        );
    }
}
