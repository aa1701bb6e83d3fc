//! Score messages (type byte `'6'`).

use super::{PayloadDecoder, ascii_digit, digit_or_zero};
use crate::types::{MessageEvent, ScoreLine};

/// Shortest payload carrying both scores.
const MIN_LEN: usize = 10;
const HOME_TENS: usize = 5;
const GUEST_TENS: usize = 7;

/// Reads home and guest scores as two ASCII digits each.
///
/// A non-digit ones byte counts as 0; a non-digit tens byte makes the whole
/// score 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoreDecoder;

impl ScoreDecoder {
    fn field(payload: &[u8], tens_at: usize) -> u8 {
        match ascii_digit(payload[tens_at]) {
            Some(tens) => tens * 10 + digit_or_zero(payload, tens_at + 1),
            None => 0,
        }
    }
}

impl PayloadDecoder for ScoreDecoder {
    fn name(&self) -> &'static str {
        "score"
    }

    fn decode(&self, payload: &[u8]) -> MessageEvent {
        if payload.len() < MIN_LEN {
            return MessageEvent::Score(None);
        }

        MessageEvent::Score(Some(ScoreLine {
            home: Self::field(payload, HOME_TENS),
            guest: Self::field(payload, GUEST_TENS),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::score_payload;

    #[test]
    fn reads_ascii_digits_at_fixed_offsets() {
        let payload = [b'G', b'6', b'0', 0x80, b'1', 0x33, 0x35, 0x30, 0x32, b'0'];
        assert_eq!(ScoreDecoder.decode(&payload), MessageEvent::Score(Some(ScoreLine::new(35, 2))));
    }

    #[test]
    fn builder_payload_round_trips() {
        for (home, guest) in [(0, 0), (9, 10), (99, 99), (42, 7)] {
            assert_eq!(
                ScoreDecoder.decode(&score_payload(home, guest)),
                MessageEvent::Score(Some(ScoreLine::new(home, guest)))
            );
        }
    }

    #[test]
    fn short_payload_carries_no_score() {
        assert_eq!(ScoreDecoder.decode(b"G6012345"), MessageEvent::Score(None));
    }

    #[test]
    fn invalid_tens_digit_reports_zero() {
        let mut payload = score_payload(35, 27);
        payload[5] = b' ';
        assert_eq!(ScoreDecoder.decode(&payload), MessageEvent::Score(Some(ScoreLine::new(0, 27))));
    }

    #[test]
    fn invalid_ones_digit_counts_as_zero() {
        let mut payload = score_payload(35, 27);
        payload[8] = 0xFF;
        assert_eq!(ScoreDecoder.decode(&payload), MessageEvent::Score(Some(ScoreLine::new(35, 20))));
    }
}
