//! Registry mapping a payload's type byte to its decoder.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use super::{ClockDecoder, GenericDecoder, PayloadDecoder, PenaltyDecoder, ScoreDecoder};

/// Position of the type byte within the payload.
const DISCRIMINANT_INDEX: usize = 1;

/// Maps a type byte to a decoder, with a fallback for everything else.
pub struct DecoderRegistry {
    decoders: HashMap<u8, Arc<dyn PayloadDecoder>>,
    fallback: Arc<dyn PayloadDecoder>,
}

impl Default for DecoderRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

impl DecoderRegistry {
    /// Registry with no typed decoders; every payload goes to the fallback.
    pub fn empty() -> Self {
        Self { decoders: HashMap::new(), fallback: Arc::new(GenericDecoder) }
    }

    /// Registry with the score (`'6'`), clock (`'7'`) and penalty (`'8'`) decoders.
    pub fn standard() -> Self {
        let mut registry = Self::empty();
        registry.register(b'6', ScoreDecoder);
        registry.register(b'7', ClockDecoder);
        registry.register(b'8', PenaltyDecoder);
        registry
    }

    /// Register `decoder` for payloads whose type byte is `discriminant`.
    ///
    /// Returns the decoder previously registered for that byte, if any.
    pub fn register<D: PayloadDecoder>(
        &mut self,
        discriminant: u8,
        decoder: D,
    ) -> Option<Arc<dyn PayloadDecoder>> {
        debug!(
            discriminant = format_args!("{:#04x}", discriminant),
            decoder = decoder.name(),
            "Registering payload decoder"
        );
        self.decoders.insert(discriminant, Arc::new(decoder))
    }

    /// Replace the decoder used when no registered type byte matches.
    pub fn set_fallback<D: PayloadDecoder>(&mut self, decoder: D) {
        self.fallback = Arc::new(decoder);
    }

    /// Decoder responsible for `payload`.
    pub fn resolve(&self, payload: &[u8]) -> &dyn PayloadDecoder {
        let decoder = payload
            .get(DISCRIMINANT_INDEX)
            .and_then(|byte| self.decoders.get(byte))
            .unwrap_or(&self.fallback);
        &**decoder
    }

    /// Registered type bytes, sorted.
    pub fn discriminants(&self) -> Vec<u8> {
        let mut keys: Vec<u8> = self.decoders.keys().copied().collect();
        keys.sort_unstable();
        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{MessageEvent, ScoreLine};

    struct FixedScore;

    impl PayloadDecoder for FixedScore {
        fn name(&self) -> &'static str {
            "fixed"
        }

        fn decode(&self, _payload: &[u8]) -> MessageEvent {
            MessageEvent::Score(Some(ScoreLine::new(1, 1)))
        }
    }

    #[test]
    fn standard_registry_covers_known_types() {
        let registry = DecoderRegistry::standard();
        assert_eq!(registry.discriminants(), vec![b'6', b'7', b'8']);
        assert_eq!(registry.resolve(b"G6").name(), "score");
        assert_eq!(registry.resolve(b"G7").name(), "clock");
        assert_eq!(registry.resolve(b"G8").name(), "penalty");
        assert_eq!(registry.resolve(b"G1").name(), "generic");
        assert_eq!(registry.resolve(b"G").name(), "generic");
    }

    #[test]
    fn custom_decoder_extends_dispatch() {
        let mut registry = DecoderRegistry::standard();
        assert!(registry.register(b'9', FixedScore).is_none());

        let decoder = registry.resolve(b"G9");
        assert_eq!(decoder.name(), "fixed");
        assert_eq!(decoder.decode(b"G9"), MessageEvent::Score(Some(ScoreLine::new(1, 1))));
    }

    #[test]
    fn register_replaces_existing_decoder() {
        let mut registry = DecoderRegistry::standard();
        let previous = registry.register(b'6', FixedScore).expect("score decoder registered");
        assert_eq!(previous.name(), "score");
        assert_eq!(registry.resolve(b"G6").name(), "fixed");
    }

    #[test]
    fn empty_registry_uses_fallback() {
        let mut registry = DecoderRegistry::empty();
        assert!(registry.discriminants().is_empty());
        assert_eq!(registry.resolve(b"G6").name(), "generic");

        registry.set_fallback(FixedScore);
        assert_eq!(registry.resolve(b"G6").name(), "fixed");
    }
}
