//! Property-based tests for the envelope codec
//!
//! These tests verify the fundamental invariants of the envelope scheme:
//!
//! 1. **Round-trip**: open(seal(m, s), s) == m for all messages and secrets
//! 2. **Tamper detection**: any bit flip in the wire form fails closed
//! 3. **Wrong-key rejection**: a different secret never opens an envelope
//! 4. **Determinism**: same (message, secret, nonce) seals identically

#![allow(clippy::unwrap_used)]

use hushlink_crypto::{
    ADDRESS_SIZE, Envelope, EnvelopeError, EphemeralSecret, NONCE_SIZE, open, seal,
};
use proptest::prelude::*;

fn secret_strategy() -> impl Strategy<Value = EphemeralSecret> {
    any::<[u8; ADDRESS_SIZE]>().prop_map(EphemeralSecret::from_entropy)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn roundtrip_preserves_plaintext(
        plaintext in proptest::collection::vec(any::<u8>(), 0..2048),
        secret in secret_strategy(),
        nonce in any::<[u8; NONCE_SIZE]>(),
    ) {
        let envelope = seal(&plaintext, &secret, nonce);
        prop_assert_eq!(open(&envelope, &secret).unwrap(), plaintext);
    }

    #[test]
    fn wire_form_roundtrips(
        plaintext in proptest::collection::vec(any::<u8>(), 0..512),
        secret in secret_strategy(),
        nonce in any::<[u8; NONCE_SIZE]>(),
    ) {
        let envelope = seal(&plaintext, &secret, nonce);
        let reparsed = Envelope::decode(&envelope.encode()).unwrap();
        prop_assert_eq!(&reparsed, &envelope);
        prop_assert_eq!(open(&reparsed, &secret).unwrap(), plaintext);
    }

    #[test]
    fn tampered_byte_fails_closed(
        plaintext in proptest::collection::vec(any::<u8>(), 1..512),
        secret in secret_strategy(),
        nonce in any::<[u8; NONCE_SIZE]>(),
        position in any::<prop::sample::Index>(),
        flip in 1u8..=255,
    ) {
        let envelope = seal(&plaintext, &secret, nonce);

        let mut ciphertext = envelope.ciphertext().to_vec();
        let i = position.index(ciphertext.len());
        ciphertext[i] ^= flip;

        let tampered = Envelope::decode(&format!(
            "v1.{}.{}",
            base64_encode(envelope.nonce()),
            base64_encode(&ciphertext),
        )).unwrap();

        prop_assert_eq!(open(&tampered, &secret), Err(EnvelopeError::AuthenticationFailure));
    }

    #[test]
    fn wrong_secret_fails_closed(
        plaintext in proptest::collection::vec(any::<u8>(), 0..512),
        entropy_a in any::<[u8; ADDRESS_SIZE]>(),
        entropy_b in any::<[u8; ADDRESS_SIZE]>(),
        nonce in any::<[u8; NONCE_SIZE]>(),
    ) {
        prop_assume!(entropy_a != entropy_b);

        let envelope = seal(&plaintext, &EphemeralSecret::from_entropy(entropy_a), nonce);
        let result = open(&envelope, &EphemeralSecret::from_entropy(entropy_b));

        prop_assert_eq!(result, Err(EnvelopeError::AuthenticationFailure));
    }

    #[test]
    fn sealing_is_deterministic(
        plaintext in proptest::collection::vec(any::<u8>(), 0..512),
        secret in secret_strategy(),
        nonce in any::<[u8; NONCE_SIZE]>(),
    ) {
        let a = seal(&plaintext, &secret, nonce);
        let b = seal(&plaintext, &secret, nonce);
        prop_assert_eq!(a, b);
    }
}

fn base64_encode(bytes: &[u8]) -> String {
    use base64::Engine as _;
    base64::engine::general_purpose::STANDARD.encode(bytes)
}
