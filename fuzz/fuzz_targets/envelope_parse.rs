//! Fuzz target for envelope parsing and tamper rejection
//!
//! # Strategy
//!
//! - Completely arbitrary wire strings (general malformation)
//! - Structurally plausible strings built from arbitrary fields
//! - Sealed-then-tampered envelopes (bit flips in nonce or ciphertext)
//!
//! # Invariants
//!
//! - Parsing NEVER panics on malformed input
//! - A parsed envelope re-encodes to a string that parses back equal
//! - Any bit flip in a sealed envelope's binary fields fails decryption
//!   closed; plaintext is never silently altered

#![no_main]

use arbitrary::Arbitrary;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use hushlink_crypto::{open, seal, Envelope, EnvelopeError, EphemeralSecret, NONCE_SIZE};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
enum EnvelopeInput {
    /// Arbitrary bytes reinterpreted as a wire string.
    RawString(String),
    /// Three arbitrary fields joined with dots.
    AssembledFields { version: String, nonce: Vec<u8>, ciphertext: Vec<u8> },
    /// A genuinely sealed envelope with one byte flipped.
    Tampered {
        plaintext: Vec<u8>,
        entropy: [u8; 20],
        nonce: [u8; NONCE_SIZE],
        flip_nonce: bool,
        position: usize,
        flip: u8,
    },
}

fuzz_target!(|input: EnvelopeInput| {
    match input {
        EnvelopeInput::RawString(wire) => {
            if let Ok(envelope) = Envelope::decode(&wire) {
                let reparsed = Envelope::decode(&envelope.encode()).expect("re-encode must parse");
                assert_eq!(reparsed, envelope);
            }
        }
        EnvelopeInput::AssembledFields { version, nonce, ciphertext } => {
            let wire =
                format!("{version}.{}.{}", BASE64.encode(&nonce), BASE64.encode(&ciphertext));
            if let Ok(envelope) = Envelope::decode(&wire) {
                // Only v1 with a 12-byte nonce and tag-sized ciphertext may
                // parse.
                assert_eq!(version, "v1");
                assert_eq!(nonce.len(), NONCE_SIZE);
                assert!(ciphertext.len() >= 16);
                assert_eq!(envelope.ciphertext(), ciphertext.as_slice());
            }
        }
        EnvelopeInput::Tampered { plaintext, entropy, nonce, flip_nonce, position, flip } => {
            if flip == 0 {
                return;
            }
            let secret = EphemeralSecret::from_entropy(entropy);
            let sealed = seal(&plaintext, &secret, nonce);

            let mut nonce_bytes = *sealed.nonce();
            let mut ciphertext = sealed.ciphertext().to_vec();
            if flip_nonce {
                nonce_bytes[position % NONCE_SIZE] ^= flip;
            } else {
                let i = position % ciphertext.len();
                ciphertext[i] ^= flip;
            }

            let wire =
                format!("v1.{}.{}", BASE64.encode(nonce_bytes), BASE64.encode(&ciphertext));
            let tampered = Envelope::decode(&wire).expect("valid structure must parse");
            assert_eq!(open(&tampered, &secret), Err(EnvelopeError::AuthenticationFailure));
        }
    }
});
