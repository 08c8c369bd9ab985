//! The versioned message envelope: AES-256-GCM under a derived key.
//!
//! Wire form is a printable string safe for a ledger text field:
//! `"v1." + base64(nonce) + "." + base64(ciphertext || tag)`.
//!
//! All functions are pure - random bytes must be provided by the caller.
//! This enables deterministic testing.

use aes_gcm::{
    Aes256Gcm, Nonce,
    aead::{Aead, KeyInit},
};
use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use sha2::{Digest, Sha256};
use thiserror::Error;
use zeroize::Zeroizing;

use crate::address::EphemeralSecret;

/// Size of the derived symmetric key in bytes.
pub const MESSAGE_KEY_SIZE: usize = 32;

/// Size of the AES-GCM nonce in bytes (96 bits).
pub const NONCE_SIZE: usize = 12;

/// Size of the GCM authentication tag in bytes.
pub const TAG_SIZE: usize = 16;

/// Leading version token. The only version defined; anything else is
/// rejected before any cryptographic operation.
const VERSION_TAG: &str = "v1";

/// Errors from envelope parsing and decryption.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EnvelopeError {
    /// The envelope string does not have the `v1.<nonce>.<ciphertext>`
    /// structure. Rejected before any cryptographic operation.
    #[error("malformed envelope: {reason}")]
    Malformed {
        /// What structural check failed.
        reason: &'static str,
    },

    /// The authentication tag did not verify: wrong key, corrupted
    /// ciphertext, or tampering. Deliberately carries no detail about which,
    /// to avoid aiding chosen-ciphertext analysis.
    #[error("decryption failed")]
    AuthenticationFailure,
}

/// A parsed envelope: nonce plus ciphertext (tag included).
///
/// Invariant: decrypting with any key other than the one the envelope was
/// sealed under fails closed with [`EnvelopeError::AuthenticationFailure`],
/// never returns garbage plaintext.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    /// The 12-byte AES-GCM nonce.
    nonce: [u8; NONCE_SIZE],
    /// Ciphertext with the 16-byte GCM tag appended.
    ciphertext: Vec<u8>,
}

impl Envelope {
    /// The nonce this envelope was sealed with.
    pub const fn nonce(&self) -> &[u8; NONCE_SIZE] {
        &self.nonce
    }

    /// Ciphertext including the authentication tag.
    pub fn ciphertext(&self) -> &[u8] {
        &self.ciphertext
    }

    /// Plaintext length (ciphertext length minus authentication tag).
    pub fn plaintext_len(&self) -> usize {
        self.ciphertext.len().saturating_sub(TAG_SIZE)
    }

    /// Encode to the `v1.<base64 nonce>.<base64 ciphertext>` wire string.
    pub fn encode(&self) -> String {
        format!(
            "{VERSION_TAG}.{}.{}",
            BASE64.encode(self.nonce),
            BASE64.encode(&self.ciphertext)
        )
    }

    /// Parse a wire string, validating structure only.
    ///
    /// # Errors
    ///
    /// - `Malformed`: not exactly three dot-separated fields, version token
    ///   is not `v1`, a field is not valid base64, the nonce is not 12
    ///   bytes, or the ciphertext is shorter than the tag
    pub fn decode(wire: &str) -> Result<Self, EnvelopeError> {
        let fields: Vec<&str> = wire.split('.').collect();
        let [version, nonce_b64, ciphertext_b64] = fields.as_slice() else {
            return Err(EnvelopeError::Malformed { reason: "expected three dot-separated fields" });
        };

        if *version != VERSION_TAG {
            return Err(EnvelopeError::Malformed { reason: "unsupported version token" });
        }

        let nonce_bytes = BASE64
            .decode(*nonce_b64)
            .map_err(|_| EnvelopeError::Malformed { reason: "nonce is not valid base64" })?;
        let nonce: [u8; NONCE_SIZE] = nonce_bytes
            .try_into()
            .map_err(|_| EnvelopeError::Malformed { reason: "nonce is not 12 bytes" })?;

        let ciphertext = BASE64
            .decode(*ciphertext_b64)
            .map_err(|_| EnvelopeError::Malformed { reason: "ciphertext is not valid base64" })?;
        if ciphertext.len() < TAG_SIZE {
            return Err(EnvelopeError::Malformed { reason: "ciphertext shorter than tag" });
        }

        Ok(Self { nonce, ciphertext })
    }
}

impl std::fmt::Display for Envelope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.encode())
    }
}

impl std::str::FromStr for Envelope {
    type Err = EnvelopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s)
    }
}

/// Derive the 256-bit message key from an ephemeral secret.
///
/// `SHA-256` of the lowercase textual form (`0x` + 40 lowercase hex chars).
/// Deterministic, so any holder of the secret recomputes the same key;
/// casing of the secret's textual representation never matters.
pub fn derive_message_key(secret: &EphemeralSecret) -> Zeroizing<[u8; MESSAGE_KEY_SIZE]> {
    let digest = Sha256::digest(secret.to_lowercase_hex().as_bytes());
    Zeroizing::new(digest.into())
}

/// Seal plaintext into an envelope under the key derived from `secret`.
///
/// # Security
///
/// - Caller MUST provide a fresh, cryptographically random nonce
/// - Each secret keys exactly one message, so a fresh nonce per call makes
///   (key, nonce) reuse impossible
pub fn seal(plaintext: &[u8], secret: &EphemeralSecret, nonce: [u8; NONCE_SIZE]) -> Envelope {
    let key = derive_message_key(secret);
    let key_bytes: &[u8; MESSAGE_KEY_SIZE] = &key;
    let cipher = Aes256Gcm::new(key_bytes.into());

    let Ok(ciphertext) = cipher.encrypt(Nonce::from_slice(&nonce), plaintext) else {
        unreachable!("AES-256-GCM encryption cannot fail with valid inputs");
    };

    Envelope { nonce, ciphertext }
}

/// Open an envelope with the key derived from `secret`.
///
/// # Errors
///
/// - `AuthenticationFailure`: tag mismatch (wrong key, corruption, or
///   tampering - indistinguishable by design)
pub fn open(envelope: &Envelope, secret: &EphemeralSecret) -> Result<Vec<u8>, EnvelopeError> {
    let key = derive_message_key(secret);
    let key_bytes: &[u8; MESSAGE_KEY_SIZE] = &key;
    let cipher = Aes256Gcm::new(key_bytes.into());

    cipher
        .decrypt(Nonce::from_slice(&envelope.nonce), envelope.ciphertext.as_slice())
        .map_err(|_| EnvelopeError::AuthenticationFailure)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::address::ADDRESS_SIZE;

    fn test_secret(fill: u8) -> EphemeralSecret {
        EphemeralSecret::from_entropy([fill; ADDRESS_SIZE])
    }

    #[test]
    fn seal_open_roundtrip() {
        let secret = test_secret(0x11);
        let envelope = seal(b"hello hushlink", &secret, [0xab; NONCE_SIZE]);
        assert_eq!(open(&envelope, &secret).unwrap(), b"hello hushlink");
    }

    #[test]
    fn seal_open_empty_message() {
        let secret = test_secret(0x22);
        let envelope = seal(b"", &secret, [0x00; NONCE_SIZE]);
        assert_eq!(open(&envelope, &secret).unwrap(), b"");
    }

    #[test]
    fn seal_open_large_message() {
        let secret = test_secret(0x33);
        let plaintext = vec![0x42u8; 64 * 1024]; // 64KB
        let envelope = seal(&plaintext, &secret, [0xff; NONCE_SIZE]);
        assert_eq!(open(&envelope, &secret).unwrap(), plaintext);
    }

    #[test]
    fn wire_string_has_v1_prefix_and_roundtrips() {
        let secret = test_secret(0x44);
        let envelope = seal(b"payload", &secret, [0x01; NONCE_SIZE]);
        let wire = envelope.encode();

        assert!(wire.starts_with("v1."));
        let reparsed = Envelope::decode(&wire).unwrap();
        assert_eq!(reparsed, envelope);
        assert_eq!(open(&reparsed, &secret).unwrap(), b"payload");
    }

    #[test]
    fn wrong_key_fails_closed() {
        let envelope = seal(b"secret message", &test_secret(0x55), [0x00; NONCE_SIZE]);
        let result = open(&envelope, &test_secret(0x56));
        assert_eq!(result, Err(EnvelopeError::AuthenticationFailure));
    }

    #[test]
    fn tampered_ciphertext_fails_closed() {
        let secret = test_secret(0x66);
        let envelope = seal(b"original message", &secret, [0x00; NONCE_SIZE]);

        // Flip one bit in every ciphertext/tag position in turn.
        for i in 0..envelope.ciphertext.len() {
            let mut tampered = envelope.clone();
            tampered.ciphertext[i] ^= 0x01;
            assert_eq!(open(&tampered, &secret), Err(EnvelopeError::AuthenticationFailure));
        }
    }

    #[test]
    fn ciphertext_is_plaintext_plus_tag() {
        let envelope = seal(b"test message", &test_secret(0x77), [0x00; NONCE_SIZE]);
        assert_eq!(envelope.ciphertext().len(), b"test message".len() + TAG_SIZE);
        assert_eq!(envelope.plaintext_len(), b"test message".len());
    }

    #[test]
    fn version_guard_rejects_before_crypto() {
        for wire in [
            "v2.AAAAAAAAAAAAAAAA.AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA",
            "v1.AAAAAAAAAAAAAAAA",
            "v1.a.b.c",
            "",
            "v1",
            "not-an-envelope",
        ] {
            assert!(matches!(Envelope::decode(wire), Err(EnvelopeError::Malformed { .. })));
        }
    }

    #[test]
    fn decode_rejects_bad_fields() {
        let secret = test_secret(0x88);
        let envelope = seal(b"x", &secret, [0x00; NONCE_SIZE]);
        let ct_b64 = BASE64.encode(envelope.ciphertext());

        // Invalid base64 in either field
        assert!(Envelope::decode(&format!("v1.!!!.{ct_b64}")).is_err());
        assert!(Envelope::decode("v1.AAAAAAAAAAAAAAAA.!!!").is_err());

        // Nonce of the wrong length
        let short_nonce = BASE64.encode([0u8; 8]);
        assert!(Envelope::decode(&format!("v1.{short_nonce}.{ct_b64}")).is_err());

        // Ciphertext shorter than the tag
        let nonce_b64 = BASE64.encode([0u8; NONCE_SIZE]);
        let short_ct = BASE64.encode([0u8; TAG_SIZE - 1]);
        assert!(Envelope::decode(&format!("v1.{nonce_b64}.{short_ct}")).is_err());
    }

    #[test]
    fn derived_key_ignores_secret_casing() {
        let mixed: EphemeralSecret = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed".parse().unwrap();
        let lower: EphemeralSecret = "0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed".parse().unwrap();
        assert_eq!(*derive_message_key(&mixed), *derive_message_key(&lower));

        let envelope = seal(b"hello hushlink", &mixed, [0x09; NONCE_SIZE]);
        assert_eq!(open(&envelope, &lower).unwrap(), b"hello hushlink");
    }

    #[test]
    fn different_nonces_produce_different_ciphertexts() {
        let secret = test_secret(0x99);
        let a = seal(b"same message", &secret, [0x00; NONCE_SIZE]);
        let b = seal(b"same message", &secret, [0x01; NONCE_SIZE]);

        assert_ne!(a.nonce(), b.nonce());
        assert_ne!(a.ciphertext(), b.ciphertext());
    }

    #[test]
    fn authentication_error_message_is_generic() {
        // Must not reveal whether the key, nonce, or ciphertext was wrong.
        assert_eq!(EnvelopeError::AuthenticationFailure.to_string(), "decryption failed");
    }
}
