//! HushLink Cryptographic Primitives
//!
//! Cryptographic building blocks for HushLink message confidentiality. Pure
//! functions with deterministic outputs. Callers provide random bytes for
//! deterministic testing.
//!
//! # Key Lifecycle
//!
//! Each message is encrypted under a key derived from a single-use,
//! address-shaped ephemeral secret. The secret is the only value that must
//! survive the round trip through the key-custody layer; everything else is
//! a public, deterministic transform.
//!
//! ```text
//! Ephemeral Secret (20 bytes, address-shaped)
//!        │
//!        ▼
//! SHA-256(lowercase textual form) → Message Key (32 bytes)
//!        │
//!        ▼
//! AES-256-GCM → Envelope ("v1." + base64(nonce) + "." + base64(ct‖tag))
//! ```
//!
//! A secret keys exactly one message. The sender discards it after the
//! envelope and the encrypted key handle are produced; the recipient
//! recovers it through the custody oracle and recomputes the same key.
//!
//! # Security
//!
//! Confidentiality and authenticity:
//! - AES-256-GCM provides tamper-proof authenticated encryption
//! - Failed authentication tag -> reject envelope, never emit plaintext
//! - Authentication failures carry no cause detail (no decryption oracle)
//!
//! Nonce uniqueness:
//! - A fresh random 96-bit nonce is drawn per envelope
//! - Each derived key encrypts exactly one message, so nonce reuse under a
//!   key cannot occur even across senders

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod address;
mod envelope;
mod handle;

pub use address::{ADDRESS_SIZE, Address, AddressError, EphemeralSecret};
pub use envelope::{
    Envelope, EnvelopeError, MESSAGE_KEY_SIZE, NONCE_SIZE, TAG_SIZE, derive_message_key, open,
    seal,
};
pub use handle::{HANDLE_SIZE, Handle, HandleError};
