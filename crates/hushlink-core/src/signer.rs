//! The injected typed-data signing capability.
//!
//! Signing is an external, possibly human-gated suspension point (hardware
//! wallet approval has no internal timeout). Modeling it as an injected
//! capability rather than a hidden global lets tests substitute a
//! deterministic signer; cancellation is the caller's responsibility
//! (abandon the pending future - nothing dangles).

use async_trait::async_trait;
use hushlink_crypto::Address;
use thiserror::Error;

use crate::custody::TypedData;

/// Errors from the signing capability.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SignerError {
    /// No signing identity is present. Terminal for this attempt.
    #[error("no signing identity available")]
    SignatureUnavailable,
}

/// A typed-data signature in its transport form: `0x`-prefixed hex.
///
/// The custody oracle expects the signature without the transport prefix;
/// [`Signature::without_prefix`] strips it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature(String);

impl Signature {
    /// Wrap a transport-form signature string.
    pub fn new(hex: String) -> Self {
        Self(hex)
    }

    /// The transport form, `0x`-prefixed.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The oracle form: hex without the `0x` prefix.
    pub fn without_prefix(&self) -> &str {
        self.0.strip_prefix("0x").unwrap_or(&self.0)
    }
}

/// Capability trait for the requester's signing identity.
#[async_trait]
pub trait TypedDataSigner: Send + Sync {
    /// The ledger address of this signing identity.
    fn address(&self) -> Address;

    /// Produce a typed-data signature over the structured authorization
    /// message.
    ///
    /// May suspend indefinitely pending external approval.
    ///
    /// # Errors
    ///
    /// - `SignatureUnavailable`: no signer is present or it declined
    async fn sign_typed_data(&self, typed_data: &TypedData) -> Result<Signature, SignerError>;
}
