//! Deterministic signing doubles.
//!
//! The mock signature scheme is a proof-of-possession stand-in, not real
//! ECDSA: `keccak256(canonical_json(typed_data) || signer_address)`. The
//! mock oracle recomputes the same digest from the request fields, so a
//! signature binds the grant contents and the requester exactly like the
//! real typed-data scheme does, without key management.

use async_trait::async_trait;
use hushlink_core::{Address, Signature, SignerError, TypedData, TypedDataSigner};
use sha3::{Digest, Keccak256};

/// Compute the mock grant signature over a typed authorization message.
///
/// Returns the transport form: `0x`-prefixed hex.
pub fn mock_grant_signature(typed_data: &TypedData, signer: Address) -> String {
    let Ok(canonical) = serde_json::to_vec(typed_data) else {
        unreachable!("typed-data serialization to JSON cannot fail");
    };

    let mut hasher = Keccak256::new();
    hasher.update(&canonical);
    hasher.update(signer.as_bytes());
    format!("0x{}", hex::encode(hasher.finalize()))
}

/// A signer that always approves, deterministically, as one fixed account.
#[derive(Debug, Clone, Copy)]
pub struct StaticSigner {
    address: Address,
}

impl StaticSigner {
    /// Create a signer for `address`.
    pub fn new(address: Address) -> Self {
        Self { address }
    }
}

#[async_trait]
impl TypedDataSigner for StaticSigner {
    fn address(&self) -> Address {
        self.address
    }

    async fn sign_typed_data(&self, typed_data: &TypedData) -> Result<Signature, SignerError> {
        Ok(Signature::new(mock_grant_signature(typed_data, self.address)))
    }
}

/// A signing seam with no identity behind it: every request fails with
/// `SignatureUnavailable`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSigner;

#[async_trait]
impl TypedDataSigner for NoSigner {
    fn address(&self) -> Address {
        Address::ZERO
    }

    async fn sign_typed_data(&self, _typed_data: &TypedData) -> Result<Signature, SignerError> {
        Err(SignerError::SignatureUnavailable)
    }
}
