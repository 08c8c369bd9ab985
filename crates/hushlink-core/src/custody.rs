//! The key-custody oracle: a narrow capability surface over the external
//! homomorphic-encryption service.
//!
//! The oracle's cryptography is explicitly out of scope; the core only
//! consumes four capabilities: mint an ephemeral keypair, build an
//! encrypted-input session, build a typed authorization message, and execute
//! a signature-gated user decryption.

use std::collections::HashMap;

use async_trait::async_trait;
use hushlink_crypto::{Address, Handle};
use serde::Serialize;
use thiserror::Error;

/// Errors from custody oracle operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CustodyError {
    /// An encrypted-input session could not be established. Transient.
    #[error("custody service unavailable: {0}")]
    Unavailable(String),

    /// The value could not be encoded as an encrypted input of the expected
    /// type. A programming-invariant violation, not a user-facing error:
    /// generated secrets are always address-shaped.
    #[error("value not representable as encrypted input: {0}")]
    EncodingRejected(String),

    /// The user-decryption endpoint could not be reached. Transient.
    #[error("custody oracle unavailable: {0}")]
    OracleUnavailable(String),

    /// The oracle rejected the grant on validity-window grounds. Terminal
    /// for this attempt; the caller must construct a fresh grant.
    #[error("authorization grant expired")]
    AuthorizationExpired,

    /// The oracle rejected the grant for any other reason (bad signature,
    /// scope mismatch, unknown handle). Terminal for this attempt.
    #[error("authorization rejected: {0}")]
    AuthorizationRejected(String),
}

impl CustodyError {
    /// Returns true if this error is transient and may succeed on retry.
    ///
    /// Grant rejections are never transient - retrying the same grant can
    /// only fail again; the caller needs a fresh one.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable(_) | Self::OracleUnavailable(_))
    }
}

/// A fresh public/private keypair minted for one decryption attempt.
///
/// The private half must never leave the requesting process; it is handed
/// only to the oracle's user-decryption call, which uses it to unwrap the
/// response for this attempt. Never reused across attempts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EphemeralKeypair {
    /// Public half, included in the signed authorization message.
    pub public_key: Vec<u8>,
    /// Private half, attempt-scoped.
    pub private_key: Vec<u8>,
}

/// A handle paired with the contract scope it was wrapped for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandleScope {
    /// The encrypted key handle.
    pub handle: Handle,
    /// The contract the handle is bound to.
    pub scope: Address,
}

/// EIP-712-style domain separator for the authorization message.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TypedDataDomain {
    /// Signing domain name.
    pub name: String,
    /// Signing domain version.
    pub version: String,
    /// Chain the grant is valid on.
    pub chain_id: u64,
    /// Verifying contract of the custody scheme.
    pub verifying_contract: String,
}

/// The typed fields of a `UserDecryptRequestVerification` message.
///
/// `start_timestamp` and `duration_days` travel as decimal strings; that is
/// the oracle's wire convention, and it keeps the signed bytes identical to
/// what the oracle later verifies.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserDecryptRequestVerification {
    /// Hex form of the ephemeral public key the grant authorizes.
    pub public_key: String,
    /// Checksummed contract addresses the grant is scoped to.
    pub contract_addresses: Vec<String>,
    /// Grant issuance time, seconds since the Unix epoch, as a decimal
    /// string.
    pub start_timestamp: String,
    /// Validity window in days, as a decimal string.
    pub duration_days: String,
}

/// A structured message ready for typed-data signing.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TypedData {
    /// Domain separator.
    pub domain: TypedDataDomain,
    /// Primary type name: `UserDecryptRequestVerification`.
    pub primary_type: String,
    /// The message fields to sign.
    pub message: UserDecryptRequestVerification,
}

/// Everything the oracle's user-decryption endpoint needs for one attempt.
#[derive(Debug, Clone)]
pub struct UserDecryptRequest<'a> {
    /// Handle/scope pairs to decrypt. The oracle supports batches; the
    /// decryption adapter submits one pair per grant.
    pub pairs: &'a [HandleScope],
    /// Private half of the attempt's ephemeral keypair.
    pub private_key: &'a [u8],
    /// Public half of the attempt's ephemeral keypair.
    pub public_key: &'a [u8],
    /// The grant signature, hex without the `0x` transport prefix.
    pub signature: &'a str,
    /// Contract scopes the grant covers.
    pub scopes: &'a [Address],
    /// The identity that signed the grant.
    pub requester: Address,
    /// Grant issuance time (decimal string, seconds since epoch).
    pub issued_at: &'a str,
    /// Grant validity window (decimal string, days).
    pub validity_days: &'a str,
}

/// Result of finalizing an encrypted-input session: handles plus the
/// zero-knowledge-style proof that they encode validly-typed values for the
/// session's scope. Handles and proof are meaningless individually.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedInput {
    /// One handle per field added to the session, in insertion order.
    pub handles: Vec<Handle>,
    /// Input-validity proof binding the handles to (scope, submitter).
    pub proof: Vec<u8>,
}

/// An open encrypted-input session, scoped to one (contract, submitter)
/// pair.
#[async_trait]
pub trait EncryptedInputBuilder: Send {
    /// Add an address-typed field to the session.
    fn add_address(&mut self, value: Address);

    /// Finalize the session into handles plus proof.
    ///
    /// # Errors
    ///
    /// - `EncodingRejected`: a field was not representable (defect)
    /// - `Unavailable`: the service failed mid-session (transient)
    async fn finalize(self: Box<Self>) -> Result<EncryptedInput, CustodyError>;
}

/// Capability trait for the external key-custody oracle.
#[async_trait]
pub trait CustodyOracle: Send + Sync {
    /// Mint a fresh ephemeral keypair for one decryption attempt.
    ///
    /// Local, non-networked generation is acceptable.
    async fn mint_keypair(&self) -> Result<EphemeralKeypair, CustodyError>;

    /// Build the structured authorization message for typed-data signing.
    ///
    /// Pure construction; the domain and type schema are the oracle's.
    fn authorization_message(
        &self,
        public_key: &[u8],
        scopes: &[Address],
        issued_at: &str,
        validity_days: &str,
    ) -> TypedData;

    /// Execute a signature-gated decryption of wrapped secrets.
    ///
    /// Returns a map from handle to cleartext value bytes.
    ///
    /// # Errors
    ///
    /// - `OracleUnavailable`: transport failure (transient)
    /// - `AuthorizationExpired`: the grant's validity window has passed
    /// - `AuthorizationRejected`: bad signature, scope mismatch, or unknown
    ///   handle
    async fn user_decrypt(
        &self,
        request: UserDecryptRequest<'_>,
    ) -> Result<HashMap<Handle, Vec<u8>>, CustodyError>;

    /// Open an encrypted-input session scoped to `(scope, submitter)`.
    ///
    /// # Errors
    ///
    /// - `Unavailable`: the session could not be established (transient)
    async fn encrypted_input(
        &self,
        scope: Address,
        submitter: Address,
    ) -> Result<Box<dyn EncryptedInputBuilder>, CustodyError>;
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn only_service_failures_are_transient() {
        assert!(CustodyError::Unavailable("dns".into()).is_transient());
        assert!(CustodyError::OracleUnavailable("503".into()).is_transient());

        assert!(!CustodyError::EncodingRejected("not an address".into()).is_transient());
        assert!(!CustodyError::AuthorizationExpired.is_transient());
        assert!(!CustodyError::AuthorizationRejected("scope mismatch".into()).is_transient());
    }

    #[test]
    fn typed_data_serializes_with_camel_case_keys() {
        let typed = TypedData {
            domain: TypedDataDomain {
                name: "UserDecryptRequestVerification".into(),
                version: "1".into(),
                chain_id: 1,
                verifying_contract: "0x0000000000000000000000000000000000000001".into(),
            },
            primary_type: "UserDecryptRequestVerification".into(),
            message: UserDecryptRequestVerification {
                public_key: "0xabcd".into(),
                contract_addresses: vec!["0x0000000000000000000000000000000000000002".into()],
                start_timestamp: "1700000000".into(),
                duration_days: "10".into(),
            },
        };

        let json = serde_json::to_string(&typed).unwrap();
        assert!(json.contains("\"chainId\""));
        assert!(json.contains("\"verifyingContract\""));
        assert!(json.contains("\"startTimestamp\""));
        assert!(json.contains("\"durationDays\""));
        assert!(json.contains("\"primaryType\""));
    }
}
