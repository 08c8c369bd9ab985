//! Authorized decryption adapter.
//!
//! Gates who may ask the custody oracle to reveal a wrapped secret. One
//! attempt walks: validate inputs locally → mint ephemeral keypair →
//! construct and sign the authorization grant → query the oracle → validate
//! the recovered secret → open the envelope.
//!
//! Every attempt is self-contained: the keypair and signature are
//! attempt-scoped, so abandoning the pending future discards them without
//! leaving process-wide state dangling. The signing step may suspend
//! indefinitely (hardware wallet approval); cancellation is the caller's
//! responsibility.

use hushlink_crypto::{ADDRESS_SIZE, Address, Envelope, EphemeralSecret, Handle, open};

use crate::{
    custody::{CustodyOracle, HandleScope, UserDecryptRequest},
    env::Environment,
    error::DecryptError,
    ledger::StoredMessage,
    signer::TypedDataSigner,
};

/// Protocol-level default validity window for authorization grants, in days.
pub const DEFAULT_VALIDITY_DAYS: u64 = 10;

/// The authorized decryption adapter.
///
/// Issues one authorization grant per decryption call. The oracle's
/// interface supports batching multiple handle/scope pairs under one grant;
/// that is an optimization, not a correctness requirement, and this adapter
/// does not use it.
pub struct AuthorizedDecryptor<O, S, E> {
    oracle: O,
    signer: S,
    env: E,
    scope: Address,
    validity_days: u64,
}

impl<O, S, E> AuthorizedDecryptor<O, S, E>
where
    O: CustodyOracle,
    S: TypedDataSigner,
    E: Environment,
{
    /// Create an adapter scoped to the ledger contract at `scope`, with the
    /// default 10-day grant validity window.
    pub fn new(oracle: O, signer: S, env: E, scope: Address) -> Self {
        Self { oracle, signer, env, scope, validity_days: DEFAULT_VALIDITY_DAYS }
    }

    /// Override the grant validity window.
    #[must_use]
    pub fn with_validity_days(mut self, days: u64) -> Self {
        self.validity_days = days;
        self
    }

    /// Recover the ephemeral secret behind `handle` via a signed grant.
    ///
    /// # Errors
    ///
    /// - `Signer`: no signing identity present
    /// - `Custody`: oracle unavailable (transient), grant expired, or grant
    ///   rejected
    /// - `CustodyResponseInvalid`: the oracle's cleartext does not decode to
    ///   an address-shaped secret
    pub async fn recover_secret(&self, handle: Handle) -> Result<EphemeralSecret, DecryptError> {
        let keypair = self.oracle.mint_keypair().await?;

        let issued_at = self.env.wall_clock_secs().to_string();
        let validity_days = self.validity_days.to_string();
        let scopes = [self.scope];

        let typed_data = self.oracle.authorization_message(
            &keypair.public_key,
            &scopes,
            &issued_at,
            &validity_days,
        );

        tracing::debug!(
            "requesting grant signature for handle {handle}, issued_at={issued_at}, \
             validity_days={validity_days}"
        );
        let signature = self.signer.sign_typed_data(&typed_data).await?;

        let pairs = [HandleScope { handle, scope: self.scope }];
        let mut cleartexts = self
            .oracle
            .user_decrypt(UserDecryptRequest {
                pairs: &pairs,
                private_key: &keypair.private_key,
                public_key: &keypair.public_key,
                signature: signature.without_prefix(),
                scopes: &scopes,
                requester: self.signer.address(),
                issued_at: &issued_at,
                validity_days: &validity_days,
            })
            .await?;

        let value = cleartexts.remove(&handle).ok_or_else(|| {
            DecryptError::CustodyResponseInvalid(
                "oracle response is missing the requested handle".into(),
            )
        })?;

        let entropy: [u8; ADDRESS_SIZE] = value.as_slice().try_into().map_err(|_| {
            DecryptError::CustodyResponseInvalid(format!(
                "cleartext is {} bytes, expected {ADDRESS_SIZE}",
                value.len()
            ))
        })?;

        tracing::debug!("recovered ephemeral secret for handle {handle}");
        Ok(EphemeralSecret::from_entropy(entropy))
    }

    /// Decrypt one message: textual ciphertext plus textual handle, as read
    /// from the ledger.
    ///
    /// Both inputs are validated locally before any network call; malformed
    /// input is never retried.
    ///
    /// # Errors
    ///
    /// - `InvalidHandle`: `handle` is not `0x` + 64 hex characters
    /// - `Envelope`: the ciphertext is not a well-formed `v1` envelope, or
    ///   (after secret recovery) its authentication tag does not verify
    /// - everything `recover_secret` can fail with
    pub async fn decrypt_message(
        &self,
        ciphertext: &str,
        handle: &str,
    ) -> Result<Vec<u8>, DecryptError> {
        let handle: Handle = handle.parse()?;
        let envelope = Envelope::decode(ciphertext)?;

        let secret = self.recover_secret(handle).await?;
        Ok(open(&envelope, &secret)?)
    }

    /// Decrypt a stored inbox entry.
    pub async fn decrypt_entry(&self, entry: &StoredMessage) -> Result<Vec<u8>, DecryptError> {
        self.decrypt_message(&entry.ciphertext, &entry.handle).await
    }
}
