//! Sender pipeline.
//!
//! One send: generate secret → seal envelope → wrap secret into a handle →
//! store ciphertext and handle on the ledger. The secret never touches the
//! ledger in plaintext; it is returned to the caller as a receipt and then
//! forgotten by the core.

use hushlink_crypto::{Address, EphemeralSecret, NONCE_SIZE, seal};

use crate::{
    custody::CustodyOracle, env::Environment, error::SendError, ledger::MessageLedger,
    secret::generate_secret, wrap::wrap_secret,
};

/// Receipt for a stored message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendReceipt {
    /// Index assigned by the ledger in the recipient's inbox.
    pub index: u64,
    /// The single-use secret the message was sealed under. Surfaced so the
    /// sender's own UI can display it; outside the core's guarantee once
    /// returned.
    pub ephemeral_secret: EphemeralSecret,
}

/// The sender pipeline, bound to one submitting identity and one ledger
/// contract scope.
///
/// Holds no per-message state; concurrent sends are independent attempts.
pub struct Outbox<O, L, E> {
    oracle: O,
    ledger: L,
    env: E,
    sender: Address,
    scope: Address,
}

impl<O, L, E> Outbox<O, L, E>
where
    O: CustodyOracle,
    L: MessageLedger,
    E: Environment,
{
    /// Create an outbox for `sender`, targeting the ledger contract at
    /// `scope`.
    pub fn new(oracle: O, ledger: L, env: E, sender: Address, scope: Address) -> Self {
        Self { oracle, ledger, env, sender, scope }
    }

    /// Encrypt `plaintext` for `recipient` and store it on the ledger.
    ///
    /// # Errors
    ///
    /// - `Custody`: the secret could not be wrapped (transient if the
    ///   service was unreachable)
    /// - `Ledger`: the store was rejected (zero recipient, unsupported
    ///   deployment) or the ledger was unreachable (transient)
    pub async fn send(&self, recipient: Address, plaintext: &[u8]) -> Result<SendReceipt, SendError> {
        let secret = generate_secret(&self.env);

        let mut nonce = [0u8; NONCE_SIZE];
        self.env.random_bytes(&mut nonce);
        let envelope = seal(plaintext, &secret, nonce);

        let (handle, proof) = wrap_secret(&self.oracle, &secret, self.sender, self.scope).await?;

        let index = self
            .ledger
            .send_message(recipient, &envelope.encode(), handle, &proof)
            .await?;

        tracing::debug!("stored message for {recipient} at index {index}");
        Ok(SendReceipt { index, ephemeral_secret: secret })
    }
}
