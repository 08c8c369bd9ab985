//! The ledger collaborator: the minimal surface the core consumes.
//!
//! The ledger stores one append-only inbox per recipient. The core issues a
//! single `send_message` per sent message and any number of reads; inbox
//! bookkeeping, consensus, and fees are the ledger's problem. The ledger
//! serializes stores so a message's index is readable only once the inbox
//! count reflects it.

use async_trait::async_trait;
use hushlink_crypto::{Address, Handle};
use thiserror::Error;

/// Errors from ledger operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// The recipient is the zero address.
    #[error("invalid recipient: the zero address cannot receive messages")]
    InvalidRecipient,

    /// The custody scheme is not enabled on this deployment.
    #[error("custody scheme is not supported on this deployment")]
    CustodyUnsupported,

    /// A read past the end of the recipient's inbox.
    #[error("invalid message index: {index} >= inbox count {count}")]
    InvalidIndex {
        /// The index that was requested.
        index: u64,
        /// The recipient's current inbox count.
        count: u64,
    },

    /// Transport or service failure. Retryable by the caller; the core never
    /// retries on its own.
    #[error("ledger unavailable: {0}")]
    Unavailable(String),
}

impl LedgerError {
    /// Returns true if this error is transient and may succeed on retry.
    ///
    /// Invalid recipients and out-of-range indexes are never transient -
    /// they indicate a caller bug, not a service hiccup.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}

/// One stored message, as returned by a ledger read.
///
/// `ciphertext` and `handle` come back in the ledger's raw textual forms;
/// the decryption adapter validates both before doing anything with them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredMessage {
    /// Who submitted the message.
    pub sender: Address,
    /// Ledger timestamp of the store, seconds since the Unix epoch.
    pub timestamp: u64,
    /// The envelope wire string (opaque to the ledger).
    pub ciphertext: String,
    /// The encrypted key handle, `0x`-prefixed 64-character hex.
    pub handle: String,
}

/// Capability trait for the external message ledger.
///
/// Implementations are expected to make stores atomic: the recipient's inbox
/// count must reflect a message before that message is readable at its
/// assigned index.
#[async_trait]
pub trait MessageLedger: Send + Sync {
    /// Store a message for `recipient`. Returns the assigned inbox index.
    ///
    /// # Errors
    ///
    /// - `InvalidRecipient`: `recipient` is the zero address
    /// - `CustodyUnsupported`: this deployment has no custody scheme
    /// - `Unavailable`: transport failure (transient)
    async fn send_message(
        &self,
        recipient: Address,
        ciphertext: &str,
        handle: Handle,
        proof: &[u8],
    ) -> Result<u64, LedgerError>;

    /// Number of messages stored for `user`. Zero for unknown addresses.
    async fn inbox_count(&self, user: Address) -> Result<u64, LedgerError>;

    /// Read the message at `index` in `user`'s inbox.
    ///
    /// # Errors
    ///
    /// - `InvalidIndex`: `index >= inbox_count(user)`
    /// - `Unavailable`: transport failure (transient)
    async fn message(&self, user: Address, index: u64) -> Result<StoredMessage, LedgerError>;
}
