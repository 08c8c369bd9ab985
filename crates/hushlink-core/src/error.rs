//! Error types for the protocol core.
//!
//! One enum per pipeline (send, decrypt), with each variant mapped to
//! exactly one class of the taxonomy: malformed input (rejected locally,
//! never retried), authentication failure (terminal, cause-free),
//! service unavailability (transient, caller retries), authorization
//! failure (terminal, fresh grant required), and invariant violations
//! (defects, surfaced verbatim).

use hushlink_crypto::{EnvelopeError, HandleError};
use thiserror::Error;

use crate::{custody::CustodyError, ledger::LedgerError, signer::SignerError};

/// Errors from the send pipeline.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SendError {
    /// Wrapping the ephemeral secret failed.
    #[error(transparent)]
    Custody(#[from] CustodyError),

    /// Storing the message on the ledger failed.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

impl SendError {
    /// Returns true if this error is transient and may succeed on retry.
    ///
    /// The core performs no silent retries itself; retry policy belongs to
    /// the caller.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Custody(e) => e.is_transient(),
            Self::Ledger(e) => e.is_transient(),
        }
    }
}

/// Errors from the authorized decryption pipeline.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecryptError {
    /// The encrypted key handle is not 32-byte-hex-shaped. Rejected locally
    /// before any network call.
    #[error("invalid encrypted key handle")]
    InvalidHandle,

    /// The signing identity was missing or declined.
    #[error(transparent)]
    Signer(#[from] SignerError),

    /// The custody oracle failed or rejected the grant.
    #[error(transparent)]
    Custody(#[from] CustodyError),

    /// The oracle returned a value that does not decode to an
    /// address-shaped secret. A defect in the custody layer, surfaced
    /// verbatim, never masked.
    #[error("custody response invalid: {0}")]
    CustodyResponseInvalid(String),

    /// Envelope parsing or decryption failed. Codec errors propagate
    /// unchanged; the adapter does not reinterpret them.
    #[error(transparent)]
    Envelope(#[from] EnvelopeError),
}

impl DecryptError {
    /// Returns true if this error is transient and may succeed on retry.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Custody(e) => e.is_transient(),
            Self::InvalidHandle
            | Self::Signer(_)
            | Self::CustodyResponseInvalid(_)
            | Self::Envelope(_) => false,
        }
    }
}

impl From<HandleError> for DecryptError {
    fn from(_: HandleError) -> Self {
        Self::InvalidHandle
    }
}
