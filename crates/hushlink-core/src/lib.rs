//! HushLink Protocol Core
//!
//! The hybrid confidentiality protocol behind HushLink private messaging:
//! messages are sealed locally under a key derived from a single-use,
//! address-shaped secret, and that secret is distributed to exactly the
//! intended recipient through a homomorphic key-custody oracle gated by
//! signed, time-bounded authorization grants.
//!
//! # Architecture
//!
//! The core is Sans-IO at its seams: the ledger, the custody oracle, and
//! the signing identity are injected capability traits
//! ([`MessageLedger`], [`CustodyOracle`], [`TypedDataSigner`]), and time and
//! randomness come from an [`Environment`]. Protocol logic performs no
//! retries and holds no cross-attempt state; concurrent send and decrypt
//! attempts are independent tasks.
//!
//! # Components
//!
//! - [`Outbox`]: the sender pipeline (generate, seal, wrap, store)
//! - [`wrap_secret`]: the key-custody encryption adapter
//! - [`AuthorizedDecryptor`]: the authorized decryption adapter
//! - [`generate_secret`]: the ephemeral secret generator
//!
//! The envelope codec itself lives in [`hushlink_crypto`] and is re-exported
//! here.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod custody;
pub mod env;
mod error;
pub mod ledger;
mod outbox;
mod secret;
pub mod signer;

mod decrypt;
mod wrap;

pub use custody::{
    CustodyError, CustodyOracle, EncryptedInput, EncryptedInputBuilder, EphemeralKeypair,
    HandleScope, TypedData, TypedDataDomain, UserDecryptRequest, UserDecryptRequestVerification,
};
pub use decrypt::{AuthorizedDecryptor, DEFAULT_VALIDITY_DAYS};
pub use env::{Environment, SystemEnv};
pub use error::{DecryptError, SendError};
pub use hushlink_crypto::{
    ADDRESS_SIZE, Address, AddressError, Envelope, EnvelopeError, EphemeralSecret, HANDLE_SIZE,
    Handle, HandleError,
};
pub use ledger::{LedgerError, MessageLedger, StoredMessage};
pub use outbox::{Outbox, SendReceipt};
pub use secret::generate_secret;
pub use signer::{Signature, SignerError, TypedDataSigner};
pub use wrap::wrap_secret;
