//! HushLink Test Harness
//!
//! Deterministic doubles for every capability the protocol core consumes:
//! a virtual-clock [`TestEnv`], an append-only [`InMemoryLedger`], a
//! [`MockCustodyOracle`] that enforces scope binding, signature checks, and
//! grant validity windows, and signing doubles ([`StaticSigner`],
//! [`NoSigner`]).
//!
//! The mock oracle does NOT implement homomorphic encryption; it keeps
//! wrapped secrets in a map keyed by opaque handles and enforces the same
//! request/response contract the real oracle does. That is exactly the
//! boundary the core is tested against.
//!
//! Integration tests for the full send/receive protocol live in this
//! crate's `tests/` directory.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod env;
mod ledger;
mod oracle;
mod signer;

pub use env::TestEnv;
pub use ledger::{InMemoryLedger, MessageSentEvent};
pub use oracle::MockCustodyOracle;
pub use signer::{NoSigner, StaticSigner, mock_grant_signature};
