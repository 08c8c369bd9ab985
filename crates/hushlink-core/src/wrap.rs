//! Key-custody encryption adapter.
//!
//! Wraps an ephemeral secret into an on-ledger handle plus input-validity
//! proof. Stateless: one oracle session per call, no state held between
//! calls.

use hushlink_crypto::{Address, EphemeralSecret, Handle};

use crate::custody::{CustodyError, CustodyOracle};

/// Wrap `secret` into an encrypted key handle for `scope`, submitted by
/// `submitter`.
///
/// Opens one encrypted-input session, adds the secret as the session's only
/// address-typed field, and finalizes. The returned handle and proof are
/// produced together and are meaningless individually.
///
/// # Errors
///
/// - `Unavailable`: the oracle session could not be established (transient)
/// - `EncodingRejected`: the oracle did not produce exactly one handle for
///   the one field added (a custody-layer defect, not a user-facing error)
pub async fn wrap_secret<O>(
    oracle: &O,
    secret: &EphemeralSecret,
    submitter: Address,
    scope: Address,
) -> Result<(Handle, Vec<u8>), CustodyError>
where
    O: CustodyOracle + ?Sized,
{
    let mut session = oracle.encrypted_input(scope, submitter).await?;
    session.add_address(*secret.address());
    let input = session.finalize().await?;

    let [handle] = input.handles.as_slice() else {
        return Err(CustodyError::EncodingRejected(format!(
            "expected one handle for one address field, got {}",
            input.handles.len()
        )));
    };
    let handle = *handle;

    tracing::debug!("wrapped ephemeral secret into handle {handle} for scope {scope}");
    Ok((handle, input.proof))
}
