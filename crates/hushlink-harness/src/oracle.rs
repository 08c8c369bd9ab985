//! Mock key-custody oracle.
//!
//! Keeps wrapped secrets in a map keyed by opaque handles and enforces the
//! real oracle's request contract: proof-of-possession signature over the
//! typed authorization message, scope binding of every handle, and the
//! grant validity window against the shared virtual clock. No homomorphic
//! encryption happens here; the custody scheme itself is out of scope.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use hushlink_core::{
    ADDRESS_SIZE, Address, CustodyError, CustodyOracle, EncryptedInput, EncryptedInputBuilder,
    Environment, EphemeralKeypair, Handle, TypedData, TypedDataDomain, UserDecryptRequest,
    UserDecryptRequestVerification,
};
use sha3::{Digest, Keccak256};

use crate::{env::TestEnv, signer::mock_grant_signature};

/// Chain ID the mock deployment signs for (the local hardhat default).
const MOCK_CHAIN_ID: u64 = 31_337;

struct WrappedEntry {
    secret: [u8; ADDRESS_SIZE],
    scope: Address,
}

#[derive(Default)]
struct OracleState {
    wrapped: HashMap<Handle, WrappedEntry>,
    counter: u64,
    offline: bool,
}

/// Mock custody oracle sharing the harness virtual clock.
#[derive(Clone)]
pub struct MockCustodyOracle {
    state: Arc<Mutex<OracleState>>,
    env: TestEnv,
}

impl MockCustodyOracle {
    /// Create an oracle whose validity-window checks read `env`'s clock.
    pub fn new(env: TestEnv) -> Self {
        Self { state: Arc::new(Mutex::new(OracleState::default())), env }
    }

    /// Simulate a service outage (or recovery).
    pub fn set_offline(&self, offline: bool) {
        self.lock().offline = offline;
    }

    /// Number of secrets currently held in custody.
    pub fn wrapped_count(&self) -> usize {
        self.lock().wrapped.len()
    }

    #[allow(clippy::unwrap_used)]
    fn lock(&self) -> std::sync::MutexGuard<'_, OracleState> {
        // Lock poisoning only happens if a test already panicked.
        self.state.lock().unwrap()
    }
}

struct MockInputBuilder {
    state: Arc<Mutex<OracleState>>,
    scope: Address,
    submitter: Address,
    fields: Vec<Address>,
}

#[async_trait]
impl EncryptedInputBuilder for MockInputBuilder {
    fn add_address(&mut self, value: Address) {
        self.fields.push(value);
    }

    #[allow(clippy::unwrap_used)]
    async fn finalize(self: Box<Self>) -> Result<EncryptedInput, CustodyError> {
        let mut state = self.state.lock().unwrap();
        if state.offline {
            return Err(CustodyError::Unavailable("custody service offline".into()));
        }

        let mut handles = Vec::with_capacity(self.fields.len());
        for field in &self.fields {
            // A counter in the preimage keeps handles unique even when the
            // same value is wrapped twice for the same scope.
            state.counter += 1;
            let mut hasher = Keccak256::new();
            hasher.update(b"hushlink-mock-handle");
            hasher.update(field.as_bytes());
            hasher.update(self.scope.as_bytes());
            hasher.update(self.submitter.as_bytes());
            hasher.update(state.counter.to_be_bytes());
            let handle = Handle::from_bytes(hasher.finalize().into());

            state.wrapped.insert(
                handle,
                WrappedEntry { secret: *field.as_bytes(), scope: self.scope },
            );
            handles.push(handle);
        }

        let mut hasher = Keccak256::new();
        hasher.update(b"hushlink-mock-proof");
        for handle in &handles {
            hasher.update(handle.as_bytes());
        }
        hasher.update(self.scope.as_bytes());
        hasher.update(self.submitter.as_bytes());
        let proof = hasher.finalize().to_vec();

        Ok(EncryptedInput { handles, proof })
    }
}

#[async_trait]
impl CustodyOracle for MockCustodyOracle {
    async fn mint_keypair(&self) -> Result<EphemeralKeypair, CustodyError> {
        let mut public_key = vec![0u8; 32];
        let mut private_key = vec![0u8; 32];
        self.env.random_bytes(&mut public_key);
        self.env.random_bytes(&mut private_key);
        Ok(EphemeralKeypair { public_key, private_key })
    }

    fn authorization_message(
        &self,
        public_key: &[u8],
        scopes: &[Address],
        issued_at: &str,
        validity_days: &str,
    ) -> TypedData {
        let verifying_contract =
            scopes.first().copied().unwrap_or(Address::ZERO).to_checksummed();
        TypedData {
            domain: TypedDataDomain {
                name: "Decryption".into(),
                version: "1".into(),
                chain_id: MOCK_CHAIN_ID,
                verifying_contract,
            },
            primary_type: "UserDecryptRequestVerification".into(),
            message: UserDecryptRequestVerification {
                public_key: format!("0x{}", hex::encode(public_key)),
                contract_addresses: scopes.iter().map(Address::to_checksummed).collect(),
                start_timestamp: issued_at.to_string(),
                duration_days: validity_days.to_string(),
            },
        }
    }

    async fn user_decrypt(
        &self,
        request: UserDecryptRequest<'_>,
    ) -> Result<HashMap<Handle, Vec<u8>>, CustodyError> {
        let now = self.env.wall_clock_secs();
        let state = self.lock();

        if state.offline {
            return Err(CustodyError::OracleUnavailable("custody service offline".into()));
        }

        // The grant signature must bind exactly the submitted fields.
        let typed_data = self.authorization_message(
            request.public_key,
            request.scopes,
            request.issued_at,
            request.validity_days,
        );
        let expected = mock_grant_signature(&typed_data, request.requester);
        let expected = expected.strip_prefix("0x").unwrap_or(&expected);
        if request.signature != expected {
            return Err(CustodyError::AuthorizationRejected(
                "grant signature verification failed".into(),
            ));
        }

        let issued_at: u64 = request.issued_at.parse().map_err(|_| {
            CustodyError::AuthorizationRejected("issued_at is not a decimal timestamp".into())
        })?;
        let validity_days: u64 = request.validity_days.parse().map_err(|_| {
            CustodyError::AuthorizationRejected("validity_days is not a decimal count".into())
        })?;
        let expiry = issued_at.saturating_add(validity_days.saturating_mul(86_400));
        if now > expiry {
            return Err(CustodyError::AuthorizationExpired);
        }

        let mut cleartexts = HashMap::with_capacity(request.pairs.len());
        for pair in request.pairs {
            let entry = state.wrapped.get(&pair.handle).ok_or_else(|| {
                CustodyError::AuthorizationRejected("unknown handle".into())
            })?;
            if entry.scope != pair.scope || !request.scopes.contains(&pair.scope) {
                return Err(CustodyError::AuthorizationRejected(
                    "grant scope does not cover handle".into(),
                ));
            }
            cleartexts.insert(pair.handle, entry.secret.to_vec());
        }

        tracing::debug!("released {} cleartext(s) to {}", cleartexts.len(), request.requester);
        Ok(cleartexts)
    }

    async fn encrypted_input(
        &self,
        scope: Address,
        submitter: Address,
    ) -> Result<Box<dyn EncryptedInputBuilder>, CustodyError> {
        if self.lock().offline {
            return Err(CustodyError::Unavailable("custody service offline".into()));
        }
        Ok(Box::new(MockInputBuilder {
            state: Arc::clone(&self.state),
            scope,
            submitter,
            fields: Vec::new(),
        }))
    }
}
