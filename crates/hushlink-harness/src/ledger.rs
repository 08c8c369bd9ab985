//! In-memory message ledger.
//!
//! Append-only per-recipient inboxes with the same atomicity contract as
//! the real ledger: a message's index is never readable before the inbox
//! count reflects it (both live under one lock here).

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use hushlink_core::{Address, Environment, Handle, LedgerError, MessageLedger, StoredMessage};

use crate::env::TestEnv;

/// A recorded `MessageSent` event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageSentEvent {
    /// Submitting account.
    pub sender: Address,
    /// Recipient inbox the message landed in.
    pub recipient: Address,
    /// Index assigned within that inbox.
    pub index: u64,
}

#[derive(Default)]
struct LedgerState {
    inboxes: HashMap<Address, Vec<StoredMessage>>,
    events: Vec<MessageSentEvent>,
    offline: bool,
    custody_enabled: bool,
}

/// In-memory ledger double.
///
/// A handle is bound to one submitting account, the way a real client is
/// bound to its connected wallet; [`InMemoryLedger::connect_as`] yields a
/// handle for another account sharing the same state.
#[derive(Clone)]
pub struct InMemoryLedger {
    state: Arc<Mutex<LedgerState>>,
    env: TestEnv,
    submitter: Address,
}

impl InMemoryLedger {
    /// Create a ledger with the custody scheme enabled, connected as
    /// `submitter`.
    pub fn new(env: TestEnv, submitter: Address) -> Self {
        let state = LedgerState { custody_enabled: true, ..LedgerState::default() };
        Self { state: Arc::new(Mutex::new(state)), env, submitter }
    }

    /// Create a deployment without the custody scheme; every store is
    /// rejected with `CustodyUnsupported`.
    pub fn without_custody(env: TestEnv, submitter: Address) -> Self {
        Self { state: Arc::new(Mutex::new(LedgerState::default())), env, submitter }
    }

    /// A handle to the same ledger state, submitting as a different
    /// account.
    #[must_use]
    pub fn connect_as(&self, submitter: Address) -> Self {
        Self { state: Arc::clone(&self.state), env: self.env.clone(), submitter }
    }

    /// Simulate a transport outage (or recovery).
    pub fn set_offline(&self, offline: bool) {
        self.lock().offline = offline;
    }

    /// All `MessageSent` events recorded so far, in emission order.
    pub fn events(&self) -> Vec<MessageSentEvent> {
        self.lock().events.clone()
    }

    #[allow(clippy::unwrap_used)]
    fn lock(&self) -> std::sync::MutexGuard<'_, LedgerState> {
        // Lock poisoning only happens if a test already panicked.
        self.state.lock().unwrap()
    }
}

#[async_trait]
impl MessageLedger for InMemoryLedger {
    async fn send_message(
        &self,
        recipient: Address,
        ciphertext: &str,
        handle: Handle,
        _proof: &[u8],
    ) -> Result<u64, LedgerError> {
        let timestamp = self.env.wall_clock_secs();
        let mut state = self.lock();

        if state.offline {
            return Err(LedgerError::Unavailable("ledger transport offline".into()));
        }
        if !state.custody_enabled {
            return Err(LedgerError::CustodyUnsupported);
        }
        if recipient.is_zero() {
            return Err(LedgerError::InvalidRecipient);
        }

        let inbox = state.inboxes.entry(recipient).or_default();
        let index = inbox.len() as u64;
        inbox.push(StoredMessage {
            sender: self.submitter,
            timestamp,
            ciphertext: ciphertext.to_string(),
            handle: handle.to_hex(),
        });
        state.events.push(MessageSentEvent { sender: self.submitter, recipient, index });

        tracing::debug!("stored message {index} for {recipient}");
        Ok(index)
    }

    async fn inbox_count(&self, user: Address) -> Result<u64, LedgerError> {
        let state = self.lock();
        if state.offline {
            return Err(LedgerError::Unavailable("ledger transport offline".into()));
        }
        Ok(state.inboxes.get(&user).map_or(0, |inbox| inbox.len() as u64))
    }

    async fn message(&self, user: Address, index: u64) -> Result<StoredMessage, LedgerError> {
        let state = self.lock();
        if state.offline {
            return Err(LedgerError::Unavailable("ledger transport offline".into()));
        }

        let inbox = state.inboxes.get(&user);
        let count = inbox.map_or(0, |i| i.len() as u64);
        inbox
            .and_then(|i| i.get(index as usize))
            .cloned()
            .ok_or(LedgerError::InvalidIndex { index, count })
    }
}
