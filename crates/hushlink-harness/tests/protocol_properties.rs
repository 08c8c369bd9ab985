//! Property-based tests for the full send/receive pipeline
//!
//! Drives seal + wrap + store + authorized decrypt over the deterministic
//! doubles with arbitrary plaintexts and RNG seeds:
//!
//! 1. **Round-trip**: whatever the sender stores, the recipient's signed
//!    grant recovers, byte for byte
//! 2. **Freshness**: a burst of sends never repeats an ephemeral secret or
//!    an encrypted key handle

#![allow(clippy::unwrap_used)]

use std::collections::HashSet;

use hushlink_core::{ADDRESS_SIZE, Address, AuthorizedDecryptor, MessageLedger, Outbox};
use hushlink_harness::{InMemoryLedger, MockCustodyOracle, StaticSigner, TestEnv};
use proptest::prelude::*;

fn addr(fill: u8) -> Address {
    Address::from_bytes([fill; ADDRESS_SIZE])
}

fn block_on<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(future)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn any_plaintext_survives_the_full_pipeline(
        seed in any::<u64>(),
        plaintext in proptest::collection::vec(any::<u8>(), 0..1024),
    ) {
        let recovered = block_on(async {
            let (alice, bob, scope) = (addr(1), addr(2), addr(0xcc));
            let env = TestEnv::new(seed);
            let oracle = MockCustodyOracle::new(env.clone());
            let ledger = InMemoryLedger::new(env.clone(), alice);

            let outbox =
                Outbox::new(oracle.clone(), ledger.clone(), env.clone(), alice, scope);
            let index = outbox.send(bob, &plaintext).await.unwrap().index;

            let stored = ledger.message(bob, index).await.unwrap();
            let decryptor =
                AuthorizedDecryptor::new(oracle, StaticSigner::new(bob), env, scope);
            decryptor.decrypt_entry(&stored).await.unwrap()
        });

        prop_assert_eq!(recovered, plaintext);
    }

    #[test]
    fn bursts_never_reuse_secrets_or_handles(
        seed in any::<u64>(),
        count in 2usize..8,
    ) {
        let (secrets, handles) = block_on(async {
            let (alice, bob, scope) = (addr(1), addr(2), addr(0xcc));
            let env = TestEnv::new(seed);
            let oracle = MockCustodyOracle::new(env.clone());
            let ledger = InMemoryLedger::new(env.clone(), alice);
            let outbox = Outbox::new(oracle, ledger.clone(), env, alice, scope);

            let mut secrets = HashSet::new();
            let mut handles = HashSet::new();
            for _ in 0..count {
                let receipt = outbox.send(bob, b"burst").await.unwrap();
                secrets.insert(receipt.ephemeral_secret);

                let stored = ledger.message(bob, receipt.index).await.unwrap();
                handles.insert(stored.handle);
            }
            (secrets, handles)
        });

        prop_assert_eq!(secrets.len(), count);
        prop_assert_eq!(handles.len(), count);
    }
}
