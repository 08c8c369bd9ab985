//! Deterministic environment: seeded RNG and a manually driven clock.

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicU64, Ordering},
};

use hushlink_core::Environment;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;

/// Default virtual clock start: 2023-11-14T22:13:20Z.
const DEFAULT_START_SECS: u64 = 1_700_000_000;

/// Simulation environment with a seeded ChaCha RNG and a virtual wall
/// clock.
///
/// Clones share the same RNG stream and clock, so an environment handed to
/// several components stays globally consistent. Time only moves when a
/// test calls [`TestEnv::advance_secs`].
#[derive(Clone)]
pub struct TestEnv {
    rng: Arc<Mutex<ChaCha20Rng>>,
    clock: Arc<AtomicU64>,
}

impl TestEnv {
    /// Create an environment from an RNG seed, starting the clock at a
    /// fixed default instant.
    pub fn new(seed: u64) -> Self {
        Self::with_clock(seed, DEFAULT_START_SECS)
    }

    /// Create an environment with an explicit clock start.
    pub fn with_clock(seed: u64, start_secs: u64) -> Self {
        Self {
            rng: Arc::new(Mutex::new(ChaCha20Rng::seed_from_u64(seed))),
            clock: Arc::new(AtomicU64::new(start_secs)),
        }
    }

    /// Move the wall clock forward.
    pub fn advance_secs(&self, secs: u64) {
        self.clock.fetch_add(secs, Ordering::SeqCst);
    }

    /// Move the wall clock forward by whole days.
    pub fn advance_days(&self, days: u64) {
        self.advance_secs(days * 86_400);
    }
}

impl Environment for TestEnv {
    fn wall_clock_secs(&self) -> u64 {
        self.clock.load(Ordering::SeqCst)
    }

    #[allow(clippy::unwrap_used)]
    fn random_bytes(&self, buffer: &mut [u8]) {
        // Lock poisoning only happens if a test already panicked.
        self.rng.lock().unwrap().fill_bytes(buffer);
    }
}
