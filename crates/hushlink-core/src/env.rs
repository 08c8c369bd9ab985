//! Environment abstraction for deterministic testing.
//!
//! Decouples protocol logic from system resources (wall-clock time,
//! randomness). Enables deterministic tests with a virtual clock and seeded
//! RNG, and production use with real system resources.

/// Abstract environment providing time and randomness.
///
/// # Safety
///
/// Implementations MUST guarantee:
///
/// - `wall_clock_secs()` never goes backwards within one execution context
/// - `random_bytes()` uses cryptographically secure entropy in production
pub trait Environment: Clone + Send + Sync + 'static {
    /// Current wall-clock time as seconds since the Unix epoch.
    ///
    /// Authorization grants carry this as their `issued_at` field, so the
    /// custody oracle compares it against its own clock; implementations
    /// should stay within ordinary clock skew of real time in production.
    fn wall_clock_secs(&self) -> u64;

    /// Fills the provided buffer with random bytes.
    ///
    /// # Invariants
    ///
    /// - Uses cryptographically secure RNG in production
    /// - Given the same RNG seed, a simulation environment produces the same
    ///   sequence of bytes
    fn random_bytes(&self, buffer: &mut [u8]);
}

/// Production environment using system time and cryptographic RNG.
///
/// # Security
///
/// The RNG uses getrandom which provides OS-level cryptographic randomness
/// (e.g., /dev/urandom on Linux, `BCryptGenRandom` on Windows). Suitable for
/// generating ephemeral secrets and AEAD nonces.
///
/// # Panics
///
/// Panics if the OS RNG fails. This is intentional - without functioning
/// cryptographic randomness every ephemeral secret and nonce would be
/// predictable, so continuing would break the confidentiality guarantee
/// outright.
#[derive(Clone, Default)]
pub struct SystemEnv;

impl SystemEnv {
    /// Create a new system environment.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Environment for SystemEnv {
    #[allow(clippy::disallowed_methods)]
    #[allow(clippy::expect_used)]
    fn wall_clock_secs(&self) -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("invariant: system clock is after Unix epoch (1970-01-01)")
            .as_secs()
    }

    #[allow(clippy::expect_used)]
    fn random_bytes(&self, buffer: &mut [u8]) {
        getrandom::fill(buffer)
            .expect("invariant: OS RNG failure is unrecoverable - cannot operate securely");
    }
}
