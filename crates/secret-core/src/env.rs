//! Environment abstraction for deterministic testing.
//!
//! Decouples bundle sealing and service bookkeeping from system resources
//! (wall clock, entropy). Production uses [`SystemEnv`]; tests and the mock
//! service use [`SeededEnv`] for reproducible nonces, IDs and timestamps.

use std::{
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};

use chrono::{DateTime, TimeZone, Utc};
use rand::{RngCore, SeedableRng, rngs::OsRng};
use rand_chacha::ChaCha20Rng;

/// Abstract environment providing wall-clock time and randomness.
///
/// # Safety
///
/// Implementations MUST guarantee:
///
/// - `random_bytes()` uses cryptographically secure entropy in production
/// - `now()` is UTC
pub trait Environment: Clone + Send + Sync + 'static {
    /// Current wall-clock time.
    fn now(&self) -> DateTime<Utc>;

    /// Fills the provided buffer with random bytes.
    ///
    /// # Invariants
    ///
    /// - Given the same seed, this produces the same sequence of bytes
    fn random_bytes(&self, buffer: &mut [u8]);

    /// Generates a fixed-size random array (nonces).
    fn random_array<const N: usize>(&self) -> [u8; N] {
        let mut bytes = [0u8; N];
        self.random_bytes(&mut bytes);
        bytes
    }

    /// Generates a random `u64`.
    fn random_u64(&self) -> u64 {
        u64::from_be_bytes(self.random_array())
    }
}

/// Production environment: system clock and OS entropy.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemEnv;

impl Environment for SystemEnv {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn random_bytes(&self, buffer: &mut [u8]) {
        OsRng.fill_bytes(buffer);
    }
}

#[derive(Debug)]
struct SeededState {
    rng: ChaCha20Rng,
    now: DateTime<Utc>,
}

/// Deterministic environment: seeded ChaCha20 RNG and a manual clock.
///
/// Clones share the same RNG stream and clock.
#[derive(Debug, Clone)]
pub struct SeededEnv {
    state: Arc<Mutex<SeededState>>,
}

impl SeededEnv {
    /// Create an environment with the given seed, clock at the Unix epoch
    /// plus one day.
    pub fn with_seed(seed: u64) -> Self {
        let start = Utc.timestamp_opt(86_400, 0).single().unwrap_or_default();
        Self::with_seed_at(seed, start)
    }

    /// Create an environment with the given seed and starting time.
    pub fn with_seed_at(seed: u64, now: DateTime<Utc>) -> Self {
        let state = SeededState { rng: ChaCha20Rng::seed_from_u64(seed), now };
        Self { state: Arc::new(Mutex::new(state)) }
    }

    /// Move the clock forward.
    pub fn advance(&self, by: Duration) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if let Ok(delta) = chrono::Duration::from_std(by) {
            state.now += delta;
        }
    }
}

impl Environment for SeededEnv {
    fn now(&self) -> DateTime<Utc> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner).now
    }

    fn random_bytes(&self, buffer: &mut [u8]) {
        self.state.lock().unwrap_or_else(PoisonError::into_inner).rng.fill_bytes(buffer);
    }
}
