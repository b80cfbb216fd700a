use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::{Mutex, PoisonError};

/// Source of the random draws behind latency and failure injection.
pub trait Entropy: Send + Sync {
    /// A uniform draw in `[0, 1)`.
    fn next_unit(&self) -> f64;
}

/// Production entropy backed by a shared `StdRng`.
pub struct RngEntropy {
    rng: Mutex<StdRng>,
}

impl RngEntropy {
    /// Seeded from the operating system.
    pub fn from_entropy() -> Self {
        Self { rng: Mutex::new(StdRng::from_entropy()) }
    }

    /// Reproducible stream for a given seed.
    pub fn seeded(seed: u64) -> Self {
        Self { rng: Mutex::new(StdRng::seed_from_u64(seed)) }
    }
}

impl Entropy for RngEntropy {
    fn next_unit(&self) -> f64 {
        // A panic while holding the lock cannot leave an StdRng half-updated.
        self.rng.lock().unwrap_or_else(PoisonError::into_inner).gen::<f64>()
    }
}
