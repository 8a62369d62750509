//! Deterministic seed hierarchy.
//!
//! A caller-supplied master seed is expanded into per-(purpose, key) sub-seeds
//! via BLAKE3. Derivation is hash-based rather than sequential, so the sub-seed
//! for "SPY" does not depend on which other symbols were derived before it.

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Deterministic seed hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedHierarchy {
    master_seed: u64,
}

impl SeedHierarchy {
    pub fn new(master_seed: u64) -> Self {
        Self { master_seed }
    }

    pub fn master_seed(&self) -> u64 {
        self.master_seed
    }

    /// Derive a sub-seed for `(purpose, key)`, e.g. `("benchmark", "SPY")`.
    pub fn sub_seed(&self, purpose: &str, key: &str) -> u64 {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&self.master_seed.to_le_bytes());
        // Length-prefix the purpose so ("ab", "c") and ("a", "bc") differ.
        hasher.update(&(purpose.len() as u64).to_le_bytes());
        hasher.update(purpose.as_bytes());
        hasher.update(key.as_bytes());
        let hash = hasher.finalize();
        let mut head = [0u8; 8];
        head.copy_from_slice(&hash.as_bytes()[..8]);
        u64::from_le_bytes(head)
    }

    /// A seeded `StdRng` for `(purpose, key)`.
    pub fn rng_for(&self, purpose: &str, key: &str) -> StdRng {
        StdRng::seed_from_u64(self.sub_seed(purpose, key))
    }
}
