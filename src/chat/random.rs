//! Injectable randomness for phrase selection
//!
//! Each request draws its own generator, so concurrent requests never share
//! random state.

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Hands out a fresh generator per request
pub trait RandomSource: Send + Sync {
    fn rng(&self) -> StdRng;
}

/// OS-seeded generator for production use
#[derive(Debug, Clone, Copy, Default)]
pub struct EntropyRandom;

impl RandomSource for EntropyRandom {
    fn rng(&self) -> StdRng {
        StdRng::from_entropy()
    }
}

/// Every request gets a generator seeded identically
#[derive(Debug, Clone, Copy)]
pub struct SeededRandom(pub u64);

impl RandomSource for SeededRandom {
    fn rng(&self) -> StdRng {
        StdRng::seed_from_u64(self.0)
    }
}
