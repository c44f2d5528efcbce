//! Explicit random streams for Monte Carlo draws.
//!
//! A study owns one [`RandomStream`]. Every simulator or evaluator call takes a
//! fresh call seed from it, and each hour of that call draws from its own
//! [`StdRng`] derived from (call seed, hour). Hours can therefore run on any
//! rayon worker in any order and still produce the same numbers.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Run-level random source threaded through every simulation call.
#[derive(Debug, Clone)]
pub struct RandomStream {
    rng: StdRng,
    seed: Option<u64>,
}

impl RandomStream {
    /// Reproducible stream.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed: Some(seed),
        }
    }

    /// Non-reproducible stream seeded from the OS.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            seed: None,
        }
    }

    pub fn new(seed: Option<u64>) -> Self {
        seed.map(Self::seeded).unwrap_or_else(Self::from_entropy)
    }

    /// Seed the stream was created with, if any.
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Seed for one simulator/evaluator call.
    pub fn next_call_seed(&mut self) -> u64 {
        self.rng.gen()
    }
}

/// Independent generator for one hour of one call.
pub(crate) fn hour_rng(call_seed: u64, hour: usize) -> StdRng {
    StdRng::seed_from_u64(splitmix64(call_seed ^ splitmix64(hour as u64)))
}

// SplitMix64 finalizer; spreads nearby (seed, hour) pairs across the seed space.
fn splitmix64(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
