//! Seeded pseudo-random stream.
//!
//! Every stochastic choice of a run draws from one [`SeedStream`], so a run
//! is fully reproduced by its seed. The stream is a ChaCha8 generator seeded
//! with `seed_from_u64`; it is owned by a single run and passed by `&mut`.
//! Parallel stages never draw from it.

use std::f32::consts::TAU;

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Deterministic random stream derived from a single seed.
#[derive(Debug, Clone)]
pub struct SeedStream {
    seed: u64,
    rng: ChaCha8Rng,
}

impl SeedStream {
    /// Create a stream from an explicit seed, or from OS entropy when `None`.
    ///
    /// The resolved seed is available through [`SeedStream::seed`] so a
    /// caller can report it and reproduce the run later.
    pub fn new(seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or_else(rand::random::<u64>);
        Self {
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// The seed this stream was created from.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform float in `[lo, hi)`. Returns `lo` for an empty range.
    pub fn range_f32(&mut self, lo: f32, hi: f32) -> f32 {
        if hi <= lo {
            return lo;
        }
        self.rng.gen_range(lo..hi)
    }

    /// Uniform integer in `[lo, hi]`. Returns `lo` when `hi < lo`.
    pub fn range_usize(&mut self, lo: usize, hi: usize) -> usize {
        if hi <= lo {
            return lo;
        }
        self.rng.gen_range(lo..=hi)
    }

    /// Uniform index in `[0, len)`. `len` must be non-zero.
    pub fn index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0);
        if len <= 1 {
            return 0;
        }
        self.rng.gen_range(0..len)
    }

    /// Uniform angle in `[0, 2π)`.
    pub fn angle(&mut self) -> f32 {
        self.range_f32(0.0, TAU)
    }

    /// True with probability `p`.
    pub fn chance(&mut self, p: f64) -> bool {
        self.rng.gen_bool(p.clamp(0.0, 1.0))
    }

    /// Shuffle a slice in place.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.rng);
    }
}
