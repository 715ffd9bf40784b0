//! Deterministic lag-target jitter.
//!
//! The lagged index adds a small offset to its target so it never mirrors
//! the fast index exactly. The offset is a pure function of (region id,
//! tick index) so identical runs stay byte-identical; there is no global
//! RNG anywhere in the engine.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::hash::{Hash, Hasher};

/// Stable 64-bit hash of a region id.
///
/// `DefaultHasher::new()` uses fixed keys, so this is deterministic across
/// runs of the same binary.
pub fn region_seed(region_id: &str) -> u64 {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    region_id.hash(&mut hasher);
    hasher.finish()
}

/// Jitter in `[-magnitude, magnitude]` for a region at a tick.
pub fn lag_jitter(region_seed: u64, tick: u64, magnitude: f64) -> f64 {
    if magnitude <= 0.0 {
        return 0.0;
    }
    let seed = region_seed ^ tick.wrapping_mul(0x9E37_79B9_7F4A_7C15);
    let mut rng = SmallRng::seed_from_u64(seed);
    rng.gen_range(-magnitude..=magnitude)
}
