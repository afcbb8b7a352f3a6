use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Generator every flock draws from unless the host supplies its own.
pub type FlockRng = ChaCha8Rng;

/// Create a deterministic RNG from a seed.
pub fn create_rng(seed: u64) -> FlockRng {
    FlockRng::seed_from_u64(seed)
}

/// Create an RNG seeded from the operating system, for runs that do not need
/// to be replayed.
#[cfg(feature = "std")]
pub fn entropy_rng() -> FlockRng {
    FlockRng::from_entropy()
}
