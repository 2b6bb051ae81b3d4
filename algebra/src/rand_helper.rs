use rand_chacha::{rand_core::SeedableRng, ChaChaRng};

const TEST_SEED: [u8; 32] = *b"tessera deterministic test seed!";

/// A ChaCha rng for tests. It is seeded from the OS unless the environment
/// sets `DETERMINISTIC_TEST_RNG=1`, in which case every call replays the same
/// stream. Never use it outside of tests and benches.
pub fn test_rng() -> ChaChaRng {
    #[cfg(feature = "std")]
    {
        if std::env::var("DETERMINISTIC_TEST_RNG").as_deref() != Ok("1") {
            return ChaChaRng::from_entropy();
        }
    }
    ChaChaRng::from_seed(TEST_SEED)
}
