use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Random source used by every lottery operation.
pub type LotteryRng = ChaCha8Rng;

/// Seeded generator when a seed is given, otherwise one drawn from OS entropy.
pub fn rng_from_seed(seed: Option<u64>) -> LotteryRng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    }
}
