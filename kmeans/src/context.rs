//! Engine configuration and generator seeding

use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::error::InvalidInput;

/// Seed used by [`SeedMode::deterministic`]
pub const DEFAULT_SEED: u64 = 0;

/// How the engine's generator is seeded at construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeedMode {
    /// Fixed seed, reproducible runs
    Fixed(u64),
    /// Seed drawn from the thread-local entropy source
    Entropy,
}

impl SeedMode {
    pub fn deterministic() -> Self {
        Self::Fixed(DEFAULT_SEED)
    }

    pub(crate) fn rng(&self) -> ChaCha20Rng {
        match self {
            Self::Fixed(seed) => ChaCha20Rng::seed_from_u64(*seed),
            Self::Entropy => ChaCha20Rng::from_rng(&mut rand::rng()),
        }
    }
}

/// Settings for one k-means engine. Fixed for the lifetime of the engine built from it.
#[derive(Clone, Debug)]
pub struct KMeansContext {
    pub k: usize,
    pub workers: usize,
    pub seed: SeedMode,
    /// `None` runs until the per-cluster distances stop changing.
    pub max_iterations: Option<usize>,
}

impl KMeansContext {
    /// Context for `k` clusters on every available core, seeded from entropy.
    pub fn new(k: usize) -> Self {
        Self {
            k,
            workers: rayon::current_num_threads(),
            seed: SeedMode::Entropy,
            max_iterations: None,
        }
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_seed(mut self, seed: SeedMode) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_deterministic_seed(self, deterministic: bool) -> Self {
        self.with_seed(if deterministic { SeedMode::deterministic() } else { SeedMode::Entropy })
    }

    /// Cap the number of recentering passes. Stopping on the cap leaves the model unconverged.
    pub fn with_max_iterations(mut self, max_iterations: Option<usize>) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn validate(&self) -> Result<(), InvalidInput> {
        if self.k == 0 {
            return Err(InvalidInput::ZeroClusters);
        }
        if self.workers == 0 {
            return Err(InvalidInput::ZeroWorkers);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rand::RngExt;

    use super::*;

    #[test]
    fn fixed_seed_repeats() {
        let mut a = SeedMode::Fixed(55).rng();
        let mut b = SeedMode::Fixed(55).rng();
        let xs: Vec<f64> = (0..4).map(|_| a.random_range(0.0..52.0)).collect();
        let ys: Vec<f64> = (0..4).map(|_| b.random_range(0.0..52.0)).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn builder_and_validation() {
        let context = KMeansContext::new(3)
            .with_workers(2)
            .with_deterministic_seed(true)
            .with_max_iterations(Some(10));
        assert_eq!(context.seed, SeedMode::Fixed(DEFAULT_SEED));
        assert_eq!(context.max_iterations, Some(10));
        assert!(context.validate().is_ok());

        assert_eq!(KMeansContext::new(0).validate(), Err(InvalidInput::ZeroClusters));
        assert_eq!(KMeansContext::new(2).with_workers(0).validate(), Err(InvalidInput::ZeroWorkers));
    }

    #[test]
    fn entropy_seeds_differ() {
        let mut a = SeedMode::Entropy.rng();
        let mut b = SeedMode::Entropy.rng();
        let xs: Vec<u64> = (0..4).map(|_| a.random()).collect();
        let ys: Vec<u64> = (0..4).map(|_| b.random()).collect();
        assert_ne!(xs, ys);
    }
}
