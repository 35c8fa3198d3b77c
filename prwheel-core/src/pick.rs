//! Uniform reviewer draws
//!
//! The engines never call a global random source directly; they draw
//! through a [`Picker`] so tests can seed the generator and assert on
//! deterministic outcomes.

use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Process-wide uniform draw source.
///
/// Wraps a seedable generator behind a mutex so one instance can be shared
/// across concurrent request handlers. No ordering is guaranteed across
/// calls.
pub struct Picker {
    rng: Mutex<StdRng>,
}

impl Picker {
    /// Picker seeded from OS entropy, for production use
    pub fn from_entropy() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Picker with a fixed seed, for deterministic tests
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Draw one element uniformly from `pool`, or `None` if it is empty.
    pub fn one<T: Clone>(&self, pool: &[T]) -> Option<T> {
        let mut rng = self.rng.lock().expect("picker lock poisoned");
        pool.choose(&mut *rng).cloned()
    }

    /// Draw up to `amount` distinct elements uniformly without replacement.
    ///
    /// Returns the whole pool (in unspecified order) when it has `amount`
    /// or fewer elements.
    pub fn up_to<T: Clone>(&self, pool: &[T], amount: usize) -> Vec<T> {
        let mut rng = self.rng.lock().expect("picker lock poisoned");
        pool.choose_multiple(&mut *rng, amount).cloned().collect()
    }
}

impl Default for Picker {
    fn default() -> Self {
        Self::from_entropy()
    }
}
