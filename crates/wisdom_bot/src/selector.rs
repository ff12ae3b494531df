//! Uniform random choice among the candidate wisdoms.

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use std::collections::BTreeSet;
use wisdom_store::WisdomId;

/// Random source shared by the selector and the composer.
pub type RandomSource = Box<dyn RngCore + Send>;

/// Picks one wisdom id per run.
///
/// The random source is injected so a seeded generator makes selection
/// reproducible.
///
/// # Examples
///
/// ```
/// use rand::{SeedableRng, rngs::StdRng};
/// use std::collections::BTreeSet;
/// use wisdom_bot::Selector;
/// use wisdom_store::WisdomId;
///
/// let selector = Selector::new(StdRng::seed_from_u64(7));
/// let candidates: BTreeSet<WisdomId> = (1..=3).filter_map(WisdomId::new).collect();
///
/// let id = selector.select(&candidates).unwrap();
/// assert!(candidates.contains(&id));
/// assert!(selector.select(&BTreeSet::new()).is_none());
/// ```
pub struct Selector {
    rng: Mutex<RandomSource>,
}

impl Selector {
    /// Create a selector drawing from `rng`.
    pub fn new(rng: impl RngCore + Send + 'static) -> Self {
        Self {
            rng: Mutex::new(Box::new(rng)),
        }
    }

    /// Create a selector seeded from the operating system.
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    /// Choose one id uniformly at random, or `None` if there are no candidates.
    ///
    /// Whether the chosen wisdom is complete is not checked here.
    pub fn select(&self, candidates: &BTreeSet<WisdomId>) -> Option<WisdomId> {
        if candidates.is_empty() {
            return None;
        }
        let index = self.rng.lock().gen_range(0..candidates.len());
        candidates.iter().nth(index).copied()
    }
}

impl std::fmt::Debug for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Selector").finish_non_exhaustive()
    }
}
