use fastrand::Rng;
use std::cell::RefCell;

/// Seedable random source shared by the level generators
#[derive(Debug)]
pub struct Random {
    rng: RefCell<Rng>,
}

impl Random {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: RefCell::new(Rng::with_seed(seed)),
        }
    }

    // Get random number in range [lower, upper). Upper is not inclusive
    pub fn range_usize(&self, lower: usize, upper: usize) -> usize {
        self.rng.borrow_mut().usize(lower..upper)
    }
}
