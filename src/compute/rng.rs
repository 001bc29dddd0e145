//! Seedable random stream for map generation.

use rand::distributions::{Bernoulli, Distribution};
use rand::prelude::*;

use super::Coord;

/// Random number generator wrapper passed explicitly through the pipeline.
pub struct MapRng {
    rng: StdRng,
}

impl MapRng {
    /// Create from seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Create with random seed.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Draw `amount` distinct coordinates uniformly from the rectangle
    /// `[row_start, row_start + rows) x [col_start, col_start + cols)`.
    ///
    /// # Panics
    /// If `amount > rows * cols`.
    pub fn distinct_coords(
        &mut self,
        (row_start, rows): (usize, usize),
        (col_start, cols): (usize, usize),
        amount: usize,
    ) -> Vec<Coord> {
        rand::seq::index::sample(&mut self.rng, rows * cols, amount)
            .into_iter()
            .map(|i| Coord::new(row_start + i / cols, col_start + i % cols))
            .collect()
    }

    /// Run up to `trials` Bernoulli trials, stopping at the first success.
    pub fn any_success(&mut self, trial: &Bernoulli, trials: usize) -> bool {
        (0..trials).any(|_| trial.sample(&mut self.rng))
    }
}
