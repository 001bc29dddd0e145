//! Probabilistic frontier growth of island land masses.
//!
//! Seeds are scattered inside the buffered interior. Each round, every
//! frontier cell offers its unvisited cardinal neighbors a chance to become
//! land. A neighbor that already touches `k` land cells gets up to `k + 1`
//! Bernoulli trials, so growth clumps onto existing coastlines instead of
//! spreading as isotropic noise.

use rand::distributions::Bernoulli;
use serde::{Deserialize, Serialize};

use crate::schema::{ConfigError, MapConfig};

use super::{Coord, Field, MapRng};

/// Value of a land cell in the binary growth field.
pub const LAND: f32 = 1.0;

/// Summary of one growth run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GrowthReport {
    /// Rounds executed.
    pub rounds: usize,
    /// True if growth stopped because a round spawned nothing.
    pub converged: bool,
    /// Seed cells placed before the first round.
    pub seeds: usize,
    /// Land cells at the end of the run.
    pub land_cells: usize,
}

/// Result of [`GrowthSimulator::run`].
#[derive(Debug, Clone)]
pub struct GrowthOutcome {
    /// Binary land field (0 or 1 per cell).
    pub field: Field,
    pub report: GrowthReport,
}

/// Frontier growth driver. Owns its grid, frontier and visited mask.
pub struct GrowthSimulator<'a> {
    rng: &'a mut MapRng,
    field: Field,
    /// Interior rows `[rows.0, rows.1)`.
    rows: (usize, usize),
    /// Interior columns `[cols.0, cols.1)`.
    cols: (usize, usize),
    trial: Bernoulli,
    max_rounds: usize,
    frontier: Vec<Coord>,
    /// Cells already expanded as frontier.
    visited: Vec<bool>,
    visited_count: usize,
    seeds: usize,
    land_count: usize,
    round: usize,
}

impl<'a> GrowthSimulator<'a> {
    /// Validate the configuration, allocate the grid and place the seeds.
    pub fn new(config: &MapConfig, rng: &'a mut MapRng) -> Result<Self, ConfigError> {
        config.validate()?;

        let trial = Bernoulli::new(config.spawn_probability as f64)
            .map_err(|_| ConfigError::InvalidSpawnProbability(config.spawn_probability))?;

        let b = config.buffer;
        let rows = (b, config.height - b);
        let cols = (b, config.width - b);

        let mut field = Field::zeros(config.width, config.height);
        let frontier = rng.distinct_coords(
            (rows.0, rows.1 - rows.0),
            (cols.0, cols.1 - cols.0),
            config.islands,
        );
        for &seed in &frontier {
            field.set(seed.row, seed.col, LAND);
        }

        let seeds = frontier.len();
        log::debug!(
            "Placed {} island seeds in {}x{} interior",
            seeds,
            cols.1 - cols.0,
            rows.1 - rows.0
        );

        Ok(Self {
            rng,
            visited: vec![false; field.len()],
            field,
            rows,
            cols,
            trial,
            max_rounds: config.max_rounds,
            frontier,
            visited_count: 0,
            seeds,
            land_count: seeds,
            round: 0,
        })
    }

    /// Current binary field.
    pub fn field(&self) -> &Field {
        &self.field
    }

    /// Rounds executed so far.
    pub fn round(&self) -> usize {
        self.round
    }

    /// Coordinates that will be expanded next round.
    pub fn frontier(&self) -> &[Coord] {
        &self.frontier
    }

    /// Number of cells already expanded.
    pub fn visited_count(&self) -> usize {
        self.visited_count
    }

    /// Number of land cells.
    pub fn land_count(&self) -> usize {
        self.land_count
    }

    /// Check if a coordinate lies inside the buffered interior.
    #[inline]
    pub fn in_interior(&self, c: Coord) -> bool {
        (self.rows.0..self.rows.1).contains(&c.row) && (self.cols.0..self.cols.1).contains(&c.col)
    }

    /// Land cells among the interior cardinal neighbors of `c`.
    fn land_neighbors(&self, c: Coord) -> usize {
        c.cardinal()
            .filter(|&n| self.in_interior(n) && self.field.at(n) == LAND)
            .count()
    }

    /// Run one growth round. Returns whether any cell became land.
    pub fn step(&mut self) -> bool {
        let frontier = std::mem::take(&mut self.frontier);
        let mut spawned = Vec::new();

        for &cell in &frontier {
            for n in cell.cardinal() {
                if !self.in_interior(n) {
                    continue;
                }
                let idx = self.field.idx(n.row, n.col);
                // Already land: a spawn here could not change the grid.
                if self.visited[idx] || self.field.data[idx] == LAND {
                    continue;
                }

                let k = self.land_neighbors(n);
                if self.rng.any_success(&self.trial, k + 1) {
                    self.field.data[idx] = LAND;
                    spawned.push(n);
                }
            }
        }

        for cell in frontier {
            let idx = self.field.idx(cell.row, cell.col);
            if !self.visited[idx] {
                self.visited[idx] = true;
                self.visited_count += 1;
            }
        }

        self.round += 1;
        self.land_count += spawned.len();
        log::debug!(
            "Growth round {}: {} spawned, {} land",
            self.round,
            spawned.len(),
            self.land_count
        );

        self.frontier = spawned;
        !self.frontier.is_empty()
    }

    /// Grow until a round spawns nothing or the round cap is reached.
    pub fn run(mut self) -> GrowthOutcome {
        let mut converged = false;
        while self.round < self.max_rounds {
            if !self.step() {
                converged = true;
                break;
            }
        }

        if !converged {
            log::info!(
                "Growth hit the {} round cap with {} frontier cells remaining",
                self.max_rounds,
                self.frontier.len()
            );
        }

        GrowthOutcome {
            report: GrowthReport {
                rounds: self.round,
                converged,
                seeds: self.seeds,
                land_cells: self.land_count,
            },
            field: self.field,
        }
    }
}
