//! Island generator - runs growth, smoothing and classification in order.

use serde::{Deserialize, Serialize};

use crate::schema::{ConfigError, MapConfig};

use super::{
    FieldSmoother, FieldStats, GrowthReport, GrowthSimulator, MapRng, TerrainClassifier,
    TerrainMap,
};

/// Diagnostics collected during one generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationStats {
    pub growth: GrowthReport,
    /// Statistics of the smoothed field before classification.
    pub elevation: FieldStats,
}

/// Validated pipeline. Each [`generate`](Self::generate) call owns its own
/// buffers, so one generator can produce any number of maps.
pub struct IslandGenerator {
    config: MapConfig,
    smoother: FieldSmoother,
    classifier: TerrainClassifier,
}

impl IslandGenerator {
    /// Validate the configuration and precompute the kernel and band table.
    pub fn new(config: MapConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let smoother = FieldSmoother::new(&config.smoothing);
        let classifier = TerrainClassifier::from_preset(&config.bands)?;

        Ok(Self {
            config,
            smoother,
            classifier,
        })
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    pub fn classifier(&self) -> &TerrainClassifier {
        &self.classifier
    }

    /// Random stream selected by the configuration: seeded when
    /// `random_seed` is set, otherwise drawn from OS entropy.
    pub fn rng(&self) -> MapRng {
        match self.config.random_seed {
            Some(seed) => MapRng::new(seed),
            None => MapRng::from_entropy(),
        }
    }

    /// Generate one map, drawing all randomness from `rng`.
    pub fn generate(&self, rng: &mut MapRng) -> Result<(TerrainMap, GenerationStats), ConfigError> {
        let growth = GrowthSimulator::new(&self.config, rng)?.run();
        let smoothed = self.smoother.smooth(&growth.field);
        let elevation = FieldStats::from_field(&smoothed);
        let map = self.classifier.classify(&smoothed);

        log::info!(
            "Generated {}x{} map: {} land cells after {} rounds (converged: {})",
            map.width(),
            map.height(),
            growth.report.land_cells,
            growth.report.rounds,
            growth.report.converged
        );

        Ok((
            map,
            GenerationStats {
                growth: growth.report,
                elevation,
            },
        ))
    }
}
