//! JSON export of a generated map for the external renderer.
//!
//! One export carries exactly one terrain grid together with every render
//! target, so the full map and the minimap are always drawn from the same
//! island.

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::compute::{BandCount, Field, GenerationStats, TerrainMap};
use crate::schema::{MapConfig, RenderTarget};

/// Export errors.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Terrain holds {actual} values, expected {width}x{height}")]
    ShapeMismatch {
        width: usize,
        height: usize,
        actual: usize,
    },
}

/// Serialized quantized grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerrainGrid {
    pub width: usize,
    pub height: usize,
    /// Row-major band scalars.
    pub values: Vec<f32>,
    pub bands: Vec<BandCount>,
}

/// Everything the renderer needs to draw one generated map. Render targets
/// live in `config.targets`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapExport {
    pub config: MapConfig,
    pub stats: GenerationStats,
    pub terrain: TerrainGrid,
}

impl MapExport {
    /// Bundle a generated map with the configuration that produced it.
    pub fn new(config: &MapConfig, map: &TerrainMap, stats: &GenerationStats) -> Self {
        Self {
            config: config.clone(),
            stats: stats.clone(),
            terrain: TerrainGrid {
                width: map.width(),
                height: map.height(),
                values: map.field.data.clone(),
                bands: map.bands.clone(),
            },
        }
    }

    /// Images to render from the terrain grid.
    pub fn targets(&self) -> &[RenderTarget] {
        &self.config.targets
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, ExportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write to disk as JSON.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ExportError> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Read an export back from disk.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ExportError> {
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Rebuild the terrain map, checking the grid shape.
    pub fn into_terrain(self) -> Result<TerrainMap, ExportError> {
        let TerrainGrid {
            width,
            height,
            values,
            bands,
        } = self.terrain;

        if width.checked_mul(height) != Some(values.len()) {
            return Err(ExportError::ShapeMismatch {
                width,
                height,
                actual: values.len(),
            });
        }

        Ok(TerrainMap {
            field: Field::from_vec(width, height, values),
            bands,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::IslandGenerator;
    use tempfile::tempdir;

    fn generate() -> (MapConfig, TerrainMap, GenerationStats) {
        let config = MapConfig {
            width: 48,
            height: 36,
            islands: 3,
            spawn_probability: 0.35,
            buffer: 4,
            random_seed: Some(5),
            ..MapConfig::default()
        };
        let generator = IslandGenerator::new(config.clone()).unwrap();
        let (map, stats) = generator.generate(&mut generator.rng()).unwrap();
        (config, map, stats)
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("island.map.json");

        let (config, map, stats) = generate();
        MapExport::new(&config, &map, &stats).save(&path).unwrap();

        let loaded = MapExport::load(&path).unwrap();
        assert_eq!(loaded.targets(), config.targets.as_slice());
        assert_eq!(loaded.stats.growth.rounds, stats.growth.rounds);

        let terrain = loaded.into_terrain().unwrap();
        assert_eq!(terrain.field, map.field);
        assert_eq!(terrain.bands, map.bands);
    }

    #[test]
    fn test_one_grid_many_targets() {
        let (config, map, stats) = generate();
        let export = MapExport::new(&config, &map, &stats);

        let palettes: Vec<&str> = export
            .targets()
            .iter()
            .map(|t| t.palette.as_str())
            .collect();
        assert_eq!(palettes, vec!["gist_earth", "bone"]);
        assert_eq!(export.terrain.values.len(), 48 * 36);
    }

    #[test]
    fn test_targets_written_once() {
        let (config, map, stats) = generate();
        let json = MapExport::new(&config, &map, &stats).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert!(value.get("targets").is_none());
        assert_eq!(value["config"]["targets"].as_array().map(Vec::len), Some(2));
        assert_eq!(json.matches("\"minimap\"").count(), 1);
    }

    #[test]
    fn test_shape_mismatch() {
        let (config, map, stats) = generate();
        let mut export = MapExport::new(&config, &map, &stats);
        export.terrain.values.pop();

        assert!(matches!(
            export.into_terrain(),
            Err(ExportError::ShapeMismatch { actual, .. }) if actual == 48 * 36 - 1
        ));
    }

    #[test]
    fn test_shape_overflow() {
        let (config, map, stats) = generate();
        let mut export = MapExport::new(&config, &map, &stats);
        export.terrain.width = usize::MAX;
        export.terrain.height = 2;

        assert!(matches!(
            export.into_terrain(),
            Err(ExportError::ShapeMismatch {
                width: usize::MAX,
                height: 2,
                ..
            })
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            MapExport::load(dir.path().join("missing.json")),
            Err(ExportError::Io(_))
        ));
    }
}
