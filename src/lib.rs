//! Island Gen - Procedural island heightmaps.
//!
//! This crate synthesizes naturalistic island terrain in three stages:
//! neighbor-weighted probabilistic frontier growth of land from random
//! seeds, Gaussian smoothing of the binary land field, and classification of
//! the smoothed elevation into discrete terrain bands.
//!
//! # Architecture
//!
//! The crate is split into three modules:
//!
//! - `schema`: Configuration types, band presets and validation
//! - `compute`: Growth, kernels, convolution, classification and the pipeline
//! - `export`: JSON export of one generated map for an external renderer
//!
//! # Example
//!
//! ```rust,no_run
//! use island_gen::{
//!     compute::IslandGenerator,
//!     schema::{BandPreset, MapConfig},
//! };
//!
//! // Create configuration
//! let config = MapConfig {
//!     bands: BandPreset::Four,
//!     random_seed: Some(42),
//!     ..MapConfig::default()
//! };
//!
//! // Validate once, then generate
//! let generator = IslandGenerator::new(config).expect("valid config");
//! let mut rng = generator.rng();
//! let (map, stats) = generator.generate(&mut rng).expect("valid config");
//!
//! println!(
//!     "{}x{} map, {} land cells after {} rounds",
//!     map.width(),
//!     map.height(),
//!     stats.growth.land_cells,
//!     stats.growth.rounds
//! );
//! ```

pub mod compute;
pub mod export;
pub mod schema;

// Re-export commonly used types
pub use compute::{IslandGenerator, MapRng, TerrainMap};
pub use export::MapExport;
pub use schema::{BandPreset, MapConfig};
