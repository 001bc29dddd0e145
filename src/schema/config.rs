//! Configuration types for island map generation.

use serde::{Deserialize, Serialize};

use super::{BandPreset, validate_rules};

/// Upper bound on growth rounds. Growth always halts within this many.
pub const MAX_ROUNDS: usize = 800;

/// Largest Gaussian kernel radius, in cells, along either axis.
pub const MAX_KERNEL_RADIUS: usize = 512;

fn default_max_rounds() -> usize {
    MAX_ROUNDS
}

/// Default render targets: full map and minimap from the same grid.
fn default_targets() -> Vec<RenderTarget> {
    vec![
        RenderTarget {
            name: "map".to_string(),
            palette: "gist_earth".to_string(),
            width: 1200,
            height: 700,
        },
        RenderTarget {
            name: "minimap".to_string(),
            palette: "bone".to_string(),
            width: 1200,
            height: 700,
        },
    ]
}

/// Top-level map generation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapConfig {
    /// Canvas width in cells (columns).
    pub width: usize,
    /// Canvas height in cells (rows).
    pub height: usize,
    /// Number of island seeds.
    pub islands: usize,
    /// Per-trial probability that a frontier neighbor becomes land.
    pub spawn_probability: f32,
    /// Margin (in cells) along every edge where growth may not occur.
    pub buffer: usize,
    /// Maximum number of growth rounds, at most [`MAX_ROUNDS`].
    #[serde(default = "default_max_rounds")]
    pub max_rounds: usize,
    /// Gaussian smoothing parameters.
    #[serde(default)]
    pub smoothing: SmoothingConfig,
    /// Terrain band rules.
    #[serde(default)]
    pub bands: BandPreset,
    /// Random seed. `None` draws one from OS entropy.
    #[serde(default)]
    pub random_seed: Option<u64>,
    /// Images the external renderer should produce from the generated grid.
    #[serde(default = "default_targets")]
    pub targets: Vec<RenderTarget>,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 700,
            islands: 20,
            spawn_probability: 0.2455,
            buffer: 30,
            max_rounds: default_max_rounds(),
            smoothing: SmoothingConfig::default(),
            bands: BandPreset::default(),
            random_seed: None,
            targets: default_targets(),
        }
    }
}

/// Gaussian smoothing parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmoothingConfig {
    /// Standard deviation along columns (X).
    pub sigma_x: f32,
    /// Standard deviation along rows (Y).
    pub sigma_y: f32,
    /// Kernel radius in standard deviations. `truncate * sigma` must stay
    /// within [`MAX_KERNEL_RADIUS`].
    #[serde(default = "default_truncate")]
    pub truncate: f32,
    /// Convolution backend.
    #[serde(default)]
    pub backend: SmoothingBackend,
}

fn default_truncate() -> f32 {
    4.0
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            sigma_x: 7.0,
            sigma_y: 7.0,
            truncate: default_truncate(),
            backend: SmoothingBackend::default(),
        }
    }
}

impl SmoothingConfig {
    /// Isotropic smoothing with the given standard deviation.
    pub fn isotropic(sigma: f32) -> Self {
        Self {
            sigma_x: sigma,
            sigma_y: sigma,
            ..Self::default()
        }
    }
}

/// Convolution strategy for the smoothing pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SmoothingBackend {
    /// Row pass followed by column pass.
    #[default]
    Separable,
    /// Full 2D kernel, O(N * K^2).
    Direct,
    /// Zero-padded FFT convolution.
    Fft,
}

/// A named palette/resolution pair for the external renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderTarget {
    /// Output name (e.g. "map", "minimap").
    pub name: String,
    /// Colormap name understood by the renderer.
    pub palette: String,
    /// Output image width in pixels.
    pub width: usize,
    /// Output image height in pixels.
    pub height: usize,
}

impl MapConfig {
    /// Get total grid size (width * height).
    #[inline]
    pub fn grid_size(&self) -> usize {
        self.width * self.height
    }

    /// Number of cells inside the buffered interior.
    ///
    /// Zero when the buffer swallows either dimension.
    pub fn interior_cells(&self) -> usize {
        let margin = self.buffer.saturating_mul(2);
        let cols = self.width.saturating_sub(margin);
        let rows = self.height.saturating_sub(margin);
        cols * rows
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        // Row 1 must exist for the low calibration cell.
        if self.width == 0 || self.height < 2 {
            return Err(ConfigError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        // Same as 2 * buffer >= side, without the multiply.
        if self.buffer >= self.width.div_ceil(2) || self.buffer >= self.height.div_ceil(2) {
            return Err(ConfigError::BufferTooLarge {
                buffer: self.buffer,
                width: self.width,
                height: self.height,
            });
        }
        let interior = self.interior_cells();
        if self.islands > interior {
            return Err(ConfigError::TooManyIslands {
                islands: self.islands,
                interior,
            });
        }
        if !(0.0..=1.0).contains(&self.spawn_probability) {
            return Err(ConfigError::InvalidSpawnProbability(self.spawn_probability));
        }
        if !(1..=MAX_ROUNDS).contains(&self.max_rounds) {
            return Err(ConfigError::InvalidRoundCap(self.max_rounds));
        }
        for (axis, sigma) in [("x", self.smoothing.sigma_x), ("y", self.smoothing.sigma_y)] {
            if !sigma.is_finite() || sigma < 0.0 {
                return Err(ConfigError::InvalidSigma { axis, sigma });
            }
        }
        if !self.smoothing.truncate.is_finite() || self.smoothing.truncate <= 0.0 {
            return Err(ConfigError::InvalidTruncate(self.smoothing.truncate));
        }
        for (axis, sigma) in [("x", self.smoothing.sigma_x), ("y", self.smoothing.sigma_y)] {
            // f64 so huge sigmas cannot saturate before the comparison.
            let radius = (f64::from(self.smoothing.truncate) * f64::from(sigma) + 0.5).floor();
            if radius > MAX_KERNEL_RADIUS as f64 {
                return Err(ConfigError::KernelTooLarge { axis, radius });
            }
        }
        validate_rules(&self.bands.rules())?;
        for target in &self.targets {
            if target.width == 0 || target.height == 0 {
                return Err(ConfigError::InvalidRenderTarget {
                    name: target.name.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Grid must be at least 1x2 cells, got {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    #[error("Buffer {buffer} leaves no interior on a {width}x{height} grid")]
    BufferTooLarge {
        buffer: usize,
        width: usize,
        height: usize,
    },
    #[error("Cannot place {islands} distinct islands in {interior} interior cells")]
    TooManyIslands { islands: usize, interior: usize },
    #[error("Spawn probability must be within [0, 1], got {0}")]
    InvalidSpawnProbability(f32),
    #[error("Round cap must be within 1..={max}, got {0}", max = MAX_ROUNDS)]
    InvalidRoundCap(usize),
    #[error("Smoothing sigma along {axis} must be finite and non-negative, got {sigma}")]
    InvalidSigma { axis: &'static str, sigma: f32 },
    #[error("Kernel truncation must be finite and positive, got {0}")]
    InvalidTruncate(f32),
    #[error(
        "Kernel radius {radius} along {axis} exceeds {max} cells",
        max = MAX_KERNEL_RADIUS
    )]
    KernelTooLarge { axis: &'static str, radius: f64 },
    #[error("At least one terrain band is required")]
    NoBands,
    #[error("Band {index} threshold is not greater than the previous band's")]
    UnsortedBands { index: usize },
    #[error("Band {index} threshold must be finite")]
    InvalidThreshold { index: usize },
    #[error("Unbounded band {index} must be the last band")]
    UnboundedBandNotLast { index: usize },
    #[error("The last band must be unbounded")]
    MissingUnboundedBand,
    #[error("Band '{name}' value {value} lies outside its own range")]
    BandValueOutOfRange { name: String, value: f32 },
    #[error("Render target '{name}' must have non-zero size")]
    InvalidRenderTarget { name: String },
}
