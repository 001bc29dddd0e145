//! Discretization of the smoothed field into terrain bands.

use serde::{Deserialize, Serialize};

use crate::schema::{BandPreset, BandRule, ConfigError, validate_rules};

use super::Field;

/// Cell count of one band in a classified map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandCount {
    pub name: String,
    pub value: f32,
    pub cells: usize,
}

/// Quantized elevation grid. Every cell holds one band scalar.
#[derive(Debug, Clone)]
pub struct TerrainMap {
    pub field: Field,
    /// Per-band cell counts, lowest band first.
    pub bands: Vec<BandCount>,
}

impl TerrainMap {
    #[inline]
    pub fn width(&self) -> usize {
        self.field.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.field.height
    }

    /// Fraction of cells whose band is at or above `name`.
    ///
    /// Returns `None` if no band has that name.
    pub fn fraction_at_or_above(&self, name: &str) -> Option<f32> {
        let start = self.bands.iter().position(|b| b.name == name)?;
        let cells: usize = self.bands[start..].iter().map(|b| b.cells).sum();
        Some(cells as f32 / self.field.len().max(1) as f32)
    }
}

/// Ordered band rules plus the calibration extremes.
#[derive(Debug, Clone)]
pub struct TerrainClassifier {
    rules: Vec<BandRule>,
    min_value: f32,
    max_value: f32,
}

impl TerrainClassifier {
    /// Create from rules sorted lowest threshold first.
    pub fn new(rules: Vec<BandRule>) -> Result<Self, ConfigError> {
        validate_rules(&rules)?;

        let min_value = rules.iter().map(|r| r.value).fold(f32::INFINITY, f32::min);
        let max_value = rules
            .iter()
            .map(|r| r.value)
            .fold(f32::NEG_INFINITY, f32::max);

        Ok(Self {
            rules,
            min_value,
            max_value,
        })
    }

    /// Create from a preset.
    pub fn from_preset(preset: &BandPreset) -> Result<Self, ConfigError> {
        Self::new(preset.rules())
    }

    pub fn rules(&self) -> &[BandRule] {
        &self.rules
    }

    /// Smallest representative scalar.
    pub fn min_value(&self) -> f32 {
        self.min_value
    }

    /// Largest representative scalar.
    pub fn max_value(&self) -> f32 {
        self.max_value
    }

    /// First band (lowest threshold first) whose predicate accepts `v`.
    ///
    /// Returns the band index and its representative scalar.
    pub fn classify_value(&self, v: f32) -> (usize, f32) {
        let last = self.rules.len() - 1;
        let index = self
            .rules
            .iter()
            .position(|r| r.matches(v))
            .unwrap_or(last);
        (index, self.rules[index].value)
    }

    /// Quantize every cell, then pin cell (0, 0) to the largest band scalar
    /// and cell (1, 0) to the smallest so a fixed-range palette always spans
    /// its full range.
    pub fn classify(&self, input: &Field) -> TerrainMap {
        let data = input
            .data
            .iter()
            .map(|&v| self.classify_value(v).1)
            .collect();
        let mut field = Field::from_vec(input.width, input.height, data);

        if field.width > 0 && field.height > 1 {
            field.set(0, 0, self.max_value);
            field.set(1, 0, self.min_value);
        }

        let bands = self.band_histogram(&field);
        TerrainMap { field, bands }
    }

    /// Count cells per band of an already classified field.
    pub fn band_histogram(&self, field: &Field) -> Vec<BandCount> {
        let mut counts = vec![0usize; self.rules.len()];
        for &v in &field.data {
            counts[self.classify_value(v).0] += 1;
        }

        self.rules
            .iter()
            .zip(counts)
            .map(|(rule, cells)| BandCount {
                name: rule.name.clone(),
                value: rule.value,
                cells,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn eight() -> TerrainClassifier {
        TerrainClassifier::from_preset(&BandPreset::Eight).unwrap()
    }

    fn four() -> TerrainClassifier {
        TerrainClassifier::from_preset(&BandPreset::Four).unwrap()
    }

    #[test]
    fn test_eight_band_boundaries() {
        let c = eight();
        let cases = [
            (0.0, "deep_ocean"),
            (0.049, "deep_ocean"),
            (0.05, "ocean"),
            (0.199, "ocean"),
            (0.2, "sea"),
            (0.4, "sea"),
            (0.41, "beach"),
            (0.5, "beach"),
            (0.51, "land"),
            (0.8, "land"),
            (0.85, "inland"),
            (0.91, "inland"),
            (0.93, "mountain"),
            (0.95, "mountain"),
            (0.96, "mountain_tip"),
            (1.0, "mountain_tip"),
        ];
        for (v, name) in cases {
            let (index, _) = c.classify_value(v);
            assert_eq!(c.rules()[index].name, name, "value {}", v);
        }
    }

    #[test]
    fn test_extremes() {
        assert_eq!(eight().min_value(), 0.0);
        assert_eq!(eight().max_value(), 1.0);
        assert_eq!(four().min_value(), 0.0);
        assert_eq!(four().max_value(), 1.0);
    }

    #[test]
    fn test_calibration_cells() {
        let c = four();
        let field = Field::from_vec(3, 3, vec![0.7; 9]);
        let map = c.classify(&field);

        assert_eq!(map.field.get(0, 0), 1.0);
        assert_eq!(map.field.get(1, 0), 0.0);
        assert_eq!(map.field.get(2, 2), 1.0);
        assert_eq!(map.bands[0].cells, 1);
        assert_eq!(map.bands[3].cells, 8);
    }

    #[test]
    fn test_histogram_sums_to_grid() {
        let data: Vec<f32> = (0..100).map(|i| i as f32 / 99.0).collect();
        let map = eight().classify(&Field::from_vec(10, 10, data));

        let total: usize = map.bands.iter().map(|b| b.cells).sum();
        assert_eq!(total, 100);
        assert!(map.fraction_at_or_above("land").unwrap() > 0.0);
        assert!(map.fraction_at_or_above("nonexistent").is_none());
    }

    #[test]
    fn test_rejects_invalid_rules() {
        assert!(matches!(
            TerrainClassifier::new(Vec::new()),
            Err(ConfigError::NoBands)
        ));
    }

    fn field_strategy() -> impl Strategy<Value = Field> {
        (1usize..12, 2usize..12).prop_flat_map(|(w, h)| {
            prop::collection::vec(0.0f32..=1.0, w * h)
                .prop_map(move |data| Field::from_vec(w, h, data))
        })
    }

    proptest! {
        #[test]
        fn prop_classification_is_idempotent(field in field_strategy()) {
            for c in [eight(), four()] {
                let once = c.classify(&field);
                let twice = c.classify(&once.field);
                prop_assert_eq!(&once.field, &twice.field);
                prop_assert_eq!(&once.bands, &twice.bands);
            }
        }

        #[test]
        fn prop_calibration_invariant(field in field_strategy()) {
            for c in [eight(), four()] {
                let map = c.classify(&field);
                prop_assert_eq!(map.field.get(0, 0), c.max_value());
                prop_assert_eq!(map.field.get(1, 0), c.min_value());
            }
        }

        #[test]
        fn prop_output_uses_band_scalars(field in field_strategy()) {
            let c = eight();
            let map = c.classify(&field);
            for &v in &map.field.data {
                prop_assert!(c.rules().iter().any(|r| r.value == v));
            }
        }
    }
}
