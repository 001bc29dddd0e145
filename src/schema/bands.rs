//! Terrain band rules and presets.

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// A terrain band: a threshold predicate over the smoothed field and the
/// scalar written to every cell that matches it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandRule {
    /// Band name (e.g. "deep_ocean").
    pub name: String,
    /// Upper threshold. `None` marks the unbounded top band.
    pub max: Option<f32>,
    /// Match `v <= max` instead of `v < max`.
    #[serde(default)]
    pub inclusive: bool,
    /// Representative scalar written to matching cells.
    pub value: f32,
}

impl BandRule {
    /// Band bounded above by `v < max`.
    pub fn below(name: &str, max: f32, value: f32) -> Self {
        Self {
            name: name.to_string(),
            max: Some(max),
            inclusive: false,
            value,
        }
    }

    /// Band bounded above by `v <= max`.
    pub fn up_to(name: &str, max: f32, value: f32) -> Self {
        Self {
            name: name.to_string(),
            max: Some(max),
            inclusive: true,
            value,
        }
    }

    /// Unbounded top band.
    pub fn above(name: &str, value: f32) -> Self {
        Self {
            name: name.to_string(),
            max: None,
            inclusive: false,
            value,
        }
    }

    /// Check the upper-bound predicate.
    #[inline]
    pub fn matches(&self, v: f32) -> bool {
        match self.max {
            None => true,
            Some(max) if self.inclusive => v <= max,
            Some(max) => v < max,
        }
    }
}

/// Predefined band tables.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BandPreset {
    /// Deep ocean through mountain tip.
    #[default]
    Eight,
    /// Ocean, sea, beach, land.
    Four,
    /// User-supplied rules, lowest threshold first.
    Custom { rules: Vec<BandRule> },
}

impl BandPreset {
    /// Expand the preset into its ordered rule list.
    pub fn rules(&self) -> Vec<BandRule> {
        match self {
            BandPreset::Eight => vec![
                BandRule::below("deep_ocean", 0.05, 0.0),
                BandRule::below("ocean", 0.2, 0.1),
                BandRule::up_to("sea", 0.4, 0.3),
                BandRule::up_to("beach", 0.5, 0.45),
                BandRule::up_to("land", 0.8, 0.65),
                BandRule::up_to("inland", 0.91, 0.85),
                BandRule::up_to("mountain", 0.95, 0.93),
                BandRule::above("mountain_tip", 1.0),
            ],
            BandPreset::Four => vec![
                BandRule::below("ocean", 0.2, 0.0),
                BandRule::up_to("sea", 0.4, 0.3),
                BandRule::up_to("beach", 0.5, 0.45),
                BandRule::above("land", 1.0),
            ],
            BandPreset::Custom { rules } => rules.clone(),
        }
    }
}

/// Check that rules partition the real line in ascending order and that
/// every representative scalar falls inside its own band.
///
/// The last condition makes classification idempotent.
pub fn validate_rules(rules: &[BandRule]) -> Result<(), ConfigError> {
    let Some(last) = rules.last() else {
        return Err(ConfigError::NoBands);
    };
    if last.max.is_some() {
        return Err(ConfigError::MissingUnboundedBand);
    }

    let mut prev: Option<&BandRule> = None;
    for (index, rule) in rules.iter().enumerate() {
        match rule.max {
            None if index + 1 != rules.len() => {
                return Err(ConfigError::UnboundedBandNotLast { index });
            }
            Some(max) if !max.is_finite() => {
                return Err(ConfigError::InvalidThreshold { index });
            }
            Some(max) => {
                if let Some(p_max) = prev.and_then(|p| p.max)
                    && max <= p_max
                {
                    return Err(ConfigError::UnsortedBands { index });
                }
            }
            None => {}
        }

        let above_prev = match prev {
            None => true,
            Some(p) => !p.matches(rule.value),
        };
        if !rule.value.is_finite() || !above_prev || !rule.matches(rule.value) {
            return Err(ConfigError::BandValueOutOfRange {
                name: rule.name.clone(),
                value: rule.value,
            });
        }

        prev = Some(rule);
    }

    Ok(())
}
