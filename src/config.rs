//! Configuration for the Harvest environment.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{HarvestError, Result};

/// Default respawn table, indexed by the clamped local resource count.
pub const DEFAULT_SPAWN_PROBABILITIES: [f64; 4] = [0.0, 0.005, 0.02, 0.05];

/// Configuration for the Harvest environment.
///
/// Controls observation size, beam reach, resource regrowth and reward
/// shaping.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HarvestConfig {
    // --- Observation ---
    /// Observation half extent along rows.
    pub view_rows: usize,
    /// Observation half extent along columns.
    pub view_cols: usize,

    // --- Beam ---
    /// Maximum number of cells a beam covers.
    pub beam_range: usize,

    // --- Respawn ---
    /// Half extent of the square sampled around each resource spawn point.
    pub respawn_radius: usize,
    /// Spawn probability per local resource count; the last entry applies to
    /// every count at or beyond its index.
    pub spawn_probabilities: Vec<f64>,

    // --- Episode ---
    /// Number of ticks after which every agent reports `done`.
    pub episode_horizon: u32,

    // --- Reward ---
    /// Reward per apple collected.
    pub apple_reward: f64,
    /// Cost charged to an agent each time it fires.
    pub fire_cost: f64,
    /// Penalty for being covered by another agent's beam.
    pub hit_penalty: f64,
}

impl HarvestConfig {
    /// Spawn probability for a spawn point seeing `count` resources nearby.
    pub fn spawn_probability(&self, count: usize) -> f64 {
        match self.spawn_probabilities.len() {
            0 => 0.0,
            n => self.spawn_probabilities[count.min(n - 1)],
        }
    }

    /// Side lengths `(rows, cols)` of an agent's observation window.
    pub fn observation_shape(&self) -> (usize, usize) {
        (2 * self.view_rows + 1, 2 * self.view_cols + 1)
    }

    /// Number of discrete actions available to each agent.
    pub fn action_dim(&self) -> usize {
        crate::action::Action::COUNT
    }

    /// Checks that the configuration describes a runnable environment.
    pub fn validate(&self) -> Result<()> {
        if self.spawn_probabilities.is_empty() {
            return Err(HarvestError::InvalidConfig(
                "spawn probability table is empty".into(),
            ));
        }
        if let Some(p) = self
            .spawn_probabilities
            .iter()
            .find(|p| !(0.0..=1.0).contains(*p))
        {
            return Err(HarvestError::InvalidConfig(format!(
                "spawn probability {p} is outside [0, 1]"
            )));
        }
        if self.beam_range == 0 {
            return Err(HarvestError::InvalidConfig(
                "beam range must be at least 1".into(),
            ));
        }
        if self.episode_horizon == 0 {
            return Err(HarvestError::InvalidConfig(
                "episode horizon must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            view_rows: 3,
            view_cols: 3,
            beam_range: 5,
            respawn_radius: 2,
            spawn_probabilities: DEFAULT_SPAWN_PROBABILITIES.to_vec(),
            episode_horizon: 1000,
            apple_reward: 1.0,
            fire_cost: 0.0,
            hit_penalty: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let cfg = HarvestConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.beam_range, 5);
        assert_eq!(cfg.observation_shape(), (7, 7));
        assert_eq!(cfg.action_dim(), 8);
    }

    #[test]
    fn spawn_probability_clamps_count() {
        let cfg = HarvestConfig::default();
        assert_eq!(cfg.spawn_probability(0), 0.0);
        assert_eq!(cfg.spawn_probability(2), 0.02);
        assert_eq!(cfg.spawn_probability(3), 0.05);
        assert_eq!(cfg.spawn_probability(40), 0.05);
    }

    #[test]
    fn rejects_probability_out_of_range() {
        let cfg = HarvestConfig {
            spawn_probabilities: vec![0.1, 1.5],
            ..HarvestConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(HarvestError::InvalidConfig(_))
        ));
    }

    #[test]
    fn rejects_empty_table() {
        let cfg = HarvestConfig {
            spawn_probabilities: vec![],
            ..HarvestConfig::default()
        };
        assert!(cfg.validate().is_err());
        assert_eq!(cfg.spawn_probability(1), 0.0);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn config_json_roundtrip() {
        let cfg = HarvestConfig {
            beam_range: 3,
            ..HarvestConfig::default()
        };
        let json = serde_json::to_string(&cfg).unwrap();
        let restored: HarvestConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, cfg);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn config_missing_fields_use_defaults() {
        let restored: HarvestConfig = serde_json::from_str(r#"{"view_rows": 7}"#).unwrap();
        assert_eq!(restored.view_rows, 7);
        assert_eq!(restored.beam_range, 5);
    }
}
