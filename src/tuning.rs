//! Data-driven game balance
//!
//! Every numeric knob of item drops and level drafting lives here so a page can
//! override it with a JSON blob. Missing fields fall back to the defaults.

use serde::{Deserialize, Serialize};

/// Item drop chances, each the probability that a defeat drops anything
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DropTuning {
    /// Modrons, goblins, gelatins and demons
    pub common_chance: f64,
    /// High-dras and pirates
    pub rare_chance: f64,
    /// Share of modron drops that are potions instead of a core
    pub modron_potion_share: f64,
}

impl Default for DropTuning {
    fn default() -> Self {
        Self {
            common_chance: 0.3,
            rare_chance: 0.5,
            modron_potion_share: 0.2,
        }
    }
}

/// Level draft constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelTuning {
    /// Budget = depth * budget_per_depth + budget_base
    pub budget_per_depth: i32,
    pub budget_base: i32,
    pub min_monsters: usize,
    pub max_monsters: usize,
    /// Attempts before the draft gives up
    pub max_attempts: u32,
    /// Half-width of the noise added when shuffling the manual
    pub draft_jitter: f64,
    /// Half-width of the noise added when ordering the floor
    pub order_jitter: f64,
}

impl Default for LevelTuning {
    fn default() -> Self {
        Self {
            budget_per_depth: 2,
            budget_base: 4,
            min_monsters: 3,
            max_monsters: 8,
            max_attempts: 100,
            draft_jitter: 0.5,
            order_jitter: 1.75,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub drops: DropTuning,
    pub level: LevelTuning,
}

impl Tuning {
    /// Parse tuning overrides from JSON
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Parse overrides, falling back to defaults on malformed input
    pub fn from_json_or_default(json: &str) -> Self {
        match Self::from_json(json) {
            Ok(tuning) => {
                log::info!("Loaded tuning overrides");
                tuning
            }
            Err(e) => {
                log::warn!("Ignoring malformed tuning ({e}), using defaults");
                Self::default()
            }
        }
    }
}
