//! Match configuration
//!
//! Loaded from JSON by the host; every field has a default.

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_TANKS, MIN_TANKS};
use crate::sim::{ControlMode, LandscapeKind};

/// Smallest playable field
pub const MIN_DIMENSION: usize = 200;

/// Match setup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Field width in pixels (one terrain column per pixel)
    pub width: usize,
    /// Field height in pixels
    pub height: usize,
    /// Landscape for the first round
    pub landscape: LandscapeKind,
    /// One entry per tank, 2 to 4
    pub players: Vec<ControlMode>,
    /// RNG seed (0 = pick one from system entropy)
    pub seed: u64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 700,
            landscape: LandscapeKind::Earth,
            players: vec![ControlMode::Human, ControlMode::Medium],
            seed: 0,
        }
    }
}

impl MatchConfig {
    /// Config with the given tank line-up and default everything else
    pub fn with_players(players: &[ControlMode]) -> Self {
        Self {
            players: players.to_vec(),
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Copy with out-of-range values corrected
    pub fn validated(&self) -> Self {
        let mut config = self.clone();

        if config.width < MIN_DIMENSION {
            log::warn!("Field width {} too small, using {}", config.width, MIN_DIMENSION);
            config.width = MIN_DIMENSION;
        }
        if config.height < MIN_DIMENSION {
            log::warn!("Field height {} too small, using {}", config.height, MIN_DIMENSION);
            config.height = MIN_DIMENSION;
        }
        if config.players.len() > MAX_TANKS {
            log::warn!("{} players configured, keeping the first {}", config.players.len(), MAX_TANKS);
            config.players.truncate(MAX_TANKS);
        }
        while config.players.len() < MIN_TANKS {
            log::warn!("Too few players, adding a medium AI");
            config.players.push(ControlMode::Medium);
        }

        config
    }
}
