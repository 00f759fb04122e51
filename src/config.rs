//! every tunable in one TOML‑loadable resource
//!
//! Missing sections and keys fall back to their defaults, so an empty file
//! is a valid config.
use std::fs;
use std::path::Path;

use bevy::prelude::*;
use serde::Deserialize;

use crate::enemy::EnemyConfig;
use crate::error::MinerError;
use crate::input::InputConfig;
use crate::mining::MiningConfig;
use crate::player::PlayerConfig;
use crate::visibility::LightConfig;
use crate::world_gen::WorldGenConfig;

#[derive(Resource, Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub world: WorldGenConfig,
    pub mining: MiningConfig,
    pub light: LightConfig,
    pub input: InputConfig,
    pub player: PlayerConfig,
    pub enemies: EnemyConfig,
}

impl GameConfig {
    /// defaults when `path` is `None`
    pub fn load(path: Option<&Path>) -> Result<Self, MinerError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = fs::read_to_string(path).map_err(|source| MinerError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, MinerError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), MinerError> {
        self.world.validate()?;
        if self.light.base_intensity == 0 || self.light.open_cost == 0 || self.light.dense_cost == 0 {
            return Err(MinerError::InvalidConfig(
                "light intensity and costs must be positive".into(),
            ));
        }
        if self.light.window_width % 2 == 0 || self.light.window_height % 2 == 0 {
            return Err(MinerError::InvalidConfig(format!(
                "light window {}x{} must be odd on both axes to centre on the player",
                self.light.window_width, self.light.window_height
            )));
        }
        if self.mining.damage_per_action == 0 {
            return Err(MinerError::InvalidConfig("damage_per_action must be positive".into()));
        }
        if !(0.0..=1.0).contains(&self.player.friction) {
            return Err(MinerError::InvalidConfig(format!(
                "friction {} outside 0..=1",
                self.player.friction
            )));
        }
        Ok(())
    }
}
