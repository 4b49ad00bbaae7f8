//! # Configuration
//!
//! Tunables for world generation and player physics. Every struct deserialises
//! from JSON with `#[serde(default)]`, so a config file only needs to name the
//! values it changes.

use std::{fs, io, path::Path};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Horizontal walking speed in blocks per second.
pub const WALK_SPEED: f32 = 4.3;
/// Downward acceleration in blocks per second squared.
pub const GRAVITY: f32 = 28.0;
/// Vertical velocity applied by a jump.
pub const JUMP_FORCE: f32 = 8.5;
/// Rate at which horizontal speed decays when no movement key is held.
pub const FRICTION_COEFFICIENT: f32 = 10.0;
/// Height of the eye above the feet.
pub const EYE_HEIGHT: f32 = 1.6;
/// How far away a block can be selected.
pub const REACH_DISTANCE: f32 = 6.0;

/// Errors raised while loading an [`EngineConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config file: {0}")]
    Io(#[from] io::Error),
    /// The config file is not valid JSON for the config schema.
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// The terrain generator used for new chunks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerrainKind {
    /// Bedrock floor, dirt, and a grass surface at a fixed height.
    Flat,
    /// Same layering over a Perlin noise height map.
    #[default]
    Perlin,
    /// Nothing but air.
    Empty,
}

/// Parameters of terrain generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Seed shared by the noise function and tree placement.
    pub seed: u32,
    pub terrain: TerrainKind,
    /// Height of the grass layer on flat terrain and the mean height on Perlin terrain.
    pub surface_height: i32,
    /// Maximum deviation of the Perlin height map from `surface_height`.
    pub height_amplitude: f64,
    /// Scale applied to world coordinates before sampling noise.
    pub noise_scale: f64,
    /// Number of tree placement attempts per chunk.
    pub trees_per_chunk: u32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        WorldConfig {
            seed: 0,
            terrain: TerrainKind::Perlin,
            surface_height: 16,
            height_amplitude: 6.0,
            noise_scale: 0.02,
            trees_per_chunk: 2,
        }
    }
}

impl WorldConfig {
    /// A flat world with its grass layer at `surface_height` and no trees.
    pub fn flat(surface_height: i32) -> Self {
        WorldConfig {
            terrain: TerrainKind::Flat,
            surface_height,
            trees_per_chunk: 0,
            ..WorldConfig::default()
        }
    }

    /// A world of air, useful as a blank canvas.
    pub fn empty() -> Self {
        WorldConfig {
            terrain: TerrainKind::Empty,
            trees_per_chunk: 0,
            ..WorldConfig::default()
        }
    }
}

/// Parameters of player movement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub walk_speed: f32,
    pub gravity: f32,
    pub jump_force: f32,
    pub friction: f32,
    pub eye_height: f32,
    /// Maximum distance of block selection.
    pub reach: f32,
    /// Radians of rotation per unit of mouse movement.
    pub mouse_sensitivity: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        PlayerConfig {
            walk_speed: WALK_SPEED,
            gravity: GRAVITY,
            jump_force: JUMP_FORCE,
            friction: FRICTION_COEFFICIENT,
            eye_height: EYE_HEIGHT,
            reach: REACH_DISTANCE,
            mouse_sensitivity: 0.0025,
        }
    }
}

/// Top-level configuration of an engine session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub world: WorldConfig,
    pub player: PlayerConfig,
    /// Chunks within this many chunk steps of the player are kept generated.
    pub view_radius: i32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            world: WorldConfig::default(),
            player: PlayerConfig::default(),
            view_radius: 2,
        }
    }
}

impl EngineConfig {
    /// Parses a config from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a JSON config file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults_for_missing_fields() {
        let config = EngineConfig::from_json_str(
            r#"{ "world": { "terrain": "flat", "seed": 7 }, "view_radius": 3 }"#,
        )
        .unwrap();
        assert_eq!(config.world.terrain, TerrainKind::Flat);
        assert_eq!(config.world.seed, 7);
        assert_eq!(config.world.surface_height, WorldConfig::default().surface_height);
        assert_eq!(config.player, PlayerConfig::default());
        assert_eq!(config.view_radius, 3);
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let result = EngineConfig::from_json_str("{ \"world\": 12 }");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let result = EngineConfig::load("/definitely/not/a/config.json");
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
