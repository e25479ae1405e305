//! Game balance and wiring constants
//!
//! Loaded from JSON; any field left out falls back to its default.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::sim::animator::AnimationMode;

/// Score delay bounds (ms between score increments)
pub const SCORE_DELAY_RANGE: (f32, f32) = (80.0, 1400.0);
/// Player speed bounds (units/s)
pub const PLAYER_SPEED_RANGE: (f32, f32) = (200.0, 650.0);
/// Obstacle spawn delay bounds (ms)
pub const SPAWN_DELAY_RANGE: (i32, i32) = (3800, 9000);
/// Obstacle spawn distance bounds (units behind the player)
pub const SPAWN_DISTANCE_RANGE: (f32, f32) = (950.0, 2600.0);

/// Per-tick difficulty nudges, applied while it is fully day
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DifficultySteps {
    pub score_delay: f32,
    pub player_speed: f32,
    pub spawn_delay: i32,
    pub spawn_distance: f32,
}

impl Default for DifficultySteps {
    fn default() -> Self {
        Self {
            score_delay: 0.6,
            player_speed: 0.1,
            spawn_delay: 1,
            spawn_distance: 0.4,
        }
    }
}

/// Complete tuning set
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Run seed; each subsystem derives its own stream from it
    pub seed: u64,
    /// Fixed simulation step (seconds)
    pub fixed_dt: f32,

    // === Difficulty ===
    pub score_delay_ms: f32,
    pub player_speed: f32,
    pub spawn_delay_ms: i32,
    pub spawn_distance: f32,
    pub steps: DifficultySteps,

    // === Day/Night ===
    /// Score interval between nights: 250 -> nights at 250, 500, 750, ...
    pub points_to_night: f32,
    /// Phase change per second
    pub transition_speed: f32,
    pub night_hold_seconds: f32,

    // === Obstacles ===
    pub single_prefab: String,
    pub double_prefab: String,
    pub triple_prefab: String,
    pub cactus_models: Vec<String>,
    /// Lateral/vertical placement; y is replaced by the spawn coordinate
    pub spawn_anchor: Vec3,
    /// Playable vertical band for the player
    pub min_player_z: f32,
    pub max_player_z: f32,

    // === Player ===
    pub jump_power: f32,

    // === Animation ===
    pub frame_delay_ms: u32,
    pub animation_mode: AnimationMode,
    pub running_frames: Vec<String>,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            seed: 0x00C4_C705,
            fixed_dt: crate::consts::SIM_DT,

            score_delay_ms: 100.0,
            player_speed: 300.0,
            spawn_delay_ms: 6000,
            spawn_distance: 2000.0,
            steps: DifficultySteps::default(),

            points_to_night: 250.0,
            transition_speed: 0.5,
            night_hold_seconds: 25.0,

            single_prefab: "prefabs/cactus.prefab".into(),
            double_prefab: "prefabs/two_cactus.prefab".into(),
            triple_prefab: "prefabs/three_cactus.prefab".into(),
            cactus_models: vec![
                "models/vmdl/cactus.vmdl".into(),
                "models/vmdl/cactus2.vmdl".into(),
            ],
            spawn_anchor: Vec3::new(-32641.779, 0.0, 115.137),
            min_player_z: 35.0,
            max_player_z: 360.0,

            jump_power: 29000.0,

            frame_delay_ms: 130,
            animation_mode: AnimationMode::Gated,
            running_frames: (1..=8)
                .map(|i| format!("models/vmdl/dino/dino_{i}.vmdl"))
                .collect(),
        }
    }
}

impl Tuning {
    /// Parse and validate a JSON tuning document
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning.clamped())
    }

    /// Load from a file path
    pub fn load(path: &std::path::Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.fixed_dt > 0.0) {
            return Err(ConfigError::InvalidTuning(format!(
                "fixed_dt must be positive, got {}",
                self.fixed_dt
            )));
        }
        if self.min_player_z > self.max_player_z {
            return Err(ConfigError::InvalidTuning(format!(
                "min_player_z {} exceeds max_player_z {}",
                self.min_player_z, self.max_player_z
            )));
        }
        if self.cactus_models.is_empty() {
            return Err(ConfigError::InvalidTuning("cactus_models is empty".into()));
        }
        if self.transition_speed < 0.0 || self.night_hold_seconds < 0.0 {
            return Err(ConfigError::InvalidTuning(
                "day/night durations must not be negative".into(),
            ));
        }
        Ok(())
    }

    /// Difficulty defaults pulled into their legal ranges
    fn clamped(mut self) -> Self {
        self.score_delay_ms = self
            .score_delay_ms
            .clamp(SCORE_DELAY_RANGE.0, SCORE_DELAY_RANGE.1);
        self.player_speed = self
            .player_speed
            .clamp(PLAYER_SPEED_RANGE.0, PLAYER_SPEED_RANGE.1);
        self.spawn_delay_ms = self
            .spawn_delay_ms
            .clamp(SPAWN_DELAY_RANGE.0, SPAWN_DELAY_RANGE.1);
        self.spawn_distance = self
            .spawn_distance
            .clamp(SPAWN_DISTANCE_RANGE.0, SPAWN_DISTANCE_RANGE.1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let tuning = Tuning::from_json(r#"{ "points_to_night": 100 }"#).unwrap();
        assert_eq!(tuning.points_to_night, 100.0);
        assert_eq!(tuning.night_hold_seconds, 25.0);
        assert_eq!(tuning.running_frames.len(), 8);
        assert_eq!(tuning.animation_mode, AnimationMode::Gated);
    }

    #[test]
    fn test_out_of_range_defaults_are_clamped() {
        let tuning =
            Tuning::from_json(r#"{ "score_delay_ms": 5, "spawn_delay_ms": 20000 }"#).unwrap();
        assert_eq!(tuning.score_delay_ms, 80.0);
        assert_eq!(tuning.spawn_delay_ms, 9000);
    }

    #[test]
    fn test_rejects_inverted_bounds() {
        let err = Tuning::from_json(r#"{ "min_player_z": 500, "max_player_z": 10 }"#);
        assert!(matches!(err, Err(ConfigError::InvalidTuning(_))));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(
            Tuning::from_json("{ nope"),
            Err(ConfigError::InvalidTuning(_))
        ));
    }
}
