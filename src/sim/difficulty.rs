//! Difficulty knobs
//!
//! Four clamped tunables nudged toward harder values every fully-day tick
//! and restored to their stored defaults on restart.

use serde::{Deserialize, Serialize};

use crate::tuning::{
    DifficultySteps, PLAYER_SPEED_RANGE, SCORE_DELAY_RANGE, SPAWN_DELAY_RANGE,
    SPAWN_DISTANCE_RANGE, Tuning,
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyKnobs {
    score_delay_ms: f32,
    player_speed: f32,
    spawn_delay_ms: i32,
    spawn_distance: f32,
}

impl DifficultyKnobs {
    pub fn new(score_delay_ms: f32, player_speed: f32, spawn_delay_ms: i32, spawn_distance: f32) -> Self {
        let mut knobs = Self {
            score_delay_ms: SCORE_DELAY_RANGE.0,
            player_speed: PLAYER_SPEED_RANGE.0,
            spawn_delay_ms: SPAWN_DELAY_RANGE.0,
            spawn_distance: SPAWN_DISTANCE_RANGE.0,
        };
        knobs.set_score_delay_ms(score_delay_ms);
        knobs.set_player_speed(player_speed);
        knobs.set_spawn_delay_ms(spawn_delay_ms);
        knobs.set_spawn_distance(spawn_distance);
        knobs
    }

    pub fn from_tuning(tuning: &Tuning) -> Self {
        Self::new(
            tuning.score_delay_ms,
            tuning.player_speed,
            tuning.spawn_delay_ms,
            tuning.spawn_distance,
        )
    }

    pub fn score_delay_ms(&self) -> f32 {
        self.score_delay_ms
    }

    pub fn set_score_delay_ms(&mut self, value: f32) {
        self.score_delay_ms = value.clamp(SCORE_DELAY_RANGE.0, SCORE_DELAY_RANGE.1);
    }

    pub fn player_speed(&self) -> f32 {
        self.player_speed
    }

    pub fn set_player_speed(&mut self, value: f32) {
        self.player_speed = value.clamp(PLAYER_SPEED_RANGE.0, PLAYER_SPEED_RANGE.1);
    }

    pub fn spawn_delay_ms(&self) -> i32 {
        self.spawn_delay_ms
    }

    pub fn set_spawn_delay_ms(&mut self, value: i32) {
        self.spawn_delay_ms = value.clamp(SPAWN_DELAY_RANGE.0, SPAWN_DELAY_RANGE.1);
    }

    pub fn spawn_distance(&self) -> f32 {
        self.spawn_distance
    }

    pub fn set_spawn_distance(&mut self, value: f32) {
        self.spawn_distance = value.clamp(SPAWN_DISTANCE_RANGE.0, SPAWN_DISTANCE_RANGE.1);
    }

    /// One difficulty tick: faster scoring and running, denser and closer obstacles
    pub fn step(&mut self, steps: &DifficultySteps) {
        self.set_score_delay_ms(self.score_delay_ms - steps.score_delay);
        self.set_player_speed(self.player_speed + steps.player_speed);
        self.set_spawn_delay_ms(self.spawn_delay_ms.saturating_sub(steps.spawn_delay));
        self.set_spawn_distance(self.spawn_distance - steps.spawn_distance);
    }
}
