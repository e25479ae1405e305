//! Obstacle spawning
//!
//! Cacti appear ahead of the runner at randomized intervals. The runner
//! moves toward -y, so obstacles are placed `spawn_distance` below the
//! player's current y.

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::state::{GameState, SimEvent};
use crate::collab::{ModelHandle, ObjectHandle, SceneObjects};
use crate::error::ConfigError;
use crate::timer::TimerQueue;
use crate::tuning::Tuning;

/// Obstacle prefab category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObstacleCategory {
    Single,
    Double,
    Triple,
}

impl ObstacleCategory {
    /// Map a uniform roll in [0, 1): 75% single, 10% double, 15% triple
    pub fn from_roll(roll: f32) -> Self {
        if roll >= 0.25 {
            ObstacleCategory::Single
        } else if roll > 0.15 {
            ObstacleCategory::Double
        } else {
            ObstacleCategory::Triple
        }
    }
}

/// A live obstacle and the variant models it was dressed with
#[derive(Debug, Clone)]
pub struct SpawnedObstacle {
    pub handle: ObjectHandle,
    pub category: ObstacleCategory,
    /// One entry for a single cactus, one per child otherwise
    pub variants: Vec<ModelHandle>,
    pub position: Vec3,
}

/// Random wait before the next spawn: uniform in [delay/2, delay) ms
pub fn spawn_wait_ms(rng: &mut impl Rng, spawn_delay_ms: i32) -> i64 {
    let hi = spawn_delay_ms as i64;
    let lo = (spawn_delay_ms as f64 * 0.5).round_ties_even() as i64;
    let hi = if hi <= lo { lo + 1 } else { hi };
    rng.random_range(lo..hi)
}

#[derive(Debug, Clone)]
pub struct ObstacleSpawner {
    /// Driven by the day/night cycle: no spawns during night-hold
    pub stop_generation: bool,
    /// A spawn wait is in flight
    generating: bool,
    live: Vec<SpawnedObstacle>,
    rng: Pcg32,

    anchor: Vec3,
    single_prefab: String,
    double_prefab: String,
    triple_prefab: String,
    variants: Vec<ModelHandle>,
    min_player_z: f32,
    max_player_z: f32,
}

impl ObstacleSpawner {
    /// Loads the cactus variants once up front; at least one is required
    pub fn new(tuning: &Tuning, scene: &mut dyn SceneObjects) -> Result<Self, ConfigError> {
        if tuning.cactus_models.is_empty() {
            return Err(ConfigError::NoObstacleModels);
        }
        let variants = tuning
            .cactus_models
            .iter()
            .map(|path| scene.load_model(path))
            .collect();

        Ok(Self {
            stop_generation: false,
            generating: false,
            live: Vec::new(),
            rng: Pcg32::seed_from_u64(tuning.seed),
            anchor: tuning.spawn_anchor,
            single_prefab: tuning.single_prefab.clone(),
            double_prefab: tuning.double_prefab.clone(),
            triple_prefab: tuning.triple_prefab.clone(),
            variants,
            min_player_z: tuning.min_player_z,
            max_player_z: tuning.max_player_z,
        })
    }

    pub fn live(&self) -> &[SpawnedObstacle] {
        &self.live
    }

    pub fn is_generating(&self) -> bool {
        self.generating
    }

    /// Start a randomized wait if allowed and none is in flight
    pub fn poll(
        &mut self,
        state: GameState,
        spawn_delay_ms: i32,
        epoch: u32,
        timers: &mut TimerQueue<SimEvent>,
    ) {
        if self.stop_generation || self.generating || state != GameState::Playing {
            return;
        }
        self.generating = true;
        let wait = spawn_wait_ms(&mut self.rng, spawn_delay_ms);
        timers.schedule(wait as f64, SimEvent::SpawnElapsed { epoch });
    }

    /// Wait finished: spawn unless night started or the run ended meanwhile
    pub fn complete(
        &mut self,
        state: GameState,
        spawn_distance: f32,
        player_pos: Vec3,
        scene: &mut dyn SceneObjects,
    ) -> Option<ObjectHandle> {
        self.generating = false;
        if self.stop_generation {
            return None;
        }
        if state != GameState::Playing {
            log::debug!("Dropping obstacle spawn that finished in {state:?}");
            return None;
        }

        let category = ObstacleCategory::from_roll(self.rng.random::<f32>());
        Some(self.spawn(category, spawn_distance, player_pos, scene))
    }

    fn spawn(
        &mut self,
        category: ObstacleCategory,
        spawn_distance: f32,
        player_pos: Vec3,
        scene: &mut dyn SceneObjects,
    ) -> ObjectHandle {
        let prefab = match category {
            ObstacleCategory::Single => &self.single_prefab,
            ObstacleCategory::Double => &self.double_prefab,
            ObstacleCategory::Triple => &self.triple_prefab,
        };
        let position = Vec3::new(self.anchor.x, player_pos.y - spawn_distance, self.anchor.z);
        let handle = scene.clone_prefab(prefab, position);

        let mut variants = Vec::new();
        match category {
            ObstacleCategory::Single => {
                let model = self.random_variant();
                scene.set_model(handle, model);
                variants.push(model);
            }
            ObstacleCategory::Double | ObstacleCategory::Triple => {
                for child in scene.children(handle) {
                    let model = self.random_variant();
                    scene.set_model(child, model);
                    variants.push(model);
                }
            }
        }

        log::debug!("Spawned {category:?} obstacle at y={:.1}", position.y);
        self.live.push(SpawnedObstacle {
            handle,
            category,
            variants,
            position,
        });
        handle
    }

    fn random_variant(&mut self) -> ModelHandle {
        self.variants[self.rng.random_range(0..self.variants.len())]
    }

    /// Destroy every live obstacle and drop any in-flight wait
    pub fn clear(&mut self, scene: &mut dyn SceneObjects) {
        for obstacle in self.live.drain(..) {
            scene.destroy(obstacle.handle);
        }
        self.generating = false;
    }

    /// Warn when the player leaves the playable vertical band
    pub fn check_player_bounds(&self, player_pos: Vec3) -> bool {
        let inside = (self.min_player_z..=self.max_player_z).contains(&player_pos.z);
        if !inside {
            log::warn!("The player has left the map area (z={:.1})", player_pos.z);
        }
        inside
    }
}
