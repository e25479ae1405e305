//! Deterministic simulation module
//!
//! All gameplay logic lives here:
//! - Fixed timestep for the state machine and day/night cycle
//! - Seeded RNG only, one stream per subsystem
//! - Timed waits as scheduled events, never threads
//! - Host capabilities reached only through `collab` traits

pub mod animator;
pub mod daynight;
pub mod difficulty;
pub mod machine;
pub mod obstacles;
pub mod player;
pub mod score;
pub mod state;

pub use animator::{AnimationMode, LocomotionAnimator, PlayerAnimation};
pub use daynight::{DayNightController, next_threshold, night_interval};
pub use difficulty::DifficultyKnobs;
pub use machine::GameStateMachine;
pub use obstacles::{ObstacleCategory, ObstacleSpawner, SpawnedObstacle};
pub use player::PlayerController;
pub use score::ScoreAccumulator;
pub use state::{GameState, SimEvent};
