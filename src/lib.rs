//! Cactus Run - simulation core of a desert endless runner
//!
//! Core modules:
//! - `sim`: Game state machine, day/night cycle, scoring, obstacles, animation
//! - `collab`: Capabilities the core calls into (physics body, audio, scene, UI)
//! - `tuning`: Data-driven game balance
//! - `headless`: In-memory collaborators for tests and the headless binary

pub mod collab;
pub mod error;
pub mod headless;
pub mod runner;
pub mod sim;
pub mod timer;
pub mod tuning;

pub use error::ConfigError;
pub use runner::Runner;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (50 Hz, matches the physics rate)
    pub const SIM_DT: f32 = 1.0 / 50.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Achievement ids
    pub const ACH_500_POINTS: &str = "500-points";
    pub const ACH_1500_POINTS: &str = "1500-points";
    pub const ACH_FIRST_NIGHT: &str = "thefirstnight";

    /// Render attribute receiving the day/night scalar
    pub const INVERT_AMOUNT: &str = "InvertAmount";
}

/// Move `current` toward `target` by at most `max_delta`, snapping when within reach.
#[inline]
pub fn move_towards(current: f32, target: f32, max_delta: f32) -> f32 {
    if (target - current).abs() <= max_delta {
        return target;
    }
    current + (target - current).signum() * max_delta
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_move_towards_snaps() {
        assert_eq!(move_towards(0.9, 1.0, 0.2), 1.0);
        assert_eq!(move_towards(0.0, 1.0, 0.25), 0.25);
        assert_eq!(move_towards(0.5, 0.0, 0.1), 0.4);
    }

    proptest! {
        #[test]
        fn move_towards_is_bounded(
            current in 0.0f32..=1.0,
            target in prop::sample::select(vec![0.0f32, 1.0]),
            step in 0.0001f32..0.5,
        ) {
            let next = move_towards(current, target, step);
            prop_assert!((next - current).abs() <= step + 1e-6);
            prop_assert!((0.0..=1.0).contains(&next));
            if (target - current).abs() <= step {
                prop_assert_eq!(next, target);
            }
        }
    }
}
