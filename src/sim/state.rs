//! Shared simulation types

use serde::{Deserialize, Serialize};

/// Overall game state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    /// Active run
    Playing,
    /// Player just died; cleaned up on the next tick
    Dead,
    /// Waiting for the menu to start a run
    MainMenu,
}

/// Timed-wait completions for the fixed-tick subsystems.
///
/// `epoch` is the run generation the wait was started in; completions from
/// an earlier run are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimEvent {
    ScoreElapsed { epoch: u32 },
    SpawnElapsed { epoch: u32 },
}
