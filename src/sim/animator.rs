//! Frame-swap locomotion animation
//!
//! The running cycle is a list of models shown one after another. Progress is
//! kept in `frame_index` across interruptions, so a jump or a death freezes
//! the cycle on its current frame and the next run picks up from there.

use serde::{Deserialize, Serialize};

use super::state::GameState;
use crate::collab::{ModelHandle, ModelRenderer};
use crate::error::ConfigError;
use crate::timer::TimerQueue;
use crate::tuning::Tuning;

/// How the animator decides when to play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AnimationMode {
    /// Cycles regardless of game state or grounding (menu dummies, props)
    FreeRunning,
    /// Only while playing and grounded
    #[default]
    Gated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayerAnimation {
    #[default]
    Running,
    Crouching,
}

/// Per-frame wait finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FrameElapsed;

pub struct LocomotionAnimator {
    mode: AnimationMode,
    current: PlayerAnimation,
    frames: Vec<ModelHandle>,
    renderer: Box<dyn ModelRenderer>,
    frame_delay_ms: f64,
    /// Frame to show next; always in [0, frames.len())
    frame_index: usize,
    /// A pass through the cycle is in flight
    busy: bool,
    /// Frames completed in the current pass
    step: usize,
    timers: TimerQueue<FrameElapsed>,
}

impl LocomotionAnimator {
    pub fn new(
        tuning: &Tuning,
        renderer: Option<Box<dyn ModelRenderer>>,
    ) -> Result<Self, ConfigError> {
        let mut renderer =
            renderer.ok_or(ConfigError::MissingCollaborator("player model renderer"))?;
        if tuning.running_frames.is_empty() {
            return Err(ConfigError::EmptyAnimation);
        }

        let frames: Vec<ModelHandle> = tuning
            .running_frames
            .iter()
            .map(|path| renderer.load_model(path))
            .collect();
        renderer.set_model(frames[0]);

        Ok(Self {
            mode: tuning.animation_mode,
            current: PlayerAnimation::Running,
            frames,
            renderer,
            frame_delay_ms: tuning.frame_delay_ms as f64,
            frame_index: 0,
            busy: false,
            step: 0,
            timers: TimerQueue::new(),
        })
    }

    pub fn frame_index(&self) -> usize {
        self.frame_index
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn mode(&self) -> AnimationMode {
        self.mode
    }

    pub fn animation(&self) -> PlayerAnimation {
        self.current
    }

    pub fn set_animation(&mut self, animation: PlayerAnimation) {
        self.current = animation;
    }

    /// Variable-rate update: apply elapsed frame waits, then start a new pass if idle
    pub fn update(&mut self, dt_ms: f64, state: GameState, grounded: bool) {
        for FrameElapsed in self.timers.advance(dt_ms) {
            self.on_frame_elapsed(state, grounded);
        }
        if !self.busy {
            self.try_start(state, grounded);
        }
    }

    fn can_run(&self, state: GameState, grounded: bool) -> bool {
        if self.current != PlayerAnimation::Running {
            return false;
        }
        match self.mode {
            AnimationMode::FreeRunning => true,
            AnimationMode::Gated => state == GameState::Playing && grounded,
        }
    }

    fn try_start(&mut self, state: GameState, grounded: bool) {
        if !self.can_run(state, grounded) {
            return;
        }
        self.busy = true;
        self.step = 0;
        self.show_and_wait();
    }

    fn on_frame_elapsed(&mut self, state: GameState, grounded: bool) {
        let n = self.frames.len();
        self.frame_index = (self.frame_index % n + 1) % n;
        self.step += 1;

        if self.step >= n {
            self.busy = false;
            return;
        }
        // Airborne or no longer playing: freeze here, frame_index marks where to resume
        if self.mode == AnimationMode::Gated && !self.can_run(state, grounded) {
            self.busy = false;
            return;
        }
        self.show_and_wait();
    }

    fn show_and_wait(&mut self) {
        let frame = self.frames[self.frame_index % self.frames.len()];
        self.renderer.set_model(frame);
        self.timers.schedule(self.frame_delay_ms, FrameElapsed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::HeadlessWorld;

    fn animator(world: &HeadlessWorld, mode: AnimationMode) -> LocomotionAnimator {
        let tuning = Tuning {
            animation_mode: mode,
            ..Default::default()
        };
        LocomotionAnimator::new(&tuning, Some(Box::new(world.renderer()))).unwrap()
    }

    #[test]
    fn test_missing_renderer_is_config_error() {
        let result = LocomotionAnimator::new(&Tuning::default(), None);
        assert!(matches!(result, Err(ConfigError::MissingCollaborator(_))));
    }

    #[test]
    fn test_empty_sequence_is_config_error() {
        let world = HeadlessWorld::new();
        let tuning = Tuning {
            running_frames: Vec::new(),
            ..Default::default()
        };
        let result = LocomotionAnimator::new(&tuning, Some(Box::new(world.renderer())));
        assert!(matches!(result, Err(ConfigError::EmptyAnimation)));
    }

    #[test]
    fn test_cycles_while_grounded() {
        let world = HeadlessWorld::new();
        let mut anim = animator(&world, AnimationMode::Gated);

        anim.update(0.0, GameState::Playing, true);
        assert!(anim.is_busy());
        assert_eq!(anim.frame_index(), 0);

        for expected in 1..=10usize {
            anim.update(130.0, GameState::Playing, true);
            assert_eq!(anim.frame_index(), expected % 8);
            assert_eq!(world.player_model(), Some(anim.frames[expected % 8]));
        }
    }

    #[test]
    fn test_jump_freezes_without_reset() {
        let world = HeadlessWorld::new();
        let mut anim = animator(&world, AnimationMode::Gated);

        anim.update(0.0, GameState::Playing, true);
        anim.update(130.0, GameState::Playing, true);
        anim.update(130.0, GameState::Playing, true);
        assert_eq!(anim.frame_index(), 2);

        // Takes off mid-frame; the pending wait completes then the pass stops
        anim.update(130.0, GameState::Playing, false);
        assert_eq!(anim.frame_index(), 3);
        assert!(!anim.is_busy());
        let frozen = world.player_model();

        for _ in 0..5 {
            anim.update(130.0, GameState::Playing, false);
        }
        assert_eq!(anim.frame_index(), 3);
        assert_eq!(world.player_model(), frozen);

        // Lands: resumes from frame 3
        anim.update(0.0, GameState::Playing, true);
        assert_eq!(world.player_model(), Some(anim.frames[3]));
    }

    #[test]
    fn test_death_while_airborne_keeps_index() {
        let world = HeadlessWorld::new();
        let mut anim = animator(&world, AnimationMode::Gated);

        anim.update(0.0, GameState::Playing, true);
        for _ in 0..5 {
            anim.update(130.0, GameState::Playing, true);
        }
        anim.update(130.0, GameState::Playing, false);
        let index = anim.frame_index();

        anim.update(130.0, GameState::Dead, false);
        anim.update(130.0, GameState::MainMenu, false);
        anim.update(130.0, GameState::MainMenu, true);
        assert_eq!(anim.frame_index(), index);

        anim.update(0.0, GameState::Playing, true);
        assert_eq!(world.player_model(), Some(anim.frames[index]));
    }

    #[test]
    fn test_free_running_ignores_state() {
        let world = HeadlessWorld::new();
        let mut anim = animator(&world, AnimationMode::FreeRunning);

        anim.update(0.0, GameState::MainMenu, false);
        assert!(anim.is_busy());
        for _ in 0..12 {
            anim.update(130.0, GameState::Dead, false);
        }
        assert_eq!(anim.frame_index(), 12 % 8);
    }

    #[test]
    fn test_crouching_does_not_cycle() {
        let world = HeadlessWorld::new();
        let mut anim = animator(&world, AnimationMode::Gated);
        anim.set_animation(PlayerAnimation::Crouching);
        anim.update(130.0, GameState::Playing, true);
        assert!(!anim.is_busy());
        assert_eq!(anim.frame_index(), 0);
    }
}
