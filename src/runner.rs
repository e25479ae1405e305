//! Frame driver
//!
//! Splits each host frame into: timer completions, fixed simulation ticks,
//! then the variable-rate step (jump input and locomotion animation).
//! Components that failed configuration are left out and the rest keep going.

use crate::collab::{InputState, ModelRenderer, Wiring};
use crate::consts::MAX_SUBSTEPS;
use crate::sim::{GameState, GameStateMachine, LocomotionAnimator};
use crate::tuning::Tuning;

pub struct Runner {
    machine: Option<GameStateMachine>,
    animator: Option<LocomotionAnimator>,
    accumulator: f32,
    fixed_dt: f32,
}

impl Runner {
    pub fn new(tuning: &Tuning, wiring: Wiring, renderer: Option<Box<dyn ModelRenderer>>) -> Self {
        let machine = GameStateMachine::new(tuning, wiring)
            .inspect_err(|err| log::error!("Game status disabled: {err}"))
            .ok();
        let animator = LocomotionAnimator::new(tuning, renderer)
            .inspect_err(|err| log::error!("Player animation disabled: {err}"))
            .ok();

        Self {
            machine,
            animator,
            accumulator: 0.0,
            fixed_dt: tuning.fixed_dt,
        }
    }

    pub fn machine(&self) -> Option<&GameStateMachine> {
        self.machine.as_ref()
    }

    pub fn machine_mut(&mut self) -> Option<&mut GameStateMachine> {
        self.machine.as_mut()
    }

    pub fn animator(&self) -> Option<&LocomotionAnimator> {
        self.animator.as_ref()
    }

    /// Advance one host frame of `dt` seconds; returns the fixed ticks run
    pub fn frame(&mut self, dt: f32, input: &dyn InputState) -> u32 {
        let dt = dt.clamp(0.0, 0.1);
        let dt_ms = dt as f64 * 1000.0;
        let mut substeps = 0;

        if let Some(machine) = self.machine.as_mut() {
            machine.advance_timers(dt_ms);

            self.accumulator += dt;
            while self.accumulator >= self.fixed_dt && substeps < MAX_SUBSTEPS {
                machine.fixed_tick(self.fixed_dt);
                self.accumulator -= self.fixed_dt;
                substeps += 1;
            }
            if substeps == MAX_SUBSTEPS {
                // Drop the backlog rather than spiral
                self.accumulator = self.accumulator.min(self.fixed_dt);
            }

            machine.handle_input(input);
        }

        if let Some(animator) = self.animator.as_mut() {
            let (state, grounded) = match &self.machine {
                Some(m) => (m.state(), m.player().is_grounded()),
                None => (GameState::MainMenu, true),
            };
            animator.update(dt_ms, state, grounded);
        }

        substeps
    }

    /// Ground contact from the host's physics
    pub fn land(&mut self) {
        if let Some(machine) = self.machine.as_mut() {
            machine.player_mut().land();
        }
    }

    /// External "kill player" trigger (obstacle contact)
    pub fn kill_player(&mut self) {
        match self.machine.as_mut() {
            Some(machine) => machine.kill_player(),
            None => log::error!("Cannot kill the player: game status is missing or not enabled"),
        }
    }

    /// Menu "play"
    pub fn start_game(&mut self) {
        match self.machine.as_mut() {
            Some(machine) => machine.start_game(),
            None => log::error!("Cannot start a run: game status is missing or not enabled"),
        }
    }

    pub fn hide_main_menu(&mut self) {
        match self.machine.as_mut() {
            Some(machine) => machine.hide_main_menu(),
            None => log::error!("Cannot hide the menu: game status is missing or not enabled"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::{HeadlessWorld, Keys};
    use crate::sim::AnimationMode;
    use crate::tuning::DifficultySteps;

    fn runner(world: &HeadlessWorld) -> Runner {
        Runner::new(
            &Tuning::default(),
            world.wiring(2, 3),
            Some(Box::new(world.renderer())),
        )
    }

    #[test]
    fn test_frame_runs_fixed_substeps() {
        let world = HeadlessWorld::new();
        let mut r = runner(&world);
        // 0.05s at 50 Hz: two ticks with 0.01s carried over
        assert_eq!(r.frame(0.05, &Keys::none()), 2);
        assert_eq!(r.frame(0.02, &Keys::none()), 1);
        // Long stalls are clamped
        assert!(r.frame(5.0, &Keys::none()) <= MAX_SUBSTEPS);
    }

    #[test]
    fn test_missing_scene_degrades() {
        let world = HeadlessWorld::new();
        let mut wiring = world.wiring(0, 0);
        wiring.scene = None;
        let tuning = Tuning {
            animation_mode: AnimationMode::FreeRunning,
            ..Default::default()
        };
        let mut r = Runner::new(&tuning, wiring, Some(Box::new(world.renderer())));
        assert!(r.machine().is_none());

        r.kill_player();
        r.start_game();
        for _ in 0..20 {
            assert_eq!(r.frame(0.1, &Keys::none()), 0);
        }
        // Animation keeps running on its own
        assert_ne!(r.animator().map(|a| a.frame_index()), Some(0));
    }

    #[test]
    fn test_jump_and_land_through_frames() {
        let world = HeadlessWorld::new();
        let mut r = runner(&world);

        r.frame(0.02, &Keys::none());
        r.frame(0.02, &Keys::jump());
        assert!(!r.machine().unwrap().player().is_grounded());
        assert_eq!(world.forces().len(), 1);
        assert_eq!(world.last_sound(), Some(crate::collab::SoundId(2)));

        r.land();
        assert!(r.machine().unwrap().player().is_grounded());
    }

    #[test]
    fn test_score_over_wall_time() {
        let world = HeadlessWorld::new();
        let tuning = Tuning {
            score_delay_ms: 100.0,
            steps: DifficultySteps {
                score_delay: 0.0,
                ..Default::default()
            },
            ..Default::default()
        };
        let mut r = Runner::new(&tuning, world.wiring(0, 0), Some(Box::new(world.renderer())));
        for _ in 0..100 {
            r.frame(1.0 / 60.0, &Keys::none());
        }
        // A point per 100ms wait, restarted on the next tick, over ~1.67s
        let score = r.machine().unwrap().score();
        assert!((12..=16).contains(&score), "score {score}");
    }
}
