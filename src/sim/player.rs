//! Player locomotion and jump input

use glam::Vec3;

use super::state::GameState;
use crate::collab::{AudioTrigger, InputAction, InputState, PlayerBody};

#[derive(Debug, Clone)]
pub struct PlayerController {
    grounded: bool,
    jump_power: f32,
    last_state: GameState,
    /// Set on entering Playing; cleared once jump has been released
    wait_for_jump_release: bool,
}

impl PlayerController {
    pub fn new(jump_power: f32) -> Self {
        Self {
            grounded: true,
            jump_power,
            last_state: GameState::MainMenu,
            wait_for_jump_release: false,
        }
    }

    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    /// Contact with the ground reported by the host
    pub fn land(&mut self) {
        self.grounded = true;
    }

    /// Fixed tick: run along -y at `speed`, keeping vertical velocity
    pub fn drive(&self, state: GameState, speed: f32, body: &mut dyn PlayerBody) {
        if state == GameState::Playing {
            let vz = body.velocity().z;
            body.set_velocity(Vec3::new(0.0, -speed, vz));
        }
    }

    /// Variable tick: honour a held jump unless it is still held over from before the run
    pub fn handle_input(
        &mut self,
        state: GameState,
        input: &dyn InputState,
        body: &mut dyn PlayerBody,
        audio: &mut dyn AudioTrigger,
    ) -> bool {
        let jump_down = input.is_down(InputAction::Jump);

        if state == GameState::Playing && self.last_state != GameState::Playing {
            self.wait_for_jump_release = true;
        }
        if self.wait_for_jump_release && !jump_down {
            self.wait_for_jump_release = false;
        }
        self.last_state = state;

        if self.grounded && jump_down && state == GameState::Playing && !self.wait_for_jump_release {
            self.grounded = false;
            audio.play();
            body.apply_force(Vec3::new(0.0, 0.0, self.jump_power));
            return true;
        }
        false
    }
}
