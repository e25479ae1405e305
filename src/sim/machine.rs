//! Game state machine
//!
//! Owns the run: Playing -> Dead -> MainMenu -> Playing. Each fixed tick
//! while playing runs, in order: the day/night cycle, the obstacle gate,
//! the difficulty step, score accumulation and achievement checks.
//!
//! Timed waits (score, spawns) live in a `TimerQueue` advanced by the host
//! between ticks with `advance_timers`.

use std::collections::BTreeSet;

use super::daynight::DayNightController;
use super::difficulty::DifficultyKnobs;
use super::obstacles::ObstacleSpawner;
use super::player::PlayerController;
use super::score::ScoreAccumulator;
use super::state::{GameState, SimEvent};
use crate::collab::{AxisLocks, Collaborators, InputState, Wiring};
use crate::consts::{ACH_1500_POINTS, ACH_500_POINTS, ACH_FIRST_NIGHT};
use crate::error::ConfigError;
use crate::timer::TimerQueue;
use crate::tuning::{DifficultySteps, Tuning};

pub struct GameStateMachine {
    state: GameState,
    /// Run generation; bumped on restart to orphan in-flight waits
    epoch: u32,

    defaults: DifficultyKnobs,
    knobs: DifficultyKnobs,
    steps: DifficultySteps,

    day_night: DayNightController,
    score: ScoreAccumulator,
    spawner: ObstacleSpawner,
    player: PlayerController,
    timers: TimerQueue<SimEvent>,

    /// Achievements already sent
    unlocked: BTreeSet<&'static str>,
    collab: Collaborators,
}

impl GameStateMachine {
    /// Validate the wiring once; a missing collaborator is a configuration error
    pub fn new(tuning: &Tuning, wiring: Wiring) -> Result<Self, ConfigError> {
        let (mut collab, stars, constellations) = wiring.validate()?;

        let defaults = DifficultyKnobs::from_tuning(tuning);
        let spawner = ObstacleSpawner::new(tuning, collab.scene.as_mut())?;
        let mut day_night = DayNightController::new(tuning, stars, constellations);

        // Start on a fully lit day
        day_night.set_day(collab.scene.as_mut(), collab.render.as_mut());
        day_night.recompute_threshold(0, true);

        if let Some(jump) = collab.jump_sound {
            collab.audio.assign(jump);
        }

        log::info!(
            "Game ready: first night at {}, score delay {}ms",
            day_night.next_night_at(),
            defaults.score_delay_ms()
        );

        Ok(Self {
            state: GameState::Playing,
            epoch: 0,
            defaults,
            knobs: defaults,
            steps: tuning.steps,
            day_night,
            score: ScoreAccumulator::new(),
            spawner,
            player: PlayerController::new(tuning.jump_power),
            timers: TimerQueue::new(),
            unlocked: BTreeSet::new(),
            collab,
        })
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn score(&self) -> u64 {
        self.score.score()
    }

    pub fn knobs(&self) -> &DifficultyKnobs {
        &self.knobs
    }

    pub fn knobs_mut(&mut self) -> &mut DifficultyKnobs {
        &mut self.knobs
    }

    pub fn default_knobs(&self) -> &DifficultyKnobs {
        &self.defaults
    }

    pub fn day_night(&self) -> &DayNightController {
        &self.day_night
    }

    pub fn day_night_mut(&mut self) -> &mut DayNightController {
        &mut self.day_night
    }

    pub fn spawner(&self) -> &ObstacleSpawner {
        &self.spawner
    }

    pub fn player(&self) -> &PlayerController {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut PlayerController {
        &mut self.player
    }

    pub fn unlocked(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.unlocked.iter().copied()
    }

    /// Apply every timed wait that finished during `dt_ms` of wall time
    pub fn advance_timers(&mut self, dt_ms: f64) {
        for event in self.timers.advance(dt_ms) {
            match event {
                SimEvent::ScoreElapsed { epoch } if epoch == self.epoch => {
                    self.score.complete(self.state);
                }
                SimEvent::SpawnElapsed { epoch } if epoch == self.epoch => {
                    let player_pos = self.collab.body.position();
                    self.spawner.complete(
                        self.state,
                        self.knobs.spawn_distance(),
                        player_pos,
                        self.collab.scene.as_mut(),
                    );
                }
                stale => log::debug!("Ignoring {stale:?} from an earlier run"),
            }
        }
    }

    /// One fixed simulation step
    pub fn fixed_tick(&mut self, dt: f32) {
        match self.state {
            GameState::Playing => self.tick_playing(dt),
            GameState::Dead => {
                self.display_main_menu();
                self.restart();
                self.day_night
                    .set_day(self.collab.scene.as_mut(), self.collab.render.as_mut());
            }
            GameState::MainMenu => {}
        }

        self.spawner.poll(
            self.state,
            self.knobs.spawn_delay_ms(),
            self.epoch,
            &mut self.timers,
        );
        self.spawner.check_player_bounds(self.collab.body.position());
        self.player
            .drive(self.state, self.knobs.player_speed(), self.collab.body.as_mut());
    }

    fn tick_playing(&mut self, dt: f32) {
        let score = self.score.score();
        self.day_night.tick(
            score,
            dt,
            self.collab.scene.as_mut(),
            self.collab.render.as_mut(),
        );
        self.spawner.stop_generation = self.day_night.is_night_hold();

        if self.day_night.phase() == 0.0 {
            self.knobs.step(&self.steps);
        }

        self.score.poll(
            self.state,
            self.knobs.score_delay_ms(),
            self.epoch,
            &mut self.timers,
        );
        self.give_achievements();
    }

    /// Variable-rate step: jump input
    pub fn handle_input(&mut self, input: &dyn InputState) -> bool {
        self.player.handle_input(
            self.state,
            input,
            self.collab.body.as_mut(),
            self.collab.audio.as_mut(),
        )
    }

    fn give_achievements(&mut self) {
        let score = self.score.score();
        if score >= 500 {
            self.unlock(ACH_500_POINTS);
        }
        if score >= 1500 {
            self.unlock(ACH_1500_POINTS);
        }
        if self.day_night.phase() == 1.0 {
            self.unlock(ACH_FIRST_NIGHT);
        }
    }

    fn unlock(&mut self, id: &'static str) {
        if self.unlocked.insert(id) {
            log::info!("Achievement unlocked: {id}");
            self.collab.achievements.unlock(id);
        }
    }

    /// Player hit an obstacle
    ///
    /// Only acts while Playing; any other state logs a warning and is left as is.
    pub fn kill_player(&mut self) {
        if self.state != GameState::Playing {
            log::warn!("kill_player ignored in {:?}", self.state);
            return;
        }
        self.state = GameState::Dead;
        log::info!("Player died at score {}", self.score.score());

        if let Some(hit) = self.collab.hit_sound {
            self.collab.audio.assign(hit);
        }
        self.collab.audio.play();
        if let Some(jump) = self.collab.jump_sound {
            self.collab.audio.assign(jump);
        }
    }

    fn display_main_menu(&mut self) {
        self.state = GameState::MainMenu;
        self.collab.ui.set_score_visible(false);
        self.collab.ui.set_menu_visible(true);
    }

    /// Resume play without resetting the run
    pub fn hide_main_menu(&mut self) {
        self.state = GameState::Playing;
        self.collab.ui.set_score_visible(true);
        self.collab.ui.set_menu_visible(false);
    }

    fn restart(&mut self) {
        self.collab.body.set_locking(AxisLocks::ALL);
        self.collab.body.set_position(self.collab.start_anchor);

        self.spawner.clear(self.collab.scene.as_mut());
        self.score.release();
        self.epoch = self.epoch.wrapping_add(1);
        self.knobs = self.defaults;
    }

    /// Begin a fresh run from the menu
    pub fn start_game(&mut self) {
        self.day_night
            .set_day(self.collab.scene.as_mut(), self.collab.render.as_mut());
        self.score.reset();
        self.day_night.recompute_threshold(0, true);
        self.state = GameState::Playing;
        self.collab.body.set_locking(AxisLocks::RUNNING);
        log::info!("Run started, first night at {}", self.day_night.next_night_at());
    }
}
