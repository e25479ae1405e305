//! Cactus Run headless entry point
//!
//! Runs a scripted session against the in-memory host world: an autopilot
//! jumps over cacti, the run ends on contact (or is ended by the script),
//! and a second run starts from the menu.

use cactus_run::collab::PlayerBody;
use cactus_run::headless::{HeadlessWorld, Keys};
use cactus_run::sim::GameState;
use cactus_run::{Runner, Tuning};

/// Host frame rate for the scripted session
const FRAME_DT: f32 = 1.0 / 60.0;
/// Seconds per run before the script ends it
const RUN_SECONDS: f32 = 45.0;
/// Seconds spent on the menu between runs
const MENU_SECONDS: f32 = 2.0;
/// Contact distance between the player and a cactus
const REACH: f32 = 25.0;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let tuning = match std::env::args().nth(1) {
        Some(path) => match Tuning::load(std::path::Path::new(&path)) {
            Ok(tuning) => tuning,
            Err(err) => {
                log::error!("{err}; falling back to default tuning");
                Tuning::default()
            }
        },
        None => Tuning::default(),
    };

    let world = HeadlessWorld::new();
    let mut runner = Runner::new(&tuning, world.wiring(12, 5), Some(Box::new(world.renderer())));
    log::info!("Cactus Run (headless) starting, seed {:#x}", tuning.seed);

    for run in 1..=2 {
        runner.start_game();
        let final_score = play_run(&mut runner, &world);
        log::info!("Run {run} over with score {final_score}");

        let menu_frames = (MENU_SECONDS / FRAME_DT) as u32;
        for _ in 0..menu_frames {
            runner.frame(FRAME_DT, &Keys::none());
        }
    }

    if let Some(machine) = runner.machine() {
        let unlocked: Vec<_> = machine.unlocked().collect();
        log::info!("Achievements: {unlocked:?}");
    }
}

/// Play until death or the time limit; returns the score at the end
fn play_run(runner: &mut Runner, world: &HeadlessWorld) -> u64 {
    let body = world.body();
    let frames = (RUN_SECONDS / FRAME_DT) as u32;
    let mut nights = 0;
    let mut was_night = false;

    for _ in 0..frames {
        let Some(machine) = runner.machine() else {
            return 0;
        };
        if machine.state() != GameState::Playing {
            break;
        }
        let score = machine.score();

        // Autopilot: jump when a cactus is just ahead
        let player_y = body.position().y;
        let cactus_ahead = machine
            .spawner()
            .live()
            .iter()
            .any(|o| (40.0..150.0).contains(&(player_y - o.position.y)));
        let keys = if cactus_ahead { Keys::jump() } else { Keys::none() };

        runner.frame(FRAME_DT, &keys);
        if world.step_physics(FRAME_DT) {
            runner.land();
        }

        let night = runner
            .machine()
            .is_some_and(|m| m.day_night().is_night_hold());
        if night && !was_night {
            nights += 1;
        }
        was_night = night;

        if world.touching_obstacle(REACH) {
            log::info!("Hit a cactus at score {score}");
            runner.kill_player();
        }
    }

    let score = runner.machine().map(|m| m.score()).unwrap_or(0);
    if runner.machine().is_some_and(|m| m.state() == GameState::Playing) {
        log::info!("Time is up, ending the run");
        runner.kill_player();
    }
    // Let the death be processed into the menu
    runner.frame(FRAME_DT, &Keys::none());
    log::info!("Nights survived: {nights}");
    score
}
