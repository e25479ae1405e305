//! Day/night cycle
//!
//! A phase scalar (0 = day, 1 = night) eased toward its target at a bounded
//! rate. Nights trigger on score multiples of `points_to_night` and hold for
//! a fixed time, during which the stars and one constellation are shown.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::collab::{ObjectHandle, RenderParams, SceneObjects};
use crate::consts::INVERT_AMOUNT;
use crate::move_towards;
use crate::tuning::Tuning;

/// Night interval for a given tunable, never below 1. Halves round to even.
pub fn night_interval(points_to_night: f32) -> u64 {
    (points_to_night.max(1.0).round_ties_even() as u64).max(1)
}

/// Smallest multiple of `interval` strictly greater than `score`
pub fn next_threshold(score: u64, interval: u64) -> u64 {
    let interval = interval.max(1);
    (score / interval + 1) * interval
}

#[derive(Debug, Clone)]
pub struct DayNightController {
    phase: f32,
    hold_timer: f32,
    next_night_at: u64,
    last_interval: u64,

    points_to_night: f32,
    transition_speed: f32,
    night_hold_seconds: f32,

    stars: Vec<ObjectHandle>,
    constellations: Vec<ObjectHandle>,
    /// Index into `constellations`, chosen on night entry
    active_constellation: Option<usize>,
    rng: Pcg32,
}

impl DayNightController {
    pub fn new(tuning: &Tuning, stars: Vec<ObjectHandle>, constellations: Vec<ObjectHandle>) -> Self {
        Self {
            phase: 0.0,
            hold_timer: 0.0,
            next_night_at: 0,
            last_interval: 0,
            points_to_night: tuning.points_to_night,
            transition_speed: tuning.transition_speed,
            night_hold_seconds: tuning.night_hold_seconds,
            stars,
            constellations,
            active_constellation: None,
            rng: Pcg32::seed_from_u64(tuning.seed ^ 0x5EED_0F_5A75),
        }
    }

    pub fn phase(&self) -> f32 {
        self.phase
    }

    pub fn hold_timer(&self) -> f32 {
        self.hold_timer
    }

    pub fn next_night_at(&self) -> u64 {
        self.next_night_at
    }

    /// Night-hold in progress (obstacles paused, decor shown)
    pub fn is_night_hold(&self) -> bool {
        self.hold_timer > 0.0
    }

    pub fn active_constellation(&self) -> Option<ObjectHandle> {
        self.active_constellation.map(|i| self.constellations[i])
    }

    pub fn points_to_night(&self) -> f32 {
        self.points_to_night
    }

    /// Takes effect on the next tick without retroactively firing a night
    pub fn set_points_to_night(&mut self, points: f32) {
        self.points_to_night = points;
    }

    /// Recompute the next threshold when forced or when the interval changed
    pub fn recompute_threshold(&mut self, score: u64, force: bool) {
        let interval = night_interval(self.points_to_night);
        if force || interval != self.last_interval {
            self.last_interval = interval;
            self.next_night_at = next_threshold(score, interval);
        }
    }

    /// One fixed step of the cycle. Returns true on the tick night begins.
    pub fn tick(
        &mut self,
        score: u64,
        dt: f32,
        scene: &mut dyn SceneObjects,
        render: &mut dyn RenderParams,
    ) -> bool {
        self.recompute_threshold(score, false);

        let mut entered = false;
        if self.next_night_at > 0 && score >= self.next_night_at && self.hold_timer <= 0.0 {
            self.hold_timer = self.night_hold_seconds;
            self.next_night_at += night_interval(self.points_to_night);
            entered = true;
            log::info!("Night falls at score {score}, next night at {}", self.next_night_at);
        }

        if self.hold_timer > 0.0 {
            self.hold_timer = (self.hold_timer - dt).max(0.0);
        }

        let target = if self.hold_timer > 0.0 { 1.0 } else { 0.0 };
        self.phase = move_towards(self.phase, target, self.transition_speed * dt);
        render.set_scalar(INVERT_AMOUNT, self.phase);

        self.sync_decor(scene);
        entered
    }

    /// Snap to full day: hold cleared, phase 0, decor hidden
    pub fn set_day(&mut self, scene: &mut dyn SceneObjects, render: &mut dyn RenderParams) {
        self.hold_timer = 0.0;
        self.phase = 0.0;
        render.set_scalar(INVERT_AMOUNT, self.phase);
        self.sync_decor(scene);
    }

    fn sync_decor(&mut self, scene: &mut dyn SceneObjects) {
        let night = self.is_night_hold();

        for &star in &self.stars {
            scene.set_enabled(star, night);
        }

        if night {
            if self.active_constellation.is_none() && !self.constellations.is_empty() {
                let idx = self.rng.random_range(0..self.constellations.len());
                self.active_constellation = Some(idx);
            }
        } else {
            self.active_constellation = None;
        }

        for (i, &member) in self.constellations.iter().enumerate() {
            scene.set_enabled(member, self.active_constellation == Some(i));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::HeadlessWorld;
    use proptest::prelude::*;

    fn controller(world: &HeadlessWorld) -> DayNightController {
        let stars = world.spawn_decor(3);
        let constellations = world.spawn_decor(4);
        DayNightController::new(&Tuning::default(), stars, constellations)
    }

    #[test]
    fn test_threshold_scenario() {
        let world = HeadlessWorld::new();
        let mut dn = controller(&world);
        let (mut scene, mut render) = (world.scene(), world.render());

        dn.recompute_threshold(240, true);
        assert_eq!(dn.next_night_at(), 250);

        assert!(!dn.tick(249, 0.02, &mut scene, &mut render));
        assert!(dn.tick(250, 0.02, &mut scene, &mut render));
        assert!((dn.hold_timer() - (25.0 - 0.02)).abs() < 1e-4);
        assert_eq!(dn.next_night_at(), 500);
    }

    #[test]
    fn test_interval_rounds_half_to_even() {
        assert_eq!(night_interval(2.5), 2);
        assert_eq!(night_interval(3.5), 4);
        assert_eq!(night_interval(250.4), 250);
        assert_eq!(night_interval(0.5), 1);
    }

    #[test]
    fn test_interval_change_does_not_fire_retroactively() {
        let world = HeadlessWorld::new();
        let mut dn = controller(&world);
        let (mut scene, mut render) = (world.scene(), world.render());

        dn.recompute_threshold(0, true);
        assert_eq!(dn.next_night_at(), 250);

        // Score 320 already passed the 300 multiple of the new interval
        dn.set_points_to_night(100.0);
        assert!(!dn.tick(320, 0.02, &mut scene, &mut render));
        assert_eq!(dn.next_night_at(), 400);
    }

    #[test]
    fn test_phase_eases_and_returns_to_day() {
        let world = HeadlessWorld::new();
        let tuning = Tuning {
            night_hold_seconds: 1.0,
            transition_speed: 2.0,
            ..Default::default()
        };
        let mut dn = DayNightController::new(&tuning, Vec::new(), Vec::new());
        let (mut scene, mut render) = (world.scene(), world.render());
        dn.recompute_threshold(0, true);

        dn.tick(250, 0.1, &mut scene, &mut render);
        assert!((dn.phase() - 0.2).abs() < 1e-5);

        for _ in 0..20 {
            dn.tick(250, 0.1, &mut scene, &mut render);
            assert!((0.0..=1.0).contains(&dn.phase()));
        }
        // Hold has run out by now and the phase is back to day
        assert!(!dn.is_night_hold());
        assert_eq!(dn.phase(), 0.0);
        assert_eq!(world.last_scalar(INVERT_AMOUNT), Some(0.0));
    }

    #[test]
    fn test_single_constellation_only_during_night() {
        let world = HeadlessWorld::new();
        let mut dn = controller(&world);
        let (mut scene, mut render) = (world.scene(), world.render());
        dn.recompute_threshold(0, true);

        dn.tick(10, 0.02, &mut scene, &mut render);
        assert_eq!(world.enabled_count(&dn.constellations), 0);
        assert_eq!(world.enabled_count(&dn.stars), 0);

        dn.tick(250, 0.02, &mut scene, &mut render);
        let chosen = dn.active_constellation();
        assert!(chosen.is_some());
        assert_eq!(world.enabled_count(&dn.constellations), 1);
        assert_eq!(world.enabled_count(&dn.stars), 3);

        // Selection persists for the whole night
        for _ in 0..10 {
            dn.tick(251, 0.02, &mut scene, &mut render);
            assert_eq!(dn.active_constellation(), chosen);
            assert_eq!(world.enabled_count(&dn.constellations), 1);
        }

        dn.set_day(&mut scene, &mut render);
        assert_eq!(dn.active_constellation(), None);
        assert_eq!(world.enabled_count(&dn.constellations), 0);
        assert_eq!(world.enabled_count(&dn.stars), 0);
    }

    proptest! {
        #[test]
        fn threshold_is_next_multiple(score in 0u64..1_000_000, interval in 1u64..10_000) {
            let t = next_threshold(score, interval);
            prop_assert_eq!(t % interval, 0);
            prop_assert!(t > score);
            prop_assert!(t - interval <= score);
        }

        #[test]
        fn interval_never_zero(points in -1e6f32..1e6) {
            prop_assert!(night_interval(points) >= 1);
        }
    }
}
