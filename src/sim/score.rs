//! Timed score accumulation
//!
//! One point per `score_delay_ms`, counted on its own timer rather than the
//! fixed step. The delay is sampled when a wait starts.

use super::state::{GameState, SimEvent};
use crate::timer::TimerQueue;

#[derive(Debug, Clone, Default)]
pub struct ScoreAccumulator {
    score: u64,
    /// A wait is in flight
    waiting: bool,
}

impl ScoreAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn is_waiting(&self) -> bool {
        self.waiting
    }

    /// Start the next wait if none is in flight; the delay is whole milliseconds
    pub fn poll(
        &mut self,
        state: GameState,
        delay_ms: f32,
        epoch: u32,
        timers: &mut TimerQueue<SimEvent>,
    ) {
        if self.waiting || state != GameState::Playing {
            return;
        }
        self.waiting = true;
        timers.schedule(delay_ms.trunc() as f64, SimEvent::ScoreElapsed { epoch });
    }

    /// Wait finished; the point only counts if the run is still going
    pub fn complete(&mut self, state: GameState) {
        self.waiting = false;
        if state == GameState::Playing {
            self.score += 1;
        } else {
            log::debug!("Dropping score tick that finished in {state:?}");
        }
    }

    /// Forget any in-flight wait (its completion will be stale)
    pub fn release(&mut self) {
        self.waiting = false;
    }

    pub fn reset(&mut self) {
        self.score = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_wait_in_flight() {
        let mut timers = TimerQueue::new();
        let mut acc = ScoreAccumulator::new();

        acc.poll(GameState::Playing, 100.0, 0, &mut timers);
        acc.poll(GameState::Playing, 100.0, 0, &mut timers);
        assert_eq!(timers.len(), 1);

        for event in timers.advance(100.0) {
            assert_eq!(event, SimEvent::ScoreElapsed { epoch: 0 });
            acc.complete(GameState::Playing);
        }
        assert_eq!(acc.score(), 1);
        assert!(!acc.is_waiting());
    }

    #[test]
    fn test_delay_sampled_at_wait_start() {
        let mut timers = TimerQueue::new();
        let mut acc = ScoreAccumulator::new();

        acc.poll(GameState::Playing, 500.0, 0, &mut timers);
        // A faster delay now only affects the following wait
        acc.poll(GameState::Playing, 80.0, 0, &mut timers);
        assert!(timers.advance(499.0).is_empty());
        assert_eq!(timers.advance(1.0).len(), 1);
    }

    #[test]
    fn test_fractional_delay_truncated() {
        let mut timers = TimerQueue::new();
        let mut acc = ScoreAccumulator::new();
        acc.poll(GameState::Playing, 999.4, 0, &mut timers);
        assert!(timers.advance(998.0).is_empty());
        assert_eq!(timers.advance(1.0).len(), 1);
    }

    #[test]
    fn test_completion_after_death_is_dropped() {
        let mut timers = TimerQueue::new();
        let mut acc = ScoreAccumulator::new();
        acc.poll(GameState::Playing, 100.0, 0, &mut timers);
        timers.advance(100.0);
        acc.complete(GameState::Dead);
        assert_eq!(acc.score(), 0);
        assert!(!acc.is_waiting());
    }

    #[test]
    fn test_no_wait_outside_playing() {
        let mut timers = TimerQueue::new();
        let mut acc = ScoreAccumulator::new();
        acc.poll(GameState::MainMenu, 100.0, 0, &mut timers);
        assert!(timers.is_empty());
    }
}
