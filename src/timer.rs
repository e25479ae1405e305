//! Cooperative timer queue
//!
//! Timed waits are scheduled events rather than tasks. The owner advances
//! the queue between ticks and applies whatever fired, checking its own
//! guards at fire time.

/// A scheduled event
#[derive(Debug, Clone)]
struct Pending<E> {
    due_ms: f64,
    seq: u64,
    event: E,
}

/// Events keyed by due time on a private millisecond clock
#[derive(Debug, Clone)]
pub struct TimerQueue<E> {
    now_ms: f64,
    next_seq: u64,
    pending: Vec<Pending<E>>,
}

impl<E> Default for TimerQueue<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> TimerQueue<E> {
    pub fn new() -> Self {
        Self {
            now_ms: 0.0,
            next_seq: 0,
            pending: Vec::new(),
        }
    }

    /// Fire `event` once `delay_ms` has elapsed on this queue's clock
    pub fn schedule(&mut self, delay_ms: f64, event: E) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.push(Pending {
            due_ms: self.now_ms + delay_ms.max(0.0),
            seq,
            event,
        });
    }

    /// Advance the clock and drain everything now due, earliest first
    pub fn advance(&mut self, dt_ms: f64) -> Vec<E> {
        self.now_ms += dt_ms.max(0.0);
        let now = self.now_ms;

        let mut due: Vec<Pending<E>> = Vec::new();
        let mut i = 0;
        while i < self.pending.len() {
            if self.pending[i].due_ms <= now {
                due.push(self.pending.swap_remove(i));
            } else {
                i += 1;
            }
        }
        due.sort_by(|a, b| a.due_ms.total_cmp(&b.due_ms).then(a.seq.cmp(&b.seq)));
        due.into_iter().map(|p| p.event).collect()
    }

    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_in_due_order() {
        let mut q = TimerQueue::new();
        q.schedule(30.0, "c");
        q.schedule(10.0, "a");
        q.schedule(10.0, "b");
        assert!(q.advance(9.0).is_empty());
        assert_eq!(q.advance(25.0), vec!["a", "b", "c"]);
        assert!(q.is_empty());
    }

    #[test]
    fn test_schedule_is_relative_to_current_clock() {
        let mut q = TimerQueue::new();
        q.advance(100.0);
        q.schedule(50.0, 1u8);
        assert!(q.advance(49.0).is_empty());
        assert_eq!(q.advance(1.0), vec![1]);
        assert_eq!(q.now_ms(), 150.0);
    }
}
