//! Delayed effects processed once per tick
//!
//! A `TimerQueue` owns a local clock. Effects are scheduled relative to that
//! clock and handed back by [`TimerQueue::advance`] once they come due.
//! Dropping or clearing the queue cancels everything still pending, which is
//! how round resets keep old timers from firing against a fresh fighter.

use smallvec::SmallVec;

#[derive(Debug, Clone, PartialEq)]
struct Scheduled<T> {
    due_ms: f32,
    seq: u64,
    item: T,
}

/// Millisecond clock plus the effects waiting on it
#[derive(Debug, Clone, PartialEq)]
pub struct TimerQueue<T> {
    now_ms: f32,
    next_seq: u64,
    pending: Vec<Scheduled<T>>,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self {
            now_ms: 0.0,
            next_seq: 0,
            pending: Vec::new(),
        }
    }
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current time on this queue's clock
    pub fn now_ms(&self) -> f32 {
        self.now_ms
    }

    /// Run `item` once `delay_ms` has elapsed on this clock.
    pub fn schedule(&mut self, delay_ms: f32, item: T) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.push(Scheduled {
            due_ms: self.now_ms + delay_ms.max(0.0),
            seq,
            item,
        });
    }

    /// Advance the clock and return every effect that is now due,
    /// earliest first (ties in scheduling order).
    pub fn advance(&mut self, dt_ms: f32) -> SmallVec<[T; 4]> {
        self.now_ms += dt_ms;
        self.take_due()
    }

    /// Effects due at the current time, without moving the clock.
    pub fn take_due(&mut self) -> SmallVec<[T; 4]> {
        let now = self.now_ms;
        if !self.pending.iter().any(|entry| entry.due_ms <= now) {
            return SmallVec::new();
        }

        let (mut due, rest): (Vec<_>, Vec<_>) = std::mem::take(&mut self.pending)
            .into_iter()
            .partition(|entry| entry.due_ms <= now);
        self.pending = rest;

        due.sort_by(|a, b| a.due_ms.total_cmp(&b.due_ms).then(a.seq.cmp(&b.seq)));
        due.into_iter().map(|entry| entry.item).collect()
    }

    /// Drop every pending effect. The clock keeps running.
    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
