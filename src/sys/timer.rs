//! One-shot timers that fire back into the reactor.
//!
//! The queue only stores deadlines; the reactor's event loop sleeps until
//! [`TimerQueue::next_deadline`] and then drains [`TimerQueue::take_expired`].
//! Deadlines come from tokio's clock so a paused runtime can drive them.

use std::time::Duration;

use slotmap::{SlotMap, new_key_type};
use tokio::time::Instant;

use crate::model::Rect;
use crate::sys::window_system::WindowId;

new_key_type! {
    pub struct TimerId;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timeout {
    /// Debounced write of the window's frame to the remembered position.
    Persist(WindowId),
    /// A delayed retry of moving the window back to `position`.
    Restore { window: WindowId, attempt: u8, position: Rect },
}

#[derive(Debug)]
struct Entry {
    deadline: Instant,
    seq: u64,
    timeout: Timeout,
}

#[derive(Debug, Default)]
pub struct TimerQueue {
    entries: SlotMap<TimerId, Entry>,
    next_seq: u64,
}

impl TimerQueue {
    pub fn new() -> Self { Self::default() }

    pub fn schedule(&mut self, delay: Duration, timeout: Timeout) -> TimerId {
        let seq = self.next_seq;
        self.next_seq = self.next_seq.wrapping_add(1);
        self.entries.insert(Entry { deadline: Instant::now() + delay, seq, timeout })
    }

    /// Returns false if the timer already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool { self.entries.remove(id).is_some() }

    pub fn is_pending(&self, id: TimerId) -> bool { self.entries.contains_key(id) }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.entries.values().map(|entry| entry.deadline).min()
    }

    /// Removes every timer due at `now`, earliest first. Timers sharing a
    /// deadline come out in the order they were scheduled.
    pub fn take_expired(&mut self, now: Instant) -> Vec<(TimerId, Timeout)> {
        let mut due: Vec<(Instant, u64, TimerId)> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.deadline <= now)
            .map(|(id, entry)| (entry.deadline, entry.seq, id))
            .collect();
        due.sort_unstable_by_key(|&(deadline, seq, _)| (deadline, seq));

        due.into_iter()
            .filter_map(|(_, _, id)| self.entries.remove(id).map(|entry| (id, entry.timeout)))
            .collect()
    }

    pub fn clear(&mut self) { self.entries.clear(); }

    pub fn len(&self) -> usize { self.entries.len() }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }
}
