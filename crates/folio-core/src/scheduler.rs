#![forbid(unsafe_code)]

//! Deterministic timer queue.
//!
//! Every `setTimeout` chain in the page scripts becomes a task in a
//! [`TimerQueue`]. The host reports time through a [`Clock`](crate::clock::Clock)
//! and calls [`TimerQueue::pop_due`] until it returns `None`; the browser
//! frontend arms one real timer for [`TimerQueue::next_deadline`].
//!
//! # Invariants
//!
//! 1. Tasks fire in deadline order; equal deadlines fire in scheduling order.
//! 2. A cancelled task never fires.
//! 3. A task never fires before its deadline.
//!
//! [`Debouncer`] layers trailing-edge debounce on top: re-arming cancels the
//! pending task so only the latest trigger in a burst fires.

use core::time::Duration;
use std::collections::BTreeMap;

/// Handle to a scheduled task, used for cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

impl TimerId {
    /// Raw sequence number (unique per queue).
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Ordered set of pending tasks keyed by `(deadline, sequence)`.
#[derive(Debug, Clone)]
pub struct TimerQueue<T> {
    pending: BTreeMap<(Duration, u64), T>,
    deadlines: BTreeMap<u64, Duration>,
    next_seq: u64,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TimerQueue<T> {
    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self {
            pending: BTreeMap::new(),
            deadlines: BTreeMap::new(),
            next_seq: 0,
        }
    }

    /// Schedule `task` to fire `delay` after `now`.
    pub fn schedule(&mut self, now: Duration, delay: Duration, task: T) -> TimerId {
        let seq = self.next_seq;
        self.next_seq += 1;
        let deadline = now.saturating_add(delay);
        self.pending.insert((deadline, seq), task);
        self.deadlines.insert(seq, deadline);
        crate::trace!(timer = seq, deadline_ms = deadline.as_millis() as u64, "timer scheduled");
        TimerId(seq)
    }

    /// Cancel a pending task. Returns the task if it had not fired yet.
    pub fn cancel(&mut self, id: TimerId) -> Option<T> {
        let deadline = self.deadlines.remove(&id.0)?;
        crate::trace!(timer = id.0, "timer cancelled");
        self.pending.remove(&(deadline, id.0))
    }

    /// Whether `id` is still waiting to fire.
    #[must_use]
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.deadlines.contains_key(&id.0)
    }

    /// Remove and return the earliest task whose deadline is `<= now`.
    pub fn pop_due(&mut self, now: Duration) -> Option<(TimerId, T)> {
        let (&(deadline, seq), _) = self.pending.first_key_value()?;
        if deadline > now {
            return None;
        }
        let task = self.pending.remove(&(deadline, seq))?;
        self.deadlines.remove(&seq);
        Some((TimerId(seq), task))
    }

    /// Earliest pending deadline, if any.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.pending.first_key_value().map(|(&(deadline, _), _)| deadline)
    }

    /// Number of pending tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether no task is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Iterate pending tasks in firing order.
    pub fn iter(&self) -> impl Iterator<Item = (Duration, &T)> + '_ {
        self.pending.iter().map(|(&(deadline, _), task)| (deadline, task))
    }

    /// Drop every pending task.
    pub fn clear(&mut self) {
        self.pending.clear();
        self.deadlines.clear();
    }
}

/// Trailing-edge debounce slot.
///
/// Holds at most one pending [`TimerId`]. Each [`Debouncer::arm`] cancels the
/// previous task, so a burst of triggers fires once, `delay` after the last.
#[derive(Debug, Clone, Copy)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<TimerId>,
}

impl Debouncer {
    /// Create a debouncer with the given trailing delay.
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Configured delay.
    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// (Re)arm the slot, cancelling any pending task.
    pub fn arm<T>(&mut self, queue: &mut TimerQueue<T>, now: Duration, task: T) -> TimerId {
        self.cancel(queue);
        let id = queue.schedule(now, self.delay, task);
        self.pending = Some(id);
        id
    }

    /// Cancel the pending task, if any.
    pub fn cancel<T>(&mut self, queue: &mut TimerQueue<T>) {
        if let Some(id) = self.pending.take() {
            queue.cancel(id);
        }
    }

    /// Mark `id` as fired. Returns `false` for a stale id (already superseded).
    pub fn fire(&mut self, id: TimerId) -> bool {
        if self.pending == Some(id) {
            self.pending = None;
            true
        } else {
            false
        }
    }

    /// Whether a task is waiting.
    #[must_use]
    pub const fn is_armed(&self) -> bool {
        self.pending.is_some()
    }
}
