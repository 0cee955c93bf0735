//! Scoped Virtual Timers
//!
//! Engines own no OS timers. Every countdown and phase transition is an
//! entry in this queue, fired by the host-driven `advance(elapsed_ms)`
//! call in deterministic `(fire_at, id)` order. Clearing the queue on
//! completion/cleanup makes a timer firing into a disposed engine
//! structurally impossible.

use serde::{Serialize, Deserialize};

/// Handle for cancelling a scheduled timer.
pub type TimerId = u32;

/// What a fired timer means to the game logic.
///
/// Games interpret these in the context of their current phase; the queue
/// itself attaches no semantics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerAction {
    /// Repeating countdown tick
    Tick,
    /// End of a show/highlight/display phase
    PhaseEnd,
    /// Reveal the next step of a sequence
    StepShow,
    /// Feedback delay elapsed; move on
    Feedback,
    /// Reaction "go" signal
    Go,
}

#[derive(Clone, Debug)]
struct TimerEntry {
    id: TimerId,
    fire_at: u64,
    /// Re-arm period for repeating timers
    interval: Option<u64>,
    action: TimerAction,
}

/// Pending timers for one engine instance.
///
/// Never shared across engines. Small enough that a linear scan per fire
/// beats a heap.
#[derive(Debug, Default)]
pub struct TimerQueue {
    next_id: TimerId,
    entries: Vec<TimerEntry>,
}

impl TimerQueue {
    /// Empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a one-shot timer `delay_ms` after `now_ms`.
    pub fn schedule(&mut self, now_ms: u64, delay_ms: u64, action: TimerAction) -> TimerId {
        self.push(now_ms + delay_ms, None, action)
    }

    /// Schedule a repeating timer every `interval_ms` (minimum 1 ms).
    pub fn schedule_repeating(
        &mut self,
        now_ms: u64,
        interval_ms: u64,
        action: TimerAction,
    ) -> TimerId {
        let interval = interval_ms.max(1);
        self.push(now_ms + interval, Some(interval), action)
    }

    fn push(&mut self, fire_at: u64, interval: Option<u64>, action: TimerAction) -> TimerId {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        self.entries.push(TimerEntry {
            id,
            fire_at,
            interval,
            action,
        });
        id
    }

    /// Cancel a pending timer. Unknown ids are ignored.
    pub fn cancel(&mut self, id: TimerId) {
        self.entries.retain(|e| e.id != id);
    }

    /// Drop every pending timer.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// True if nothing is scheduled.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Fire the next timer due at or before `until`.
    ///
    /// Returns `(fire_time, action)` for the earliest entry, breaking ties
    /// by schedule order (id). Repeating entries are re-armed at
    /// `fire_time + interval`.
    pub fn fire_next(&mut self, until: u64) -> Option<(u64, TimerAction)> {
        let idx = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.fire_at <= until)
            .min_by_key(|(_, e)| (e.fire_at, e.id))
            .map(|(i, _)| i)?;

        let fire_at = self.entries[idx].fire_at;
        let action = self.entries[idx].action;

        match self.entries[idx].interval {
            Some(interval) => self.entries[idx].fire_at = fire_at + interval,
            None => {
                self.entries.swap_remove(idx);
            }
        }

        Some((fire_at, action))
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_shot_fires_once() {
        let mut q = TimerQueue::new();
        q.schedule(0, 100, TimerAction::PhaseEnd);

        assert_eq!(q.fire_next(99), None);
        assert_eq!(q.fire_next(100), Some((100, TimerAction::PhaseEnd)));
        assert_eq!(q.fire_next(10_000), None);
        assert!(q.is_empty());
    }

    #[test]
    fn test_repeating_rearms() {
        let mut q = TimerQueue::new();
        q.schedule_repeating(0, 100, TimerAction::Tick);

        assert_eq!(q.fire_next(350), Some((100, TimerAction::Tick)));
        assert_eq!(q.fire_next(350), Some((200, TimerAction::Tick)));
        assert_eq!(q.fire_next(350), Some((300, TimerAction::Tick)));
        assert_eq!(q.fire_next(350), None);
        assert!(!q.is_empty());
    }

    #[test]
    fn test_fire_order_by_time_then_id() {
        let mut q = TimerQueue::new();
        let _a = q.schedule(0, 200, TimerAction::PhaseEnd);
        let _b = q.schedule(0, 100, TimerAction::Feedback);
        let _c = q.schedule(0, 100, TimerAction::Go);

        // Earliest time first; same-time entries in schedule order
        assert_eq!(q.fire_next(1000), Some((100, TimerAction::Feedback)));
        assert_eq!(q.fire_next(1000), Some((100, TimerAction::Go)));
        assert_eq!(q.fire_next(1000), Some((200, TimerAction::PhaseEnd)));
    }

    #[test]
    fn test_cancel() {
        let mut q = TimerQueue::new();
        let id = q.schedule(0, 50, TimerAction::Go);
        q.schedule(0, 60, TimerAction::Feedback);

        q.cancel(id);
        assert_eq!(q.fire_next(1000), Some((60, TimerAction::Feedback)));
        assert_eq!(q.fire_next(1000), None);

        // Cancelling an unknown id is a no-op
        q.cancel(999);
    }

    #[test]
    fn test_clear() {
        let mut q = TimerQueue::new();
        q.schedule(0, 10, TimerAction::Tick);
        q.schedule_repeating(0, 10, TimerAction::Tick);
        q.clear();
        assert!(q.is_empty());
        assert_eq!(q.fire_next(u64::MAX), None);
    }

    #[test]
    fn test_zero_interval_clamped() {
        // A zero interval would spin forever; it is clamped to 1 ms.
        let mut q = TimerQueue::new();
        q.schedule_repeating(0, 0, TimerAction::Tick);
        assert_eq!(q.fire_next(2), Some((1, TimerAction::Tick)));
        assert_eq!(q.fire_next(2), Some((2, TimerAction::Tick)));
        assert_eq!(q.fire_next(2), None);
    }
}
