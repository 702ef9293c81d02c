use crate::story::actions::StoryAction;
use bevy::prelude::*;
use std::collections::BTreeMap;
use std::time::Duration;

/// Handle to a scheduled continuation, used to cancel it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

/// Delayed story actions ordered by deadline, then by scheduling order.
///
/// Advanced by the frame clock; nothing fires outside `due`.
#[derive(Resource, Default, Debug)]
pub struct StoryScheduler {
    pending: BTreeMap<(Duration, u64), StoryAction>,
    next_seq: u64,
}

impl StoryScheduler {
    pub fn schedule(&mut self, now: Duration, delay: Duration, action: StoryAction) -> TimerHandle {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.insert((now + delay, seq), action);
        TimerHandle(seq)
    }

    /// Returns whether the timer was still pending.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let key = self
            .pending
            .keys()
            .find(|(_, seq)| *seq == handle.0)
            .copied();
        key.and_then(|key| self.pending.remove(&key)).is_some()
    }

    /// Drop every pending continuation. Returns how many were cancelled.
    pub fn cancel_all(&mut self) -> usize {
        let cancelled = self.pending.len();
        self.pending.clear();
        cancelled
    }

    /// Remove and return every action whose deadline is at or before `now`.
    pub fn due(&mut self, now: Duration) -> Vec<StoryAction> {
        let mut fired = Vec::new();
        while let Some(entry) = self.pending.first_entry() {
            if entry.key().0 > now {
                break;
            }
            fired.push(entry.remove());
        }
        fired
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.pending.keys().next().map(|(deadline, _)| *deadline)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
