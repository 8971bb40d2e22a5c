//! Deferred actions keyed by tick.
//!
//! Removal after impact is queued here rather than run inline. There is no
//! cancel: once an action is scheduled it will run at its tick.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::projectile::ProjectileId;

/// Action run by the zone at a later tick.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeferredAction {
    /// Remove a projectile from the world.
    Destroy(ProjectileId),
}

/// Tick-ordered action queue.
///
/// Actions due on the same tick run in scheduling order.
#[derive(Debug, Clone, Default)]
pub struct ActionQueue {
    pending: BTreeMap<(u64, u64), DeferredAction>,
    seq: u64,
}

impl ActionQueue {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules `action` to run at `due_tick`.
    pub fn schedule(&mut self, due_tick: u64, action: DeferredAction) {
        self.pending.insert((due_tick, self.seq), action);
        self.seq += 1;
    }

    /// Removes and returns every action due at or before `now`, in order.
    pub fn pop_due(&mut self, now: u64) -> Vec<DeferredAction> {
        let due = match now.checked_add(1) {
            Some(bound) => {
                let later = self.pending.split_off(&(bound, 0));
                std::mem::replace(&mut self.pending, later)
            }
            None => std::mem::take(&mut self.pending),
        };
        due.into_values().collect()
    }

    /// Tick of the earliest pending action.
    #[must_use]
    pub fn next_due(&self) -> Option<u64> {
        self.pending.keys().next().map(|(tick, _)| *tick)
    }

    /// Number of pending actions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Returns `true` if nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn destroy(id: u64) -> DeferredAction {
        DeferredAction::Destroy(ProjectileId::new(id))
    }

    #[test]
    fn nothing_runs_early() {
        let mut queue = ActionQueue::new();
        queue.schedule(5, destroy(1));
        assert!(queue.pop_due(4).is_empty());
        assert_eq!(queue.next_due(), Some(5));
        assert_eq!(queue.pop_due(5), vec![destroy(1)]);
        assert!(queue.is_empty());
    }

    #[test]
    fn same_tick_keeps_schedule_order() {
        let mut queue = ActionQueue::new();
        queue.schedule(3, destroy(2));
        queue.schedule(3, destroy(1));
        queue.schedule(1, destroy(9));
        assert_eq!(queue.pop_due(10), vec![destroy(9), destroy(2), destroy(1)]);
    }

    #[test]
    fn overdue_actions_still_run() {
        let mut queue = ActionQueue::new();
        queue.schedule(2, destroy(1));
        queue.schedule(8, destroy(2));
        assert_eq!(queue.pop_due(6), vec![destroy(1)]);
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn max_tick_does_not_overflow() {
        let mut queue = ActionQueue::new();
        queue.schedule(u64::MAX, destroy(1));
        assert_eq!(queue.pop_due(u64::MAX), vec![destroy(1)]);
    }
}
