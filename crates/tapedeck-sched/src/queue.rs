//! Pending-event set with deterministic ordering.
//!
//! [`EventQueue`] stores items keyed by `(due_tick, event_id)`. Event ids
//! come from a monotonic counter, so the composite key sorts events due on
//! the same tick in creation (FIFO) order.
//!
//! Draining is two-phase: [`due_ids()`](EventQueue::due_ids) snapshots the
//! keys that are due, then each item is claimed with
//! [`remove()`](EventQueue::remove). Items removed between the two phases
//! are skipped by the caller; items inserted between them are not in the
//! snapshot.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use tapedeck_core::{EventId, TickId};

/// Ordered set of pending items with O(log n) removal by id.
pub struct EventQueue<T> {
    by_due: BTreeMap<(TickId, EventId), T>,
    due_of: IndexMap<EventId, TickId>,
}

impl<T> EventQueue<T> {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self {
            by_due: BTreeMap::new(),
            due_of: IndexMap::new(),
        }
    }

    /// Insert `item` due at `due` under `id`.
    ///
    /// Ids must be unique among pending items; the scheduler guarantees
    /// this by allocating them from a counter.
    pub fn insert(&mut self, due: TickId, id: EventId, item: T) {
        debug_assert!(!self.due_of.contains_key(&id), "duplicate event id {id}");
        self.by_due.insert((due, id), item);
        self.due_of.insert(id, due);
    }

    /// Remove and return the item for `id`, if still pending.
    pub fn remove(&mut self, id: EventId) -> Option<T> {
        let due = self.due_of.swap_remove(&id)?;
        self.by_due.remove(&(due, id))
    }

    /// Snapshot the ids of every item due at or before `now`, in
    /// `(due_tick, event_id)` order.
    pub fn due_ids(&self, now: TickId) -> Vec<EventId> {
        self.by_due
            .range(..=(now, EventId(u64::MAX)))
            .map(|(&(_, id), _)| id)
            .collect()
    }

    /// Tick at which `id` is due, if pending.
    pub fn due_tick(&self, id: EventId) -> Option<TickId> {
        self.due_of.get(&id).copied()
    }

    /// Earliest due tick among pending items.
    pub fn next_due(&self) -> Option<TickId> {
        self.by_due.keys().next().map(|&(due, _)| due)
    }

    /// Whether `id` is pending.
    pub fn contains(&self, id: EventId) -> bool {
        self.due_of.contains_key(&id)
    }

    /// Number of pending items.
    pub fn len(&self) -> usize {
        self.due_of.len()
    }

    /// Whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.due_of.is_empty()
    }

    /// Drop every pending item.
    pub fn clear(&mut self) {
        self.by_due.clear();
        self.due_of.clear();
    }
}

impl<T> Default for EventQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
