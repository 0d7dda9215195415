//! Bounded, per-pane coalescing queue behind `PaneRegistry::queue_update`.

use super::kind::PaneId;
use rustc_hash::FxHashMap;
use serde::Serialize;
use serde_json::Value;
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QueueOutcome {
    Queued,
    /// An update for the same pane was already waiting; the new payload replaced it.
    Coalesced,
    /// The queue already holds its capacity of distinct panes; the payload was rejected.
    Full,
}

#[derive(Debug)]
pub struct DebounceQueue {
    capacity: usize,
    order: VecDeque<PaneId>,
    pending: FxHashMap<PaneId, Value>,
    rejected: u64,
}

impl DebounceQueue {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            order: VecDeque::new(),
            pending: FxHashMap::default(),
            rejected: 0,
        }
    }

    pub fn push(&mut self, pane: PaneId, payload: Value) -> QueueOutcome {
        if let Some(slot) = self.pending.get_mut(&pane) {
            *slot = payload;
            return QueueOutcome::Coalesced;
        }
        if self.pending.len() >= self.capacity {
            self.rejected += 1;
            return QueueOutcome::Full;
        }
        self.order.push_back(pane.clone());
        self.pending.insert(pane, payload);
        QueueOutcome::Queued
    }

    pub fn remove(&mut self, pane: &PaneId) -> bool {
        if self.pending.remove(pane).is_none() {
            return false;
        }
        self.order.retain(|queued| queued != pane);
        true
    }

    /// Takes every pending update in first-queued order.
    pub fn drain(&mut self) -> Vec<(PaneId, Value)> {
        let mut drained = Vec::with_capacity(self.order.len());
        while let Some(pane) = self.order.pop_front() {
            if let Some(payload) = self.pending.remove(&pane) {
                drained.push((pane, payload));
            }
        }
        drained
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn rejected(&self) -> u64 {
        self.rejected
    }
}
