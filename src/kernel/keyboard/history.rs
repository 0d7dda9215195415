use crate::core::Action;
use serde::Serialize;
use std::collections::VecDeque;
use std::time::SystemTime;

pub const DEFAULT_KEY_HISTORY_CAPACITY: usize = 64;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyRecord {
    pub combo: String,
    pub action: Option<Action>,
    pub at: SystemTime,
}

/// Fixed-capacity ring of recent key events, oldest evicted first.
#[derive(Debug, Clone)]
pub struct KeyHistory {
    capacity: usize,
    entries: VecDeque<KeyRecord>,
}

impl KeyHistory {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, record: KeyRecord) {
        while self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(record);
    }

    /// Attaches the resolved action to the most recent entry.
    pub fn resolve_last(&mut self, action: Action) {
        if let Some(last) = self.entries.back_mut() {
            last.action = Some(action);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &KeyRecord> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for KeyHistory {
    fn default() -> Self {
        Self::new(DEFAULT_KEY_HISTORY_CAPACITY)
    }
}
