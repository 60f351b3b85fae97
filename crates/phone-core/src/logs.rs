//! Append-only call logs
//!
//! Both the missed-call log and the call history keep every entry for the
//! lifetime of the process, newest first. Nothing is evicted or persisted.

use std::collections::VecDeque;

/// Newest-first, append-only sequence
#[derive(Debug, Clone)]
pub struct CallLog<T> {
    entries: VecDeque<T>,
}

impl<T> CallLog<T> {
    pub fn new() -> Self {
        Self {
            entries: VecDeque::new(),
        }
    }

    /// Prepend an entry so iteration yields it first
    pub fn push(&mut self, entry: T) {
        self.entries.push_front(entry);
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&T> {
        self.entries.front()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T: Clone> CallLog<T> {
    pub fn to_vec(&self) -> Vec<T> {
        self.entries.iter().cloned().collect()
    }
}

impl<T> Default for CallLog<T> {
    fn default() -> Self {
        Self::new()
    }
}
