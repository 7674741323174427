// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use crate::search::moves::TabuKey;
use std::collections::{HashSet, VecDeque};

/// Fixed-capacity FIFO memory of recently displaced assignments.
///
/// Keys age out strictly in insertion order; re-inserting a key already in
/// the list refreshes nothing (the original insertion keeps its slot).
#[derive(Debug, Clone)]
pub struct TabuList {
    capacity: usize,
    queue: VecDeque<TabuKey>,
    members: HashSet<TabuKey>,
}

impl TabuList {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            queue: VecDeque::with_capacity(capacity),
            members: HashSet::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    #[inline]
    pub fn contains(&self, key: &TabuKey) -> bool {
        self.members.contains(key)
    }

    /// Inserts a key, evicting the oldest entry once the list is full.
    pub fn insert(&mut self, key: TabuKey) {
        if self.members.contains(&key) {
            return;
        }
        if self.queue.len() == self.capacity
            && let Some(evicted) = self.queue.pop_front()
        {
            self.members.remove(&evicted);
        }
        self.queue.push_back(key);
        self.members.insert(key);
    }

    pub fn clear(&mut self) {
        self.queue.clear();
        self.members.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[inline]
    fn key(e: usize, d: usize, s: usize) -> TabuKey {
        TabuKey::new(e, d, s)
    }

    #[test]
    fn test_insert_and_contains() {
        let mut tabu = TabuList::new(3);
        assert!(tabu.is_empty());
        tabu.insert(key(0, 1, 2));
        assert!(tabu.contains(&key(0, 1, 2)));
        assert!(!tabu.contains(&key(0, 1, 1)));
        assert_eq!(tabu.len(), 1);
    }

    #[test]
    fn test_fifo_eviction_at_capacity() {
        let mut tabu = TabuList::new(2);
        tabu.insert(key(0, 0, 0));
        tabu.insert(key(1, 1, 1));
        tabu.insert(key(2, 2, 2));
        assert_eq!(tabu.len(), 2);
        assert!(!tabu.contains(&key(0, 0, 0)), "oldest key evicted");
        assert!(tabu.contains(&key(1, 1, 1)));
        assert!(tabu.contains(&key(2, 2, 2)));
    }

    #[test]
    fn test_duplicate_insert_keeps_original_slot() {
        let mut tabu = TabuList::new(2);
        tabu.insert(key(0, 0, 0));
        tabu.insert(key(1, 1, 1));
        tabu.insert(key(0, 0, 0)); // no-op
        tabu.insert(key(2, 2, 2)); // evicts (0,0,0), the true oldest
        assert!(!tabu.contains(&key(0, 0, 0)));
        assert!(tabu.contains(&key(1, 1, 1)));
    }

    #[test]
    fn test_clear_empties_everything() {
        let mut tabu = TabuList::new(4);
        tabu.insert(key(0, 0, 0));
        tabu.insert(key(1, 1, 1));
        tabu.clear();
        assert!(tabu.is_empty());
        assert!(!tabu.contains(&key(0, 0, 0)));
    }
}
