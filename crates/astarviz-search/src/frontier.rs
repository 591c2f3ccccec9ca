//! Min-priority frontier for best-first search.
//!
//! Entries are stored in a min-heap keyed by `(priority, insertion_order)`.
//! Lower priorities are popped first; ties are broken by insertion order
//! (FIFO), which keeps expansion order reproducible.
//!
//! There is no decrease-key. Pushing a node that is already queued adds a
//! second entry, and the search discards whichever entry turns out stale
//! when it is popped. [`len`](PriorityFrontier::len) therefore counts stale
//! entries too and is not the size of the open set.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// An entry popped from a [`PriorityFrontier`].
#[derive(Debug, Clone, Copy)]
pub struct FrontierEntry<N> {
    pub node: N,
    pub priority: i32,
    /// Monotonically increasing counter used to break ties.
    pub seq: u64,
}

impl<N> PartialEq for FrontierEntry<N> {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority && self.seq == other.seq
    }
}

impl<N> Eq for FrontierEntry<N> {}

impl<N> PartialOrd for FrontierEntry<N> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<N> Ord for FrontierEntry<N> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Natural order; the heap wraps entries in Reverse.
        self.priority
            .cmp(&other.priority)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

/// A min-priority queue with FIFO tie-breaking.
#[derive(Debug, Clone)]
pub struct PriorityFrontier<N = usize> {
    heap: BinaryHeap<Reverse<FrontierEntry<N>>>,
    seq: u64,
}

impl<N> PriorityFrontier<N> {
    /// Create an empty frontier.
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            seq: 0,
        }
    }

    /// Insert `node` at `priority`. Always adds a new entry, even if the
    /// node is already queued.
    pub fn push(&mut self, node: N, priority: i32) {
        let seq = self.seq;
        self.seq += 1;
        self.heap.push(Reverse(FrontierEntry {
            node,
            priority,
            seq,
        }));
    }

    /// Remove and return the entry with the lowest priority (ties broken
    /// FIFO).
    pub fn pop_min(&mut self) -> Option<FrontierEntry<N>> {
        self.heap.pop().map(|Reverse(entry)| entry)
    }

    /// Look at the entry [`pop_min`](Self::pop_min) would return.
    pub fn peek(&self) -> Option<&FrontierEntry<N>> {
        self.heap.peek().map(|Reverse(entry)| entry)
    }

    /// Priority of the lowest entry, stale or not.
    pub fn peek_priority(&self) -> Option<i32> {
        self.peek().map(|e| e.priority)
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Number of entries, including stale duplicates.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Drop every entry and restart the insertion counter.
    pub fn clear(&mut self) {
        self.heap.clear();
        self.seq = 0;
    }
}

impl<N> Default for PriorityFrontier<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pops_lowest_priority_first() {
        let mut q = PriorityFrontier::new();
        q.push("a", 3);
        q.push("b", 1);
        q.push("c", 2);

        assert_eq!(q.pop_min().map(|e| e.node), Some("b"));
        assert_eq!(q.pop_min().map(|e| e.node), Some("c"));
        assert_eq!(q.pop_min().map(|e| e.node), Some("a"));
        assert!(q.pop_min().is_none());
    }

    #[test]
    fn equal_priorities_are_fifo() {
        let mut q = PriorityFrontier::new();
        q.push("first", 1);
        q.push("second", 1);
        q.push("third", 1);

        assert_eq!(q.pop_min().map(|e| e.node), Some("first"));
        assert_eq!(q.pop_min().map(|e| e.node), Some("second"));
        assert_eq!(q.pop_min().map(|e| e.node), Some("third"));
    }

    #[test]
    fn duplicates_are_kept() {
        let mut q = PriorityFrontier::new();
        q.push(7usize, 5);
        q.push(7usize, 3);
        assert_eq!(q.len(), 2);

        let e = q.pop_min().unwrap();
        assert_eq!((e.node, e.priority), (7, 3));
        let e = q.pop_min().unwrap();
        assert_eq!((e.node, e.priority), (7, 5));
    }

    #[test]
    fn peek_matches_pop() {
        let mut q = PriorityFrontier::new();
        assert_eq!(q.peek_priority(), None);
        q.push(1usize, 4);
        q.push(2usize, 2);
        assert_eq!(q.peek().map(|e| e.node), Some(2));
        assert_eq!(q.peek_priority(), Some(2));
        assert_eq!(q.pop_min().map(|e| e.node), Some(2));
    }

    #[test]
    fn clear_restarts_sequence() {
        let mut q = PriorityFrontier::new();
        q.push(1usize, 1);
        q.push(2usize, 1);
        q.clear();
        assert!(q.is_empty());
        q.push(3usize, 1);
        assert_eq!(q.pop_min().map(|e| e.seq), Some(0));
    }
}
