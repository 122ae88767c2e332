//! Indexed max-heap for lazy greedy
//!
//! Keys are gain estimates that go stale as the selection grows. Refreshing
//! an estimate must replace the entry rather than push a duplicate, and a
//! selected item must be removable by identity, so the heap keeps a
//! position index next to the binary heap array.
//!
//! | Operation          | Complexity |
//! |--------------------|------------|
//! | `insert_or_update` | O(log n)   |
//! | `pop_max`          | O(log n)   |
//! | `remove`           | O(log n)   |
//! | `peek_max`         | O(1)       |
//!
//! Ordering: larger gain first; equal gains pop in ascending key order.
//! Not thread-safe.

use std::cmp::Ordering;
use std::hash::Hash;

use rustc_hash::FxHashMap;

/// Max-heap of `(key, gain)` entries with in-place update and removal
#[derive(Debug, Clone)]
pub struct LazyMaxHeap<K> {
    heap: Vec<(K, f64)>,
    positions: FxHashMap<K, usize>,
}

impl<K: Copy + Eq + Hash + Ord> Default for LazyMaxHeap<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Copy + Eq + Hash + Ord> LazyMaxHeap<K> {
    /// Create an empty heap
    pub fn new() -> Self {
        Self {
            heap: Vec::new(),
            positions: FxHashMap::default(),
        }
    }

    /// Create an empty heap with pre-allocated capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: Vec::with_capacity(capacity),
            positions: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    /// Number of live entries
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Check if the heap is empty
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// The entry `pop_max` would return, without removing it
    pub fn peek_max(&self) -> Option<(K, f64)> {
        self.heap.first().copied()
    }

    /// Set the gain of `key`, inserting it if absent
    pub fn insert_or_update(&mut self, key: K, gain: f64) {
        match self.positions.get(&key) {
            Some(&pos) => {
                let old = self.heap[pos].1;
                self.heap[pos].1 = gain;
                match gain.total_cmp(&old) {
                    Ordering::Greater => self.sift_up(pos),
                    Ordering::Less => self.sift_down(pos),
                    Ordering::Equal => {}
                }
            }
            None => {
                let pos = self.heap.len();
                self.heap.push((key, gain));
                self.positions.insert(key, pos);
                self.sift_up(pos);
            }
        }
    }

    /// Remove and return the entry with the largest gain
    pub fn pop_max(&mut self) -> Option<(K, f64)> {
        self.take_at(0)
    }

    /// Remove `key`, returning its gain if it was present
    pub fn remove(&mut self, key: &K) -> Option<f64> {
        let pos = *self.positions.get(key)?;
        self.take_at(pos).map(|(_, gain)| gain)
    }

    fn take_at(&mut self, pos: usize) -> Option<(K, f64)> {
        let last = self.heap.len().checked_sub(1)?;
        self.swap(pos, last);
        let entry = self.heap.pop()?;
        self.positions.remove(&entry.0);
        if pos < self.heap.len() {
            self.sift_down(pos);
            self.sift_up(pos);
        }
        Some(entry)
    }

    /// `a` should sit above `b`
    #[inline]
    fn outranks(a: &(K, f64), b: &(K, f64)) -> bool {
        match a.1.total_cmp(&b.1) {
            Ordering::Greater => true,
            Ordering::Less => false,
            Ordering::Equal => a.0 < b.0,
        }
    }

    fn swap(&mut self, i: usize, j: usize) {
        if i == j {
            return;
        }
        self.heap.swap(i, j);
        self.positions.insert(self.heap[i].0, i);
        self.positions.insert(self.heap[j].0, j);
    }

    fn sift_up(&mut self, mut pos: usize) {
        while pos > 0 {
            let parent = (pos - 1) / 2;
            if !Self::outranks(&self.heap[pos], &self.heap[parent]) {
                break;
            }
            self.swap(pos, parent);
            pos = parent;
        }
    }

    fn sift_down(&mut self, mut pos: usize) {
        let len = self.heap.len();
        loop {
            let left = 2 * pos + 1;
            let right = left + 1;
            let mut top = pos;
            if left < len && Self::outranks(&self.heap[left], &self.heap[top]) {
                top = left;
            }
            if right < len && Self::outranks(&self.heap[right], &self.heap[top]) {
                top = right;
            }
            if top == pos {
                break;
            }
            self.swap(pos, top);
            pos = top;
        }
    }

    #[cfg(test)]
    fn check_invariants(&self) {
        assert_eq!(self.heap.len(), self.positions.len());
        for (pos, entry) in self.heap.iter().enumerate() {
            assert_eq!(self.positions[&entry.0], pos);
            if pos > 0 {
                let parent = &self.heap[(pos - 1) / 2];
                assert!(!Self::outranks(entry, parent), "heap order violated at {pos}");
            }
        }
    }
}

impl<K: Copy + Eq + Hash + Ord> Extend<(K, f64)> for LazyMaxHeap<K> {
    fn extend<I: IntoIterator<Item = (K, f64)>>(&mut self, iter: I) {
        for (key, gain) in iter {
            self.insert_or_update(key, gain);
        }
    }
}

impl<K: Copy + Eq + Hash + Ord> FromIterator<(K, f64)> for LazyMaxHeap<K> {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        let mut heap = Self::new();
        heap.extend(iter);
        heap
    }
}
