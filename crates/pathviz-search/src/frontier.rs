//! Min-priority frontier for A*.
//!
//! Entries are ordered by `(f, seq)`: lower `f` is popped first, ties go to
//! the entry inserted earliest. Lowering a key pushes a fresh heap entry
//! under the same `seq` and leaves the old one behind; superseded entries
//! are skipped lazily on extraction by checking them against the live key
//! map.

use std::collections::{BinaryHeap, HashMap};

use pathviz_core::Point;

use crate::error::SearchError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Entry {
    f: i32,
    seq: u64,
    pos: Point,
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Reversed: BinaryHeap is a max-heap and we want smallest (f, seq).
        other.f.cmp(&self.f).then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// A mapping-backed min-priority queue of points keyed by f-score.
#[derive(Debug, Default)]
pub struct PriorityFrontier {
    heap: BinaryHeap<Entry>,
    live: HashMap<Point, (i32, u64)>,
    seq: u64,
}

impl PriorityFrontier {
    /// Create an empty frontier.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `pos` with key `f`, or lower its key if it is already queued.
    ///
    /// An existing entry is only touched when `f` is strictly lower, and it
    /// keeps its original insertion rank. Returns whether the frontier
    /// changed.
    pub fn insert_or_update(&mut self, pos: Point, f: i32) -> bool {
        match self.live.get_mut(&pos) {
            Some(key) => {
                if f >= key.0 {
                    return false;
                }
                key.0 = f;
                let seq = key.1;
                self.heap.push(Entry { f, seq, pos });
            }
            None => {
                let seq = self.seq;
                self.seq += 1;
                self.live.insert(pos, (f, seq));
                self.heap.push(Entry { f, seq, pos });
            }
        }
        true
    }

    /// Remove and return the entry with the lowest key (earliest inserted on
    /// ties).
    pub fn extract_min(&mut self) -> Result<(Point, i32), SearchError> {
        while let Some(e) = self.heap.pop() {
            if self.live.get(&e.pos) == Some(&(e.f, e.seq)) {
                self.live.remove(&e.pos);
                return Ok((e.pos, e.f));
            }
        }
        Err(SearchError::EmptyFrontier)
    }

    /// Whether `pos` is currently queued.
    #[inline]
    pub fn contains(&self, pos: Point) -> bool {
        self.live.contains_key(&pos)
    }

    /// Current key of `pos`, if queued.
    #[inline]
    pub fn key(&self, pos: Point) -> Option<i32> {
        self.live.get(&pos).map(|&(f, _)| f)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Number of queued points (superseded heap entries are not counted).
    #[inline]
    pub fn len(&self) -> usize {
        self.live.len()
    }

    /// Drop every entry and restart insertion numbering.
    pub fn clear(&mut self) {
        self.heap.clear();
        self.live.clear();
        self.seq = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: i32, y: i32) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn extracts_lowest_key_first() {
        let mut q = PriorityFrontier::new();
        q.insert_or_update(p(0, 0), 5);
        q.insert_or_update(p(1, 0), 2);
        q.insert_or_update(p(2, 0), 9);
        assert_eq!(q.extract_min(), Ok((p(1, 0), 2)));
        assert_eq!(q.extract_min(), Ok((p(0, 0), 5)));
        assert_eq!(q.extract_min(), Ok((p(2, 0), 9)));
        assert_eq!(q.extract_min(), Err(SearchError::EmptyFrontier));
    }

    #[test]
    fn ties_break_by_insertion_order() {
        let mut q = PriorityFrontier::new();
        q.insert_or_update(p(3, 3), 4);
        q.insert_or_update(p(0, 0), 4);
        q.insert_or_update(p(1, 1), 4);
        assert_eq!(q.extract_min().unwrap().0, p(3, 3));
        assert_eq!(q.extract_min().unwrap().0, p(0, 0));
        assert_eq!(q.extract_min().unwrap().0, p(1, 1));
    }

    #[test]
    fn only_strictly_lower_keys_update() {
        let mut q = PriorityFrontier::new();
        q.insert_or_update(p(0, 0), 6);
        assert!(!q.insert_or_update(p(0, 0), 6));
        assert!(!q.insert_or_update(p(0, 0), 8));
        assert_eq!(q.key(p(0, 0)), Some(6));
        assert!(q.insert_or_update(p(0, 0), 3));
        assert_eq!(q.key(p(0, 0)), Some(3));
        assert_eq!(q.len(), 1);

        // The superseded entry is never returned.
        assert_eq!(q.extract_min(), Ok((p(0, 0), 3)));
        assert!(q.is_empty());
        assert_eq!(q.extract_min(), Err(SearchError::EmptyFrontier));
    }

    #[test]
    fn update_keeps_original_rank() {
        let mut q = PriorityFrontier::new();
        q.insert_or_update(p(0, 0), 9);
        q.insert_or_update(p(1, 0), 5);
        // Lowered to tie with (1, 0); inserted first, so it wins.
        q.insert_or_update(p(0, 0), 5);
        assert_eq!(q.extract_min().unwrap().0, p(0, 0));
        assert_eq!(q.extract_min().unwrap().0, p(1, 0));
    }

    #[test]
    fn contains_and_clear() {
        let mut q = PriorityFrontier::new();
        q.insert_or_update(p(2, 2), 1);
        assert!(q.contains(p(2, 2)));
        assert!(!q.contains(p(0, 0)));
        q.clear();
        assert!(q.is_empty());
        assert!(!q.contains(p(2, 2)));

        // Reinsertion after extraction gets a fresh rank.
        q.insert_or_update(p(0, 0), 1);
        q.insert_or_update(p(1, 0), 1);
        let (first, _) = q.extract_min().unwrap();
        q.insert_or_update(first, 1);
        assert_eq!(q.extract_min().unwrap().0, p(1, 0));
        assert_eq!(q.extract_min().unwrap().0, p(0, 0));
    }
}
