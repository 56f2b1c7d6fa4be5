//! Bounded top-K admission over a count-ordered stream.

use std::cmp::Ordering;
use std::cmp::Reverse;
use std::collections::BinaryHeap;

struct Ranked<T> {
    count: u64,
    seq: u64,
    value: T,
}

impl<T> PartialEq for Ranked<T> {
    fn eq(&self, other: &Self) -> bool {
        self.count == other.count && self.seq == other.seq
    }
}

impl<T> Eq for Ranked<T> {}

impl<T> PartialOrd for Ranked<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Ranked<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        // seq is unique, so this is a total order without requiring T: Ord.
        (self.count, self.seq).cmp(&(other.count, other.seq))
    }
}

/// Min-heap-backed collection keeping at most `capacity` highest-count
/// entries.
///
/// Admission policy once full: a new entry replaces the current minimum only
/// when its count is strictly greater. A tie with the minimum is rejected, so
/// whichever tied entry arrived first is kept. Membership only; call
/// [`BoundedTopK::into_sorted_desc`] for the final ordering.
pub struct BoundedTopK<T> {
    capacity: Option<usize>,
    heap: BinaryHeap<Reverse<Ranked<T>>>,
    next_seq: u64,
}

impl<T> BoundedTopK<T> {
    /// `capacity: None` grows without limit.
    pub fn new(capacity: Option<usize>) -> Self {
        Self { capacity, heap: BinaryHeap::new(), next_seq: 0 }
    }

    pub fn insert(&mut self, count: u64, value: T) {
        let ranked = Ranked { count, seq: self.next_seq, value };
        self.next_seq += 1;

        match self.capacity {
            Some(capacity) if self.heap.len() >= capacity => {
                if let Some(Reverse(minimum)) = self.heap.peek() {
                    if ranked.count > minimum.count {
                        self.heap.pop();
                        self.heap.push(Reverse(ranked));
                    }
                }
            }
            _ => self.heap.push(Reverse(ranked)),
        }
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Drain into `(count, value)` pairs, count-descending, ties in
    /// insertion order.
    pub fn into_sorted_desc(self) -> Vec<(u64, T)> {
        let mut entries: Vec<Ranked<T>> =
            self.heap.into_iter().map(|Reverse(ranked)| ranked).collect();
        entries.sort_by(|left, right| {
            right.count.cmp(&left.count).then(left.seq.cmp(&right.seq))
        });
        entries.into_iter().map(|ranked| (ranked.count, ranked.value)).collect()
    }
}
