//! Per-key bounded top-K index over the pair counter.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::counter::PairCounter;
use crate::key::CanonicalKey;
use crate::topk::BoundedTopK;

/// Sentinel for an unlimited bucket size.
pub const UNBOUNDED_BUCKET: i64 = -1;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub count: u64,
    pub key: CanonicalKey,
}

/// Immutable mapping from a source key to its most co-occurring related
/// keys, count-descending. Built offline, loaded once per serving process.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RecommendationIndex {
    buckets: HashMap<CanonicalKey, Vec<IndexEntry>>,
}

impl RecommendationIndex {
    pub fn from_buckets(buckets: HashMap<CanonicalKey, Vec<IndexEntry>>) -> Self {
        Self { buckets }
    }

    /// An absent source key yields an empty bucket, not an error.
    pub fn bucket(&self, key: &CanonicalKey) -> &[IndexEntry] {
        self.buckets.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CanonicalKey, &[IndexEntry])> {
        self.buckets.iter().map(|(key, entries)| (key, entries.as_slice()))
    }
}

/// Build the index by feeding every counted pair through a bounded top-K
/// bucket per source key, then sorting each bucket count-descending.
///
/// `max_bucket_size` of [`UNBOUNDED_BUCKET`] lifts the cap. The final sort is
/// required: the bounded structure guarantees membership, not order.
pub fn build_index(counter: &PairCounter, max_bucket_size: i64) -> RecommendationIndex {
    let capacity = if max_bucket_size == UNBOUNDED_BUCKET {
        None
    } else {
        Some(max_bucket_size.max(0) as usize)
    };

    let mut heaps: Vec<(CanonicalKey, BoundedTopK<CanonicalKey>)> = Vec::new();
    let mut positions: HashMap<CanonicalKey, usize> = HashMap::new();

    for (source, related, count) in counter.iter() {
        let position = match positions.get(source) {
            Some(&position) => position,
            None => {
                let position = heaps.len();
                positions.insert(source.clone(), position);
                heaps.push((source.clone(), BoundedTopK::new(capacity)));
                position
            }
        };
        heaps[position].1.insert(count, related.clone());
    }

    let mut buckets = HashMap::with_capacity(heaps.len());
    for (source, heap) in heaps {
        let entries = heap
            .into_sorted_desc()
            .into_iter()
            .map(|(count, key)| IndexEntry { count, key })
            .collect();
        buckets.insert(source, entries);
    }
    RecommendationIndex { buckets }
}

#[cfg(test)]
mod tests {
    use super::{build_index, UNBOUNDED_BUCKET};
    use crate::counter::PairCounter;
    use crate::key::CanonicalKey;

    fn key(text: &str) -> CanonicalKey {
        CanonicalKey::new(text)
    }

    #[test]
    fn buckets_are_sorted_descending_by_count() {
        let mut counter = PairCounter::new();
        counter.add(key("shirt"), key("jeans"), 3);
        counter.add(key("shirt"), key("sneakers"), 7);
        counter.add(key("shirt"), key("coat"), 5);

        let index = build_index(&counter, UNBOUNDED_BUCKET);
        let bucket = index.bucket(&key("shirt"));

        let counts: Vec<u64> = bucket.iter().map(|entry| entry.count).collect();
        assert_eq!(counts, vec![7, 5, 3]);
        assert_eq!(bucket[0].key, key("sneakers"));
    }

    #[test]
    fn a_bounded_bucket_keeps_only_the_highest_counts() {
        let mut counter = PairCounter::new();
        counter.add(key("shirt"), key("jeans"), 5);
        counter.add(key("shirt"), key("coat"), 3);
        counter.add(key("shirt"), key("hat"), 1);

        let index = build_index(&counter, 2);
        let bucket = index.bucket(&key("shirt"));

        let counts: Vec<u64> = bucket.iter().map(|entry| entry.count).collect();
        assert_eq!(counts, vec![5, 3]);
    }

    #[test]
    fn each_source_key_gets_its_own_bucket() {
        let mut counter = PairCounter::new();
        counter.add(key("shirt"), key("jeans"), 2);
        counter.add(key("jeans"), key("shirt"), 2);

        let index = build_index(&counter, UNBOUNDED_BUCKET);
        assert_eq!(index.bucket_count(), 2);
        assert_eq!(index.bucket(&key("jeans")).len(), 1);
    }

    #[test]
    fn an_unknown_source_key_yields_an_empty_bucket() {
        let index = build_index(&PairCounter::new(), UNBOUNDED_BUCKET);
        assert!(index.bucket(&key("missing")).is_empty());
    }
}
