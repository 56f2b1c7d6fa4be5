//! Offline pairwise co-occurrence counting over outfit groups.

use std::collections::HashMap;

use crate::domain::attribute::{Attribute, AttributeSchema};
use crate::domain::item::GroupedRow;
use crate::key::{category_root, encode, CanonicalKey};

/// Directional pair counts, insertion-ordered.
///
/// Iteration order matters downstream: bounded index buckets break count ties
/// by arrival order, so the counter must replay pairs in the order the batch
/// input produced them rather than in hash order.
#[derive(Clone, Debug, Default)]
pub struct PairCounter {
    entries: Vec<(CanonicalKey, CanonicalKey, u64)>,
    positions: HashMap<(CanonicalKey, CanonicalKey), usize>,
}

impl PairCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&mut self, source: CanonicalKey, related: CanonicalKey) {
        self.add(source, related, 1);
    }

    pub fn add(&mut self, source: CanonicalKey, related: CanonicalKey, count: u64) {
        let pair = (source, related);
        if let Some(&position) = self.positions.get(&pair) {
            self.entries[position].2 += count;
        } else {
            let position = self.entries.len();
            self.entries.push((pair.0.clone(), pair.1.clone(), count));
            self.positions.insert(pair, position);
        }
    }

    pub fn get(&self, source: &CanonicalKey, related: &CanonicalKey) -> u64 {
        self.positions
            .get(&(source.clone(), related.clone()))
            .map(|&position| self.entries[position].2)
            .unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CanonicalKey, &CanonicalKey, u64)> {
        self.entries.iter().map(|(source, related, count)| (source, related, *count))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Count every ordered pair of distinct items within each outfit group into
/// `counter`, skipping pairs whose category roots coincide.
///
/// The accumulator is passed in explicitly so callers own its lifecycle and
/// can merge several batches into one counter. Quadratic in group size;
/// outfits hold few items.
pub fn count_pairs(rows: &[GroupedRow], schema: &AttributeSchema, counter: &mut PairCounter) {
    let category_position = schema.position(Attribute::Category);

    for group in group_by_outfit(rows) {
        let keys: Vec<CanonicalKey> = group.iter().map(|row| encode(&row.record, schema)).collect();

        for (left_position, left) in keys.iter().enumerate() {
            for (right_position, right) in keys.iter().enumerate() {
                if left_position == right_position {
                    continue;
                }
                if let Some(position) = category_position {
                    let left_root = left.segment(position).map(category_root);
                    let right_root = right.segment(position).map(category_root);
                    if left_root == right_root {
                        continue;
                    }
                }
                counter.increment(left.clone(), right.clone());
            }
        }
    }
}

/// Partition rows by outfit id, preserving first-seen group order and row
/// order inside each group.
fn group_by_outfit(rows: &[GroupedRow]) -> Vec<Vec<&GroupedRow>> {
    let mut groups: Vec<Vec<&GroupedRow>> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for row in rows {
        match positions.get(row.outfit_id.as_str()) {
            Some(&position) => groups[position].push(row),
            None => {
                positions.insert(row.outfit_id.as_str(), groups.len());
                groups.push(vec![row]);
            }
        }
    }
    groups
}
