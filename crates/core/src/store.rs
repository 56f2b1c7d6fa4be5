//! Item store contract consumed by the batch jobs and the serving engine.

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::domain::attribute::{Attribute, AttributeRecord, AttributeSchema};
use crate::domain::item::{GroupedRow, ItemId, ItemRow};
use crate::key::VALUE_SEPARATOR;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("item store query failed: {0}")]
    Query(String),
    #[error("item store row decode failed: {0}")]
    Decode(String),
}

/// One constraint per schema attribute: either an exact value match or an
/// explicit requirement that the attribute is absent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PredicateTerm {
    Equals(String),
    MustBeAbsent,
}

/// Predicate over every schema attribute, in schema order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ItemPredicate {
    terms: Vec<(Attribute, PredicateTerm)>,
}

impl ItemPredicate {
    /// Present attributes constrain by equality; the rest must be absent, so
    /// a candidate group only matches items with exactly its attribute shape.
    pub fn from_record(record: &AttributeRecord, schema: &AttributeSchema) -> Self {
        let terms = schema
            .attributes()
            .iter()
            .map(|&attribute| match record.get(attribute) {
                Some(value) => (attribute, PredicateTerm::Equals(value.to_string())),
                None => (attribute, PredicateTerm::MustBeAbsent),
            })
            .collect();
        Self { terms }
    }

    pub fn terms(&self) -> &[(Attribute, PredicateTerm)] {
        &self.terms
    }

    pub fn matches(&self, record: &AttributeRecord) -> bool {
        self.terms.iter().all(|(attribute, term)| match term {
            PredicateTerm::Equals(value) => record.get(*attribute) == Some(value.as_str()),
            PredicateTerm::MustBeAbsent => record.get(*attribute).is_none(),
        })
    }
}

/// Live item lookups backing the engine and the batch counting job.
///
/// Connection pooling and per-query acquisition belong to implementations;
/// callers treat every method as one blocking unit of work and abort on the
/// first failure.
#[async_trait]
pub trait ItemStore: Send + Sync {
    async fn fetch_by_id(&self, id: &ItemId) -> Result<Option<ItemRow>, StoreError>;

    /// Rows matching the predicate, ordered by popularity descending.
    async fn fetch_by_predicate(&self, predicate: &ItemPredicate)
        -> Result<Vec<ItemRow>, StoreError>;

    /// Batch-counting input: every outfit membership joined with its item's
    /// attributes.
    async fn fetch_grouped_rows(&self) -> Result<Vec<GroupedRow>, StoreError>;

    /// Items curated into the same outfit groups as `id`, restricted to
    /// groups whose id matches the SQL LIKE `group_pattern`, excluding the
    /// input item itself.
    async fn fetch_outfit_answers(
        &self,
        id: &ItemId,
        group_pattern: &str,
    ) -> Result<Vec<ItemRow>, StoreError>;
}

/// In-memory store for engine tests and local experiments.
#[derive(Default)]
pub struct InMemoryItemStore {
    items: RwLock<Vec<ItemRow>>,
    memberships: RwLock<Vec<(String, ItemId)>>,
}

impl InMemoryItemStore {
    pub async fn insert_item(&self, item: ItemRow) {
        self.items.write().await.push(item);
    }

    pub async fn insert_membership(&self, outfit_id: impl Into<String>, item_id: ItemId) {
        self.memberships.write().await.push((outfit_id.into(), item_id));
    }
}

#[async_trait]
impl ItemStore for InMemoryItemStore {
    async fn fetch_by_id(&self, id: &ItemId) -> Result<Option<ItemRow>, StoreError> {
        let items = self.items.read().await;
        Ok(items.iter().find(|item| &item.id == id).cloned())
    }

    async fn fetch_by_predicate(
        &self,
        predicate: &ItemPredicate,
    ) -> Result<Vec<ItemRow>, StoreError> {
        let items = self.items.read().await;
        let mut matched: Vec<ItemRow> =
            items.iter().filter(|item| predicate.matches(&item.attrs)).cloned().collect();
        // Stable, so equal wish counts keep insertion order like the SQL
        // store's rowid tie-break.
        matched.sort_by(|left, right| right.wish.cmp(&left.wish));
        Ok(matched)
    }

    async fn fetch_grouped_rows(&self) -> Result<Vec<GroupedRow>, StoreError> {
        let memberships = self.memberships.read().await;
        let items = self.items.read().await;

        let mut rows: Vec<(String, ItemId, GroupedRow)> = memberships
            .iter()
            .filter_map(|(outfit_id, item_id)| {
                items.iter().find(|item| &item.id == item_id).map(|item| {
                    (
                        outfit_id.clone(),
                        item_id.clone(),
                        GroupedRow { outfit_id: outfit_id.clone(), record: item.attrs.clone() },
                    )
                })
            })
            .collect();
        rows.sort_by(|left, right| (&left.0, &left.1 .0).cmp(&(&right.0, &right.1 .0)));
        Ok(rows.into_iter().map(|(_, _, row)| row).collect())
    }

    async fn fetch_outfit_answers(
        &self,
        id: &ItemId,
        group_pattern: &str,
    ) -> Result<Vec<ItemRow>, StoreError> {
        let memberships = self.memberships.read().await;
        let items = self.items.read().await;

        let outfit_ids: Vec<&String> = memberships
            .iter()
            .filter(|(outfit_id, member)| member == id && like_match(group_pattern, outfit_id))
            .map(|(outfit_id, _)| outfit_id)
            .collect();

        let mut answers = Vec::new();
        for (outfit_id, member) in memberships.iter() {
            if member == id || !outfit_ids.contains(&outfit_id) {
                continue;
            }
            if let Some(item) = items.iter().find(|item| &item.id == member) {
                answers.push(item.clone());
            }
        }
        Ok(answers)
    }
}

/// Minimal SQL LIKE semantics: `%` matches any run of characters, everything
/// else is literal. Enough for the curated-group patterns in config.
pub fn like_match(pattern: &str, value: &str) -> bool {
    let segments: Vec<&str> = pattern.split('%').collect();
    if segments.len() == 1 {
        return pattern == value;
    }

    let mut remaining = value;
    for (position, segment) in segments.iter().enumerate() {
        if segment.is_empty() {
            continue;
        }
        if position == 0 {
            match remaining.strip_prefix(segment) {
                Some(rest) => remaining = rest,
                None => return false,
            }
        } else if position == segments.len() - 1 {
            return remaining.ends_with(segment);
        } else {
            match remaining.find(segment) {
                Some(found) => remaining = &remaining[found + segment.len()..],
                None => return false,
            }
        }
    }
    true
}

/// Split a stored attribute value into its individual options.
pub fn split_options(value: &str) -> impl Iterator<Item = &str> {
    value.split(VALUE_SEPARATOR)
}
