//! Query-time recommendation over the loaded index and the live item store.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use crate::artifact::IndexArtifact;
use crate::domain::attribute::{Attribute, AttributeRecord, AttributeSchema};
use crate::domain::item::{ItemId, ItemRow};
use crate::domain::recommendation::{AttributeOption, Prediction, Recommendation, TopAttribute};
use crate::errors::ApplicationError;
use crate::index::RecommendationIndex;
use crate::key::{decode, encode, CanonicalKey};
use crate::store::{split_options, ItemPredicate, ItemStore, StoreError};

/// Sorts below every positional rank, forcing curated answers first.
const BOOSTED_RANK: i64 = -1;

/// Serving-side engine: an immutable index bound to a live item store.
///
/// Construction requires a fully loaded, schema-verified [`IndexArtifact`],
/// so a half-initialized engine cannot exist; bootstrap fails instead.
/// `recommend` calls are stateless and safe to run concurrently.
pub struct RecommendationEngine {
    schema: AttributeSchema,
    index: RecommendationIndex,
    store: Arc<dyn ItemStore>,
    answer_group_pattern: String,
}

impl RecommendationEngine {
    pub fn new(
        artifact: IndexArtifact,
        store: Arc<dyn ItemStore>,
        answer_group_pattern: impl Into<String>,
    ) -> Self {
        Self {
            schema: artifact.schema,
            index: artifact.index,
            store,
            answer_group_pattern: answer_group_pattern.into(),
        }
    }

    pub fn schema(&self) -> &AttributeSchema {
        &self.schema
    }

    pub fn bucket_count(&self) -> usize {
        self.index.bucket_count()
    }

    /// Rank candidate attribute groups for `record` and attach live items.
    ///
    /// `ngroups_max` / `nitems_max` of `None` mean unlimited. Categories in
    /// `filter_categories` are excluded from candidates and curated answers
    /// by substring match. An input key with no index bucket yields an empty
    /// recommendation without touching the store.
    pub async fn recommend(
        &self,
        input_id: &ItemId,
        record: &AttributeRecord,
        ngroups_max: Option<usize>,
        nitems_max: Option<usize>,
        filter_categories: &[String],
    ) -> Result<Recommendation, ApplicationError> {
        let key = encode(record, &self.schema);

        // Candidate keys can recur across index entries; their counts sum.
        let mut key_counter = KeyCounter::default();
        for entry in self.index.bucket(&key) {
            let candidate = decode(&entry.key, &self.schema)?;
            let Some(category) = candidate.get(Attribute::Category) else {
                continue;
            };
            if category_is_filtered(category, filter_categories) {
                continue;
            }
            key_counter.add(entry.key.clone(), entry.count);
        }

        if key_counter.is_empty() {
            return Ok(Recommendation::default());
        }

        let attr_counters = self.weigh_attribute_options(&key_counter)?;

        let mut top_attributes = BTreeMap::new();
        for &attribute in self.schema.attributes() {
            let Some(weights) = attr_counters.get(&attribute) else {
                continue;
            };
            let total: u64 = weights.iter().map(|(_, weight)| weight).sum();
            let Some((name, max_weight)) = first_max(weights) else {
                continue;
            };
            top_attributes.insert(
                attribute,
                TopAttribute {
                    name: name.to_string(),
                    percentage: round2(max_weight as f64 / total as f64),
                },
            );
        }

        let ngroups = ngroups_max.unwrap_or_else(|| key_counter.len());
        let mut selected: Vec<(CanonicalKey, u64)> = key_counter.entries.clone();
        selected.sort_by(|left, right| right.1.cmp(&left.1));
        selected.truncate(ngroups);

        let grand_total: u64 = key_counter.iter().map(|(_, count)| count).sum();

        let mut groups: Vec<(BTreeMap<Attribute, Vec<AttributeOption>>, Vec<(i64, ItemRow)>)> =
            Vec::with_capacity(selected.len());
        for (candidate_key, _) in &selected {
            let candidate = decode(candidate_key, &self.schema)?;
            let predicate = ItemPredicate::from_record(&candidate, &self.schema);
            let rows =
                self.store.fetch_by_predicate(&predicate).await.map_err(store_failure)?;
            let ranked: Vec<(i64, ItemRow)> =
                rows.into_iter().enumerate().map(|(rank, row)| (rank as i64, row)).collect();

            let mut attrs = BTreeMap::new();
            for &attribute in self.schema.attributes() {
                let Some(value) = candidate.get(attribute) else {
                    continue;
                };
                let options = split_options(value)
                    .map(|option| AttributeOption {
                        name: option.to_string(),
                        percentage: round2(
                            option_weight(&attr_counters, attribute, option) as f64
                                / grand_total as f64,
                        ),
                    })
                    .collect();
                attrs.insert(attribute, options);
            }
            groups.push((attrs, ranked));
        }

        let answer_ids =
            self.curated_answer_ids(input_id, filter_categories).await.map_err(store_failure)?;

        let predictions = groups
            .into_iter()
            .map(|(attrs, mut ranked)| {
                for (rank, row) in ranked.iter_mut() {
                    if answer_ids.contains(&row.id) {
                        *rank = BOOSTED_RANK;
                    }
                }
                ranked.sort_by_key(|(rank, _)| *rank);
                if let Some(limit) = nitems_max {
                    ranked.truncate(limit);
                }
                Prediction { attrs, items: ranked.into_iter().map(|(_, row)| row).collect() }
            })
            .collect();

        Ok(Recommendation { predictions, top_attributes })
    }

    /// Per-attribute option weights across every surviving candidate key,
    /// insertion-ordered so ties resolve to the earliest-seen option.
    fn weigh_attribute_options(
        &self,
        key_counter: &KeyCounter,
    ) -> Result<BTreeMap<Attribute, Vec<(String, u64)>>, ApplicationError> {
        let mut attr_counters: BTreeMap<Attribute, Vec<(String, u64)>> = BTreeMap::new();
        for (candidate_key, count) in key_counter.iter() {
            let candidate = decode(candidate_key, &self.schema)?;
            for &attribute in self.schema.attributes() {
                let Some(value) = candidate.get(attribute) else {
                    continue;
                };
                let weights = attr_counters.entry(attribute).or_default();
                for option in split_options(value) {
                    match weights.iter_mut().find(|(name, _)| name == option) {
                        Some((_, weight)) => *weight += count,
                        None => weights.push((option.to_string(), count)),
                    }
                }
            }
        }
        Ok(attr_counters)
    }

    /// Ids of curated known-good complements for the input item, filtered by
    /// category and de-duplicated by the full item id.
    async fn curated_answer_ids(
        &self,
        input_id: &ItemId,
        filter_categories: &[String],
    ) -> Result<HashSet<ItemId>, StoreError> {
        let answers =
            self.store.fetch_outfit_answers(input_id, &self.answer_group_pattern).await?;

        let mut ids = HashSet::new();
        for answer in answers {
            if let Some(category) = answer.attrs.get(Attribute::Category) {
                if category_is_filtered(category, filter_categories) {
                    continue;
                }
            }
            ids.insert(answer.id);
        }
        Ok(ids)
    }
}

/// Insertion-ordered key counter; group selection breaks count ties by
/// first-seen order.
#[derive(Default)]
struct KeyCounter {
    entries: Vec<(CanonicalKey, u64)>,
    positions: HashMap<CanonicalKey, usize>,
}

impl KeyCounter {
    fn add(&mut self, key: CanonicalKey, count: u64) {
        match self.positions.get(&key) {
            Some(&position) => self.entries[position].1 += count,
            None => {
                self.positions.insert(key.clone(), self.entries.len());
                self.entries.push((key, count));
            }
        }
    }

    fn iter(&self) -> impl Iterator<Item = (&CanonicalKey, u64)> {
        self.entries.iter().map(|(key, count)| (key, *count))
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn category_is_filtered(category: &str, filter_categories: &[String]) -> bool {
    filter_categories.iter().any(|filtered| category.contains(filtered.as_str()))
}

fn first_max(weights: &[(String, u64)]) -> Option<(&str, u64)> {
    let mut best: Option<(&str, u64)> = None;
    for (name, weight) in weights {
        if best.map_or(true, |(_, best_weight)| *weight > best_weight) {
            best = Some((name.as_str(), *weight));
        }
    }
    best
}

fn option_weight(
    attr_counters: &BTreeMap<Attribute, Vec<(String, u64)>>,
    attribute: Attribute,
    option: &str,
) -> u64 {
    attr_counters
        .get(&attribute)
        .and_then(|weights| weights.iter().find(|(name, _)| name == option))
        .map(|(_, weight)| *weight)
        .unwrap_or(0)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn store_failure(error: StoreError) -> ApplicationError {
    ApplicationError::Store(error.to_string())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;

    use super::RecommendationEngine;
    use crate::artifact::IndexArtifact;
    use crate::counter::PairCounter;
    use crate::domain::attribute::{Attribute, AttributeRecord, AttributeSchema};
    use crate::domain::item::{GroupedRow, ItemId, ItemRow};
    use crate::index::{build_index, UNBOUNDED_BUCKET};
    use crate::key::encode;
    use crate::store::{InMemoryItemStore, ItemPredicate, ItemStore, StoreError};

    fn record(pairs: &[(&str, &str)]) -> AttributeRecord {
        AttributeRecord::from_pairs(pairs).expect("valid attribute names")
    }

    fn item(id: &str, wish: i64, pairs: &[(&str, &str)]) -> ItemRow {
        ItemRow {
            id: ItemId(id.to_string()),
            brand: None,
            name: Some(format!("item {id}")),
            detail_url: None,
            img_url: None,
            wish,
            price: None,
            attrs: record(pairs),
        }
    }

    /// Errors on every call; proves a code path issues no store queries.
    struct UnreachableStore;

    #[async_trait]
    impl ItemStore for UnreachableStore {
        async fn fetch_by_id(&self, _id: &ItemId) -> Result<Option<ItemRow>, StoreError> {
            Err(StoreError::Query("store must not be called".to_string()))
        }

        async fn fetch_by_predicate(
            &self,
            _predicate: &ItemPredicate,
        ) -> Result<Vec<ItemRow>, StoreError> {
            Err(StoreError::Query("store must not be called".to_string()))
        }

        async fn fetch_grouped_rows(&self) -> Result<Vec<GroupedRow>, StoreError> {
            Err(StoreError::Query("store must not be called".to_string()))
        }

        async fn fetch_outfit_answers(
            &self,
            _id: &ItemId,
            _group_pattern: &str,
        ) -> Result<Vec<ItemRow>, StoreError> {
            Err(StoreError::Query("store must not be called".to_string()))
        }
    }

    fn engine_from_pairs(
        pairs: &[(&AttributeRecord, &AttributeRecord, u64)],
        store: Arc<dyn ItemStore>,
    ) -> RecommendationEngine {
        let schema = AttributeSchema::standard();
        let mut counter = PairCounter::new();
        for (source, related, count) in pairs.iter().copied() {
            counter.add(encode(source, &schema), encode(related, &schema), count);
        }
        let index = build_index(&counter, UNBOUNDED_BUCKET);
        RecommendationEngine::new(
            IndexArtifact::new(schema, index, UNBOUNDED_BUCKET),
            store,
            "W%",
        )
    }

    #[tokio::test]
    async fn an_unseen_key_yields_an_empty_result_without_store_calls() {
        let shirt = record(&[("sex", "MEN"), ("category", "Top>Shirt")]);
        let pants = record(&[("sex", "MEN"), ("category", "Bottom>Pants")]);
        let engine =
            engine_from_pairs(&[(&shirt, &pants, 4)], Arc::new(UnreachableStore));

        let unseen = record(&[("sex", "WOMEN"), ("category", "Dress")]);
        let result = engine
            .recommend(&ItemId("I1".to_string()), &unseen, None, None, &[])
            .await
            .expect("empty result, not a store error");

        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn end_to_end_single_candidate_reaches_full_percentages() {
        let shirt = record(&[("sex", "MEN"), ("category", "Shirt")]);
        let pants = record(&[("sex", "MEN"), ("category", "Pants")]);

        let store = InMemoryItemStore::default();
        store.insert_item(item("P1", 10, &[("sex", "MEN"), ("category", "Pants")])).await;
        let engine = engine_from_pairs(&[(&shirt, &pants, 4)], Arc::new(store));

        let result = engine
            .recommend(&ItemId("S1".to_string()), &shirt, None, None, &[])
            .await
            .expect("recommend");

        assert_eq!(result.predictions.len(), 1);
        let group = &result.predictions[0];
        let category_options = &group.attrs[&Attribute::Category];
        assert_eq!(category_options.len(), 1);
        assert_eq!(category_options[0].name, "Pants");
        assert_eq!(category_options[0].percentage, 1.0);
        assert_eq!(group.items.len(), 1);
        assert_eq!(group.items[0].id.0, "P1");

        let top_sex = &result.top_attributes[&Attribute::Sex];
        assert_eq!(top_sex.name, "MEN");
        assert_eq!(top_sex.percentage, 1.0);
    }

    #[tokio::test]
    async fn top_attribute_percentage_is_max_weight_over_total_weight() {
        let shirt = record(&[("sex", "MEN"), ("category", "Shirt")]);
        let pants = record(&[("sex", "MEN"), ("category", "Pants")]);
        let skirt = record(&[("sex", "WOMEN"), ("category", "Skirt")]);
        let engine = engine_from_pairs(
            &[(&shirt, &pants, 3), (&shirt, &skirt, 1)],
            Arc::new(InMemoryItemStore::default()),
        );

        let result = engine
            .recommend(&ItemId("S1".to_string()), &shirt, None, None, &[])
            .await
            .expect("recommend");

        // sex weights: MEN 3, WOMEN 1 -> 3/4
        let top_sex = &result.top_attributes[&Attribute::Sex];
        assert_eq!(top_sex.name, "MEN");
        assert_eq!(top_sex.percentage, 0.75);

        // category weights: Pants 3, Skirt 1 -> 3/4
        let top_category = &result.top_attributes[&Attribute::Category];
        assert_eq!(top_category.name, "Pants");
        assert_eq!(top_category.percentage, 0.75);
    }

    #[tokio::test]
    async fn group_value_percentages_are_weights_over_the_candidate_total() {
        let shirt = record(&[("sex", "MEN"), ("category", "Shirt")]);
        let pants = record(&[("sex", "MEN"), ("category", "Pants")]);
        let skirt = record(&[("sex", "MEN"), ("category", "Skirt")]);
        let engine = engine_from_pairs(
            &[(&shirt, &pants, 3), (&shirt, &skirt, 1)],
            Arc::new(InMemoryItemStore::default()),
        );

        let result = engine
            .recommend(&ItemId("S1".to_string()), &shirt, None, None, &[])
            .await
            .expect("recommend");

        // Candidate totals sum to 4; the Pants group shows 3/4 for its
        // category option and the Skirt group 1/4.
        assert_eq!(result.predictions[0].attrs[&Attribute::Category][0].percentage, 0.75);
        assert_eq!(result.predictions[1].attrs[&Attribute::Category][0].percentage, 0.25);
        // sex=MEN accumulated from both candidates: 4/4 in either group.
        assert_eq!(result.predictions[0].attrs[&Attribute::Sex][0].percentage, 1.0);
    }

    #[tokio::test]
    async fn groups_are_ordered_by_summed_count_descending() {
        let shirt = record(&[("sex", "MEN"), ("category", "Shirt")]);
        let pants = record(&[("sex", "MEN"), ("category", "Pants")]);
        let skirt = record(&[("sex", "MEN"), ("category", "Skirt")]);
        let coat = record(&[("sex", "MEN"), ("category", "Coat")]);
        let engine = engine_from_pairs(
            &[(&shirt, &skirt, 1), (&shirt, &pants, 5), (&shirt, &coat, 3)],
            Arc::new(InMemoryItemStore::default()),
        );

        let result = engine
            .recommend(&ItemId("S1".to_string()), &shirt, Some(2), None, &[])
            .await
            .expect("recommend");

        assert_eq!(result.predictions.len(), 2);
        assert_eq!(result.predictions[0].attrs[&Attribute::Category][0].name, "Pants");
        assert_eq!(result.predictions[1].attrs[&Attribute::Category][0].name, "Coat");
    }

    #[tokio::test]
    async fn filtered_categories_are_excluded_from_candidates() {
        let shirt = record(&[("sex", "MEN"), ("category", "Shirt")]);
        let pants = record(&[("sex", "MEN"), ("category", "Pants")]);
        let shoes = record(&[("sex", "MEN"), ("category", "Shoes>Boots")]);
        let engine = engine_from_pairs(
            &[(&shirt, &shoes, 9), (&shirt, &pants, 1)],
            Arc::new(InMemoryItemStore::default()),
        );

        let result = engine
            .recommend(
                &ItemId("S1".to_string()),
                &shirt,
                None,
                None,
                &["Shoes".to_string()],
            )
            .await
            .expect("recommend");

        assert_eq!(result.predictions.len(), 1);
        assert_eq!(result.predictions[0].attrs[&Attribute::Category][0].name, "Pants");
        assert_eq!(result.top_attributes[&Attribute::Category].name, "Pants");
    }

    #[tokio::test]
    async fn candidates_without_a_category_are_skipped() {
        let shirt = record(&[("sex", "MEN"), ("category", "Shirt")]);
        let uncategorized = record(&[("sex", "MEN")]);
        let engine = engine_from_pairs(
            &[(&shirt, &uncategorized, 7)],
            Arc::new(UnreachableStore),
        );

        let result = engine
            .recommend(&ItemId("S1".to_string()), &shirt, None, None, &[])
            .await
            .expect("recommend");

        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn curated_answers_are_boosted_to_the_front() {
        let shirt = record(&[("sex", "MEN"), ("category", "Shirt")]);
        let pants = record(&[("sex", "MEN"), ("category", "Pants")]);

        let store = InMemoryItemStore::default();
        store.insert_item(item("S1", 99, &[("sex", "MEN"), ("category", "Shirt")])).await;
        store.insert_item(item("X", 30, &[("sex", "MEN"), ("category", "Pants")])).await;
        store.insert_item(item("Y", 20, &[("sex", "MEN"), ("category", "Pants")])).await;
        store.insert_item(item("Z", 10, &[("sex", "MEN"), ("category", "Pants")])).await;
        // Y is curated together with the input item in a W-group.
        store.insert_membership("W001", ItemId("S1".to_string())).await;
        store.insert_membership("W001", ItemId("Y".to_string())).await;

        let engine = engine_from_pairs(&[(&shirt, &pants, 4)], Arc::new(store));

        let result = engine
            .recommend(&ItemId("S1".to_string()), &shirt, None, None, &[])
            .await
            .expect("recommend");

        let ids: Vec<&str> =
            result.predictions[0].items.iter().map(|row| row.id.0.as_str()).collect();
        assert_eq!(ids, vec!["Y", "X", "Z"]);
    }

    #[tokio::test]
    async fn answer_matching_requires_the_full_item_id() {
        let shirt = record(&[("sex", "MEN"), ("category", "Shirt")]);
        let pants = record(&[("sex", "MEN"), ("category", "Pants")]);

        let store = InMemoryItemStore::default();
        store.insert_item(item("S1", 99, &[("sex", "MEN"), ("category", "Shirt")])).await;
        // "X" is a strict prefix of the curated answer id "XY"; it must not
        // inherit the boost.
        store.insert_item(item("X", 30, &[("sex", "MEN"), ("category", "Pants")])).await;
        store.insert_item(item("XY", 10, &[("sex", "MEN"), ("category", "Pants")])).await;
        store.insert_membership("W001", ItemId("S1".to_string())).await;
        store.insert_membership("W001", ItemId("XY".to_string())).await;

        let engine = engine_from_pairs(&[(&shirt, &pants, 4)], Arc::new(store));

        let result = engine
            .recommend(&ItemId("S1".to_string()), &shirt, None, None, &[])
            .await
            .expect("recommend");

        let ids: Vec<&str> =
            result.predictions[0].items.iter().map(|row| row.id.0.as_str()).collect();
        assert_eq!(ids, vec!["XY", "X"]);
    }

    #[tokio::test]
    async fn filtered_answer_categories_do_not_boost() {
        let shirt = record(&[("sex", "MEN"), ("category", "Shirt")]);
        let pants = record(&[("sex", "MEN"), ("category", "Pants")]);

        let store = InMemoryItemStore::default();
        store.insert_item(item("S1", 99, &[("sex", "MEN"), ("category", "Shirt")])).await;
        store.insert_item(item("X", 30, &[("sex", "MEN"), ("category", "Pants")])).await;
        // The curated complement is a shoe, which the request filters out.
        store.insert_item(item("B1", 5, &[("sex", "MEN"), ("category", "Shoes>Boots")])).await;
        store.insert_membership("W001", ItemId("S1".to_string())).await;
        store.insert_membership("W001", ItemId("B1".to_string())).await;

        let engine = engine_from_pairs(&[(&shirt, &pants, 4)], Arc::new(store));

        let result = engine
            .recommend(
                &ItemId("S1".to_string()),
                &shirt,
                None,
                None,
                &["Shoes".to_string()],
            )
            .await
            .expect("recommend");

        let ids: Vec<&str> =
            result.predictions[0].items.iter().map(|row| row.id.0.as_str()).collect();
        assert_eq!(ids, vec!["X"]);
    }

    #[tokio::test]
    async fn nitems_max_trims_after_boosting() {
        let shirt = record(&[("sex", "MEN"), ("category", "Shirt")]);
        let pants = record(&[("sex", "MEN"), ("category", "Pants")]);

        let store = InMemoryItemStore::default();
        store.insert_item(item("S1", 99, &[("sex", "MEN"), ("category", "Shirt")])).await;
        for (id, wish) in [("A", 50), ("B", 40), ("C", 30), ("D", 20), ("E", 10)] {
            store.insert_item(item(id, wish, &[("sex", "MEN"), ("category", "Pants")])).await;
        }
        store.insert_membership("W001", ItemId("S1".to_string())).await;
        store.insert_membership("W001", ItemId("D".to_string())).await;

        let engine = engine_from_pairs(&[(&shirt, &pants, 4)], Arc::new(store));

        let result = engine
            .recommend(&ItemId("S1".to_string()), &shirt, None, Some(2), &[])
            .await
            .expect("recommend");

        let ids: Vec<&str> =
            result.predictions[0].items.iter().map(|row| row.id.0.as_str()).collect();
        // Boost lifts D first, then the popularity order resumes.
        assert_eq!(ids, vec!["D", "A"]);
    }

    #[tokio::test]
    async fn a_store_failure_aborts_the_whole_call() {
        let shirt = record(&[("sex", "MEN"), ("category", "Shirt")]);
        let pants = record(&[("sex", "MEN"), ("category", "Pants")]);
        let engine = engine_from_pairs(&[(&shirt, &pants, 4)], Arc::new(UnreachableStore));

        let result = engine
            .recommend(&ItemId("S1".to_string()), &shirt, None, None, &[])
            .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn recurring_candidate_keys_sum_their_counts() {
        let schema = AttributeSchema::standard();
        let shirt = record(&[("sex", "MEN"), ("category", "Shirt")]);
        let pants = record(&[("sex", "MEN"), ("category", "Pants")]);
        let skirt = record(&[("sex", "MEN"), ("category", "Skirt")]);

        // Buckets persisted across insertion batches may repeat a related
        // key; aggregation happens here, at query time.
        let shirt_key = encode(&shirt, &schema);
        let pants_key = encode(&pants, &schema);
        let skirt_key = encode(&skirt, &schema);
        let buckets = std::collections::HashMap::from([(
            shirt_key,
            vec![
                crate::index::IndexEntry { count: 3, key: pants_key.clone() },
                crate::index::IndexEntry { count: 4, key: skirt_key },
                crate::index::IndexEntry { count: 2, key: pants_key },
            ],
        )]);
        let index = crate::index::RecommendationIndex::from_buckets(buckets);
        let engine = RecommendationEngine::new(
            IndexArtifact::new(schema, index, UNBOUNDED_BUCKET),
            Arc::new(InMemoryItemStore::default()),
            "W%",
        );

        let result = engine
            .recommend(&ItemId("S1".to_string()), &shirt, None, None, &[])
            .await
            .expect("recommend");

        // Pants sums to 5 and outranks Skirt's 4.
        assert_eq!(result.predictions[0].attrs[&Attribute::Category][0].name, "Pants");
        assert_eq!(result.predictions[1].attrs[&Attribute::Category][0].name, "Skirt");
    }
}
