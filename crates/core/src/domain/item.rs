use serde::{Deserialize, Serialize};

use crate::domain::attribute::AttributeRecord;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemId(pub String);

/// A catalog item as returned by the item store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRow {
    pub id: ItemId,
    pub brand: Option<String>,
    pub name: Option<String>,
    pub detail_url: Option<String>,
    pub img_url: Option<String>,
    /// Popularity score; predicate lookups are ordered on it descending.
    pub wish: i64,
    pub price: Option<i64>,
    pub attrs: AttributeRecord,
}

/// Batch-counting input row: one item's attributes tagged with the outfit
/// it belongs to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupedRow {
    pub outfit_id: String,
    pub record: AttributeRecord,
}
