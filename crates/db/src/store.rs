use async_trait::async_trait;
use sqlx::{QueryBuilder, Row, Sqlite};

use lookbook_core::domain::attribute::{Attribute, AttributeRecord};
use lookbook_core::domain::item::{GroupedRow, ItemId, ItemRow};
use lookbook_core::store::{ItemPredicate, ItemStore, PredicateTerm, StoreError};

use crate::DbPool;

const ITEM_COLUMNS: &str = "id, brand, name, detail_url, img_url, wish, price, \
     sex, category, color, pattern, style, fit, materials, length, neckline, sleeve_length";

/// Sqlite-backed item store. Each call acquires a pooled connection for the
/// duration of one query and releases it on return.
pub struct SqlItemStore {
    pool: DbPool,
}

impl SqlItemStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ItemStore for SqlItemStore {
    async fn fetch_by_id(&self, id: &ItemId) -> Result<Option<ItemRow>, StoreError> {
        let row = sqlx::query(&format!("SELECT {ITEM_COLUMNS} FROM items WHERE id = ?"))
            .bind(&id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(query_failure)?;

        row.map(|row| decode_item(&row)).transpose()
    }

    async fn fetch_by_predicate(
        &self,
        predicate: &ItemPredicate,
    ) -> Result<Vec<ItemRow>, StoreError> {
        let mut builder: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT {ITEM_COLUMNS} FROM items"));

        for (position, (attribute, term)) in predicate.terms().iter().enumerate() {
            builder.push(if position == 0 { " WHERE " } else { " AND " });
            match term {
                PredicateTerm::Equals(value) => {
                    builder.push(attribute.column());
                    builder.push(" = ");
                    builder.push_bind(value.clone());
                }
                PredicateTerm::MustBeAbsent => {
                    builder.push(attribute.column());
                    builder.push(" IS NULL");
                }
            }
        }
        builder.push(" ORDER BY wish DESC");

        let rows = builder.build().fetch_all(&self.pool).await.map_err(query_failure)?;
        rows.iter().map(decode_item).collect()
    }

    async fn fetch_grouped_rows(&self) -> Result<Vec<GroupedRow>, StoreError> {
        // Ordered so repeated batch runs replay pairs identically; bounded
        // index tie-breaks depend on that replay order.
        let rows = sqlx::query(
            "SELECT o.outfit_id, i.sex, i.category, i.color, i.pattern, i.style, i.fit, \
                    i.materials, i.length, i.neckline, i.sleeve_length
             FROM outfit_items o
             JOIN items i ON i.id = o.item_id
             ORDER BY o.outfit_id, o.item_id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(query_failure)?;

        rows.iter()
            .map(|row| {
                Ok(GroupedRow {
                    outfit_id: row.try_get("outfit_id").map_err(decode_failure)?,
                    record: decode_attributes(row)?,
                })
            })
            .collect()
    }

    async fn fetch_outfit_answers(
        &self,
        id: &ItemId,
        group_pattern: &str,
    ) -> Result<Vec<ItemRow>, StoreError> {
        let rows = sqlx::query(&format!(
            "SELECT {ITEM_COLUMNS} FROM items
             JOIN outfit_items o ON o.item_id = items.id
             WHERE o.outfit_id IN (
                 SELECT outfit_id FROM outfit_items
                 WHERE item_id = ? AND outfit_id LIKE ?
             )
             AND o.item_id != ?"
        ))
        .bind(&id.0)
        .bind(group_pattern)
        .bind(&id.0)
        .fetch_all(&self.pool)
        .await
        .map_err(query_failure)?;

        rows.iter().map(decode_item).collect()
    }
}

fn decode_item(row: &sqlx::sqlite::SqliteRow) -> Result<ItemRow, StoreError> {
    Ok(ItemRow {
        id: ItemId(row.try_get("id").map_err(decode_failure)?),
        brand: row.try_get("brand").map_err(decode_failure)?,
        name: row.try_get("name").map_err(decode_failure)?,
        detail_url: row.try_get("detail_url").map_err(decode_failure)?,
        img_url: row.try_get("img_url").map_err(decode_failure)?,
        wish: row.try_get("wish").map_err(decode_failure)?,
        price: row.try_get("price").map_err(decode_failure)?,
        attrs: decode_attributes(row)?,
    })
}

fn decode_attributes(row: &sqlx::sqlite::SqliteRow) -> Result<AttributeRecord, StoreError> {
    let mut record = AttributeRecord::default();
    for attribute in Attribute::ALL {
        let value: Option<String> = row.try_get(attribute.column()).map_err(decode_failure)?;
        record.set(attribute, value);
    }
    Ok(record)
}

fn query_failure(error: sqlx::Error) -> StoreError {
    StoreError::Query(error.to_string())
}

fn decode_failure(error: sqlx::Error) -> StoreError {
    StoreError::Decode(error.to_string())
}
