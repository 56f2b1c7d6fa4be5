//! Deterministic demo catalog for tests and the `lookbook seed` command.

use lookbook_core::domain::attribute::{Attribute, AttributeRecord};

use crate::DbPool;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SeedResult {
    pub items: usize,
    pub memberships: usize,
}

pub async fn insert_item(
    pool: &DbPool,
    id: &str,
    brand: Option<&str>,
    name: Option<&str>,
    wish: i64,
    price: Option<i64>,
    record: &AttributeRecord,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO items (id, brand, name, detail_url, img_url, wish, price, \
             sex, category, color, pattern, style, fit, materials, length, neckline, sleeve_length) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(brand)
    .bind(name)
    .bind(format!("https://shop.example.com/items/{id}"))
    .bind(format!("https://cdn.example.com/items/{id}_1_ORGINL.jpg"))
    .bind(wish)
    .bind(price)
    .bind(record.get(Attribute::Sex))
    .bind(record.get(Attribute::Category))
    .bind(record.get(Attribute::Color))
    .bind(record.get(Attribute::Pattern))
    .bind(record.get(Attribute::Style))
    .bind(record.get(Attribute::Fit))
    .bind(record.get(Attribute::Materials))
    .bind(record.get(Attribute::Length))
    .bind(record.get(Attribute::Neckline))
    .bind(record.get(Attribute::SleeveLength))
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn insert_outfit(
    pool: &DbPool,
    outfit_id: &str,
    item_ids: &[&str],
) -> Result<(), sqlx::Error> {
    for item_id in item_ids {
        sqlx::query("INSERT INTO outfit_items (outfit_id, item_id) VALUES (?, ?)")
            .bind(outfit_id)
            .bind(item_id)
            .execute(pool)
            .await?;
    }
    Ok(())
}

/// A small capsule wardrobe with both organic (`F…`) and curated (`W…`)
/// outfit groups, enough to exercise the full count/index/recommend path.
pub async fn seed_demo_catalog(pool: &DbPool) -> Result<SeedResult, sqlx::Error> {
    let items: &[(&str, Option<&str>, &str, i64, i64, &[(&str, &str)])] = &[
        (
            "S-OXFORD",
            Some("Harbor"),
            "Oxford shirt",
            180,
            59000,
            &[("sex", "MEN"), ("category", "상의>셔츠"), ("color", "White"), ("fit", "Regular")],
        ),
        (
            "P-DENIM",
            Some("Harbor"),
            "Straight denim",
            240,
            79000,
            &[("sex", "MEN"), ("category", "바지>데님"), ("color", "Indigo"), ("fit", "Straight")],
        ),
        (
            "P-CHINO",
            Some("Field"),
            "Cotton chino",
            150,
            65000,
            &[("sex", "MEN"), ("category", "바지>치노"), ("color", "Beige"), ("fit", "Slim")],
        ),
        (
            "K-PLEAT",
            Some("Meridian"),
            "Pleated skirt",
            210,
            72000,
            &[("sex", "WOMEN"), ("category", "스커트"), ("color", "Black"), ("length", "Midi")],
        ),
        (
            "B-BOOT",
            Some("Trail"),
            "Chelsea boots",
            320,
            129000,
            &[("sex", "MEN"), ("category", "신발>부츠"), ("color", "Brown")],
        ),
    ];

    for (id, brand, name, wish, price, pairs) in items {
        let record = AttributeRecord::from_pairs(pairs)
            .expect("fixture attribute names match the schema");
        insert_item(pool, id, *brand, Some(name), *wish, Some(*price), &record).await?;
    }

    let outfits: &[(&str, &[&str])] = &[
        ("F0001", &["S-OXFORD", "P-DENIM"]),
        ("F0002", &["S-OXFORD", "P-DENIM", "B-BOOT"]),
        ("F0003", &["S-OXFORD", "P-CHINO"]),
        ("W0001", &["S-OXFORD", "P-CHINO"]),
    ];

    let mut memberships = 0;
    for (outfit_id, item_ids) in outfits {
        insert_outfit(pool, outfit_id, item_ids).await?;
        memberships += item_ids.len();
    }

    Ok(SeedResult { items: items.len(), memberships })
}
