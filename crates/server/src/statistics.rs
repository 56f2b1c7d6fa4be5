//! The recommendation endpoint: `GET /statistics/id/{id}`.
//!
//! Serves the enriched input item, the ranked prediction groups, and the
//! aggregate top attributes. Attribute maps are additionally flattened onto
//! the enclosing objects, and item image URLs are split into an item shot
//! and a fashion shot by rewriting the image ordinal, both carried over from
//! the storefront frontend contract.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use lookbook_core::domain::attribute::AttributeSchema;
use lookbook_core::domain::item::{ItemId, ItemRow};
use lookbook_core::domain::recommendation::{Prediction, Recommendation};
use lookbook_core::errors::{ApplicationError, InterfaceError};
use lookbook_core::store::ItemStore;
use lookbook_core::RecommendationEngine;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::{error, info};
use uuid::Uuid;

#[derive(Clone)]
pub struct StatisticsState {
    store: Arc<dyn ItemStore>,
    engine: Arc<RecommendationEngine>,
    filter_categories: Arc<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct StatisticsQuery {
    pub ngroups_max: Option<usize>,
    pub nitems_max: Option<usize>,
}

pub fn router(
    store: Arc<dyn ItemStore>,
    engine: Arc<RecommendationEngine>,
    filter_categories: Vec<String>,
) -> Router {
    Router::new().route("/statistics/id/{id}", get(statistics_by_id)).with_state(StatisticsState {
        store,
        engine,
        filter_categories: Arc::new(filter_categories),
    })
}

pub async fn statistics_by_id(
    Path(id): Path<String>,
    Query(query): Query<StatisticsQuery>,
    State(state): State<StatisticsState>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let correlation_id = Uuid::new_v4().to_string();
    let item_id = ItemId(id);

    let input = state
        .store
        .fetch_by_id(&item_id)
        .await
        .map_err(|failure| {
            fail(
                ApplicationError::Store(failure.to_string()).into_interface(&correlation_id),
                &item_id,
            )
        })?
        .ok_or_else(|| {
            fail(
                InterfaceError::NotFound {
                    message: format!("item `{}` does not exist", item_id.0),
                    correlation_id: correlation_id.clone(),
                },
                &item_id,
            )
        })?;

    let recommendation = state
        .engine
        .recommend(
            &input.id,
            &input.attrs,
            query.ngroups_max,
            query.nitems_max,
            &state.filter_categories,
        )
        .await
        .map_err(|failure| fail(failure.into_interface(&correlation_id), &item_id))?;

    info!(
        event_name = "statistics.recommend.served",
        correlation_id = %correlation_id,
        item_id = %input.id.0,
        prediction_groups = recommendation.predictions.len(),
        "recommendation served"
    );

    Ok(Json(shape_response(&input, &recommendation, state.engine.schema())))
}

fn fail(failure: InterfaceError, item_id: &ItemId) -> (StatusCode, Json<Value>) {
    let status = match &failure {
        InterfaceError::NotFound { .. } => StatusCode::NOT_FOUND,
        InterfaceError::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
        InterfaceError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    };
    error!(
        event_name = "statistics.recommend.failed",
        item_id = %item_id.0,
        error = %failure,
        "recommendation request failed"
    );
    (status, Json(json!({ "error": failure.user_message() })))
}

fn shape_response(
    input: &ItemRow,
    recommendation: &Recommendation,
    schema: &AttributeSchema,
) -> Value {
    let mut top_attributes = Map::new();
    for (attribute, top) in &recommendation.top_attributes {
        top_attributes.insert(
            attribute.as_str().to_string(),
            json!({ "name": top.name, "percentage": top.percentage }),
        );
    }

    json!({
        "input_info": input_presentation(input, schema),
        "predictions_info": recommendation
            .predictions
            .iter()
            .map(|prediction| prediction_presentation(prediction, schema))
            .collect::<Vec<_>>(),
        "top_attributes": Value::Object(top_attributes),
    })
}

fn input_presentation(input: &ItemRow, schema: &AttributeSchema) -> Value {
    let mut object = item_presentation(input);

    let mut attrs = Map::new();
    for &attribute in schema.attributes() {
        let value = input.attrs.get(attribute);
        attrs.insert(attribute.as_str().to_string(), json!(value));
        // Flattened duplicate of every attribute beside the nested map.
        object.insert(attribute.as_str().to_string(), json!(value));
    }
    object.insert("attrs".to_string(), Value::Object(attrs));

    Value::Object(object)
}

fn prediction_presentation(prediction: &Prediction, schema: &AttributeSchema) -> Value {
    let mut object = Map::new();

    let mut attrs = Map::new();
    for &attribute in schema.attributes() {
        let Some(options) = prediction.attrs.get(&attribute) else {
            continue;
        };
        let rendered: Value = options
            .iter()
            .map(|option| json!({ "name": option.name, "percentage": option.percentage }))
            .collect();
        attrs.insert(attribute.as_str().to_string(), rendered.clone());
        object.insert(attribute.as_str().to_string(), rendered);
    }
    object.insert("attrs".to_string(), Value::Object(attrs));

    object.insert(
        "items".to_string(),
        Value::Array(prediction.items.iter().map(|item| Value::Object(item_presentation(item))).collect()),
    );

    Value::Object(object)
}

fn item_presentation(item: &ItemRow) -> Map<String, Value> {
    let mut object = Map::new();
    object.insert("id".to_string(), json!(item.id.0));
    object.insert("brand".to_string(), json!(item.brand));
    object.insert("name".to_string(), json!(item.name));
    object.insert("detail_url".to_string(), json!(item.detail_url));
    object.insert("wish".to_string(), json!(item.wish));
    object.insert("price".to_string(), json!(item.price));
    object.insert(
        "item_url".to_string(),
        json!(item.img_url.as_deref().map(|url| rewrite_image_ordinal(url, 1))),
    );
    object.insert(
        "fashion_url".to_string(),
        json!(item.img_url.as_deref().map(|url| rewrite_image_ordinal(url, 2))),
    );
    object
}

/// Rewrite every `_<digit>_ORGINL` image ordinal in `url` to `ordinal`.
/// Ordinal 1 addresses the product shot, ordinal 2 the on-model shot.
fn rewrite_image_ordinal(url: &str, ordinal: u8) -> String {
    let bytes = url.as_bytes();
    let marker = "_ORGINL";
    let mut output = String::with_capacity(url.len());
    let mut copied = 0;
    let mut position = 0;

    while let Some(found) = url[position..].find(marker) {
        let start = position + found;
        if start >= 2 && bytes[start - 2] == b'_' && bytes[start - 1].is_ascii_digit() {
            output.push_str(&url[copied..start - 1]);
            output.push_str(&ordinal.to_string());
            copied = start;
        }
        position = start + marker.len();
    }
    output.push_str(&url[copied..]);
    output
}
