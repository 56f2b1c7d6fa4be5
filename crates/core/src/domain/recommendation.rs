use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::attribute::Attribute;
use crate::domain::item::ItemRow;

/// Winning value for one attribute across every surviving candidate group,
/// with its share of that attribute's total weight.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TopAttribute {
    pub name: String,
    pub percentage: f64,
}

/// One concrete option of a multi-valued attribute inside a predicted group.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AttributeOption {
    pub name: String,
    pub percentage: f64,
}

/// A ranked attribute group together with the live items matching it.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Prediction {
    pub attrs: BTreeMap<Attribute, Vec<AttributeOption>>,
    pub items: Vec<ItemRow>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Recommendation {
    pub predictions: Vec<Prediction>,
    pub top_attributes: BTreeMap<Attribute, TopAttribute>,
}

impl Recommendation {
    pub fn is_empty(&self) -> bool {
        self.predictions.is_empty() && self.top_attributes.is_empty()
    }
}
