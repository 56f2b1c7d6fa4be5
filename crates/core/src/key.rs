//! Canonical encoding of attribute records into string keys.
//!
//! A canonical key joins one segment per schema attribute with `#`. Inside a
//! segment, comma-separated options are sorted ascending, so two records
//! whose per-attribute value sets are equal always encode to the same key.

use serde::{Deserialize, Serialize};

use crate::domain::attribute::{AttributeRecord, AttributeSchema};
use crate::errors::DomainError;

/// Segment delimiter. Reserved: must not appear inside attribute values.
pub const KEY_DELIMITER: char = '#';
/// Separates options inside a multi-valued segment.
pub const VALUE_SEPARATOR: char = ',';
/// Separates a category root from its subcategories, e.g. `Top>Shirt`.
pub const CATEGORY_SEPARATOR: char = '>';

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanonicalKey(String);

impl CanonicalKey {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The raw segment at `position`, or `None` past the end.
    pub fn segment(&self, position: usize) -> Option<&str> {
        self.0.split(KEY_DELIMITER).nth(position)
    }
}

impl std::fmt::Display for CanonicalKey {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(&self.0)
    }
}

/// Aggregate-mode encoding: per attribute, options sorted and rejoined.
pub fn encode(record: &AttributeRecord, schema: &AttributeSchema) -> CanonicalKey {
    let segments: Vec<String> = schema
        .attributes()
        .iter()
        .map(|&attribute| match record.get(attribute) {
            Some(value) => {
                let mut options: Vec<&str> = value.split(VALUE_SEPARATOR).collect();
                options.sort_unstable();
                options.join(",")
            }
            None => String::new(),
        })
        .collect();
    CanonicalKey(segments.join("#"))
}

/// Expanded-mode encoding: the Cartesian product of single options across
/// attributes, one key per concrete combination. Option order is preserved
/// and options are not aggregated.
pub fn encode_expanded(record: &AttributeRecord, schema: &AttributeSchema) -> Vec<CanonicalKey> {
    let per_attribute: Vec<Vec<&str>> = schema
        .attributes()
        .iter()
        .map(|&attribute| match record.get(attribute) {
            Some(value) => value.split(VALUE_SEPARATOR).collect(),
            None => vec![""],
        })
        .collect();

    let mut keys = vec![String::new()];
    for (position, options) in per_attribute.iter().enumerate() {
        let mut extended = Vec::with_capacity(keys.len() * options.len());
        for prefix in &keys {
            for option in options {
                if position == 0 {
                    extended.push((*option).to_string());
                } else {
                    extended.push(format!("{prefix}#{option}"));
                }
            }
        }
        keys = extended;
    }
    keys.into_iter().map(CanonicalKey).collect()
}

/// Decode a key back into a record. An empty segment decodes to absent.
/// A segment count different from the schema length is a fatal mismatch
/// between the artifact and the serving schema.
pub fn decode(key: &CanonicalKey, schema: &AttributeSchema) -> Result<AttributeRecord, DomainError> {
    let segments: Vec<&str> = key.as_str().split(KEY_DELIMITER).collect();
    if segments.len() != schema.len() {
        return Err(DomainError::MalformedKey { expected: schema.len(), found: segments.len() });
    }

    let mut record = AttributeRecord::default();
    for (&attribute, segment) in schema.attributes().iter().zip(segments) {
        if !segment.is_empty() {
            record.set(attribute, Some(segment.to_string()));
        }
    }
    Ok(record)
}

/// The top-level portion of a category segment, before the first `>`.
pub fn category_root(segment: &str) -> &str {
    match segment.split(CATEGORY_SEPARATOR).next() {
        Some(root) => root,
        None => segment,
    }
}
