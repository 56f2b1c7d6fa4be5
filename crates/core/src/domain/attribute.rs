use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::errors::DomainError;

/// Garment attribute dimensions, in key-segment order.
///
/// The declaration order is load-bearing: it defines the segment order of
/// every canonical key, and `Ord` follows it so ordered maps iterate in
/// schema order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    Sex,
    Category,
    Color,
    Pattern,
    Style,
    Fit,
    Materials,
    Length,
    Neckline,
    SleeveLength,
}

impl Attribute {
    pub const ALL: [Attribute; 10] = [
        Attribute::Sex,
        Attribute::Category,
        Attribute::Color,
        Attribute::Pattern,
        Attribute::Style,
        Attribute::Fit,
        Attribute::Materials,
        Attribute::Length,
        Attribute::Neckline,
        Attribute::SleeveLength,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Attribute::Sex => "sex",
            Attribute::Category => "category",
            Attribute::Color => "color",
            Attribute::Pattern => "pattern",
            Attribute::Style => "style",
            Attribute::Fit => "fit",
            Attribute::Materials => "materials",
            Attribute::Length => "length",
            Attribute::Neckline => "neckline",
            Attribute::SleeveLength => "sleeve_length",
        }
    }

    /// Column name in the item store. Identical to `as_str` today; kept
    /// separate so the wire name and the storage name can diverge.
    pub fn column(&self) -> &'static str {
        self.as_str()
    }
}

impl std::str::FromStr for Attribute {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Attribute::ALL
            .into_iter()
            .find(|attribute| attribute.as_str() == value)
            .ok_or_else(|| DomainError::UnknownAttribute(value.to_string()))
    }
}

impl std::fmt::Display for Attribute {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Ordered attribute sequence a counter or index was built against.
///
/// Must be identical across batch builds and serving; persisted blobs carry
/// the name list plus a fingerprint so mismatches are caught at load time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttributeSchema {
    attributes: Vec<Attribute>,
}

impl AttributeSchema {
    /// The full ten-attribute schema used by the production pipeline.
    pub fn standard() -> Self {
        Self { attributes: Attribute::ALL.to_vec() }
    }

    pub fn new(attributes: Vec<Attribute>) -> Self {
        Self { attributes }
    }

    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self, DomainError> {
        let attributes = names
            .iter()
            .map(|name| name.as_ref().parse::<Attribute>())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { attributes })
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    pub fn position(&self, attribute: Attribute) -> Option<usize> {
        self.attributes.iter().position(|&candidate| candidate == attribute)
    }

    pub fn names(&self) -> Vec<String> {
        self.attributes.iter().map(|attribute| attribute.as_str().to_string()).collect()
    }

    /// Content fingerprint embedded in persisted blobs so a serving process
    /// can refuse artifacts built against a different schema.
    pub fn fingerprint(&self) -> String {
        sha256_hex(self.names().join("\n").as_bytes())
    }
}

fn sha256_hex(payload: &[u8]) -> String {
    let digest = Sha256::digest(payload);
    let mut output = String::with_capacity(digest.len() * 2);
    for byte in digest {
        output.push_str(&format!("{byte:02x}"));
    }
    output
}

/// One optional value slot per schema attribute. A value may hold several
/// comma-separated options (multi-valued attribute). Empty strings normalize
/// to absent at the constructors.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeRecord {
    pub sex: Option<String>,
    pub category: Option<String>,
    pub color: Option<String>,
    pub pattern: Option<String>,
    pub style: Option<String>,
    pub fit: Option<String>,
    pub materials: Option<String>,
    pub length: Option<String>,
    pub neckline: Option<String>,
    pub sleeve_length: Option<String>,
}

impl AttributeRecord {
    /// Build a record from `(attribute name, value)` pairs, rejecting names
    /// outside the fixed schema.
    pub fn from_pairs<N, V>(pairs: &[(N, V)]) -> Result<Self, DomainError>
    where
        N: AsRef<str>,
        V: AsRef<str>,
    {
        let mut record = Self::default();
        for (name, value) in pairs {
            let attribute = name.as_ref().parse::<Attribute>()?;
            record.set(attribute, Some(value.as_ref().to_string()));
        }
        Ok(record)
    }

    pub fn get(&self, attribute: Attribute) -> Option<&str> {
        let slot = match attribute {
            Attribute::Sex => &self.sex,
            Attribute::Category => &self.category,
            Attribute::Color => &self.color,
            Attribute::Pattern => &self.pattern,
            Attribute::Style => &self.style,
            Attribute::Fit => &self.fit,
            Attribute::Materials => &self.materials,
            Attribute::Length => &self.length,
            Attribute::Neckline => &self.neckline,
            Attribute::SleeveLength => &self.sleeve_length,
        };
        slot.as_deref().filter(|value| !value.is_empty())
    }

    pub fn set(&mut self, attribute: Attribute, value: Option<String>) {
        let value = value.filter(|value| !value.is_empty());
        let slot = match attribute {
            Attribute::Sex => &mut self.sex,
            Attribute::Category => &mut self.category,
            Attribute::Color => &mut self.color,
            Attribute::Pattern => &mut self.pattern,
            Attribute::Style => &mut self.style,
            Attribute::Fit => &mut self.fit,
            Attribute::Materials => &mut self.materials,
            Attribute::Length => &mut self.length,
            Attribute::Neckline => &mut self.neckline,
            Attribute::SleeveLength => &mut self.sleeve_length,
        };
        *slot = value;
    }

    pub fn is_empty(&self) -> bool {
        Attribute::ALL.iter().all(|&attribute| self.get(attribute).is_none())
    }
}

#[cfg(test)]
mod tests {
    use super::{Attribute, AttributeRecord, AttributeSchema};

    #[test]
    fn standard_schema_orders_all_ten_attributes() {
        let schema = AttributeSchema::standard();
        assert_eq!(schema.len(), 10);
        assert_eq!(schema.attributes()[0], Attribute::Sex);
        assert_eq!(schema.attributes()[1], Attribute::Category);
        assert_eq!(schema.attributes()[9], Attribute::SleeveLength);
    }

    #[test]
    fn schema_round_trips_through_names() {
        let schema = AttributeSchema::standard();
        let restored = AttributeSchema::from_names(&schema.names()).expect("valid names");
        assert_eq!(restored, schema);
        assert_eq!(restored.fingerprint(), schema.fingerprint());
    }

    #[test]
    fn unknown_attribute_name_is_rejected() {
        let error = AttributeSchema::from_names(&["sex", "shoe_size"]).expect_err("unknown name");
        assert!(error.to_string().contains("shoe_size"));
    }

    #[test]
    fn fingerprint_depends_on_attribute_order() {
        let standard = AttributeSchema::standard();
        let reversed =
            AttributeSchema::new(Attribute::ALL.iter().rev().copied().collect::<Vec<_>>());
        assert_ne!(standard.fingerprint(), reversed.fingerprint());
    }

    #[test]
    fn record_from_pairs_rejects_unknown_names() {
        let result = AttributeRecord::from_pairs(&[("sex", "MEN"), ("waist", "32")]);
        assert!(result.is_err());
    }

    #[test]
    fn empty_values_normalize_to_absent() {
        let mut record = AttributeRecord::default();
        record.set(Attribute::Color, Some(String::new()));
        assert_eq!(record.get(Attribute::Color), None);
        assert!(record.is_empty());
    }

    #[test]
    fn record_get_and_set_cover_every_slot() {
        let mut record = AttributeRecord::default();
        for (position, &attribute) in Attribute::ALL.iter().enumerate() {
            record.set(attribute, Some(format!("value-{position}")));
        }
        for (position, &attribute) in Attribute::ALL.iter().enumerate() {
            assert_eq!(record.get(attribute), Some(format!("value-{position}").as_str()));
        }
    }
}
