pub mod artifact;
pub mod config;
pub mod counter;
pub mod domain;
pub mod engine;
pub mod errors;
pub mod index;
pub mod key;
pub mod store;
pub mod topk;

pub use artifact::{ArtifactError, CounterArtifact, IndexArtifact, FORMAT_VERSION};
pub use counter::{count_pairs, PairCounter};
pub use domain::attribute::{Attribute, AttributeRecord, AttributeSchema};
pub use domain::item::{GroupedRow, ItemId, ItemRow};
pub use domain::recommendation::{AttributeOption, Prediction, Recommendation, TopAttribute};
pub use engine::RecommendationEngine;
pub use errors::{ApplicationError, DomainError, InterfaceError};
pub use index::{build_index, IndexEntry, RecommendationIndex, UNBOUNDED_BUCKET};
pub use key::{decode, encode, encode_expanded, CanonicalKey};
pub use store::{InMemoryItemStore, ItemPredicate, ItemStore, PredicateTerm, StoreError};
pub use topk::BoundedTopK;
