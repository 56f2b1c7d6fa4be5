//! Versioned persistence for the pair counter and the index.
//!
//! Both blobs carry the schema name list and its fingerprint. Loading
//! verifies the envelope format version and the fingerprint so a serving
//! process cannot bind an index built against a different schema.

use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::counter::PairCounter;
use crate::domain::attribute::AttributeSchema;
use crate::errors::DomainError;
use crate::index::{IndexEntry, RecommendationIndex};
use crate::key::CanonicalKey;

pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("could not read artifact `{path}`: {source}")]
    Read { path: PathBuf, source: std::io::Error },
    #[error("could not write artifact `{path}`: {source}")]
    Write { path: PathBuf, source: std::io::Error },
    #[error("could not parse artifact `{path}`: {source}")]
    Parse { path: PathBuf, source: serde_json::Error },
    #[error("unsupported artifact format version {found} (expected {expected})")]
    FormatVersion { expected: u32, found: u32 },
    #[error("artifact schema fingerprint {found} does not match expected {expected}")]
    SchemaMismatch { expected: String, found: String },
    #[error(transparent)]
    Domain(#[from] DomainError),
}

#[derive(Serialize, Deserialize)]
struct PairBlob {
    source: CanonicalKey,
    related: CanonicalKey,
    count: u64,
}

#[derive(Serialize, Deserialize)]
struct CounterBlob {
    version: u32,
    schema: Vec<String>,
    schema_hash: String,
    built_at: DateTime<Utc>,
    pairs: Vec<PairBlob>,
}

/// Pair counter plus the schema it was counted under, persisted together so
/// index builds and serving cannot drift apart.
#[derive(Debug)]
pub struct CounterArtifact {
    pub schema: AttributeSchema,
    pub counter: PairCounter,
    pub built_at: DateTime<Utc>,
}

impl CounterArtifact {
    pub fn new(schema: AttributeSchema, counter: PairCounter) -> Self {
        Self { schema, counter, built_at: Utc::now() }
    }

    pub fn save(&self, path: &Path) -> Result<(), ArtifactError> {
        let pairs = self
            .counter
            .iter()
            .map(|(source, related, count)| PairBlob {
                source: source.clone(),
                related: related.clone(),
                count,
            })
            .collect();
        let blob = CounterBlob {
            version: FORMAT_VERSION,
            schema: self.schema.names(),
            schema_hash: self.schema.fingerprint(),
            built_at: self.built_at,
            pairs,
        };
        write_json_atomic(path, &blob)
    }

    pub fn load(path: &Path) -> Result<Self, ArtifactError> {
        let blob: CounterBlob = read_json(path)?;
        check_version(blob.version)?;
        let schema = AttributeSchema::from_names(&blob.schema)?;
        check_fingerprint(&schema, &blob.schema_hash)?;

        let mut counter = PairCounter::new();
        for pair in blob.pairs {
            counter.add(pair.source, pair.related, pair.count);
        }
        Ok(Self { schema, counter, built_at: blob.built_at })
    }
}

#[derive(Serialize, Deserialize)]
struct IndexBlob {
    version: u32,
    schema: Vec<String>,
    schema_hash: String,
    max_bucket_size: i64,
    built_at: DateTime<Utc>,
    buckets: HashMap<String, Vec<(u64, CanonicalKey)>>,
}

/// The built index plus its build schema and bucket cap.
#[derive(Debug)]
pub struct IndexArtifact {
    pub schema: AttributeSchema,
    pub index: RecommendationIndex,
    pub max_bucket_size: i64,
    pub built_at: DateTime<Utc>,
}

impl IndexArtifact {
    pub fn new(schema: AttributeSchema, index: RecommendationIndex, max_bucket_size: i64) -> Self {
        Self { schema, index, max_bucket_size, built_at: Utc::now() }
    }

    pub fn save(&self, path: &Path) -> Result<(), ArtifactError> {
        let buckets = self
            .index
            .iter()
            .map(|(source, entries)| {
                let flat =
                    entries.iter().map(|entry| (entry.count, entry.key.clone())).collect();
                (source.as_str().to_string(), flat)
            })
            .collect();
        let blob = IndexBlob {
            version: FORMAT_VERSION,
            schema: self.schema.names(),
            schema_hash: self.schema.fingerprint(),
            max_bucket_size: self.max_bucket_size,
            built_at: self.built_at,
            buckets,
        };
        write_json_atomic(path, &blob)
    }

    /// Load and verify against the schema the serving process runs with.
    /// Any mismatch is fatal; a stale or foreign index must not serve.
    pub fn load(path: &Path, expected: &AttributeSchema) -> Result<Self, ArtifactError> {
        let blob: IndexBlob = read_json(path)?;
        check_version(blob.version)?;
        let schema = AttributeSchema::from_names(&blob.schema)?;
        check_fingerprint(&schema, &blob.schema_hash)?;
        if schema != *expected {
            return Err(ArtifactError::SchemaMismatch {
                expected: expected.fingerprint(),
                found: schema.fingerprint(),
            });
        }

        let buckets = blob
            .buckets
            .into_iter()
            .map(|(source, entries)| {
                let bucket = entries
                    .into_iter()
                    .map(|(count, key)| IndexEntry { count, key })
                    .collect::<Vec<_>>();
                (CanonicalKey::new(source), bucket)
            })
            .collect();
        Ok(Self {
            schema,
            index: RecommendationIndex::from_buckets(buckets),
            max_bucket_size: blob.max_bucket_size,
            built_at: blob.built_at,
        })
    }
}

fn check_version(found: u32) -> Result<(), ArtifactError> {
    if found != FORMAT_VERSION {
        return Err(ArtifactError::FormatVersion { expected: FORMAT_VERSION, found });
    }
    Ok(())
}

fn check_fingerprint(schema: &AttributeSchema, recorded: &str) -> Result<(), ArtifactError> {
    let computed = schema.fingerprint();
    if computed != recorded {
        return Err(ArtifactError::SchemaMismatch {
            expected: computed,
            found: recorded.to_string(),
        });
    }
    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    let raw = std::fs::read(path)
        .map_err(|source| ArtifactError::Read { path: path.to_path_buf(), source })?;
    serde_json::from_slice(&raw)
        .map_err(|source| ArtifactError::Parse { path: path.to_path_buf(), source })
}

/// Write through a temp file in the target directory and rename into place,
/// so a crashed batch job never leaves a truncated artifact behind.
fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<(), ArtifactError> {
    let payload = serde_json::to_vec_pretty(value)
        .map_err(|source| ArtifactError::Parse { path: path.to_path_buf(), source })?;

    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(directory)
        .map_err(|source| ArtifactError::Write { path: path.to_path_buf(), source })?;

    let mut file = tempfile::NamedTempFile::new_in(directory)
        .map_err(|source| ArtifactError::Write { path: path.to_path_buf(), source })?;
    file.write_all(&payload)
        .map_err(|source| ArtifactError::Write { path: path.to_path_buf(), source })?;
    file.persist(path)
        .map_err(|error| ArtifactError::Write { path: path.to_path_buf(), source: error.error })?;
    Ok(())
}
