use std::sync::Arc;

use lookbook_core::config::{AppConfig, ConfigError, LoadOptions};
use lookbook_core::domain::attribute::AttributeSchema;
use lookbook_core::store::ItemStore;
use lookbook_core::{ArtifactError, IndexArtifact, RecommendationEngine};
use lookbook_db::{connect_with_settings, migrations, DbPool, SqlItemStore};
use thiserror::Error;
use tracing::info;

pub struct Application {
    pub config: AppConfig,
    pub db_pool: DbPool,
    pub store: Arc<dyn ItemStore>,
    pub engine: Arc<RecommendationEngine>,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("database connection failed: {0}")]
    DatabaseConnect(#[source] sqlx::Error),
    #[error("database migration failed: {0}")]
    Migration(#[source] sqlx::migrate::MigrateError),
    #[error("index artifact rejected: {0}")]
    IndexArtifact(#[source] ArtifactError),
}

pub async fn bootstrap(options: LoadOptions) -> Result<Application, BootstrapError> {
    let config = AppConfig::load(options)?;
    bootstrap_with_config(config).await
}

/// Bring the process to Ready: pool, migrations, then the index artifact.
/// A missing or schema-incompatible index is fatal here, so a serving
/// process can never exist without a bound engine.
pub async fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting application bootstrap"
    );

    let db_pool = connect_with_settings(
        &config.database.url,
        config.database.max_connections,
        config.database.timeout_secs,
    )
    .await
    .map_err(BootstrapError::DatabaseConnect)?;
    info!(
        event_name = "system.bootstrap.database_connected",
        correlation_id = "bootstrap",
        "database connection established"
    );

    migrations::run_pending(&db_pool).await.map_err(BootstrapError::Migration)?;
    info!(
        event_name = "system.bootstrap.migrations_applied",
        correlation_id = "bootstrap",
        "database migrations applied"
    );

    let artifact = IndexArtifact::load(&config.artifacts.index_path, &AttributeSchema::standard())
        .map_err(BootstrapError::IndexArtifact)?;
    info!(
        event_name = "system.bootstrap.index_loaded",
        correlation_id = "bootstrap",
        bucket_count = artifact.index.bucket_count(),
        built_at = %artifact.built_at,
        "recommendation index loaded and schema-verified"
    );

    let store: Arc<dyn ItemStore> = Arc::new(SqlItemStore::new(db_pool.clone()));
    let engine = Arc::new(RecommendationEngine::new(
        artifact,
        store.clone(),
        config.recommend.answer_group_pattern.clone(),
    ));

    Ok(Application { config, db_pool, store, engine })
}

#[cfg(test)]
mod tests {
    use lookbook_core::config::{ConfigOverrides, LoadOptions};
    use lookbook_core::domain::attribute::AttributeSchema;
    use lookbook_core::index::UNBOUNDED_BUCKET;
    use lookbook_core::{build_index, IndexArtifact, PairCounter};

    use crate::bootstrap::{bootstrap, BootstrapError};

    fn load_options(database_url: &str, index_path: std::path::PathBuf) -> LoadOptions {
        LoadOptions {
            overrides: ConfigOverrides {
                database_url: Some(database_url.to_string()),
                index_path: Some(index_path),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        }
    }

    #[tokio::test]
    async fn bootstrap_fails_fast_without_an_index_artifact() {
        let dir = tempfile::tempdir().expect("tempdir");
        let result =
            bootstrap(load_options("sqlite::memory:", dir.path().join("absent.json"))).await;

        assert!(matches!(result, Err(BootstrapError::IndexArtifact(_))));
    }

    #[tokio::test]
    async fn bootstrap_binds_an_engine_from_a_valid_artifact() {
        let dir = tempfile::tempdir().expect("tempdir");
        let index_path = dir.path().join("index.json");

        let schema = AttributeSchema::standard();
        let index = build_index(&PairCounter::new(), UNBOUNDED_BUCKET);
        IndexArtifact::new(schema, index, UNBOUNDED_BUCKET)
            .save(&index_path)
            .expect("save index artifact");

        let app = bootstrap(load_options("sqlite::memory:?cache=shared", index_path))
            .await
            .expect("bootstrap should succeed");

        assert_eq!(app.engine.bucket_count(), 0);

        let (table_count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM sqlite_master \
             WHERE type = 'table' AND name IN ('items', 'outfit_items')",
        )
        .fetch_one(&app.db_pool)
        .await
        .expect("expected baseline tables to be available after bootstrap");
        assert_eq!(table_count, 2, "bootstrap should expose the item-store tables");

        app.db_pool.close().await;
    }
}
