use crate::commands::CommandResult;
use lookbook_core::config::{AppConfig, LoadOptions};
use lookbook_core::domain::attribute::AttributeSchema;
use lookbook_core::store::ItemStore;
use lookbook_core::{count_pairs, CounterArtifact, PairCounter};
use lookbook_db::{connect_with_settings, SqlItemStore};

pub fn run() -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "count",
                "config_validation",
                format!("configuration issue: {error}"),
                2,
            );
        }
    };
    run_with_config(&config)
}

/// One full batch pass: read every outfit membership, count ordered key
/// pairs, persist the counter blob. Any store failure aborts the run with
/// nothing written.
pub fn run_with_config(config: &AppConfig) -> CommandResult {
    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return CommandResult::failure(
                "count",
                "runtime_init",
                format!("failed to initialize async runtime: {error}"),
                3,
            );
        }
    };

    let result = runtime.block_on(async {
        let pool = connect_with_settings(
            &config.database.url,
            config.database.max_connections,
            config.database.timeout_secs,
        )
        .await
        .map_err(|error| ("db_connectivity", error.to_string(), 4u8))?;

        let store = SqlItemStore::new(pool.clone());
        let rows =
            store.fetch_grouped_rows().await.map_err(|error| ("store", error.to_string(), 6u8))?;
        pool.close().await;

        let schema = AttributeSchema::standard();
        let mut counter = PairCounter::new();
        count_pairs(&rows, &schema, &mut counter);

        let artifact = CounterArtifact::new(schema, counter);
        artifact
            .save(&config.artifacts.counter_path)
            .map_err(|error| ("artifact", error.to_string(), 7u8))?;

        Ok::<(usize, usize), (&'static str, String, u8)>((rows.len(), artifact.counter.len()))
    });

    match result {
        Ok((rows, pairs)) => CommandResult::success(
            "count",
            format!(
                "counted {pairs} co-occurring key pairs from {rows} outfit rows into `{}`",
                config.artifacts.counter_path.display()
            ),
        ),
        Err((error_class, message, exit_code)) => {
            CommandResult::failure("count", error_class, message, exit_code)
        }
    }
}
