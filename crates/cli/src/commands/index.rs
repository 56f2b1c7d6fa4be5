use crate::commands::CommandResult;
use lookbook_core::config::{AppConfig, LoadOptions};
use lookbook_core::{build_index, CounterArtifact, IndexArtifact};

pub fn run() -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "index",
                "config_validation",
                format!("configuration issue: {error}"),
                2,
            );
        }
    };
    run_with_config(&config)
}

/// Rebuild the top-K index from the persisted counter blob. The index
/// inherits the counter's schema, so serving-time verification catches any
/// drift between batch runs.
pub fn run_with_config(config: &AppConfig) -> CommandResult {
    let counter = match CounterArtifact::load(&config.artifacts.counter_path) {
        Ok(counter) => counter,
        Err(error) => {
            return CommandResult::failure("index", "artifact", error.to_string(), 7);
        }
    };

    let index = build_index(&counter.counter, config.artifacts.max_bucket_size);
    let artifact =
        IndexArtifact::new(counter.schema, index, config.artifacts.max_bucket_size);

    if let Err(error) = artifact.save(&config.artifacts.index_path) {
        return CommandResult::failure("index", "artifact", error.to_string(), 7);
    }

    CommandResult::success(
        "index",
        format!(
            "built {} index buckets (max bucket size {}) into `{}`",
            artifact.index.bucket_count(),
            config.artifacts.max_bucket_size,
            config.artifacts.index_path.display()
        ),
    )
}
