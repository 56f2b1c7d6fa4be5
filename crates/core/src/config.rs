use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub artifacts: ArtifactConfig,
    pub recommend: RecommendConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub timeout_secs: u64,
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
    pub graceful_shutdown_secs: u64,
}

/// Where the batch jobs persist their blobs and how wide index buckets grow.
#[derive(Clone, Debug)]
pub struct ArtifactConfig {
    pub counter_path: PathBuf,
    pub index_path: PathBuf,
    /// `-1` lifts the per-key bucket cap.
    pub max_bucket_size: i64,
}

#[derive(Clone, Debug)]
pub struct RecommendConfig {
    /// Category substrings excluded from candidate groups and curated answers.
    pub filter_categories: Vec<String>,
    /// SQL LIKE pattern selecting curated outfit groups for answer boosting.
    pub answer_group_pattern: String,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub database_url: Option<String>,
    pub counter_path: Option<PathBuf>,
    pub index_path: Option<PathBuf>,
    pub max_bucket_size: Option<i64>,
    pub filter_categories: Option<Vec<String>>,
    pub log_level: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                url: "sqlite://lookbook.db".to_string(),
                max_connections: 5,
                timeout_secs: 30,
            },
            server: ServerConfig {
                bind_address: "127.0.0.1".to_string(),
                port: 8080,
                graceful_shutdown_secs: 15,
            },
            artifacts: ArtifactConfig {
                counter_path: PathBuf::from("data/counter.json"),
                index_path: PathBuf::from("data/index.json"),
                max_bucket_size: -1,
            },
            recommend: RecommendConfig {
                // The storefront excludes shoes, accessories, bags, and
                // outerwear from complement recommendations.
                filter_categories: vec![
                    "신발".to_string(),
                    "패션잡화".to_string(),
                    "가방".to_string(),
                    "아우터".to_string(),
                ],
                answer_group_pattern: "W%".to_string(),
            },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("lookbook.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(database) = patch.database {
            if let Some(url) = database.url {
                self.database.url = url;
            }
            if let Some(max_connections) = database.max_connections {
                self.database.max_connections = max_connections;
            }
            if let Some(timeout_secs) = database.timeout_secs {
                self.database.timeout_secs = timeout_secs;
            }
        }

        if let Some(server) = patch.server {
            if let Some(bind_address) = server.bind_address {
                self.server.bind_address = bind_address;
            }
            if let Some(port) = server.port {
                self.server.port = port;
            }
            if let Some(graceful_shutdown_secs) = server.graceful_shutdown_secs {
                self.server.graceful_shutdown_secs = graceful_shutdown_secs;
            }
        }

        if let Some(artifacts) = patch.artifacts {
            if let Some(counter_path) = artifacts.counter_path {
                self.artifacts.counter_path = counter_path;
            }
            if let Some(index_path) = artifacts.index_path {
                self.artifacts.index_path = index_path;
            }
            if let Some(max_bucket_size) = artifacts.max_bucket_size {
                self.artifacts.max_bucket_size = max_bucket_size;
            }
        }

        if let Some(recommend) = patch.recommend {
            if let Some(filter_categories) = recommend.filter_categories {
                self.recommend.filter_categories = filter_categories;
            }
            if let Some(answer_group_pattern) = recommend.answer_group_pattern {
                self.recommend.answer_group_pattern = answer_group_pattern;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("LOOKBOOK_DATABASE_URL") {
            self.database.url = value;
        }
        if let Some(value) = read_env("LOOKBOOK_DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections =
                parse_u32("LOOKBOOK_DATABASE_MAX_CONNECTIONS", &value)?;
        }
        if let Some(value) = read_env("LOOKBOOK_DATABASE_TIMEOUT_SECS") {
            self.database.timeout_secs = parse_u64("LOOKBOOK_DATABASE_TIMEOUT_SECS", &value)?;
        }

        if let Some(value) = read_env("LOOKBOOK_SERVER_BIND_ADDRESS") {
            self.server.bind_address = value;
        }
        if let Some(value) = read_env("LOOKBOOK_SERVER_PORT") {
            self.server.port = parse_u16("LOOKBOOK_SERVER_PORT", &value)?;
        }
        if let Some(value) = read_env("LOOKBOOK_SERVER_GRACEFUL_SHUTDOWN_SECS") {
            self.server.graceful_shutdown_secs =
                parse_u64("LOOKBOOK_SERVER_GRACEFUL_SHUTDOWN_SECS", &value)?;
        }

        if let Some(value) = read_env("LOOKBOOK_ARTIFACTS_COUNTER_PATH") {
            self.artifacts.counter_path = PathBuf::from(value);
        }
        if let Some(value) = read_env("LOOKBOOK_ARTIFACTS_INDEX_PATH") {
            self.artifacts.index_path = PathBuf::from(value);
        }
        if let Some(value) = read_env("LOOKBOOK_ARTIFACTS_MAX_BUCKET_SIZE") {
            self.artifacts.max_bucket_size =
                parse_i64("LOOKBOOK_ARTIFACTS_MAX_BUCKET_SIZE", &value)?;
        }

        if let Some(value) = read_env("LOOKBOOK_RECOMMEND_FILTER_CATEGORIES") {
            self.recommend.filter_categories = value
                .split(',')
                .map(str::trim)
                .filter(|category| !category.is_empty())
                .map(str::to_string)
                .collect();
        }
        if let Some(value) = read_env("LOOKBOOK_RECOMMEND_ANSWER_GROUP_PATTERN") {
            self.recommend.answer_group_pattern = value;
        }

        let log_level =
            read_env("LOOKBOOK_LOGGING_LEVEL").or_else(|| read_env("LOOKBOOK_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("LOOKBOOK_LOGGING_FORMAT").or_else(|| read_env("LOOKBOOK_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(database_url) = overrides.database_url {
            self.database.url = database_url;
        }
        if let Some(counter_path) = overrides.counter_path {
            self.artifacts.counter_path = counter_path;
        }
        if let Some(index_path) = overrides.index_path {
            self.artifacts.index_path = index_path;
        }
        if let Some(max_bucket_size) = overrides.max_bucket_size {
            self.artifacts.max_bucket_size = max_bucket_size;
        }
        if let Some(filter_categories) = overrides.filter_categories {
            self.recommend.filter_categories = filter_categories;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_database(&self.database)?;
        validate_server(&self.server)?;
        validate_artifacts(&self.artifacts)?;
        validate_recommend(&self.recommend)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("lookbook.toml"), PathBuf::from("config/lookbook.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_database(database: &DatabaseConfig) -> Result<(), ConfigError> {
    let url = database.url.trim();
    let sqlite_url =
        url.starts_with("sqlite://") || url.starts_with("sqlite::") || url == ":memory:";
    if !sqlite_url {
        return Err(ConfigError::Validation(
            "database.url must be a sqlite URL (`sqlite://...`, `sqlite::...`, or `:memory:`)"
                .to_string(),
        ));
    }

    if database.max_connections == 0 {
        return Err(ConfigError::Validation(
            "database.max_connections must be greater than zero".to_string(),
        ));
    }

    if database.timeout_secs == 0 || database.timeout_secs > 300 {
        return Err(ConfigError::Validation(
            "database.timeout_secs must be in range 1..=300".to_string(),
        ));
    }

    Ok(())
}

fn validate_server(server: &ServerConfig) -> Result<(), ConfigError> {
    if server.port == 0 {
        return Err(ConfigError::Validation("server.port must be greater than zero".to_string()));
    }

    if server.graceful_shutdown_secs == 0 {
        return Err(ConfigError::Validation(
            "server.graceful_shutdown_secs must be greater than zero".to_string(),
        ));
    }

    Ok(())
}

fn validate_artifacts(artifacts: &ArtifactConfig) -> Result<(), ConfigError> {
    if artifacts.counter_path.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "artifacts.counter_path must not be empty".to_string(),
        ));
    }

    if artifacts.index_path.as_os_str().is_empty() {
        return Err(ConfigError::Validation("artifacts.index_path must not be empty".to_string()));
    }

    if artifacts.max_bucket_size == 0 || artifacts.max_bucket_size < -1 {
        return Err(ConfigError::Validation(
            "artifacts.max_bucket_size must be positive, or -1 for unbounded".to_string(),
        ));
    }

    Ok(())
}

fn validate_recommend(recommend: &RecommendConfig) -> Result<(), ConfigError> {
    if recommend.answer_group_pattern.trim().is_empty() {
        return Err(ConfigError::Validation(
            "recommend.answer_group_pattern must not be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_u16(key: &str, value: &str) -> Result<u16, ConfigError> {
    value.parse::<u16>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_u32(key: &str, value: &str) -> Result<u32, ConfigError> {
    value.parse::<u32>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.parse::<u64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_i64(key: &str, value: &str) -> Result<i64, ConfigError> {
    value.parse::<i64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    database: Option<DatabasePatch>,
    server: Option<ServerPatch>,
    artifacts: Option<ArtifactPatch>,
    recommend: Option<RecommendPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct DatabasePatch {
    url: Option<String>,
    max_connections: Option<u32>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct ServerPatch {
    bind_address: Option<String>,
    port: Option<u16>,
    graceful_shutdown_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct ArtifactPatch {
    counter_path: Option<PathBuf>,
    index_path: Option<PathBuf>,
    max_bucket_size: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
struct RecommendPatch {
    filter_categories: Option<Vec<String>>,
    answer_group_pattern: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}
