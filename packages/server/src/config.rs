use std::path::PathBuf;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    /// Allowed origins. `"*"` allows any origin; an empty list disables CORS.
    pub allow_origins: Vec<String>,
    pub max_age: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout_secs: u64,
    /// Unset keeps pooled connections open indefinitely (required for `sqlite::memory:`).
    pub idle_timeout_secs: Option<u64>,
    pub max_lifetime_secs: Option<u64>,
    pub sqlx_logging: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// Directory avatar images are written to.
    pub avatars_dir: PathBuf,
    /// Maximum accepted avatar size in bytes.
    pub max_avatar_size: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LogConfig {
    /// Default `tracing` filter directive, overridden by `RUST_LOG`.
    pub filter: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub storage: StorageConfig,
    pub log: LogConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Self::builder()?
            // Load from config/config.toml
            .add_source(File::with_name("config/config").required(false))
            // Override from environment (e.g., SCHOOL__DATABASE__URL)
            .add_source(
                Environment::with_prefix("SCHOOL")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("server.cors.allow_origins"),
            )
            .build()?
            .try_deserialize()
    }

    fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("server.cors.allow_origins", Vec::<String>::new())?
            .set_default("server.cors.max_age", 3600)?
            .set_default("database.url", "sqlite://school.db?mode=rwc")?
            .set_default("database.max_connections", 20)?
            .set_default("database.min_connections", 1)?
            .set_default("database.connect_timeout_secs", 8)?
            .set_default("database.sqlx_logging", false)?
            .set_default("storage.avatars_dir", "./avatars")?
            .set_default("storage.max_avatar_size", 5 * 1024 * 1024)?
            .set_default("log.filter", "school_server=info,tower_http=info")
    }
}
