//! Application configuration
//!
//! Split into focused sub-modules:
//! - `server`: HTTP server settings
//! - `logging`: log level and output format
//! - `database`: SQLite database settings
//!
//! Sources are layered, later ones winning: built-in defaults, an optional
//! `config.{toml,yaml,json}` file, `MESSAGE_SERVICE_*` environment variables
//! (nested keys separated by `__`), and finally the plain `LOG_LEVEL`, `PORT`
//! and `DB_URL` variables.

mod database;
mod logging;
mod server;

use serde::{Deserialize, Serialize};

pub use database::DatabaseConfig;
pub use logging::{LogFormat, LoggingConfig};
pub use server::ServerConfig;

/// Prefix of the structured environment variables
pub const ENV_PREFIX: &str = "MESSAGE_SERVICE";

/// Shared default for boolean `true` fields across config structs
pub(crate) const fn default_true() -> bool {
    true
}

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,
}

/// Plain environment variables that override the layered configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LegacyEnv {
    /// `LOG_LEVEL`
    pub log_level: Option<String>,
    /// `PORT`
    pub port: Option<String>,
    /// `DB_URL`
    pub db_url: Option<String>,
}

impl LegacyEnv {
    /// Read the variables from the process environment; empty values are ignored
    #[must_use]
    pub fn from_env() -> Self {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.is_empty());
        Self {
            log_level: var("LOG_LEVEL"),
            port: var("PORT"),
            db_url: var("DB_URL"),
        }
    }
}

impl AppConfig {
    /// Load configuration from file and the process environment
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from(None, LegacyEnv::from_env())
    }

    /// Load configuration with an explicit environment
    ///
    /// `env` replaces the process environment for the `MESSAGE_SERVICE_*`
    /// source when given.
    pub fn load_from(
        env: Option<config::Map<String, String>>,
        legacy: LegacyEnv,
    ) -> Result<Self, config::ConfigError> {
        let port = legacy
            .port
            .map(|p| {
                p.parse::<u16>().map(i64::from).map_err(|e| {
                    config::ConfigError::Message(format!("invalid PORT {p:?}: {e}"))
                })
            })
            .transpose()?;

        let config = config::Config::builder()
            // Start with defaults
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("server.root_path", "")?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "text")?
            .set_default("database.url", "sqlite:messages.db")?
            // Load from file if exists
            .add_source(config::File::with_name("config").required(false))
            // Override with environment variables (e.g., MESSAGE_SERVICE_SERVER__PORT)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .source(env),
            )
            .set_override_option("logging.level", legacy.log_level)?
            .set_override_option("server.port", port)?
            .set_override_option("database.url", legacy.db_url)?
            .build()?;

        config.try_deserialize()
    }
}
