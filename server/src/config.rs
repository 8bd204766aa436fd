use anyhow::{Context, Result};
use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Prefix for environment overrides, e.g. `TASKS_SERVER__PORT`
pub const ENV_PREFIX: &str = "TASKS";

/// Directory under the platform data dir that holds the database
pub const APP_DIR_NAME: &str = "priority-tasks";

const DEFAULT_CONFIG: &str = include_str!("../config/default.toml");

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub seed: SeedConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DatabaseConfig {
    /// Optional database URL. Defaults to a file under the platform data dir
    pub url: Option<String>,
    /// Pool size for file databases; in-memory databases always use one connection
    pub max_connections: u32,
    /// Seconds to wait for a pooled connection
    pub connection_timeout: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    /// Interface the HTTP listener binds to
    pub listen_addr: String,
    /// TCP port, must be non-zero
    pub port: u16,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    /// One of trace, debug, info, warn, error; `RUST_LOG` takes precedence
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
    Compact,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SeedConfig {
    /// Insert the default tasks when the store is empty
    pub enabled: bool,
}

fn env_source() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

impl Config {
    /// Embedded defaults, then `CONFIG_FILE` if set, then `TASKS_*` variables
    pub fn from_env() -> Result<Self> {
        let mut builder = ConfigBuilder::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Ok(config_file) = env::var("CONFIG_FILE") {
            builder = builder.add_source(
                File::with_name(&config_file)
                    .required(false)
                    .format(FileFormat::Toml),
            );
        }

        let config = builder
            .add_source(env_source())
            .build()
            .context("Failed to build configuration")?;

        let mut result: Config = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        // Standard deployment variables win over the prefixed ones
        Self::apply_standard_env_vars(&mut result);

        Ok(result)
    }

    /// Load configuration from a specific file path, on top of the defaults
    pub fn from_file(path: &str) -> Result<Self> {
        let config = ConfigBuilder::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .add_source(File::with_name(path).format(FileFormat::Toml))
            .add_source(env_source())
            .build()
            .with_context(|| format!("Failed to build configuration from file {path}"))?;

        let mut result: Config = config
            .try_deserialize()
            .context("Failed to deserialize configuration from file")?;

        Self::apply_standard_env_vars(&mut result);

        Ok(result)
    }

    /// Unprefixed deployment variables override everything loaded so far
    fn apply_standard_env_vars(config: &mut Config) {
        if let Ok(database_url) = env::var("DATABASE_URL") {
            config.database.url = Some(database_url);
        }

        if let Ok(listen_addr) = env::var("LISTEN_ADDR") {
            config.server.listen_addr = listen_addr;
        }

        if let Ok(log_level) = env::var("LOG_LEVEL") {
            config.logging.level = log_level;
        }
    }

    /// Get the database URL with default fallback
    pub fn database_url(&self) -> String {
        match &self.database.url {
            Some(url) => url.clone(),
            None => Self::default_database_url(),
        }
    }

    /// `sqlite://<data_dir>/priority-tasks/tasks.sqlite`
    pub fn default_database_url() -> String {
        format!("sqlite://{}", default_database_path().display())
    }

    /// `listen_addr:port`
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.listen_addr, self.server.port)
    }

    /// Reject settings the server cannot start with
    pub fn validate(&self) -> Result<()> {
        match self.logging.level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(anyhow::anyhow!(
                    "Unknown log level '{}' (expected trace, debug, info, warn or error)",
                    self.logging.level
                ));
            }
        }

        let database_url = self.database_url();
        if !database_url.starts_with("sqlite:") {
            return Err(anyhow::anyhow!(
                "Only SQLite databases are supported. URL must start with 'sqlite:'. Got: {}",
                database_url
            ));
        }

        if self.server.port == 0 {
            return Err(anyhow::anyhow!("server.port must be non-zero"));
        }

        if self.database.max_connections == 0 {
            return Err(anyhow::anyhow!(
                "database.max_connections must be at least 1"
            ));
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                url: None,
                max_connections: 10,
                connection_timeout: 30,
            },
            server: ServerConfig {
                listen_addr: "127.0.0.1".to_string(),
                port: 5000,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: LogFormat::Pretty,
            },
            seed: SeedConfig { enabled: true },
        }
    }
}

/// Default database file, falling back to the current directory when the
/// platform has no data dir
pub fn default_database_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
        .join("tasks.sqlite")
}
