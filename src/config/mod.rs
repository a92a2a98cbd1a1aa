use crate::core::{AppError, Result};
use std::env;
use std::str::FromStr;
use std::time::Duration;

pub mod database;
pub mod server;

pub use database::DatabaseConfig;
pub use server::ServerConfig;

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub storage: StorageConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: String,
    pub log_level: String,
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(AppError::configuration(format!(
                "Invalid LOG_FORMAT '{}', expected pretty or json",
                other
            ))),
        }
    }
}

/// Where invoices are kept
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    MySql,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mysql" => Ok(StorageBackend::MySql),
            "memory" => Ok(StorageBackend::Memory),
            other => Err(AppError::configuration(format!(
                "Invalid STORAGE_BACKEND '{}', expected mysql or memory",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Deadline for a single repository call
    pub operation_timeout: Duration,
    /// Present when `backend` is MySQL
    pub database: Option<DatabaseConfig>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup`, which returns a variable's value
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let backend: StorageBackend = parse_var(&lookup, "STORAGE_BACKEND", "mysql")?;
        let timeout_secs: u64 = parse_var(&lookup, "DATABASE_OPERATION_TIMEOUT_SECS", "10")?;

        let database = match backend {
            StorageBackend::MySql => Some(DatabaseConfig::from_lookup(&lookup)?),
            StorageBackend::Memory => None,
        };

        Ok(Config {
            app: AppConfig {
                env: lookup("APP_ENV").unwrap_or_else(|| "development".to_string()),
                log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
                log_format: parse_var(&lookup, "LOG_FORMAT", "pretty")?,
            },
            storage: StorageConfig {
                backend,
                operation_timeout: Duration::from_secs(timeout_secs),
                database,
            },
            server: ServerConfig::from_lookup(&lookup)?,
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.storage.operation_timeout.is_zero() {
            return Err(AppError::Configuration(
                "DATABASE_OPERATION_TIMEOUT_SECS must be greater than 0".to_string(),
            ));
        }

        if let Some(database) = &self.storage.database {
            database.validate()?;
        }

        self.server.validate()
    }
}

/// Parse `key` with `default` when unset
pub(crate) fn parse_var<T, F>(lookup: &F, key: &str, default: &str) -> Result<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .unwrap_or_else(|| default.to_string())
        .parse()
        .map_err(|_| AppError::Configuration(format!("Invalid {}", key)))
}
