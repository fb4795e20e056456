//! Configuration management
//!
//! This module handles loading and parsing configuration for the Inkdex blog platform.
//! Configuration can be loaded from:
//! - config.yml file
//! - Environment variables (override file settings)
//!
//! Missing optional values are filled with sensible defaults.

use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Search index configuration
    #[serde(default)]
    pub search: SearchConfig,
    /// Pagination defaults
    #[serde(default)]
    pub pagination: PaginationConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
    /// CORS allowed origin
    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_cors_origin() -> String {
    "http://localhost:3000".to_string()
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database driver (sqlite or mysql)
    #[serde(default)]
    pub driver: DatabaseDriver,
    /// Database connection URL
    #[serde(default = "default_database_url")]
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            driver: DatabaseDriver::default(),
            url: default_database_url(),
        }
    }
}

fn default_database_url() -> String {
    "data/inkdex.db".to_string()
}

/// Database driver type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseDriver {
    /// SQLite (default)
    #[default]
    Sqlite,
    /// MySQL
    Mysql,
}

/// Search index configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Search backend driver (elastic or memory)
    #[serde(default)]
    pub driver: SearchDriver,
    /// Elasticsearch node URL
    #[serde(default = "default_search_url")]
    pub url: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            driver: SearchDriver::default(),
            url: default_search_url(),
        }
    }
}

fn default_search_url() -> String {
    "http://127.0.0.1:9200".to_string()
}

/// Search backend driver type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SearchDriver {
    /// Elasticsearch (default)
    #[default]
    Elastic,
    /// In-process index (development and tests)
    Memory,
}

/// Pagination defaults for list and search endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// Page size used when the request does not specify a limit
    #[serde(default = "default_limit")]
    pub default_limit: i64,
    /// Upper bound for the requested limit
    #[serde(default = "default_max_limit")]
    pub max_limit: i64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            max_limit: default_max_limit(),
        }
    }
}

fn default_limit() -> i64 {
    10
}

fn default_max_limit() -> i64 {
    100
}

impl PaginationConfig {
    /// Resolve requested limit/offset against the configured bounds
    pub fn resolve(&self, limit: Option<i64>, offset: Option<i64>) -> (i64, i64) {
        let max_limit = self.max_limit.max(1);
        let limit = limit.unwrap_or(self.default_limit).clamp(1, max_limit);
        let offset = offset.unwrap_or(0).max(0);
        (limit, offset)
    }
}

/// Error type for configuration parsing
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    FileRead {
        path: String,
        source: std::io::Error,
    },
    #[error("Failed to parse config file '{path}': {message}")]
    ParseError { path: String, message: String },
}

impl Config {
    /// Load configuration from file
    ///
    /// If the file doesn't exist, returns default configuration.
    /// If the file exists but is invalid YAML, returns an error with details.
    pub fn load(path: &std::path::Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.display().to_string(),
            source: e,
        })?;

        // Handle empty file - return defaults
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config =
            serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: format_yaml_error(&e),
            })?;

        Ok(config)
    }

    /// Load configuration from file with environment variable overrides
    ///
    /// Environment variables follow the pattern:
    /// - INKDEX_SERVER_HOST
    /// - INKDEX_SERVER_PORT
    /// - INKDEX_SERVER_CORS_ORIGIN
    /// - INKDEX_DATABASE_DRIVER
    /// - INKDEX_DATABASE_URL
    /// - INKDEX_SEARCH_DRIVER
    /// - INKDEX_SEARCH_URL
    /// - INKDEX_PAGINATION_DEFAULT_LIMIT
    /// - INKDEX_PAGINATION_MAX_LIMIT
    pub fn load_with_env(path: &std::path::Path) -> anyhow::Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides to the configuration
    fn apply_env_overrides(&mut self) {
        // Server configuration
        if let Ok(host) = std::env::var("INKDEX_SERVER_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("INKDEX_SERVER_PORT") {
            if let Ok(port) = port.parse::<u16>() {
                self.server.port = port;
            }
        }
        if let Ok(cors_origin) = std::env::var("INKDEX_SERVER_CORS_ORIGIN") {
            self.server.cors_origin = cors_origin;
        }

        // Database configuration
        if let Ok(driver) = std::env::var("INKDEX_DATABASE_DRIVER") {
            match driver.to_lowercase().as_str() {
                "sqlite" => self.database.driver = DatabaseDriver::Sqlite,
                "mysql" => self.database.driver = DatabaseDriver::Mysql,
                _ => {} // Ignore invalid values
            }
        }
        if let Ok(url) = std::env::var("INKDEX_DATABASE_URL") {
            self.database.url = url;
        }

        // Search configuration
        if let Ok(driver) = std::env::var("INKDEX_SEARCH_DRIVER") {
            match driver.to_lowercase().as_str() {
                "elastic" => self.search.driver = SearchDriver::Elastic,
                "memory" => self.search.driver = SearchDriver::Memory,
                _ => {} // Ignore invalid values
            }
        }
        if let Ok(url) = std::env::var("INKDEX_SEARCH_URL") {
            self.search.url = url;
        }

        // Pagination configuration
        if let Ok(limit) = std::env::var("INKDEX_PAGINATION_DEFAULT_LIMIT") {
            if let Ok(limit) = limit.parse::<i64>() {
                self.pagination.default_limit = limit;
            }
        }
        if let Ok(limit) = std::env::var("INKDEX_PAGINATION_MAX_LIMIT") {
            if let Ok(limit) = limit.parse::<i64>() {
                self.pagination.max_limit = limit;
            }
        }
    }
}

/// Format YAML parsing error with location and context
fn format_yaml_error(e: &serde_yaml::Error) -> String {
    if let Some(location) = e.location() {
        format!(
            "at line {}, column {}: {}",
            location.line(),
            location.column(),
            e
        )
    } else {
        e.to_string()
    }
}

// Shared mutex for all config tests that modify environment variables.
#[cfg(test)]
static CONFIG_ENV_MUTEX: std::sync::Mutex<()> = std::sync::Mutex::new(());
