//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use reader_core::segmenter::DEFAULT_CHARS_PER_PAGE;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::Level;

pub const USERS_FILE: &str = "users.json";
pub const PROGRESS_FILE: &str = "progress.json";

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub log_level: Level,
    /// JSON array of books.
    pub catalog_path: PathBuf,
    /// Bundled copy of the catalog, read when `catalog_path` fails.
    pub fallback_catalog_path: Option<PathBuf>,
    /// Directory the catalog's `file` references resolve against.
    pub content_dir: PathBuf,
    /// Bundled copy of the texts, tried when `content_dir` has no file.
    pub fallback_content_dir: Option<PathBuf>,
    /// Holds `users.json` and `progress.json`.
    pub data_dir: PathBuf,
    /// Frontend to serve for non-API paths.
    pub static_dir: Option<PathBuf>,
    /// Allowed CORS origins; empty mirrors the request origin.
    pub cors_origins: Vec<String>,
    pub chars_per_page: usize,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key/value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        // --- Server Settings ---
        let bind_address_str = var("BIND_ADDRESS").unwrap_or_else(|| "0.0.0.0:3000".to_string());
        let bind_address = bind_address_str.parse::<SocketAddr>().map_err(|e| {
            ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
        })?;

        let log_level_str = var("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        // --- Storage Paths ---
        let catalog_path = var("CATALOG_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./frontend/books/data/books.json"));
        let fallback_catalog_path = var("FALLBACK_CATALOG_PATH").map(PathBuf::from);
        let content_dir = var("CONTENT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./frontend/books/content"));
        let fallback_content_dir = var("FALLBACK_CONTENT_DIR").map(PathBuf::from);
        let data_dir = var("DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./data"));
        let static_dir = var("STATIC_DIR").map(PathBuf::from);

        // --- HTTP and Reader Settings ---
        let cors_origins = var("CORS_ORIGINS")
            .map(|list| {
                list.split(',')
                    .map(str::trim)
                    .filter(|origin| !origin.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let chars_per_page = match var("CHARS_PER_PAGE") {
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| {
                    ConfigError::InvalidValue(
                        "CHARS_PER_PAGE".to_string(),
                        format!("'{}' is not a positive integer", raw),
                    )
                })?,
            None => DEFAULT_CHARS_PER_PAGE,
        };

        Ok(Self {
            bind_address,
            log_level,
            catalog_path,
            fallback_catalog_path,
            content_dir,
            fallback_content_dir,
            data_dir,
            static_dir,
            cors_origins,
            chars_per_page,
        })
    }

    pub fn users_path(&self) -> PathBuf {
        self.data_dir.join(USERS_FILE)
    }

    pub fn progress_path(&self) -> PathBuf {
        self.data_dir.join(PROGRESS_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = load(&[]).unwrap();
        assert_eq!(config.bind_address, "0.0.0.0:3000".parse().unwrap());
        assert_eq!(config.log_level, Level::INFO);
        assert_eq!(config.data_dir, PathBuf::from("./data"));
        assert_eq!(config.users_path(), PathBuf::from("./data/users.json"));
        assert_eq!(config.chars_per_page, DEFAULT_CHARS_PER_PAGE);
        assert!(config.static_dir.is_none());
        assert!(config.fallback_catalog_path.is_none());
        assert!(config.cors_origins.is_empty());
    }

    #[test]
    fn values_are_read_from_the_source() {
        let config = load(&[
            ("BIND_ADDRESS", "127.0.0.1:8080"),
            ("RUST_LOG", "debug"),
            ("DATA_DIR", "/var/lib/reader"),
            ("STATIC_DIR", "./frontend"),
            ("FALLBACK_CONTENT_DIR", "./bundled"),
            ("FALLBACK_CATALOG_PATH", "./bundled/books.json"),
            ("CORS_ORIGINS", "http://localhost:3000, http://192.168.1.5:3000,"),
            ("CHARS_PER_PAGE", "1500"),
        ])
        .unwrap();
        assert_eq!(config.bind_address.port(), 8080);
        assert_eq!(config.log_level, Level::DEBUG);
        assert_eq!(config.progress_path(), PathBuf::from("/var/lib/reader/progress.json"));
        assert_eq!(config.static_dir, Some(PathBuf::from("./frontend")));
        assert_eq!(config.fallback_content_dir, Some(PathBuf::from("./bundled")));
        assert_eq!(
            config.fallback_catalog_path,
            Some(PathBuf::from("./bundled/books.json"))
        );
        assert_eq!(
            config.cors_origins,
            vec!["http://localhost:3000", "http://192.168.1.5:3000"]
        );
        assert_eq!(config.chars_per_page, 1500);
    }

    #[test]
    fn invalid_values_are_reported() {
        assert!(matches!(
            load(&[("BIND_ADDRESS", "nowhere")]),
            Err(ConfigError::InvalidValue(key, _)) if key == "BIND_ADDRESS"
        ));
        assert!(matches!(
            load(&[("RUST_LOG", "chatty")]),
            Err(ConfigError::InvalidValue(key, _)) if key == "RUST_LOG"
        ));
        assert!(matches!(
            load(&[("CHARS_PER_PAGE", "0")]),
            Err(ConfigError::InvalidValue(key, _)) if key == "CHARS_PER_PAGE"
        ));
    }
}
