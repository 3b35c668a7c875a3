//! Application settings loaded from `config.toml` and environment variables.
//!
//! Every section is optional in the file; missing values fall back to the
//! defaults below. `DATABASE_URL` and `LISTEN_ADDR` override the file when set.
//! The `[[categories]]` list is used to seed the catalogue on start-up.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

/// Environment variable naming an alternative configuration file
pub const CONFIG_PATH_ENV: &str = "PET_SHOP_CONFIG";

const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Where the HTTP server listens.
    pub server: ServerConfig,
    /// Which database to open.
    pub database: DatabaseConfig,
    /// Search page sizes.
    pub pagination: PaginationConfig,
    /// Categories created on start-up when no category of that name exists
    pub categories: Vec<CategoryConfig>,
}

/// HTTP server settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to bind, e.g. `0.0.0.0:8080`
    pub listen: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Database settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// `SeaORM` connection URL
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://pet_shop.sqlite?mode=rwc".to_string(),
        }
    }
}

/// Page size limits applied to every search endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PaginationConfig {
    /// Page size used when the request does not name one
    pub default_size: u64,
    /// Largest page size a request may ask for
    pub max_size: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_size: 10,
            max_size: 100,
        }
    }
}

/// A category to seed
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryConfig {
    /// Category name; seeding skips names that already exist.
    pub name: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
}

impl AppConfig {
    /// Replaces the database URL and listen address with explicit overrides.
    #[must_use]
    pub fn with_overrides(mut self, database_url: Option<String>, listen: Option<String>) -> Self {
        if let Some(url) = database_url {
            self.database.url = url;
        }
        if let Some(listen) = listen {
            self.server.listen = listen;
        }
        self
    }

    /// Checks values serde cannot check on its own.
    pub fn validate(&self) -> Result<()> {
        let PaginationConfig {
            default_size,
            max_size,
        } = self.pagination;
        if default_size == 0 || default_size > max_size {
            return Err(Error::Config {
                message: format!(
                    "pagination.default_size must be between 1 and max_size ({max_size}), got {default_size}"
                ),
            });
        }
        if self.categories.iter().any(|c| c.name.trim().is_empty()) {
            return Err(Error::Config {
                message: "category names in config must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

/// Loads configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();
    debug!("Attempting to load configuration from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path_ref.display()),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse {}: {e}", path_ref.display()),
    })
}

/// Loads the configuration the server runs with.
///
/// Reads the file named by `PET_SHOP_CONFIG` (default `./config.toml`) if it
/// exists, otherwise starts from defaults, then applies `DATABASE_URL` and
/// `LISTEN_ADDR` from the environment.
pub fn load_app_configuration() -> Result<AppConfig> {
    let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

    let config = if Path::new(&path).exists() {
        info!("Loading configuration from {}", path);
        load_config(&path)?
    } else {
        info!("No configuration file at {}, using defaults", path);
        AppConfig::default()
    };

    let config = config.with_overrides(
        std::env::var("DATABASE_URL").ok(),
        std::env::var("LISTEN_ADDR").ok(),
    );
    config.validate()?;
    Ok(config)
}
