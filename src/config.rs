use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;

use crate::persist::{RecipePersistence, DEFAULT_KEY};
use crate::storage::{FileStorage, KeyValueStorage, MemoryStorage};

/// Application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// Where and how recipes are persisted
    #[serde(default)]
    pub storage: StorageConfig,
    /// Log level used when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage: StorageConfig::default(),
            log_level: default_log_level(),
        }
    }
}

/// Storage medium backing the recipe collection
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// One JSON file per slot under `path`
    #[default]
    File,
    /// Process memory only; nothing survives exit
    Memory,
}

/// Configuration for the storage medium
#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    /// Data directory for the file backend
    #[serde(default = "default_path")]
    pub path: PathBuf,
    /// Slot holding the recipe collection
    #[serde(default = "default_key")]
    pub key: String,
    /// Byte quota for the memory backend
    #[serde(default)]
    pub quota_bytes: Option<usize>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            path: default_path(),
            key: default_key(),
            quota_bytes: None,
        }
    }
}

impl StorageConfig {
    /// Build the configured storage medium
    pub fn build_storage(&self) -> Box<dyn KeyValueStorage> {
        match self.backend {
            StorageBackend::File => Box::new(FileStorage::new(&self.path)),
            StorageBackend::Memory => match self.quota_bytes {
                Some(quota) => Box::new(MemoryStorage::with_quota(quota)),
                None => Box::new(MemoryStorage::new()),
            },
        }
    }

    /// Persistence adapter over the configured medium and slot
    pub fn build_persistence(&self) -> RecipePersistence<Box<dyn KeyValueStorage>> {
        RecipePersistence::with_key(self.build_storage(), self.key.clone())
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_path() -> PathBuf {
    PathBuf::from(".recipe-box")
}

fn default_key() -> String {
    DEFAULT_KEY.to_string()
}

impl AppConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with RECIPE_BOX__ prefix
    /// 2. recipe-box.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: RECIPE_BOX__STORAGE__PATH
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }
}

/// Load configuration from file and environment variables
///
/// See [`AppConfig::load`] for the source priority.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("recipe-box").required(false))
        // Use double underscore for nested: RECIPE_BOX__STORAGE__PATH
        .add_source(
            Environment::with_prefix("RECIPE_BOX")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}
