//! Configuration management for cloudbox
//!
//! Loads the storage location and transfer chunk sizes from an optional
//! `config.toml` with `CLOUDBOX_*` environment overrides.

use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;

/// 1 MiB, used when copying from a blocking reader
pub const DEFAULT_SYNC_CHUNK_SIZE: usize = 1024 * 1024;

/// 1 KiB, used by the async transfer drivers
pub const DEFAULT_ASYNC_CHUNK_SIZE: usize = 1024;

pub const DEFAULT_STORAGE_DIR: &str = "user_storage";

/// Storage configuration
#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// Directory holding one subdirectory per user id
    /// Environment: CLOUDBOX_STORAGE_DIR
    pub storage_dir: String,

    /// Chunk size for blocking transfers
    pub sync_chunk_size: usize,

    /// Chunk size for async transfers
    pub async_chunk_size: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            storage_dir: DEFAULT_STORAGE_DIR.to_string(),
            sync_chunk_size: DEFAULT_SYNC_CHUNK_SIZE,
            async_chunk_size: DEFAULT_ASYNC_CHUNK_SIZE,
        }
    }
}

impl StorageConfig {
    /// Load configuration from config.toml (if present) with environment overrides
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from the named file (extension optional, file optional)
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = Config::builder()
            .set_default("storage_dir", DEFAULT_STORAGE_DIR)?
            .set_default("sync_chunk_size", DEFAULT_SYNC_CHUNK_SIZE as i64)?
            .set_default("async_chunk_size", DEFAULT_ASYNC_CHUNK_SIZE as i64)?
            .add_source(File::with_name(config_path).required(false))
            .add_source(Environment::with_prefix("CLOUDBOX"))
            .build()?;

        let config: StorageConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Configuration rooted at an explicit directory, with default chunk sizes
    pub fn with_storage_dir(storage_dir: impl Into<String>) -> Self {
        Self {
            storage_dir: storage_dir.into(),
            ..Self::default()
        }
    }

    /// Get the storage directory as PathBuf
    pub fn storage_root(&self) -> PathBuf {
        PathBuf::from(&self.storage_dir)
    }

    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if self.storage_dir.is_empty() {
            return Err(config::ConfigError::Message(
                "storage_dir cannot be empty".into(),
            ));
        }

        if self.sync_chunk_size == 0 || self.async_chunk_size == 0 {
            return Err(config::ConfigError::Message(
                "chunk sizes must be greater than 0".into(),
            ));
        }

        Ok(())
    }
}
