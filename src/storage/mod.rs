//! Per-user sandboxed storage
//!
//! A [`UserStorage`] is bound to one user id and one directory under the
//! configured storage root. Every operation validates its path first, then
//! performs a single filesystem transaction; nothing is cached between calls.

pub mod operations;
pub mod results;
pub mod validation;

use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::StorageConfig;
use crate::error::{StorageError, map_mkdir_error};

pub use results::{EntryMetadata, UploadResult};
pub use validation::{validate_name, validate_path};

/// Storage engine bound to a single user root
#[derive(Debug, Clone)]
pub struct UserStorage {
    user_id: u64,
    root: PathBuf,
    sync_chunk_size: usize,
    async_chunk_size: usize,
}

impl UserStorage {
    /// Bind to `<storage_dir>/<user_id>`, creating it (and its parents) if absent.
    pub fn open(config: &StorageConfig, user_id: u64) -> Result<Self, StorageError> {
        let root = config.storage_root().join(user_id.to_string());

        fs::create_dir_all(&root).map_err(|e| map_mkdir_error(e, "."))?;
        debug!("[user {}] opened storage at {}", user_id, root.display());

        Ok(Self {
            user_id,
            root,
            sync_chunk_size: config.sync_chunk_size.max(1),
            async_chunk_size: config.async_chunk_size.max(1),
        })
    }

    /// Bind to `<storage_dir>/<user_id>` with default chunk sizes
    pub fn open_in(storage_dir: impl AsRef<Path>, user_id: u64) -> Result<Self, StorageError> {
        let config = StorageConfig::with_storage_dir(storage_dir.as_ref().to_string_lossy());
        Self::open(&config, user_id)
    }

    pub fn user_id(&self) -> u64 {
        self.user_id
    }

    /// Real location of the user root
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn sync_chunk_size(&self) -> usize {
        self.sync_chunk_size
    }

    pub fn async_chunk_size(&self) -> usize {
        self.async_chunk_size
    }

    pub(crate) fn resolve(&self, path: &str) -> Result<PathBuf, StorageError> {
        validation::resolve(&self.root, path)
    }
}
