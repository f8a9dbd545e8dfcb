//! Storage operations
//!
//! Listing, folder creation, deletion and renaming, plus the shared preflight
//! checks used by both transfer drivers.

use log::{debug, info};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{StorageError, handle_error, map_io_error, map_mkdir_error};
use crate::storage::UserStorage;
use crate::storage::results::EntryMetadata;
use crate::storage::validation::{join_virtual, validate_name};

impl UserStorage {
    /// Lists the direct children of `path`.
    ///
    /// A missing directory yields no entries. Order is unspecified.
    pub fn list(&self, path: &str) -> Result<Vec<EntryMetadata>, StorageError> {
        self.list_inner(path)
            .inspect_err(|e| handle_error(self.user_id(), "list", e))
    }

    fn list_inner(&self, path: &str) -> Result<Vec<EntryMetadata>, StorageError> {
        let real_path = self.resolve(path)?;

        match fs::metadata(&real_path) {
            Ok(metadata) if !metadata.is_dir() => {
                return Err(StorageError::NotFolder(path.to_string()));
            }
            Ok(_) => {}
            Err(e) if is_missing(&e) => return Ok(Vec::new()),
            Err(e) => return Err(map_io_error(e, path)),
        }

        let entries = match fs::read_dir(&real_path) {
            Ok(entries) => entries,
            Err(e) if is_missing(&e) => return Ok(Vec::new()),
            Err(e) => return Err(map_io_error(e, path)),
        };

        let mut listing = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| map_io_error(e, path))?;
            let name = match entry.file_name().into_string() {
                Ok(name) => name,
                // Not addressable through a `&str` path, so not listed
                Err(raw) => {
                    debug!("[user {}] skipping non UTF-8 entry {:?}", self.user_id(), raw);
                    continue;
                }
            };

            // Follows symlinks; entries removed mid-listing are skipped.
            match fs::metadata(entry.path()) {
                Ok(metadata) => listing.push(EntryMetadata::from_metadata(name, &metadata)),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    debug!("[user {}] {} vanished during listing", self.user_id(), name);
                }
                Err(e) => return Err(map_io_error(e, &join_virtual(path, &name))),
            }
        }

        info!(
            "[user {}] listed {} (real: {}) - {} entries",
            self.user_id(),
            path,
            real_path.display(),
            listing.len()
        );

        Ok(listing)
    }

    /// Creates `path` and any missing parents. Succeeds if it already exists as
    /// a directory.
    pub fn create_folder(&self, path: &str) -> Result<(), StorageError> {
        self.create_folder_inner(path)
            .inspect_err(|e| handle_error(self.user_id(), "create_folder", e))
    }

    fn create_folder_inner(&self, path: &str) -> Result<(), StorageError> {
        let real_path = self.resolve(path)?;
        ensure_directory(&real_path, path)?;

        info!(
            "[user {}] created folder {} (real: {})",
            self.user_id(),
            path,
            real_path.display()
        );
        Ok(())
    }

    /// Deletes a file, or a directory that has no children.
    pub fn delete(&self, path: &str) -> Result<(), StorageError> {
        self.delete_inner(path)
            .inspect_err(|e| handle_error(self.user_id(), "delete", e))
    }

    fn delete_inner(&self, path: &str) -> Result<(), StorageError> {
        let real_path = self.resolve(path)?;

        let metadata = fs::symlink_metadata(&real_path).map_err(|e| map_io_error(e, path))?;

        if metadata.is_dir() {
            fs::remove_dir(&real_path).map_err(|e| match e.kind() {
                // Some platforms report a populated directory as EEXIST
                io::ErrorKind::DirectoryNotEmpty | io::ErrorKind::AlreadyExists => {
                    StorageError::FolderNotEmpty(path.to_string())
                }
                _ => map_io_error(e, path),
            })?;
        } else {
            match fs::remove_file(&real_path) {
                Ok(()) => {}
                // Already gone by the time we got to it
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(map_io_error(e, path)),
            }
        }

        info!(
            "[user {}] deleted {} (real: {})",
            self.user_id(),
            path,
            real_path.display()
        );
        Ok(())
    }

    /// Renames `path` to `new_name` inside the same parent directory.
    ///
    /// Fails with `AlreadyExists` if `new_name` is taken; nothing is replaced.
    pub fn rename(&self, path: &str, new_name: &str) -> Result<(), StorageError> {
        self.rename_inner(path, new_name)
            .inspect_err(|e| handle_error(self.user_id(), "rename", e))
    }

    fn rename_inner(&self, path: &str, new_name: &str) -> Result<(), StorageError> {
        let real_path = self.resolve(path)?;
        validate_name(new_name)?;

        if real_path == self.root() {
            return Err(StorageError::InvalidPath(path.to_string()));
        }

        fs::symlink_metadata(&real_path).map_err(|e| map_io_error(e, path))?;

        let new_virtual = join_virtual(&virtual_parent(path), new_name);
        let new_real_path = match real_path.parent() {
            Some(parent) => parent.join(new_name),
            None => return Err(StorageError::InvalidPath(path.to_string())),
        };

        match fs::symlink_metadata(&new_real_path) {
            Ok(_) => return Err(StorageError::AlreadyExists(new_virtual)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(map_io_error(e, &new_virtual)),
        }

        fs::rename(&real_path, &new_real_path).map_err(|e| map_io_error(e, path))?;

        info!(
            "[user {}] renamed {} -> {} (real: {} -> {})",
            self.user_id(),
            path,
            new_virtual,
            real_path.display(),
            new_real_path.display()
        );
        Ok(())
    }

    /// Preflight for an upload: validates both names, makes sure `path` is a
    /// directory (creating it if absent) and returns the destination file.
    pub(crate) fn prepare_upload(
        &self,
        path: &str,
        filename: &str,
    ) -> Result<(PathBuf, String), StorageError> {
        let folder = self.resolve(path)?;
        validate_name(filename)?;

        ensure_directory(&folder, path)?;

        let virtual_file_path = join_virtual(path, filename);
        let file_path = folder.join(filename);

        if file_path.is_dir() {
            return Err(StorageError::NotFile(virtual_file_path));
        }

        debug!(
            "[user {}] prepared upload {} (real: {})",
            self.user_id(),
            virtual_file_path,
            file_path.display()
        );

        Ok((file_path, virtual_file_path))
    }

    /// Preflight for a download: `path` must exist and be a file.
    pub(crate) fn prepare_download(&self, path: &str) -> Result<PathBuf, StorageError> {
        let file_path = self.resolve(path)?;

        let metadata = fs::metadata(&file_path).map_err(|e| map_io_error(e, path))?;
        if !metadata.is_file() {
            return Err(StorageError::NotFile(path.to_string()));
        }

        debug!(
            "[user {}] prepared download {} (real: {})",
            self.user_id(),
            path,
            file_path.display()
        );

        Ok(file_path)
    }
}

/// Create `real_path` as a directory unless it already is one
fn ensure_directory(real_path: &Path, virtual_path: &str) -> Result<(), StorageError> {
    match fs::metadata(real_path) {
        Ok(metadata) if metadata.is_dir() => return Ok(()),
        Ok(_) => return Err(StorageError::NotFolder(virtual_path.to_string())),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) if e.kind() == io::ErrorKind::NotADirectory => {
            return Err(StorageError::NotFolder(virtual_path.to_string()));
        }
        Err(e) => return Err(map_io_error(e, virtual_path)),
    }

    fs::create_dir_all(real_path).map_err(|e| map_mkdir_error(e, virtual_path))
}

/// Nothing exists at the path, either plainly or because an ancestor is a file
fn is_missing(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::NotFound | io::ErrorKind::NotADirectory
    )
}

fn virtual_parent(path: &str) -> String {
    Path::new(path.trim_end_matches('/'))
        .parent()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_default()
}
