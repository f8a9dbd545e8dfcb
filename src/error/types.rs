//! Error types
//!
//! Defines the storage error taxonomy surfaced by every engine operation.

use std::fmt;
use std::io;

/// Storage engine errors
///
/// Each variant carries the virtual (user-relative) path it concerns, never
/// the real on-disk location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    InvalidPath(String),
    PathNotFound(String),
    NotFile(String),
    NotFolder(String),
    FolderNotEmpty(String),
    PermissionDenied(String),
    AlreadyExists(String),
    Unexpected { path: String, message: String },
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::InvalidPath(p) => write!(f, "Invalid path: `{}`", p),
            StorageError::PathNotFound(p) => write!(f, "Path not found: {}", p),
            StorageError::NotFile(p) => write!(f, "`{}` is not a file", p),
            StorageError::NotFolder(p) => write!(f, "`{}` is not a folder", p),
            StorageError::FolderNotEmpty(p) => {
                write!(f, "Folder `{}` must be empty before deletion", p)
            }
            StorageError::PermissionDenied(p) => write!(f, "Permission denied: {}", p),
            StorageError::AlreadyExists(p) => write!(f, "`{}` already exists", p),
            StorageError::Unexpected { path, message } => {
                write!(f, "Storage failure on {}: {}", path, message)
            }
        }
    }
}

impl std::error::Error for StorageError {}

impl StorageError {
    /// The virtual path this error refers to
    pub fn path(&self) -> &str {
        match self {
            StorageError::InvalidPath(p)
            | StorageError::PathNotFound(p)
            | StorageError::NotFile(p)
            | StorageError::NotFolder(p)
            | StorageError::FolderNotEmpty(p)
            | StorageError::PermissionDenied(p)
            | StorageError::AlreadyExists(p) => p,
            StorageError::Unexpected { path, .. } => path,
        }
    }
}

/// Translates an OS-level failure into the storage taxonomy.
///
/// This is the only place an `io::Error` is inspected; every operation passes
/// its filesystem outcomes through here.
pub fn map_io_error(err: io::Error, virtual_path: &str) -> StorageError {
    let path = virtual_path.to_string();
    match err.kind() {
        io::ErrorKind::PermissionDenied => StorageError::PermissionDenied(path),
        // A plain file in the middle of the path means nothing exists there
        io::ErrorKind::NotFound | io::ErrorKind::NotADirectory => StorageError::PathNotFound(path),
        io::ErrorKind::DirectoryNotEmpty => StorageError::FolderNotEmpty(path),
        io::ErrorKind::IsADirectory => StorageError::NotFile(path),
        _ => StorageError::Unexpected {
            path,
            message: err.to_string(),
        },
    }
}

/// Maps failures of directory creation, where an existing non-directory entry
/// surfaces as `AlreadyExists` (at the target) or `NotADirectory` (at an
/// ancestor) from the OS.
pub fn map_mkdir_error(err: io::Error, virtual_path: &str) -> StorageError {
    match err.kind() {
        io::ErrorKind::AlreadyExists | io::ErrorKind::NotADirectory => {
            StorageError::NotFolder(virtual_path.to_string())
        }
        _ => map_io_error(err, virtual_path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_denied_is_distinguished() {
        let err = io::Error::from(io::ErrorKind::PermissionDenied);
        assert_eq!(
            map_io_error(err, "docs"),
            StorageError::PermissionDenied("docs".into())
        );
    }

    #[test]
    fn test_missing_entry_maps_to_not_found() {
        let err = io::Error::from(io::ErrorKind::NotFound);
        assert_eq!(
            map_io_error(err, "a/b.txt"),
            StorageError::PathNotFound("a/b.txt".into())
        );
    }

    #[test]
    fn test_directory_kinds() {
        assert_eq!(
            map_io_error(io::Error::from(io::ErrorKind::DirectoryNotEmpty), "d"),
            StorageError::FolderNotEmpty("d".into())
        );
        assert_eq!(
            map_io_error(io::Error::from(io::ErrorKind::NotADirectory), "f.txt/sub"),
            StorageError::PathNotFound("f.txt/sub".into())
        );
        assert_eq!(
            map_io_error(io::Error::from(io::ErrorKind::IsADirectory), "d"),
            StorageError::NotFile("d".into())
        );
    }

    #[test]
    fn test_unclassified_errors_keep_message_only() {
        let err = io::Error::other("disk on fire");
        match map_io_error(err, "x") {
            StorageError::Unexpected { path, message } => {
                assert_eq!(path, "x");
                assert!(message.contains("disk on fire"));
            }
            other => panic!("unexpected mapping: {other:?}"),
        }
    }

    #[test]
    fn test_mkdir_over_file_is_not_folder() {
        let err = io::Error::from(io::ErrorKind::AlreadyExists);
        assert_eq!(
            map_mkdir_error(err, "report.pdf"),
            StorageError::NotFolder("report.pdf".into())
        );
        let err = io::Error::from(io::ErrorKind::NotADirectory);
        assert_eq!(
            map_mkdir_error(err, "report.pdf/sub"),
            StorageError::NotFolder("report.pdf/sub".into())
        );
    }
}
