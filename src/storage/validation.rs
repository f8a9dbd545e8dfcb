//! Path validation
//!
//! Syntactic containment checks applied to every caller-supplied path before
//! the filesystem is touched.

use std::path::{Component, Path, PathBuf};

use crate::error::StorageError;

/// Validate a user-relative path.
///
/// Rejects empty paths, NUL bytes, any `..` component and anything absolute. No
/// canonicalization and no symlink resolution happens here.
pub fn validate_path(path: &str) -> Result<(), StorageError> {
    if path.is_empty() || path.contains('\0') {
        return Err(StorageError::InvalidPath(path.to_string()));
    }

    for component in Path::new(path).components() {
        match component {
            Component::Normal(_) | Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(StorageError::InvalidPath(path.to_string()));
            }
        }
    }

    // Backslash-separated `..` segments are rejected on every platform.
    if path.split(['/', '\\']).any(|segment| segment == "..") {
        return Err(StorageError::InvalidPath(path.to_string()));
    }

    Ok(())
}

/// Validate a single entry name (upload filename, rename target).
pub fn validate_name(name: &str) -> Result<(), StorageError> {
    if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\', '\0']) {
        return Err(StorageError::InvalidPath(name.to_string()));
    }
    Ok(())
}

/// Validate `path` and map it below `user_root`.
///
/// `.` components are dropped, so `"."` names the root itself.
pub fn resolve(user_root: &Path, path: &str) -> Result<PathBuf, StorageError> {
    validate_path(path)?;
    let mut real = user_root.to_path_buf();
    for component in Path::new(path).components() {
        if let Component::Normal(segment) = component {
            real.push(segment);
        }
    }
    Ok(real)
}

/// Join two virtual path segments for messages
pub fn join_virtual(path: &str, name: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() || trimmed == "." {
        name.to_string()
    } else {
        format!("{trimmed}/{name}")
    }
}
