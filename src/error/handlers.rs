//! Error handlers
//!
//! Logging and response-code classification for storage errors.

use crate::error::types::StorageError;
use log::{error, warn};

impl StorageError {
    /// True when the failure was caused by the caller's input or the current
    /// state of their tree, rather than by the host.
    pub fn is_client_error(&self) -> bool {
        !matches!(
            self,
            StorageError::PermissionDenied(_) | StorageError::Unexpected { .. }
        )
    }

    /// HTTP status an outer web layer should answer with
    pub fn status_code(&self) -> u16 {
        match self {
            StorageError::InvalidPath(_)
            | StorageError::NotFile(_)
            | StorageError::NotFolder(_)
            | StorageError::FolderNotEmpty(_)
            | StorageError::AlreadyExists(_) => 400,
            StorageError::PathNotFound(_) => 404,
            StorageError::PermissionDenied(_) => 403,
            StorageError::Unexpected { .. } => 500,
        }
    }
}

/// Log a storage error at a level matching its cause
pub fn handle_error(user_id: u64, operation: &str, err: &StorageError) {
    if err.is_client_error() {
        warn!("[user {user_id}] {operation} rejected: {err}");
    } else {
        error!("[user {user_id}] {operation} failed: {err}");
    }
}
