//! Storage result types
//!
//! Defines result structures returned by storage operations.

use chrono::{DateTime, Local};
use serde::Serialize;
use std::fs::Metadata;
use std::path::PathBuf;

/// Read-only projection of one directory entry, captured at listing time
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryMetadata {
    pub name: String,
    /// Size in bytes, 0 for directories
    pub size: u64,
    pub is_dir: bool,
    pub mod_time: DateTime<Local>,
}

impl EntryMetadata {
    pub fn from_metadata(name: String, metadata: &Metadata) -> Self {
        let is_dir = metadata.is_dir();
        let size = if is_dir { 0 } else { metadata.len() };
        let mod_time = metadata
            .modified()
            .map(DateTime::<Local>::from)
            .unwrap_or_else(|_| DateTime::<Local>::from(std::time::UNIX_EPOCH));

        Self {
            name,
            size,
            is_dir,
            mod_time,
        }
    }
}

/// Result of a completed upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadResult {
    pub file_path: PathBuf,
    pub virtual_path: String,
    pub bytes_written: u64,
}
