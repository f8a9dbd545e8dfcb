//! cloudbox - per-user sandboxed file storage
//!
//! Each user id owns one directory under the configured storage root. All
//! paths handed to [`UserStorage`] are user-relative and are validated before
//! the filesystem is touched.

pub mod commands;
pub mod config;
pub mod error;
pub mod storage;
pub mod transfer;
pub mod utils;

pub use config::StorageConfig;
pub use error::StorageError;
pub use storage::{EntryMetadata, UploadResult, UserStorage};
pub use transfer::{ByteStream, Download};
