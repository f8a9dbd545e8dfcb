//! Transfer module
//!
//! Chunked upload and download drivers for the blocking and the tokio
//! execution models. Both share the storage preflight checks and error
//! mapping; only the byte pumping differs.

pub mod async_ops;
pub mod file_ops;

pub use async_ops::ByteStream;
pub use file_ops::{Download, copy_chunked};
