//! Blocking transfers
//!
//! Upload from any `Read` and download as a chunk iterator, both in
//! `sync_chunk_size` pieces so payload size is never bounded by memory.
//!
//! Uploads overwrite in place. A source that fails mid-copy leaves a truncated
//! file behind; callers that need all-or-nothing semantics must stage the
//! upload themselves.

use log::{debug, info};
use std::fs::File;
use std::io::{self, Read, Write};

use crate::error::{StorageError, handle_error, map_io_error};
use crate::storage::{UploadResult, UserStorage};

impl UserStorage {
    /// Writes everything `source` yields to `path/filename`.
    pub fn upload<R: Read>(
        &self,
        path: &str,
        filename: &str,
        mut source: R,
    ) -> Result<UploadResult, StorageError> {
        self.upload_inner(path, filename, &mut source)
            .inspect_err(|e| handle_error(self.user_id(), "upload", e))
    }

    /// Uploads several named sources into the same folder, stopping at the
    /// first failure.
    pub fn upload_files<N, R, I>(&self, path: &str, files: I) -> Result<Vec<UploadResult>, StorageError>
    where
        N: AsRef<str>,
        R: Read,
        I: IntoIterator<Item = (N, R)>,
    {
        files
            .into_iter()
            .map(|(name, source)| self.upload(path, name.as_ref(), source))
            .collect()
    }

    fn upload_inner(
        &self,
        path: &str,
        filename: &str,
        source: &mut dyn Read,
    ) -> Result<UploadResult, StorageError> {
        let (file_path, virtual_path) = self.prepare_upload(path, filename)?;

        let mut file = File::create(&file_path).map_err(|e| map_io_error(e, &virtual_path))?;
        let bytes_written = copy_chunked(source, &mut file, self.sync_chunk_size())
            .map_err(|e| map_io_error(e, &virtual_path))?;
        file.flush().map_err(|e| map_io_error(e, &virtual_path))?;

        info!(
            "[user {}] uploaded {} (real: {}) - {} bytes",
            self.user_id(),
            virtual_path,
            file_path.display(),
            bytes_written
        );

        Ok(UploadResult {
            file_path,
            virtual_path,
            bytes_written,
        })
    }

    /// Opens `path` for a chunked read.
    pub fn download(&self, path: &str) -> Result<Download, StorageError> {
        self.download_inner(path)
            .inspect_err(|e| handle_error(self.user_id(), "download", e))
    }

    fn download_inner(&self, path: &str) -> Result<Download, StorageError> {
        let file_path = self.prepare_download(path)?;
        let file = File::open(&file_path).map_err(|e| map_io_error(e, path))?;
        let size = file.metadata().map_err(|e| map_io_error(e, path))?.len();

        info!(
            "[user {}] download of {} (real: {}) started - {} bytes",
            self.user_id(),
            path,
            file_path.display(),
            size
        );

        Ok(Download {
            file: Some(file),
            chunk_size: self.sync_chunk_size(),
            virtual_path: path.to_string(),
            size,
        })
    }
}

/// Copy `reader` into `writer` one bounded chunk at a time.
pub fn copy_chunked<R, W>(reader: &mut R, writer: &mut W, chunk_size: usize) -> io::Result<u64>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    let mut buffer = vec![0u8; chunk_size.max(1)];
    let mut total = 0u64;

    loop {
        let n = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        writer.write_all(&buffer[..n])?;
        total += n as u64;
    }

    Ok(total)
}

/// A finite, non-restartable read of one stored file.
///
/// Yields chunks of at most `sync_chunk_size` bytes. The file handle is
/// closed as soon as the end is reached, an error is returned, or the
/// `Download` is dropped.
#[derive(Debug)]
pub struct Download {
    file: Option<File>,
    chunk_size: usize,
    virtual_path: String,
    size: u64,
}

impl Download {
    /// File size at the time the download was opened
    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn virtual_path(&self) -> &str {
        &self.virtual_path
    }

    /// True once the underlying handle has been released
    pub fn is_finished(&self) -> bool {
        self.file.is_none()
    }

    fn release(&mut self) {
        if self.file.take().is_some() {
            debug!("released handle for {}", self.virtual_path);
        }
    }
}

impl Iterator for Download {
    type Item = Result<Vec<u8>, StorageError>;

    fn next(&mut self) -> Option<Self::Item> {
        let file = self.file.as_mut()?;
        let mut buffer = vec![0u8; self.chunk_size];

        loop {
            match file.read(&mut buffer) {
                Ok(0) => {
                    self.release();
                    return None;
                }
                Ok(n) => {
                    buffer.truncate(n);
                    return Some(Ok(buffer));
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    self.release();
                    return Some(Err(map_io_error(e, &self.virtual_path)));
                }
            }
        }
    }
}

impl Read for Download {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let Some(file) = self.file.as_mut() else {
            return Ok(0);
        };
        loop {
            match file.read(buf) {
                Ok(n) => {
                    if n == 0 && !buf.is_empty() {
                        self.release();
                    }
                    return Ok(n);
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    self.release();
                    return Err(e);
                }
            }
        }
    }
}
