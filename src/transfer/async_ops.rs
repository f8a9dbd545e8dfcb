//! Async transfers
//!
//! The same upload/download contract as the blocking drivers, built on tokio.
//! Each chunk read from the source, write to disk and read from disk is an
//! await point. Preflight checks are shared with the blocking path and run on
//! the blocking pool.

use bytes::Bytes;
use futures_util::Stream;
use futures_util::stream;
use log::info;
use std::pin::Pin;
use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};

use crate::error::{StorageError, handle_error, map_io_error};
use crate::storage::{UploadResult, UserStorage};

/// Lazy sequence of file chunks. Dropping it closes the file.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, StorageError>> + Send>>;

impl UserStorage {
    /// Async counterpart of [`UserStorage::upload`].
    pub async fn upload_async<R>(
        &self,
        path: &str,
        filename: &str,
        mut source: R,
    ) -> Result<UploadResult, StorageError>
    where
        R: AsyncRead + Unpin,
    {
        self.upload_async_inner(path, filename, &mut source)
            .await
            .inspect_err(|e| handle_error(self.user_id(), "upload", e))
    }

    async fn upload_async_inner<R>(
        &self,
        path: &str,
        filename: &str,
        source: &mut R,
    ) -> Result<UploadResult, StorageError>
    where
        R: AsyncRead + Unpin,
    {
        let (file_path, virtual_path) = {
            let storage = self.clone();
            let owned_path = path.to_string();
            let owned_name = filename.to_string();
            run_blocking(path, move || storage.prepare_upload(&owned_path, &owned_name)).await?
        };

        let mut file = File::create(&file_path)
            .await
            .map_err(|e| map_io_error(e, &virtual_path))?;

        let mut buffer = vec![0u8; self.async_chunk_size()];
        let mut bytes_written = 0u64;

        loop {
            let n = source
                .read(&mut buffer)
                .await
                .map_err(|e| map_io_error(e, &virtual_path))?;
            if n == 0 {
                break;
            }
            file.write_all(&buffer[..n])
                .await
                .map_err(|e| map_io_error(e, &virtual_path))?;
            bytes_written += n as u64;
        }

        file.flush()
            .await
            .map_err(|e| map_io_error(e, &virtual_path))?;

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

    /// Async counterpart of [`UserStorage::download`].
    pub async fn download_stream(&self, path: &str) -> Result<ByteStream, StorageError> {
        self.download_stream_inner(path)
            .await
            .inspect_err(|e| handle_error(self.user_id(), "download", e))
    }

    async fn download_stream_inner(&self, path: &str) -> Result<ByteStream, StorageError> {
        let file_path = {
            let storage = self.clone();
            let owned_path = path.to_string();
            run_blocking(path, move || storage.prepare_download(&owned_path)).await?
        };

        let file = File::open(&file_path)
            .await
            .map_err(|e| map_io_error(e, path))?;

        info!(
            "[user {}] streaming {} (real: {})",
            self.user_id(),
            path,
            file_path.display()
        );

        let state = (file, self.async_chunk_size(), path.to_string());
        let chunks = stream::try_unfold(state, |(mut file, chunk_size, virtual_path)| async move {
            let mut buffer = vec![0u8; chunk_size];
            match file.read(&mut buffer).await {
                Ok(0) => Ok::<_, StorageError>(None),
                Ok(n) => {
                    buffer.truncate(n);
                    Ok(Some((Bytes::from(buffer), (file, chunk_size, virtual_path))))
                }
                Err(e) => Err(map_io_error(e, &virtual_path)),
            }
        });

        Ok(Box::pin(chunks))
    }
}

async fn run_blocking<T, F>(virtual_path: &str, f: F) -> Result<T, StorageError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, StorageError> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| StorageError::Unexpected {
            path: virtual_path.to_string(),
            message: e.to_string(),
        })?
}
