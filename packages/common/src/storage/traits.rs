use std::path::PathBuf;

use async_trait::async_trait;
use tokio::io::AsyncRead;

use super::error::StorageError;

/// Type alias for a boxed async reader.
pub type BoxReader = Box<dyn AsyncRead + Unpin + Send>;

/// Flat, name-keyed file storage.
///
/// Names are single path components (`42.png`); writing an existing name
/// replaces its content.
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Absolute path `name` is stored at, whether or not it exists yet.
    fn path(&self, name: &str) -> Result<PathBuf, StorageError>;

    /// Store bytes under `name`, replacing any previous content atomically.
    async fn put(&self, name: &str, data: &[u8]) -> Result<(), StorageError>;

    /// Retrieve a file as a streaming async reader.
    async fn get_stream(&self, name: &str) -> Result<BoxReader, StorageError>;

    /// Delete a file.
    ///
    /// Returns `true` if the file was deleted, `false` if it did not exist.
    async fn delete(&self, name: &str) -> Result<bool, StorageError>;
}
