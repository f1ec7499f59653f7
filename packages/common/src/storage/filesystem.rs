use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;
use tokio::io::{AsyncWriteExt, BufReader};
use tracing::debug;

use super::error::StorageError;
use super::traits::{BoxReader, FileStore};

/// Directory-backed file store.
///
/// Files live directly under `{base_path}/{name}`. Writes go through
/// `{base_path}/.tmp` and are renamed into place.
pub struct FilesystemStore {
    base_path: PathBuf,
    max_size: u64,
}

impl FilesystemStore {
    /// Create a new filesystem store rooted at `base_path`. The directory is
    /// created if missing and resolved to an absolute path.
    pub async fn new(base_path: impl Into<PathBuf>, max_size: u64) -> Result<Self, StorageError> {
        let base_path = base_path.into();
        fs::create_dir_all(&base_path).await?;
        let base_path = fs::canonicalize(&base_path).await?;
        Ok(Self {
            base_path,
            max_size,
        })
    }

    fn temp_dir(&self) -> PathBuf {
        self.base_path.join(".tmp")
    }
}

/// Reject anything that is not a single visible path component.
fn validate_name(name: &str) -> Result<(), StorageError> {
    let invalid = |reason: &str| Err(StorageError::InvalidName(format!("{name:?}: {reason}")));

    if name.is_empty() {
        return invalid("empty");
    }
    if name.chars().any(|c| c.is_control()) {
        return invalid("control characters are not allowed");
    }
    if name.contains('/') || name.contains('\\') {
        return invalid("path separators are not allowed");
    }
    if name.starts_with('.') {
        return invalid("hidden names are not allowed");
    }
    Ok(())
}

#[async_trait]
impl FileStore for FilesystemStore {
    fn path(&self, name: &str) -> Result<PathBuf, StorageError> {
        validate_name(name)?;
        Ok(self.base_path.join(name))
    }

    async fn put(&self, name: &str, data: &[u8]) -> Result<(), StorageError> {
        let target = self.path(name)?;

        if data.len() as u64 > self.max_size {
            return Err(StorageError::SizeLimitExceeded {
                actual: data.len() as u64,
                limit: self.max_size,
            });
        }

        // The directory may have been removed since startup.
        let temp_dir = self.temp_dir();
        fs::create_dir_all(&temp_dir).await?;
        let temp_path = temp_dir.join(uuid::Uuid::new_v4().to_string());

        let written = async {
            let mut file = fs::File::create(&temp_path).await?;
            file.write_all(data).await?;
            file.flush().await?;
            drop(file);
            fs::rename(&temp_path, &target).await
        }
        .await;

        if let Err(e) = written {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        debug!(path = %target.display(), size = data.len(), "Stored file");
        Ok(())
    }

    async fn get_stream(&self, name: &str) -> Result<BoxReader, StorageError> {
        let path = self.path(name)?;
        match fs::File::open(&path).await {
            Ok(file) => Ok(Box::new(BufReader::new(file))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(name.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, name: &str) -> Result<bool, StorageError> {
        let path = self.path(name)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
