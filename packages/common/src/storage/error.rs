/// Errors that can occur during file storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The requested file was not found.
    #[error("file not found: {0}")]
    NotFound(String),
    /// An I/O error occurred.
    #[error("storage IO error: {0}")]
    Io(#[from] std::io::Error),
    /// The file name is not a safe flat name inside the store.
    #[error("invalid file name: {0}")]
    InvalidName(String),
    /// The file exceeds the configured size limit.
    #[error("file exceeds size limit ({actual} > {limit} bytes)")]
    SizeLimitExceeded { actual: u64, limit: u64 },
}
