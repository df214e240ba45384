//! Error types for medrec-storage

use thiserror::Error;

pub type Result<T> = std::result::Result<T, StorageError>;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("object store request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("object store returned status {status} for key {key}")]
    ObjectStore { key: String, status: u16 },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
