use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum StorageError {
    #[error("Storage configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        Self::Storage(err.to_string())
    }
}
