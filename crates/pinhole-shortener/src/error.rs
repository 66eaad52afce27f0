use pinhole_core::{CoreError, StorageError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ShortenerError>;

#[derive(Debug, Clone, Error)]
pub enum ShortenerError {
    #[error("custom id already taken: {0}")]
    AliasConflict(String),
    #[error("{0}")]
    Validation(String),
    #[error("invalid short code: {0}")]
    InvalidShortCode(String),
    #[error("no free short code after {attempts} attempts")]
    Exhausted { attempts: usize },
    #[error("short code not found: {0}")]
    NotFound(String),
    #[error("storage error: {0}")]
    Storage(String),
}

impl From<CoreError> for ShortenerError {
    fn from(value: CoreError) -> Self {
        match value {
            CoreError::InvalidShortCode(message) => Self::InvalidShortCode(message),
            CoreError::Validation(message) => Self::Validation(message),
        }
    }
}

impl From<StorageError> for ShortenerError {
    fn from(value: StorageError) -> Self {
        match value {
            StorageError::Conflict(code) => Self::AliasConflict(code),
            other => Self::Storage(other.to_string()),
        }
    }
}
