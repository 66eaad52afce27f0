use pinhole_core::StorageError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RedirectorError>;

#[derive(Debug, Clone, Error)]
pub enum RedirectorError {
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}
