use crate::error::StorageError;
use crate::record::ShortLinkRecord;
use crate::shortcode::ShortCode;
use crate::update::RecordPatch;
use async_trait::async_trait;

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// A read-only view of a repository.
///
/// This trait provides only the read operations from [`Repository`],
/// allowing the stats endpoint to have read-only access.
#[async_trait]
pub trait ReadRepository: Send + Sync + 'static {
    /// Retrieves the record for a given short code.
    /// Returns `None` if the code does not exist.
    async fn get(&self, code: &ShortCode) -> Result<Option<ShortLinkRecord>>;

    /// Checks whether a short code already exists in the repository.
    async fn exists(&self, code: &ShortCode) -> Result<bool>;
}

/// The record store.
///
/// Implementations must make `insert` a compare-and-insert and
/// `increment_clicks` an atomic increment; callers never read-modify-write
/// the click counter themselves.
#[async_trait]
pub trait Repository: ReadRepository {
    /// Inserts a new record. Returns `Err(Conflict)` if the code already exists.
    async fn insert(&self, code: &ShortCode, record: ShortLinkRecord) -> Result<()>;

    /// Atomically adds one to the click counter.
    /// Returns the new count, or `None` if the code does not exist.
    async fn increment_clicks(&self, code: &ShortCode) -> Result<Option<u64>>;

    /// Applies a patch to the stored record, leaving `clicks` alone.
    /// Returns the updated record, or `None` if the code does not exist.
    async fn update(&self, code: &ShortCode, patch: &RecordPatch)
        -> Result<Option<ShortLinkRecord>>;
}
