use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use pinhole_core::error::StorageError;
use pinhole_core::repository::{ReadRepository, Repository, Result};
use pinhole_core::{RecordPatch, ShortCode, ShortLinkRecord};

/// In-memory implementation of the Repository trait using DashMap.
///
/// DashMap shards its locks, so lookups and increments on different codes
/// never block each other. Insert and increment both run under the entry's
/// shard lock, which gives the compare-and-insert and atomic increment the
/// repository contract asks for.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    storage: DashMap<String, ShortLinkRecord>,
}

impl InMemoryRepository {
    /// Creates a new in-memory repository.
    pub fn new() -> Self {
        Self {
            storage: DashMap::new(),
        }
    }

    /// Creates a new in-memory repository with the specified capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            storage: DashMap::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }
}

#[async_trait]
impl ReadRepository for InMemoryRepository {
    async fn get(&self, code: &ShortCode) -> Result<Option<ShortLinkRecord>> {
        Ok(self
            .storage
            .get(code.as_str())
            .map(|entry| entry.value().clone()))
    }

    async fn exists(&self, code: &ShortCode) -> Result<bool> {
        Ok(self.storage.contains_key(code.as_str()))
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn insert(&self, code: &ShortCode, record: ShortLinkRecord) -> Result<()> {
        match self.storage.entry(code.as_str().to_owned()) {
            Entry::Occupied(_) => Err(StorageError::Conflict(code.to_string())),
            Entry::Vacant(slot) => {
                slot.insert(record);
                Ok(())
            }
        }
    }

    async fn increment_clicks(&self, code: &ShortCode) -> Result<Option<u64>> {
        Ok(self.storage.get_mut(code.as_str()).map(|mut entry| {
            entry.clicks += 1;
            entry.clicks
        }))
    }

    async fn update(
        &self,
        code: &ShortCode,
        patch: &RecordPatch,
    ) -> Result<Option<ShortLinkRecord>> {
        Ok(self.storage.get_mut(code.as_str()).map(|mut entry| {
            patch.apply_to(entry.value_mut());
            entry.value().clone()
        }))
    }
}
