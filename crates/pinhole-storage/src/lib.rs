//! Record store implementations.
//!
//! [`InMemoryRepository`] backs tests and single-node deployments;
//! [`RedisRepository`] is the external store used in production.

pub mod memory;
pub mod redis;

pub use memory::InMemoryRepository;
pub use pinhole_core::error::StorageError;
pub use pinhole_core::repository::{ReadRepository, Repository, Result};
pub use self::redis::RedisRepository;
