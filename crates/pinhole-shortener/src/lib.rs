//! Link creation, partial update and stats.
//!
//! The redirect path lives in `pinhole-redirector`; this crate owns every
//! operation that writes or reports on a record.

pub mod error;
pub mod service;
pub mod settings;
pub mod shortener;

pub use error::{Result, ShortenerError};
pub use service::ShortenerService;
pub use settings::ShortenerSettings;
pub use shortener::{Created, LinkStats, ShortenParams, Shortener, Updated};
