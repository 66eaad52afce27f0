//! Redirect resolution for Pinhole short links.
//!
//! [`RedirectorService`] runs one redirect request through the pipeline:
//! lookup, expiry and quota check, password gate, target resolution and
//! finally the atomic click increment. Device classification is injected
//! through [`DeviceClassifier`]; [`WootheeClassifier`] is the default.
//!
//! ```rust
//! use std::sync::Arc;
//! use pinhole_core::{Repository, ShortCode, ShortLinkRecord};
//! use pinhole_redirector::{RedirectOutcome, RedirectRequest, Redirector, RedirectorService};
//! use pinhole_storage::InMemoryRepository;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let repo = Arc::new(InMemoryRepository::new());
//! let code = ShortCode::new("docs")?;
//! repo.insert(&code, ShortLinkRecord::new("https://example.com")).await?;
//!
//! let service = RedirectorService::new(repo);
//! match service.redirect(&code, RedirectRequest::default()).await? {
//!     RedirectOutcome::Redirect { target, .. } => println!("302 -> {target}"),
//!     other => println!("{other:?}"),
//! }
//! # Ok(())
//! # }
//! ```

pub mod classifier;
pub mod error;
pub mod redirector;
pub mod service;

pub use classifier::WootheeClassifier;
pub use error::{RedirectorError, Result};
pub use pinhole_core::DeviceClassifier;
pub use redirector::{RedirectOutcome, RedirectRequest, Redirector};
pub use service::RedirectorService;
