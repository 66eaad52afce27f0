//! Core types and decision logic for the Pinhole URL shortener.
//!
//! This crate holds everything the redirect pipeline decides on without
//! touching I/O: the link record, the expiry and quota evaluator, the
//! password gate, the redirect target resolver and the partial update
//! builder. The repository traits describe what the record store must
//! provide; implementations live in `pinhole-storage`.

pub mod clock;
pub mod country;
pub mod device;
pub mod error;
pub mod gate;
pub mod policy;
pub mod record;
pub mod repository;
pub mod resolver;
pub mod shortcode;
pub mod update;

pub use clock::{Clock, SystemClock};
pub use country::{CountryRedirects, ParsedCountryRedirects};
pub use device::{DeviceClass, DeviceClassifier};
pub use error::{CoreError, StorageError};
pub use gate::{Access, Credential};
pub use policy::LinkStatus;
pub use record::{ExpiryDate, FieldValue, ShortLinkRecord};
pub use repository::{ReadRepository, Repository};
pub use shortcode::ShortCode;
pub use update::{FieldChange, RecordPatch, UpdateOutcome, UpdatePayload};
