//! QR code images for short links, stored as `{dir}/{code}.png`.

pub mod error;
pub mod store;

pub use error::{QrCodeError, Result};
pub use store::{render_png, QrCodeStore};
