mod health;
mod home;
mod link;
mod redirect;

pub use health::health_handler;
pub use home::{home_handler, method_not_allowed_handler, shorten_form_handler};
pub use link::{qr_handler, shorten_handler, stats_handler, update_handler};
pub use redirect::redirect_handler;

use pinhole_core::ShortCode;

/// Parses a path segment as a short code. Malformed ids can never exist in
/// the store, so callers answer them as not found.
fn lookup_code(raw: String) -> Option<ShortCode> {
    ShortCode::new(raw).ok()
}
