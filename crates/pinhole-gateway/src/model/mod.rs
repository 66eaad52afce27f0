mod health;
mod link;

pub use health::HealthResponse;
pub use link::{MessageResponse, PasswordForm, ShortenResponse, UpdateResponse};
