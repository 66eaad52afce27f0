use pinhole_core::RecordPatch;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct ShortenResponse {
    pub short_url: String,
    pub qr_code: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct UpdateResponse {
    pub message: &'static str,
    pub updated_fields: RecordPatch,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// Body of a password submission on a protected link.
#[derive(Debug, Default, Deserialize)]
pub struct PasswordForm {
    #[serde(default)]
    pub password: Option<String>,
}
