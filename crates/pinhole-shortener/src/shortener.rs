use crate::error::Result;
use async_trait::async_trait;
use pinhole_core::{CountryRedirects, FieldValue, RecordPatch, ShortCode, UpdatePayload};
use serde::{Deserialize, Serialize};

/// Creation request as it arrives from a form or JSON body.
///
/// Every optional field treats `""` as unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ShortenParams {
    #[serde(default)]
    pub long_url: Option<String>,
    #[serde(default)]
    pub custom_id: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub expiry_date: Option<String>,
    #[serde(default)]
    pub max_clicks: Option<FieldValue>,
    #[serde(default)]
    pub mobile_url: Option<String>,
    #[serde(default)]
    pub desktop_url: Option<String>,
    #[serde(default)]
    pub country_redirect: Option<String>,
}

impl ShortenParams {
    pub fn new(long_url: impl Into<String>) -> Self {
        Self {
            long_url: Some(long_url.into()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Created {
    pub code: ShortCode,
    pub short_url: String,
    /// Skipped `country_redirect` pairs.
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Updated {
    /// The payload named no recognized field; the store was not touched.
    NoOp,
    Applied(RecordPatch),
}

/// Read-only view of a record. Never carries the password itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkStats {
    pub short_url: String,
    pub long_url: String,
    pub clicks: u64,
    /// Rendered as `YYYY-MM-DD HH:MM:SS`.
    pub expiry_date: Option<String>,
    pub max_clicks: Option<u64>,
    pub password_protected: bool,
    pub mobile_url: Option<String>,
    pub desktop_url: Option<String>,
    pub country_redirect: Option<CountryRedirects>,
}

#[async_trait]
pub trait Shortener: Send + Sync + 'static {
    /// Validates the request, allocates a code and stores a fresh record.
    async fn shorten(&self, params: ShortenParams) -> Result<Created>;

    /// Applies a partial update. Fails with `NotFound` for unknown codes,
    /// even when the payload is a no-op.
    async fn update(&self, code: &ShortCode, payload: UpdatePayload) -> Result<Updated>;

    async fn stats(&self, code: &ShortCode) -> Result<LinkStats>;

    async fn exists(&self, code: &ShortCode) -> Result<bool>;
}
