use crate::Result;
use async_trait::async_trait;
use pinhole_core::ShortCode;

/// The parts of an incoming request the redirect pipeline looks at.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RedirectRequest {
    pub user_agent: Option<String>,
    /// Value of the `X-Country` header, if any.
    pub country: Option<String>,
    /// `None` when the method cannot carry a password (GET). `Some(None)`
    /// for a POST without the field.
    pub password: Option<Option<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedirectOutcome {
    /// Redirect to `target`; `clicks` is the counter after this visit.
    Redirect { target: String, clicks: u64 },
    NotFound,
    /// Past its expiry date.
    Expired,
    /// Click quota used up.
    Exhausted,
    PasswordRequired,
    /// Wrong or missing password on a submission.
    Denied,
}

#[async_trait]
pub trait Redirector: Send + Sync + 'static {
    /// Resolves a visit to a short link and counts it when it succeeds.
    async fn redirect(&self, code: &ShortCode, request: RedirectRequest)
        -> Result<RedirectOutcome>;
}
