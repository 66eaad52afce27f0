use crate::error::{Result, ShortenerError};
use crate::settings::ShortenerSettings;
use crate::shortener::{Created, LinkStats, ShortenParams, Shortener, Updated};
use async_trait::async_trait;
use pinhole_core::record::{non_empty, validate_url};
use pinhole_core::update::build_patch;
use pinhole_core::{
    CountryRedirects, ExpiryDate, Repository, ShortCode, ShortLinkRecord, StorageError,
    UpdateOutcome, UpdatePayload,
};
use pinhole_generator::Generator;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// A concrete implementation of the `Shortener` trait.
///
/// This service wraps a `Repository` and a `Generator` to handle:
/// - request validation and normalization
/// - short code allocation (custom or generated, with a bounded retry)
/// - partial updates and stats snapshots
///
/// The final insert relies on the repository's compare-and-insert, so two
/// requests racing for the same code never overwrite each other.
#[derive(Debug)]
pub struct ShortenerService<R, G> {
    repository: Arc<R>,
    generator: G,
    settings: ShortenerSettings,
}

impl<R: Repository, G: Generator> ShortenerService<R, G> {
    pub fn new(repository: Arc<R>, generator: G, settings: ShortenerSettings) -> Self {
        Self {
            repository,
            generator,
            settings,
        }
    }

    /// Picks a short code that is currently free. Only reads the store.
    ///
    /// A custom id is validated and must not exist yet. Otherwise generated
    /// candidates are tried up to `max_attempts` times.
    pub async fn allocate(&self, custom: Option<&str>) -> Result<ShortCode> {
        match custom {
            Some(id) => self.allocate_custom(id).await,
            None => self
                .allocate_generated(self.settings.max_attempts)
                .await
                .map(|(code, _)| code),
        }
    }

    async fn allocate_custom(&self, id: &str) -> Result<ShortCode> {
        let code = ShortCode::new(id)?;
        if self.repository.exists(&code).await? {
            return Err(ShortenerError::AliasConflict(code.to_string()));
        }
        Ok(code)
    }

    /// Returns a free generated code and the number of candidates it took.
    async fn allocate_generated(&self, budget: usize) -> Result<(ShortCode, usize)> {
        for attempt in 1..=budget {
            let code: ShortCode = self.generator.generate().into();
            if !self.repository.exists(&code).await? {
                return Ok((code, attempt));
            }
            trace!(code = %code, attempt, "generated code already taken");
        }

        warn!(
            attempts = self.settings.max_attempts,
            "no free short code within attempt cap"
        );
        Err(ShortenerError::Exhausted {
            attempts: self.settings.max_attempts,
        })
    }

    async fn insert_generated(&self, record: ShortLinkRecord) -> Result<ShortCode> {
        let mut remaining = self.settings.max_attempts;
        loop {
            let (code, used) = self.allocate_generated(remaining).await?;
            remaining -= used;

            match self.repository.insert(&code, record.clone()).await {
                Ok(()) => return Ok(code),
                // Lost a race against a concurrent insert of the same code.
                Err(StorageError::Conflict(_)) if remaining > 0 => {
                    trace!(code = %code, "generated code taken during insert, retrying");
                }
                Err(StorageError::Conflict(_)) => {
                    return Err(ShortenerError::Exhausted {
                        attempts: self.settings.max_attempts,
                    })
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
}

/// Normalizes a creation request into a fresh record plus parse warnings.
fn build_record(params: ShortenParams) -> Result<(ShortLinkRecord, Vec<String>)> {
    let long_url = non_empty(params.long_url)
        .ok_or_else(|| ShortenerError::Validation("Missing URL".to_string()))?;
    validate_url("long_url", &long_url)?;

    let mut record = ShortLinkRecord::new(long_url);
    record.password = non_empty(params.password);
    record.expiry_date = non_empty(params.expiry_date)
        .map(|text| ExpiryDate::parse(&text))
        .transpose()?;
    record.max_clicks = params
        .max_clicks
        .filter(|v| !v.is_blank())
        .map(|v| v.to_max_clicks())
        .transpose()?;

    for (field, slot, value) in [
        ("mobile_url", &mut record.mobile_url, params.mobile_url),
        ("desktop_url", &mut record.desktop_url, params.desktop_url),
    ] {
        if let Some(url) = non_empty(value) {
            validate_url(field, &url)?;
            *slot = Some(url);
        }
    }

    let mut warnings = Vec::new();
    if let Some(text) = non_empty(params.country_redirect) {
        let parsed = CountryRedirects::parse(&text);
        warnings.extend(
            parsed
                .skipped
                .into_iter()
                .map(|pair| format!("country_redirect: skipped '{}' (expected CODE=URL)", pair)),
        );
        let redirects = Some(parsed.redirects).filter(|r| !r.is_empty());
        if let Some(redirects) = &redirects {
            redirects.validate()?;
        }
        record.country_redirect = redirects;
    }

    Ok((record, warnings))
}

#[async_trait]
impl<R: Repository, G: Generator> Shortener for ShortenerService<R, G> {
    async fn shorten(&self, mut params: ShortenParams) -> Result<Created> {
        let custom = non_empty(params.custom_id.take());
        let (record, warnings) = build_record(params)?;

        let code = match custom {
            Some(id) => {
                let code = self.allocate_custom(&id).await?;
                self.repository.insert(&code, record).await?;
                code
            }
            None => self.insert_generated(record).await?,
        };

        for warning in &warnings {
            warn!(code = %code, "{}", warning);
        }
        debug!(code = %code, "created short link");

        Ok(Created {
            short_url: code.to_url(&self.settings.base_url),
            code,
            warnings,
        })
    }

    async fn update(&self, code: &ShortCode, payload: UpdatePayload) -> Result<Updated> {
        if !self.repository.exists(code).await? {
            return Err(ShortenerError::NotFound(code.to_string()));
        }

        let patch = match build_patch(payload)? {
            UpdateOutcome::NoOp => return Ok(Updated::NoOp),
            UpdateOutcome::Changes(patch) => patch,
        };

        if self.repository.update(code, &patch).await?.is_none() {
            return Err(ShortenerError::NotFound(code.to_string()));
        }

        for warning in patch.warnings() {
            warn!(code = %code, "{}", warning);
        }
        debug!(code = %code, fields = patch.changes().len(), "updated short link");
        Ok(Updated::Applied(patch))
    }

    async fn stats(&self, code: &ShortCode) -> Result<LinkStats> {
        let record = self
            .repository
            .get(code)
            .await?
            .ok_or_else(|| ShortenerError::NotFound(code.to_string()))?;

        Ok(LinkStats {
            short_url: code.to_url(&self.settings.base_url),
            password_protected: record.is_password_protected(),
            long_url: record.long_url,
            clicks: record.clicks,
            expiry_date: record.expiry_date.map(|d| d.to_string()),
            max_clicks: record.max_clicks,
            mobile_url: record.mobile_url,
            desktop_url: record.desktop_url,
            country_redirect: record.country_redirect,
        })
    }

    async fn exists(&self, code: &ShortCode) -> Result<bool> {
        Ok(self.repository.exists(code).await?)
    }
}
