//! Partial updates of a stored link.
//!
//! Only fields present in the payload are touched. A present `null` or empty
//! string clears the field; an absent field is left alone.

use crate::country::CountryRedirects;
use crate::error::{CoreError, Result};
use crate::record::{validate_url, ExpiryDate, FieldValue, ShortLinkRecord};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// Raw update request.
///
/// The outer `Option` records presence, the inner one `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UpdatePayload {
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub long_url: Option<Option<FieldValue>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub password: Option<Option<FieldValue>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub expiry_date: Option<Option<FieldValue>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub max_clicks: Option<Option<FieldValue>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub mobile_url: Option<Option<FieldValue>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub desktop_url: Option<Option<FieldValue>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub country_redirect: Option<Option<FieldValue>>,
}

/// A single validated field assignment. `None` clears the field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldChange {
    LongUrl(String),
    Password(Option<String>),
    ExpiryDate(Option<ExpiryDate>),
    MaxClicks(Option<u64>),
    MobileUrl(Option<String>),
    DesktopUrl(Option<String>),
    CountryRedirect(Option<CountryRedirects>),
}

impl FieldChange {
    pub fn name(&self) -> &'static str {
        match self {
            FieldChange::LongUrl(_) => "long_url",
            FieldChange::Password(_) => "password",
            FieldChange::ExpiryDate(_) => "expiry_date",
            FieldChange::MaxClicks(_) => "max_clicks",
            FieldChange::MobileUrl(_) => "mobile_url",
            FieldChange::DesktopUrl(_) => "desktop_url",
            FieldChange::CountryRedirect(_) => "country_redirect",
        }
    }

    fn apply_to(&self, record: &mut ShortLinkRecord) {
        match self {
            FieldChange::LongUrl(v) => record.long_url = v.clone(),
            FieldChange::Password(v) => record.password = v.clone(),
            FieldChange::ExpiryDate(v) => record.expiry_date = *v,
            FieldChange::MaxClicks(v) => record.max_clicks = *v,
            FieldChange::MobileUrl(v) => record.mobile_url = v.clone(),
            FieldChange::DesktopUrl(v) => record.desktop_url = v.clone(),
            FieldChange::CountryRedirect(v) => record.country_redirect = v.clone(),
        }
    }
}

/// A validated set of field changes. Never touches `clicks`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordPatch {
    changes: Vec<FieldChange>,
    warnings: Vec<String>,
}

impl RecordPatch {
    pub fn new(changes: Vec<FieldChange>) -> Self {
        Self {
            changes,
            warnings: Vec::new(),
        }
    }

    pub fn changes(&self) -> &[FieldChange] {
        &self.changes
    }

    /// Non-fatal problems found while parsing, e.g. skipped country pairs.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn apply_to(&self, record: &mut ShortLinkRecord) {
        for change in &self.changes {
            change.apply_to(record);
        }
    }
}

/// Echoes the changed fields as `{ name: new_value }`.
impl Serialize for RecordPatch {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.changes.len()))?;
        for change in &self.changes {
            match change {
                FieldChange::LongUrl(v) => map.serialize_entry(change.name(), v)?,
                FieldChange::Password(v)
                | FieldChange::MobileUrl(v)
                | FieldChange::DesktopUrl(v) => map.serialize_entry(change.name(), v)?,
                FieldChange::ExpiryDate(v) => map.serialize_entry(change.name(), v)?,
                FieldChange::MaxClicks(v) => map.serialize_entry(change.name(), v)?,
                FieldChange::CountryRedirect(v) => map.serialize_entry(change.name(), v)?,
            }
        }
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The payload named no recognized field.
    NoOp,
    Changes(RecordPatch),
}

/// Validates a payload into a patch.
pub fn build_patch(payload: UpdatePayload) -> Result<UpdateOutcome> {
    let mut changes = Vec::new();
    let mut warnings = Vec::new();

    if let Some(value) = payload.long_url {
        let url = present(value).ok_or_else(|| {
            CoreError::Validation("long_url is required and cannot be cleared".to_string())
        })?;
        validate_url("long_url", &url)?;
        changes.push(FieldChange::LongUrl(url));
    }

    if let Some(value) = payload.password {
        changes.push(FieldChange::Password(present(value)));
    }

    if let Some(value) = payload.expiry_date {
        let expiry = present(value)
            .map(|text| ExpiryDate::parse(&text))
            .transpose()?;
        changes.push(FieldChange::ExpiryDate(expiry));
    }

    if let Some(value) = payload.max_clicks {
        let max_clicks = value
            .filter(|v| !v.is_blank())
            .map(|v| v.to_max_clicks())
            .transpose()?;
        changes.push(FieldChange::MaxClicks(max_clicks));
    }

    if let Some(value) = payload.mobile_url {
        let url = present(value);
        if let Some(url) = &url {
            validate_url("mobile_url", url)?;
        }
        changes.push(FieldChange::MobileUrl(url));
    }

    if let Some(value) = payload.desktop_url {
        let url = present(value);
        if let Some(url) = &url {
            validate_url("desktop_url", url)?;
        }
        changes.push(FieldChange::DesktopUrl(url));
    }

    if let Some(value) = payload.country_redirect {
        let redirects = present(value).map(|text| {
            let parsed = CountryRedirects::parse(&text);
            warnings.extend(
                parsed
                    .skipped
                    .into_iter()
                    .map(|pair| format!("country_redirect: skipped '{}' (expected CODE=URL)", pair)),
            );
            parsed.redirects
        });
        let redirects = redirects.filter(|r| !r.is_empty());
        if let Some(redirects) = &redirects {
            redirects.validate()?;
        }
        changes.push(FieldChange::CountryRedirect(redirects));
    }

    if changes.is_empty() {
        return Ok(UpdateOutcome::NoOp);
    }

    Ok(UpdateOutcome::Changes(RecordPatch { changes, warnings }))
}

/// Validates a payload and applies it to `record` in place.
pub fn apply_update(record: &mut ShortLinkRecord, payload: UpdatePayload) -> Result<UpdateOutcome> {
    let outcome = build_patch(payload)?;
    if let UpdateOutcome::Changes(patch) = &outcome {
        patch.apply_to(record);
    }
    Ok(outcome)
}

fn present(value: Option<FieldValue>) -> Option<String> {
    value.filter(|v| !v.is_blank()).map(FieldValue::into_text)
}
