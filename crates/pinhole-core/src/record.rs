use crate::country::CountryRedirects;
use crate::error::{CoreError, Result};
use jiff::civil::DateTime;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::Display;

/// One stored short link. The short code itself is the repository key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortLinkRecord {
    /// Default redirect target.
    pub long_url: String,
    /// Successful redirects so far. Only the store increments this.
    #[serde(default)]
    pub clicks: u64,
    /// Plaintext password required before redirecting, if any.
    pub password: Option<String>,
    pub expiry_date: Option<ExpiryDate>,
    /// Redirect quota; the link is exhausted once `clicks >= max_clicks`.
    pub max_clicks: Option<u64>,
    pub mobile_url: Option<String>,
    pub desktop_url: Option<String>,
    pub country_redirect: Option<CountryRedirects>,
}

impl ShortLinkRecord {
    /// Creates a record with no options set and zero clicks.
    pub fn new(long_url: impl Into<String>) -> Self {
        Self {
            long_url: long_url.into(),
            clicks: 0,
            password: None,
            expiry_date: None,
            max_clicks: None,
            mobile_url: None,
            desktop_url: None,
            country_redirect: None,
        }
    }

    pub fn is_password_protected(&self) -> bool {
        self.password.is_some()
    }
}

/// A local wall-clock expiry in the fixed `YYYY-MM-DD HH:MM:SS` format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ExpiryDate(DateTime);

impl ExpiryDate {
    pub const FORMAT: &'static str = "%Y-%m-%d %H:%M:%S";

    /// Parses an expiry date, failing with a validation error on any other
    /// shape. Parsing happens on write so the evaluator never sees bad input.
    pub fn parse(input: &str) -> Result<Self> {
        DateTime::strptime(Self::FORMAT, input.trim())
            .map(Self)
            .map_err(|e| {
                CoreError::Validation(format!(
                    "expiry_date must use the format YYYY-MM-DD HH:MM:SS, got '{}': {}",
                    input, e
                ))
            })
    }

    pub fn datetime(&self) -> DateTime {
        self.0
    }
}

impl From<DateTime> for ExpiryDate {
    fn from(value: DateTime) -> Self {
        Self(value)
    }
}

impl Display for ExpiryDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.strftime(Self::FORMAT))
    }
}

impl Serialize for ExpiryDate {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ExpiryDate {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        ExpiryDate::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// A loosely typed request value: JSON bodies may send numbers where form
/// bodies always send text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Integer(i64),
    Text(String),
}

impl FieldValue {
    /// Returns `true` for the empty string, which callers treat as "unset".
    pub fn is_blank(&self) -> bool {
        matches!(self, FieldValue::Text(s) if s.is_empty())
    }

    /// Returns the value as text; integers are rendered in decimal.
    pub fn into_text(self) -> String {
        match self {
            FieldValue::Integer(n) => n.to_string(),
            FieldValue::Text(s) => s,
        }
    }

    /// Parses the value as a positive click quota.
    pub fn to_max_clicks(&self) -> Result<u64> {
        let parsed = match self {
            FieldValue::Integer(n) => Some(*n),
            FieldValue::Text(s) => s.trim().parse::<i64>().ok(),
        };

        match parsed {
            Some(n) if n > 0 => Ok(n as u64),
            Some(n) => Err(CoreError::Validation(format!(
                "max_clicks must be a positive integer, got {}",
                n
            ))),
            None => Err(CoreError::Validation(format!(
                "max_clicks must be an integer, got '{}'",
                self.clone().into_text()
            ))),
        }
    }
}

/// Treats an empty string as absent.
pub fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

/// Checks that a target URL has an `http`/`https` scheme and a host.
pub fn validate_url(field: &str, url: &str) -> Result<()> {
    if url.is_empty() {
        return Err(CoreError::Validation(format!("{} cannot be empty", field)));
    }

    let Some((scheme, rest)) = url.split_once("://") else {
        return Err(CoreError::Validation(format!(
            "{} must have a valid scheme and host: {}",
            field, url
        )));
    };

    let scheme = scheme.to_ascii_lowercase();
    if scheme != "http" && scheme != "https" {
        return Err(CoreError::Validation(format!(
            "{} scheme must be http or https: {}",
            field, scheme
        )));
    }

    let host = rest.split(['/', '?', '#']).next().unwrap_or_default();
    if host.is_empty() {
        return Err(CoreError::Validation(format!(
            "{} must have a valid scheme and host: {}",
            field, url
        )));
    }

    Ok(())
}
