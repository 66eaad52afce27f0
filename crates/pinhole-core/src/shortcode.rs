use crate::error::CoreError;
use serde::{Serialize, Serializer};
use std::fmt::Display;

/// A validated short code identifier for a shortened URL.
///
/// Short codes must be 3-32 characters long and contain only
/// alphanumeric characters, hyphens, or underscores.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ShortCode {
    /// A system-generated short code (e.g. from the random generator).
    Generated(String),
    /// A user-provided custom short code.
    Custom(String),
}

const MIN_LENGTH: usize = 3;
const MAX_LENGTH: usize = 32;

/// Path segments owned by fixed routes. A link under one of these names
/// could never be reached through `/{short_id}`.
const RESERVED: &[&str] = &["shorten", "qr", "stats", "update", "health"];

impl ShortCode {
    /// Wraps the output of a trusted generator.
    ///
    /// Generators only emit `[A-Za-z0-9]`, so no validation is performed.
    pub fn generated(code: impl Into<String>) -> Self {
        Self::Generated(code.into())
    }

    /// Creates a new custom `ShortCode` after validating the input.
    ///
    /// Valid codes are 3-32 characters, contain only `[a-zA-Z0-9_-]` and are
    /// not one of the reserved route names.
    pub fn new(code: impl Into<String>) -> std::result::Result<Self, CoreError> {
        let code = code.into();
        Self::validate(&code)?;
        Ok(Self::Custom(code))
    }

    /// Creates a `ShortCode` without validation.
    ///
    /// Use this only for codes read back from a trusted store.
    pub fn new_unchecked(code: impl Into<String>) -> Self {
        Self::Custom(code.into())
    }

    /// Generates the full shortened URL based on the provided base URL.
    pub fn to_url(&self, base_url: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), self)
    }

    /// Returns the short code as a string slice.
    pub fn as_str(&self) -> &str {
        match self {
            ShortCode::Generated(s) | ShortCode::Custom(s) => s.as_str(),
        }
    }

    pub fn is_generated(&self) -> bool {
        matches!(self, ShortCode::Generated(_))
    }

    fn validate(code: &str) -> std::result::Result<(), CoreError> {
        if code.len() < MIN_LENGTH || code.len() > MAX_LENGTH {
            return Err(CoreError::InvalidShortCode(format!(
                "length must be between {} and {}, got {}",
                MIN_LENGTH,
                MAX_LENGTH,
                code.len()
            )));
        }

        if !code
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(CoreError::InvalidShortCode(format!(
                "must contain only alphanumeric characters, hyphens, or underscores: '{}'",
                code
            )));
        }

        if RESERVED.contains(&code) {
            return Err(CoreError::InvalidShortCode(format!(
                "'{}' is reserved",
                code
            )));
        }

        Ok(())
    }
}

impl Display for ShortCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ShortCode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}
