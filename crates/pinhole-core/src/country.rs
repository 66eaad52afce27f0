use crate::error::Result;
use crate::record::validate_url;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-country redirect targets, keyed by uppercased country code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CountryRedirects(BTreeMap<String, String>);

/// Result of parsing a `CODE=URL;CODE=URL` list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCountryRedirects {
    pub redirects: CountryRedirects,
    /// Non-empty pairs that were dropped because they lack a `=`, a code or
    /// a URL.
    pub skipped: Vec<String>,
}

impl CountryRedirects {
    /// Parses `US=https://us.example.com;IN=https://in.example.com`.
    ///
    /// Pairs without a `=`, or with nothing on either side of it, are skipped
    /// rather than rejected; they are reported in
    /// [`ParsedCountryRedirects::skipped`] so callers can warn.
    /// Codes are trimmed and uppercased, URLs are trimmed. A later pair for
    /// the same code wins.
    pub fn parse(input: &str) -> ParsedCountryRedirects {
        let mut redirects = BTreeMap::new();
        let mut skipped = Vec::new();

        for pair in input.split(';') {
            let pair = pair.trim();
            match pair.split_once('=') {
                Some((code, url)) if !code.trim().is_empty() && !url.trim().is_empty() => {
                    redirects.insert(code.trim().to_uppercase(), url.trim().to_string());
                }
                _ if !pair.is_empty() => skipped.push(pair.to_string()),
                _ => {}
            }
        }

        ParsedCountryRedirects {
            redirects: CountryRedirects(redirects),
            skipped,
        }
    }

    /// Looks up the target for a country code, case-insensitively.
    pub fn get(&self, country_code: &str) -> Option<&str> {
        self.0
            .get(&country_code.trim().to_uppercase())
            .map(String::as_str)
    }

    /// Checks every target the way the device URLs are checked.
    pub fn validate(&self) -> Result<()> {
        for (code, url) in self.iter() {
            validate_url(&format!("country_redirect[{}]", code), url)?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for CountryRedirects {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into().to_uppercase(), v.into()))
                .collect(),
        )
    }
}
