use crate::record::ShortLinkRecord;
use subtle::ConstantTimeEq;

/// What the request brought in the way of a password.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Credential<'a> {
    /// The request method cannot carry a password field (e.g. `GET`).
    NotCarried,
    /// The request could carry one; `None` means the field was missing.
    Carried(Option<&'a str>),
}

/// Outcome of the password gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allow,
    /// Protected link reached without a way to submit a password; the caller
    /// should prompt for one.
    PasswordRequired,
    Denied,
}

/// Decides whether a request may proceed to redirect resolution.
///
/// Passwords are compared for exact, case-sensitive equality. The comparison
/// runs in constant time over the submitted bytes.
pub fn authorize(record: &ShortLinkRecord, credential: Credential<'_>) -> Access {
    let Some(expected) = record.password.as_deref() else {
        return Access::Allow;
    };

    match credential {
        Credential::NotCarried => Access::PasswordRequired,
        Credential::Carried(Some(submitted)) if passwords_match(expected, submitted) => {
            Access::Allow
        }
        Credential::Carried(_) => Access::Denied,
    }
}

fn passwords_match(expected: &str, submitted: &str) -> bool {
    expected.as_bytes().ct_eq(submitted.as_bytes()).into()
}
