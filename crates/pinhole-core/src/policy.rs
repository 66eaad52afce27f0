//! Expiry and quota evaluation.
//!
//! Nothing here is persisted: whether a link is usable depends on the time
//! of the request, so it is recomputed on every resolution.

use crate::record::ShortLinkRecord;
use jiff::civil::DateTime;

/// Whether a record may still be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStatus {
    Usable,
    /// `now` is strictly after the record's expiry date.
    Expired,
    /// The click quota has been reached.
    Exhausted,
}

impl LinkStatus {
    pub fn is_usable(self) -> bool {
        self == LinkStatus::Usable
    }
}

/// Evaluates a record against the current local time.
///
/// The date check runs first, so a record that is both past its expiry and
/// out of clicks reports [`LinkStatus::Expired`].
pub fn evaluate(record: &ShortLinkRecord, now: DateTime) -> LinkStatus {
    if record
        .expiry_date
        .is_some_and(|expiry| now > expiry.datetime())
    {
        return LinkStatus::Expired;
    }

    if record
        .max_clicks
        .is_some_and(|max_clicks| record.clicks >= max_clicks)
    {
        return LinkStatus::Exhausted;
    }

    LinkStatus::Usable
}

/// Returns `true` when the record is expired or its quota is exhausted.
pub fn is_expired(record: &ShortLinkRecord, now: DateTime) -> bool {
    !evaluate(record, now).is_usable()
}
