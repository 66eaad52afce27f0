use crate::device::DeviceClass;
use crate::record::ShortLinkRecord;

/// Picks the redirect target for a request.
///
/// Precedence, highest first:
/// 1. a `country_redirect` entry for `country_code` (case-insensitive),
/// 2. `mobile_url` for mobile clients, `desktop_url` for desktop clients,
/// 3. `long_url`.
///
/// Tablets and unknown clients skip step 2. A missing or blank country code
/// skips step 1, as does an empty country target.
pub fn resolve<'a>(
    record: &'a ShortLinkRecord,
    device: DeviceClass,
    country_code: Option<&str>,
) -> &'a str {
    let country_target = country_code
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .and_then(|code| record.country_redirect.as_ref()?.get(code))
        .filter(|target| !target.is_empty());
    if let Some(target) = country_target {
        return target;
    }

    let device_target = match device {
        DeviceClass::Mobile => record.mobile_url.as_deref(),
        DeviceClass::Desktop => record.desktop_url.as_deref(),
        DeviceClass::Tablet | DeviceClass::Other => None,
    };

    device_target.unwrap_or(&record.long_url)
}
