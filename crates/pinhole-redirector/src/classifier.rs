use pinhole_core::{DeviceClass, DeviceClassifier};
use woothee::parser::Parser;

/// Classifies clients with the `woothee` user-agent parser.
///
/// woothee files tablets under "smartphone"; iPads and Android devices whose
/// user agent lacks the "Mobile" token are split out as tablets so they fall
/// through to `long_url`.
#[derive(Debug, Clone, Copy, Default)]
pub struct WootheeClassifier;

impl WootheeClassifier {
    pub fn new() -> Self {
        Self
    }
}

impl DeviceClassifier for WootheeClassifier {
    fn classify(&self, user_agent: Option<&str>) -> DeviceClass {
        let Some(ua) = user_agent.filter(|ua| !ua.trim().is_empty()) else {
            return DeviceClass::Other;
        };
        let Some(result) = Parser::new().parse(ua) else {
            return DeviceClass::Other;
        };

        let is_tablet = result.os == "iPad" || (result.os == "Android" && !ua.contains("Mobile"));
        match result.category {
            "smartphone" | "mobilephone" if is_tablet => DeviceClass::Tablet,
            "smartphone" | "mobilephone" => DeviceClass::Mobile,
            "pc" => DeviceClass::Desktop,
            _ => DeviceClass::Other,
        }
    }
}
