use std::fmt::Display;

/// Coarse class of the requesting client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceClass {
    Mobile,
    Tablet,
    Desktop,
    Other,
}

impl Display for DeviceClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DeviceClass::Mobile => "mobile",
            DeviceClass::Tablet => "tablet",
            DeviceClass::Desktop => "desktop",
            DeviceClass::Other => "other",
        };
        f.write_str(name)
    }
}

/// Classifies a client from its `User-Agent` header.
///
/// Kept behind a trait so the resolver can be exercised without a real
/// user-agent parser.
pub trait DeviceClassifier: Send + Sync + 'static {
    fn classify(&self, user_agent: Option<&str>) -> DeviceClass;
}

impl<F> DeviceClassifier for F
where
    F: Fn(Option<&str>) -> DeviceClass + Send + Sync + 'static,
{
    fn classify(&self, user_agent: Option<&str>) -> DeviceClass {
        self(user_agent)
    }
}
