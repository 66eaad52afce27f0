use std::fmt::Display;
use std::str::FromStr;
use typed_builder::TypedBuilder;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human readable, one line per event.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format '{other}', expected text or json")),
        }
    }
}

impl Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormat::Text => f.write_str("text"),
            LogFormat::Json => f.write_str("json"),
        }
    }
}

#[derive(Debug, Clone, TypedBuilder)]
pub struct TelemetrySettings {
    #[builder(setter(into))]
    pub service_name: String,
    #[builder(default)]
    pub log_format: LogFormat,
    /// OTLP gRPC endpoint, e.g. `http://localhost:4317`. No exporter when unset.
    #[builder(default, setter(into))]
    pub otlp_endpoint: Option<String>,
    /// Filter used when `RUST_LOG` is not set.
    #[builder(default = "info".to_string(), setter(into))]
    pub default_filter: String,
}
