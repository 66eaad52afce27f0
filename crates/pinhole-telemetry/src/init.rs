use crate::settings::{LogFormat, TelemetrySettings};
use crate::Result;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry_otlp::{SpanExporter, WithExportConfig};
use opentelemetry_sdk::trace::SdkTracerProvider;
use opentelemetry_sdk::Resource;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt, EnvFilter, Registry};

/// Flushes and shuts down the OTLP pipeline when dropped.
///
/// Hold it for the lifetime of `main`.
#[must_use = "dropping the guard shuts telemetry down"]
#[derive(Debug, Default)]
pub struct TelemetryGuard {
    provider: Option<SdkTracerProvider>,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        if let Some(provider) = self.provider.take() {
            if let Err(e) = provider.shutdown() {
                eprintln!("failed to shut down tracer provider: {e}");
            }
        }
    }
}

fn tracer_provider(service_name: &str, endpoint: &str) -> Result<SdkTracerProvider> {
    let exporter = SpanExporter::builder()
        .with_tonic()
        .with_endpoint(endpoint)
        .build()?;

    Ok(SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .with_resource(
            Resource::builder()
                .with_service_name(service_name.to_string())
                .build(),
        )
        .build())
}

/// Installs the global subscriber.
///
/// `RUST_LOG` takes precedence over `settings.default_filter`. `log` records
/// from dependencies are bridged into `tracing`. Must be called at most once
/// per process and from within a tokio runtime when an OTLP endpoint is set.
pub fn init(settings: &TelemetrySettings) -> Result<TelemetryGuard> {
    tracing_log::LogTracer::init()?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.default_filter));

    let (text, json) = match settings.log_format {
        LogFormat::Text => (Some(fmt::layer().with_target(true)), None),
        LogFormat::Json => (None, Some(fmt::layer().json().with_current_span(true))),
    };

    let provider = settings
        .otlp_endpoint
        .as_deref()
        .map(|endpoint| tracer_provider(&settings.service_name, endpoint))
        .transpose()?;
    let otel = provider.as_ref().map(|provider| {
        tracing_opentelemetry::layer().with_tracer(provider.tracer(settings.service_name.clone()))
    });

    let subscriber = Registry::default()
        .with(otel)
        .with(filter)
        .with(text)
        .with(json);
    tracing::subscriber::set_global_default(subscriber)?;

    if let Some(endpoint) = &settings.otlp_endpoint {
        tracing::info!(endpoint = %endpoint, "exporting traces over OTLP");
    }

    Ok(TelemetryGuard { provider })
}
