mod cli;

use crate::cli::{Cli, StorageBackendArg};
use anyhow::Context;
use clap::Parser;
use pinhole_core::Repository;
use pinhole_gateway::{App, AppState};
use pinhole_generator::RandomGenerator;
use pinhole_qrcode::QrCodeStore;
use pinhole_shortener::ShortenerSettings;
use pinhole_storage::{InMemoryRepository, RedisRepository};
use pinhole_telemetry::{http_trace_layer, TelemetrySettings};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Cli::parse();

    let _telemetry = pinhole_telemetry::init(
        &TelemetrySettings::builder()
            .service_name("pinhole-gateway")
            .log_format(config.log_format)
            .otlp_endpoint(config.otlp_endpoint.clone())
            .build(),
    )?;

    info!(
        listen_addr = %config.listen_addr,
        base_url = %config.base_url,
        storage_backend = %config.storage,
        qr_dir = %config.qr_dir.display(),
        "starting pinhole gateway"
    );

    let qrcodes = QrCodeStore::open(&config.qr_dir)
        .await
        .with_context(|| format!("failed to open QR directory {}", config.qr_dir.display()))?;
    let settings = ShortenerSettings::builder()
        .base_url(config.base_url.clone())
        .max_attempts(usize::from(config.max_attempts))
        .build();
    let generator = RandomGenerator::new(usize::from(config.id_length));

    let state = match config.storage {
        StorageBackendArg::InMemory => build_state(
            Arc::new(InMemoryRepository::new()),
            generator,
            settings,
            qrcodes,
        ),
        StorageBackendArg::Redis => {
            let redis_url = config
                .redis_url
                .as_deref()
                .context("redis url is required when storage backend is redis")?;
            let repository = RedisRepository::connect(redis_url).await?;
            build_state(Arc::new(repository), generator, settings, qrcodes)
        }
    };

    let app = App::router(state).layer(http_trace_layer()).layer(
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    );

    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    info!(listen_addr = %listener.local_addr()?, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("gateway stopped");
    Ok(())
}

fn build_state<R: Repository>(
    repository: Arc<R>,
    generator: RandomGenerator,
    settings: ShortenerSettings,
    qrcodes: QrCodeStore,
) -> AppState {
    AppState::with_repository(repository, generator, settings, qrcodes)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
    }
}
