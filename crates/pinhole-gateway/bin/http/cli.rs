use clap::{Parser, ValueEnum};
use pinhole_telemetry::LogFormat;
use std::fmt::{Display, Formatter};
use std::net::SocketAddr;
use std::path::PathBuf;

pub const LISTEN_ADDR_ENV: &str = "PINHOLE_LISTEN_ADDR";
pub const BASE_URL_ENV: &str = "PINHOLE_BASE_URL";
pub const STORAGE_BACKEND_ENV: &str = "PINHOLE_STORAGE_BACKEND";
pub const REDIS_URL_ENV: &str = "PINHOLE_REDIS_URL";
pub const QR_DIR_ENV: &str = "PINHOLE_QR_DIR";
pub const ID_LENGTH_ENV: &str = "PINHOLE_ID_LENGTH";
pub const MAX_ATTEMPTS_ENV: &str = "PINHOLE_ID_MAX_ATTEMPTS";
pub const LOG_FORMAT_ENV: &str = "PINHOLE_LOG_FORMAT";
pub const OTLP_ENDPOINT_ENV: &str = "PINHOLE_OTLP_ENDPOINT";

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8080";
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8080";
pub const DEFAULT_QR_DIR: &str = "qrcodes";
pub const DEFAULT_ID_LENGTH: &str = "6";
pub const DEFAULT_MAX_ATTEMPTS: &str = "10";
pub const DEFAULT_LOG_FORMAT: &str = "text";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageBackendArg {
    #[value(name = "in-memory")]
    InMemory,
    #[value(name = "redis")]
    Redis,
}

impl Display for StorageBackendArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackendArg::InMemory => write!(f, "in-memory"),
            StorageBackendArg::Redis => write!(f, "redis"),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "pinhole", about = "URL shortener with conditional redirects")]
pub struct Cli {
    #[arg(long, env = LISTEN_ADDR_ENV, default_value = DEFAULT_LISTEN_ADDR)]
    pub listen_addr: SocketAddr,

    /// Public origin used to build short and QR links.
    #[arg(long, env = BASE_URL_ENV, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    #[arg(
        long,
        env = STORAGE_BACKEND_ENV,
        value_enum,
        default_value_t = StorageBackendArg::InMemory
    )]
    pub storage: StorageBackendArg,

    #[arg(long, env = REDIS_URL_ENV, required_if_eq("storage", "redis"))]
    pub redis_url: Option<String>,

    #[arg(long, env = QR_DIR_ENV, default_value = DEFAULT_QR_DIR)]
    pub qr_dir: PathBuf,

    /// Length of generated short ids.
    #[arg(
        long,
        env = ID_LENGTH_ENV,
        default_value = DEFAULT_ID_LENGTH,
        value_parser = clap::value_parser!(u8).range(3..=32)
    )]
    pub id_length: u8,

    /// Generated candidates tried before a creation fails.
    #[arg(
        long,
        env = MAX_ATTEMPTS_ENV,
        default_value = DEFAULT_MAX_ATTEMPTS,
        value_parser = clap::value_parser!(u16).range(1..)
    )]
    pub max_attempts: u16,

    #[arg(long, env = LOG_FORMAT_ENV, default_value = DEFAULT_LOG_FORMAT)]
    pub log_format: LogFormat,

    #[arg(long, env = OTLP_ENDPOINT_ENV)]
    pub otlp_endpoint: Option<String>,
}
