//! Logging and tracing setup shared by Pinhole binaries.

pub mod error;
pub mod http;
pub mod settings;

mod init;

pub use error::{Result, TelemetryError};
pub use http::{http_trace_layer, RequestSpan};
pub use init::{init, TelemetryGuard};
pub use settings::{LogFormat, TelemetrySettings};
