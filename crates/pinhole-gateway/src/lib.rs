//! HTTP surface of Pinhole.
//!
//! [`App::router`] wires the creation, redirect, QR, stats and update
//! routes onto an [`AppState`]. The binary in `bin/http` adds tracing and
//! CORS layers and serves it.

pub mod app;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod model;
pub mod pages;
pub mod state;

pub use app::App;
pub use error::{AppError, Result};
pub use state::AppState;
