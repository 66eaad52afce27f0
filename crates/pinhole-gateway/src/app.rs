use axum::routing::get;
use axum::Router;

use crate::handlers::{
    health_handler, home_handler, method_not_allowed_handler, qr_handler, redirect_handler,
    shorten_form_handler, shorten_handler, stats_handler, update_handler,
};
use crate::state::AppState;

pub struct App {}

impl App {
    pub fn router(state: AppState) -> Router {
        Router::new()
            .route("/", get(home_handler))
            .route("/health", get(health_handler))
            .route("/shorten", get(shorten_form_handler).post(shorten_handler))
            .route("/qr/{short_id}", get(qr_handler))
            .route("/stats/{short_id}", get(stats_handler))
            .route(
                "/update/{short_id}",
                axum::routing::patch(update_handler).post(update_handler),
            )
            .route("/{short_id}", get(redirect_handler).post(redirect_handler))
            .method_not_allowed_fallback(method_not_allowed_handler)
            .with_state(state)
    }
}
