use super::lookup_code;
use crate::error::{AppError, Result};
use crate::extract::{BodyKind, FormOrJson, JsonBody};
use crate::model::{MessageResponse, ShortenResponse, UpdateResponse};
use crate::pages;
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use pinhole_core::UpdatePayload;
use pinhole_shortener::{LinkStats, ShortenParams, Updated};
use tracing::{info, warn};

pub async fn shorten_handler(
    State(state): State<AppState>,
    FormOrJson(params, kind): FormOrJson<ShortenParams>,
) -> Result<Response> {
    let created = state.shortener().shorten(params).await?;

    // The link already exists at this point; a missing image only makes
    // the QR route answer 404.
    if let Err(e) = state
        .qrcodes()
        .generate(&created.code, &created.short_url)
        .await
    {
        warn!(code = %created.code, error = %e, "failed to generate QR code");
    }

    let qr_url = state.qr_url(&created.code);
    info!(code = %created.code, "short link created");

    Ok(match kind {
        BodyKind::Json => Json(ShortenResponse {
            short_url: created.short_url,
            qr_code: qr_url,
            warnings: created.warnings,
        })
        .into_response(),
        BodyKind::Form => {
            pages::created(&created.short_url, &qr_url, &created.warnings).into_response()
        }
    })
}

pub async fn qr_handler(
    State(state): State<AppState>,
    Path(short_id): Path<String>,
) -> Result<Response> {
    let png = match lookup_code(short_id) {
        Some(code) => state.qrcodes().load(&code).await?,
        None => None,
    };

    Ok(match png {
        Some(bytes) => ([(CONTENT_TYPE, "image/png")], bytes).into_response(),
        None => (StatusCode::NOT_FOUND, pages::error("QR code not found")).into_response(),
    })
}

pub async fn stats_handler(
    State(state): State<AppState>,
    Path(short_id): Path<String>,
) -> Result<Json<LinkStats>> {
    let code = lookup_code(short_id).ok_or(AppError::NotFound)?;
    let stats = state.shortener().stats(&code).await?;
    Ok(Json(stats))
}

pub async fn update_handler(
    State(state): State<AppState>,
    Path(short_id): Path<String>,
    body: std::result::Result<JsonBody<UpdatePayload>, AppError>,
) -> Result<Response> {
    // Unknown ids answer 404 before the body is looked at.
    let code = lookup_code(short_id).ok_or(AppError::NotFound)?;
    if !state.shortener().exists(&code).await? {
        return Err(AppError::NotFound);
    }
    let JsonBody(payload) = body?;

    Ok(match state.shortener().update(&code, payload).await? {
        Updated::NoOp => (
            StatusCode::BAD_REQUEST,
            Json(MessageResponse {
                message: "No updates provided",
            }),
        )
            .into_response(),
        Updated::Applied(patch) => {
            let warnings = patch.warnings().to_vec();
            Json(UpdateResponse {
                message: "URL updated successfully",
                updated_fields: patch,
                warnings,
            })
            .into_response()
        }
    })
}
