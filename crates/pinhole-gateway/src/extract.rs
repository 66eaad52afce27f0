use crate::error::AppError;
use axum::extract::{FromRequest, Request};
use axum::http::header::CONTENT_TYPE;
use axum::http::HeaderMap;
use axum::{Form, Json};
use serde::de::DeserializeOwned;

/// How the client sent its body. Decides the response flavor as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Json,
    Form,
}

fn mime_essence(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(CONTENT_TYPE)?.to_str().ok()?;
    value
        .split(';')
        .next()
        .map(|essence| essence.trim().to_ascii_lowercase())
}

pub fn is_json(headers: &HeaderMap) -> bool {
    mime_essence(headers).is_some_and(|mime| mime == "application/json" || mime.ends_with("+json"))
}

pub fn is_form(headers: &HeaderMap) -> bool {
    mime_essence(headers).is_some_and(|mime| mime == "application/x-www-form-urlencoded")
}

/// Deserializes a JSON body when the request says it is JSON, otherwise a
/// url-encoded form.
#[derive(Debug, Clone)]
pub struct FormOrJson<T>(pub T, pub BodyKind);

impl<S, T> FromRequest<S> for FormOrJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if is_json(req.headers()) {
            let Json(value) = Json::<T>::from_request(req, state)
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            Ok(Self(value, BodyKind::Json))
        } else {
            let Form(value) = Form::<T>::from_request(req, state)
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            Ok(Self(value, BodyKind::Form))
        }
    }
}

/// Like [`Json`], but a missing or non-JSON content type is answered with
/// the plain `Send JSON data` error.
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if !is_json(req.headers()) {
            return Err(AppError::BadRequest("Send JSON data".to_string()));
        }
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        Ok(Self(value))
    }
}
