use super::lookup_code;
use crate::error::Result;
use crate::extract::{is_form, is_json};
use crate::model::PasswordForm;
use crate::pages;
use crate::state::AppState;
use axum::extract::{FromRequest, Path, Request, State};
use axum::http::header::{LOCATION, USER_AGENT};
use axum::http::{HeaderMap, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{Form, Json};
use pinhole_redirector::{RedirectOutcome, RedirectRequest};

const COUNTRY_HEADER: &str = "x-country";

fn header_value(headers: &HeaderMap, name: impl axum::http::header::AsHeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
}

/// Reads `password` from a form or JSON body. Anything unreadable counts as
/// a submission without the field.
async fn submitted_password(request: Request) -> Option<String> {
    let form = if is_json(request.headers()) {
        Json::<PasswordForm>::from_request(request, &())
            .await
            .ok()
            .map(|Json(form)| form)
    } else if is_form(request.headers()) {
        Form::<PasswordForm>::from_request(request, &())
            .await
            .ok()
            .map(|Form(form)| form)
    } else {
        None
    };
    form.and_then(|form| form.password)
}

fn html_error(status: StatusCode, message: &str) -> Response {
    (status, pages::error(message)).into_response()
}

pub async fn redirect_handler(
    State(state): State<AppState>,
    Path(short_id): Path<String>,
    request: Request,
) -> Result<Response> {
    let Some(code) = lookup_code(short_id) else {
        return Ok(html_error(StatusCode::NOT_FOUND, "URL not found"));
    };

    let user_agent = header_value(request.headers(), USER_AGENT);
    let country = header_value(request.headers(), COUNTRY_HEADER);
    let password = if request.method() == Method::POST {
        Some(submitted_password(request).await)
    } else {
        None
    };

    let outcome = state
        .redirector()
        .redirect(
            &code,
            RedirectRequest {
                user_agent,
                country,
                password,
            },
        )
        .await?;

    Ok(match outcome {
        RedirectOutcome::Redirect { target, .. } => {
            (StatusCode::FOUND, [(LOCATION, target)]).into_response()
        }
        RedirectOutcome::NotFound => html_error(StatusCode::NOT_FOUND, "URL not found"),
        RedirectOutcome::Expired | RedirectOutcome::Exhausted => html_error(
            StatusCode::FORBIDDEN,
            "Link expired or max clicks reached",
        ),
        RedirectOutcome::PasswordRequired => pages::password_prompt().into_response(),
        RedirectOutcome::Denied => html_error(StatusCode::FORBIDDEN, "Incorrect password"),
    })
}
