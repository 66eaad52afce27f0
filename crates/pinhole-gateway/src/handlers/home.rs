use crate::pages;
use axum::http::StatusCode;
use maud::Markup;

pub async fn home_handler() -> Markup {
    pages::home()
}

pub async fn shorten_form_handler() -> Markup {
    pages::shorten_form()
}

pub async fn method_not_allowed_handler() -> (StatusCode, Markup) {
    (StatusCode::METHOD_NOT_ALLOWED, pages::method_not_allowed())
}
