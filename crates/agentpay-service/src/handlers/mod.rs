//! API handlers.

pub mod checkout;
pub mod health;
pub mod portal;
pub mod subscription;

use axum::http::header::{AUTHORIZATION, ORIGIN};
use axum::http::HeaderMap;

use crate::redirect::RedirectBase;
use crate::state::AppState;

/// Raw `Authorization` header value, if present and valid UTF-8.
fn authorization(headers: &HeaderMap) -> Option<&str> {
    headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok())
}

/// Redirect base for hosted pages: the request origin or the site URL.
fn redirect_base(headers: &HeaderMap, state: &AppState) -> RedirectBase {
    let origin = headers.get(ORIGIN).and_then(|v| v.to_str().ok());
    RedirectBase::from_origin(origin, &state.site_url)
}
