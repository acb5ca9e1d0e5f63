//! Plan checkout handler.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde::Serialize;

use super::{authorization, redirect_base};
use crate::error::ApiError;
use crate::service::CheckoutRequest;
use crate::state::AppState;

/// Redirect response for hosted provider pages.
#[derive(Debug, Serialize)]
pub struct UrlResponse {
    /// Absolute URL to send the user to.
    pub url: String,
}

/// Create a hosted Checkout session for the requested plan.
///
/// Accepts any method; only CORS preflights are answered before this runs.
/// The body is read raw and validated only after the bearer token, so a
/// request without credentials fails on authentication whatever its body,
/// including one over the size limit.
pub async fn create_checkout(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<UrlResponse>, ApiError> {
    let redirect = redirect_base(&headers, &state);
    let body = body.as_deref().map_err(CheckoutRequest::invalid_body);

    let url = state
        .billing
        .create_checkout(authorization(&headers), body, &redirect)
        .await?;

    Ok(Json(UrlResponse { url }))
}
