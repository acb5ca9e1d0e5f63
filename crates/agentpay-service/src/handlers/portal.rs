//! Billing portal handler.

use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;

use super::checkout::UrlResponse;
use super::{authorization, redirect_base};
use crate::error::ApiError;
use crate::state::AppState;

/// Open the billing portal for the signed-in user's customer.
pub async fn customer_portal(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<UrlResponse>, ApiError> {
    let redirect = redirect_base(&headers, &state);

    let url = state
        .billing
        .open_portal(authorization(&headers), &redirect)
        .await?;

    Ok(Json(UrlResponse { url }))
}
