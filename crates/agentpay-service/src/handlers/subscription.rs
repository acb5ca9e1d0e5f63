//! Subscription status handler.

use std::sync::Arc;

use agentpay_core::SubscriptionStatus;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;

use super::authorization;
use crate::error::ApiError;
use crate::state::AppState;

/// Report whether the signed-in user has an active subscription.
pub async fn check_subscription(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<SubscriptionStatus>, ApiError> {
    let status = state
        .billing
        .check_subscription(authorization(&headers))
        .await?;

    Ok(Json(status))
}
