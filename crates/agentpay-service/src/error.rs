//! API error type and response envelope.
//!
//! Every failure is reported as status 500 with `{"error": "<message>"}`.
//! Callers tell error kinds apart by the message text only; the website
//! shows a generic alert for any non-2xx response.

use agentpay_core::CheckoutError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// API error type.
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct ApiError(#[from] CheckoutError);

/// JSON error response body.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self.0 {
            CheckoutError::Configuration(msg) => {
                tracing::error!(error = %msg, "Service misconfigured");
            }
            CheckoutError::UpstreamProvider { provider, message } => {
                tracing::error!(provider = %provider, error = %message, "Upstream provider error");
            }
            CheckoutError::AuthenticationRequired(_) | CheckoutError::Validation(_) => {}
        }

        let body = ErrorResponse {
            error: self.0.to_string(),
        };

        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}
