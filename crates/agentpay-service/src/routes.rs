//! Router configuration.
//!
//! This module sets up the Axum router with all routes and middleware.

use std::sync::Arc;
use std::time::Duration;

use agentpay_core::CheckoutError;
use axum::extract::DefaultBodyLimit;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, StatusCode};
use axum::middleware;
use axum::response::{IntoResponse, Response};
use axum::routing::{any, get};
use axum::Router;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::error::ApiError;
use crate::handlers::{checkout, health, portal, subscription};
use crate::state::AppState;

/// Maximum concurrent requests for billing endpoints.
const API_MAX_CONCURRENT_REQUESTS: usize = 50;

/// Headers the website sends with function invocations.
const ALLOWED_HEADERS: [HeaderName; 4] = [
    AUTHORIZATION,
    HeaderName::from_static("x-client-info"),
    HeaderName::from_static("apikey"),
    CONTENT_TYPE,
];

/// Create the service router with all routes and middleware.
///
/// # Routes
///
/// ## Public
/// - `GET /health` - Health check
///
/// ## Billing (bearer token auth)
/// - `POST /create-checkout` - Start a plan subscription checkout
/// - `POST /customer-portal` - Open the billing portal
/// - `POST /check-subscription` - Current subscription status
///
/// Billing routes accept any method. `OPTIONS` preflight requests are
/// answered by the CORS layer with an empty 200; everything else reaches
/// the handler, and every failure, timeouts included, is a 500 envelope.
pub fn create_router(state: AppState) -> Router {
    let cors_origins = state.config.cors_origins.clone();
    let max_body_bytes = state.config.max_body_bytes;
    let request_timeout_seconds = state.config.request_timeout_seconds;

    let cors = build_cors_layer(&cors_origins);

    let state = Arc::new(state);

    let api_routes = Router::new()
        .route("/create-checkout", any(checkout::create_checkout))
        .route("/customer-portal", any(portal::customer_portal))
        .route("/check-subscription", any(subscription::check_subscription))
        .layer(ConcurrencyLimitLayer::new(API_MAX_CONCURRENT_REQUESTS));

    Router::new()
        .route("/health", get(health::health))
        .merge(api_routes)
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(TimeoutLayer::new(Duration::from_secs(
            request_timeout_seconds,
        )))
        .layer(middleware::map_response(timeout_as_error))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Rewrite the timeout layer's bare 408 into the error envelope.
async fn timeout_as_error(response: Response) -> Response {
    if response.status() == StatusCode::REQUEST_TIMEOUT {
        return ApiError::from(CheckoutError::timed_out()).into_response();
    }
    response
}

/// Build the CORS layer from configured origins.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.iter().any(|o| o == "*") {
        AllowOrigin::from(Any)
    } else {
        let origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(ALLOWED_HEADERS)
}
