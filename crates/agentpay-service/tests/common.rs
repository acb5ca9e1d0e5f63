//! Common test utilities for agentpay integration tests.

#![allow(dead_code)] // Some utilities are used by different test files

use std::collections::HashMap;

use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderName, HeaderValue};
use axum_test::TestServer;
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use agentpay_service::{create_router, AppState, ServiceConfig};

/// Bearer token the identity mock accepts.
pub const VALID_TOKEN: &str = "valid-access-token";

/// Email of the user behind [`VALID_TOKEN`].
pub const USER_EMAIL: &str = "user@example.com";

/// Signing secret for locally verified tokens.
pub const JWT_SECRET: &str = "super-secret-jwt-token-with-at-least-32-characters";

/// Test harness containing everything needed for integration tests.
pub struct TestHarness {
    /// The test server for making HTTP requests.
    pub server: TestServer,
    /// Mock identity provider (`/auth/v1/user`).
    pub identity: MockServer,
    /// Mock Stripe API (mounted under `/v1`).
    pub stripe: MockServer,
    /// A test user ID returned by the identity mock.
    pub user_id: String,
}

impl TestHarness {
    /// Harness with Stripe configured.
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    /// Harness without a Stripe secret.
    pub async fn without_stripe() -> Self {
        Self::with_config(|config| config.stripe_secret_key = None).await
    }

    /// Harness verifying tokens locally with [`JWT_SECRET`].
    pub async fn with_jwt_secret() -> Self {
        Self::with_config(|config| {
            config.supabase_anon_key = None;
            config.supabase_jwt_secret = Some(JWT_SECRET.into());
        })
        .await
    }

    /// Harness whose configuration is adjusted by `configure`.
    pub async fn with_config(configure: impl FnOnce(&mut ServiceConfig)) -> Self {
        let identity = MockServer::start().await;
        let stripe = MockServer::start().await;

        let mut config = ServiceConfig {
            listen_addr: "127.0.0.1:0".into(),
            stripe_secret_key: Some("sk_test_123".into()),
            stripe_api_base: format!("{}/v1", stripe.uri()),
            supabase_url: identity.uri(),
            supabase_anon_key: Some("anon-key".into()),
            supabase_jwt_secret: None,
            site_url: "http://localhost:5173".into(),
            cors_origins: vec!["*".into()],
            max_body_bytes: 64 * 1024,
            request_timeout_seconds: 30,
        };
        configure(&mut config);

        let state = AppState::new(config).expect("Failed to build app state");
        let server = TestServer::new(create_router(state)).expect("Failed to create test server");

        Self {
            server,
            identity,
            stripe,
            user_id: uuid::Uuid::new_v4().to_string(),
        }
    }

    /// Authorization header carrying [`VALID_TOKEN`].
    pub fn user_auth_header() -> (HeaderName, HeaderValue) {
        bearer(VALID_TOKEN)
    }

    /// Identity mock accepts [`VALID_TOKEN`] as a user with `email`.
    pub async fn mock_user(&self, email: Option<&str>) {
        Mock::given(method("GET"))
            .and(path("/auth/v1/user"))
            .and(header("authorization", format!("Bearer {VALID_TOKEN}").as_str()))
            .and(header("apikey", "anon-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": self.user_id,
                "aud": "authenticated",
                "email": email,
            })))
            .mount(&self.identity)
            .await;
    }

    /// Identity mock rejects every token.
    pub async fn mock_rejected_token(&self) {
        Mock::given(method("GET"))
            .and(path("/auth/v1/user"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "code": 401,
                "msg": "invalid JWT: unable to parse or verify signature"
            })))
            .mount(&self.identity)
            .await;
    }

    /// Stripe customer search by [`USER_EMAIL`] returns `customer_id`, if any.
    pub async fn mock_customer_lookup(&self, customer_id: Option<&str>) {
        let data: Vec<_> = customer_id
            .map(|id| json!({ "id": id, "object": "customer", "email": USER_EMAIL }))
            .into_iter()
            .collect();

        Mock::given(method("GET"))
            .and(path("/v1/customers"))
            .and(query_param("email", USER_EMAIL))
            .and(query_param("limit", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "object": "list",
                "data": data,
                "has_more": false,
                "url": "/v1/customers"
            })))
            .expect(1)
            .mount(&self.stripe)
            .await;
    }

    /// Stripe Checkout session creation succeeds with `url`.
    pub async fn mock_checkout_session(&self, url: &str) {
        Mock::given(method("POST"))
            .and(path("/v1/checkout/sessions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "cs_test_a1b2c3",
                "object": "checkout.session",
                "mode": "subscription",
                "status": "open",
                "url": url
            })))
            .expect(1)
            .mount(&self.stripe)
            .await;
    }

    /// Stripe must not be called at all.
    pub async fn expect_no_stripe_calls(&self) {
        Mock::given(wiremock::matchers::any())
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&self.stripe)
            .await;
    }

    /// Identity provider must not be called at all.
    pub async fn expect_no_identity_calls(&self) {
        Mock::given(wiremock::matchers::any())
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&self.identity)
            .await;
    }

    /// Form fields of the requests Stripe received on `path`.
    pub async fn stripe_forms(&self, request_path: &str) -> Vec<HashMap<String, String>> {
        self.stripe
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|r| r.url.path() == request_path)
            .map(form_fields)
            .collect()
    }
}

/// HS256 access token for `user_id` signed with [`JWT_SECRET`].
pub fn signed_token(user_id: &str, email: Option<&str>) -> String {
    let claims = json!({
        "sub": user_id,
        "email": email,
        "aud": "authenticated",
        "role": "authenticated",
        "exp": chrono::Utc::now().timestamp() + 3600,
    });
    jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        &claims,
        &jsonwebtoken::EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .expect("token encodes")
}

/// Authorization header with `Bearer <token>`.
pub fn bearer(token: &str) -> (HeaderName, HeaderValue) {
    (
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {token}")).expect("valid header value"),
    )
}

/// Decode an `application/x-www-form-urlencoded` request body.
pub fn form_fields(request: &Request) -> HashMap<String, String> {
    url::form_urlencoded::parse(&request.body)
        .into_owned()
        .collect()
}
