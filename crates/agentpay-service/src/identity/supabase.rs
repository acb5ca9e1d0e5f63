//! Remote token introspection against the identity provider's auth API.

use std::time::Duration;

use agentpay_core::{Principal, UserId};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use super::{IdentityError, IdentityProvider};

/// Timeout for introspection requests.
const INTROSPECTION_TIMEOUT: Duration = Duration::from_secs(10);

/// User object returned by `GET /auth/v1/user`.
#[derive(Debug, Deserialize)]
struct AuthUser {
    id: String,
    #[serde(default)]
    email: Option<String>,
}

/// Client for the identity provider's `/auth/v1/user` endpoint.
#[derive(Debug, Clone)]
pub struct SupabaseAuthClient {
    client: Client,
    base_url: String,
    anon_key: String,
}

impl SupabaseAuthClient {
    /// Create a client for the project at `base_url`.
    ///
    /// The endpoint refuses requests without the project's public
    /// `anon_key`, whatever the bearer token.
    pub fn new(
        base_url: impl Into<String>,
        anon_key: impl Into<String>,
    ) -> Result<Self, IdentityError> {
        let client = Client::builder().timeout(INTROSPECTION_TIMEOUT).build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            anon_key: anon_key.into(),
        })
    }
}

#[async_trait]
impl IdentityProvider for SupabaseAuthClient {
    async fn verify(&self, token: &str) -> Result<Principal, IdentityError> {
        let url = format!("{}/auth/v1/user", self.base_url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(token)
            .header("apikey", &self.anon_key)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, url = %url, "Identity introspection request failed");
                IdentityError::Http(e)
            })?;

        let status = response.status();
        if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
            tracing::debug!(status = %status, "Identity provider rejected token");
            return Err(IdentityError::Rejected);
        }
        if !status.is_success() {
            tracing::error!(status = %status, "Identity introspection failed");
            return Err(IdentityError::Upstream(format!("HTTP {status}")));
        }

        let user: AuthUser = response.json().await?;
        let id = user.id.parse::<UserId>().map_err(|_| {
            tracing::warn!(id = %user.id, "Identity provider returned a non-UUID user id");
            IdentityError::Rejected
        })?;

        Ok(Principal {
            id,
            email: user.email,
        })
    }
}
