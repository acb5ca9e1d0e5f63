//! Identity provider integration.
//!
//! Bearer tokens are issued by the identity provider. They are turned into
//! a [`Principal`] either by asking the provider (`GET /auth/v1/user`) or,
//! when the project's JWT secret is configured, by verifying the token
//! signature locally.

pub mod jwt;
pub mod supabase;

use agentpay_core::{CheckoutError, Principal};
use async_trait::async_trait;

pub use jwt::JwtVerifier;
pub use supabase::SupabaseAuthClient;

/// Name used for identity failures in logs and upstream errors.
pub const IDENTITY_PROVIDER: &str = "identity";

/// Error type for identity operations.
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    /// The token is invalid, expired, or revoked.
    #[error("token rejected")]
    Rejected,

    /// The provider could not be reached or answered unexpectedly.
    #[error("identity provider error: {0}")]
    Upstream(String),

    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl From<IdentityError> for CheckoutError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::Rejected => Self::not_authenticated(),
            other => Self::upstream(IDENTITY_PROVIDER, other.to_string()),
        }
    }
}

/// Resolves bearer tokens to principals.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Verify `token` and return the user it was issued to.
    async fn verify(&self, token: &str) -> Result<Principal, IdentityError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_maps_to_authentication_required() {
        let err: CheckoutError = IdentityError::Rejected.into();
        assert_eq!(err, CheckoutError::not_authenticated());
    }

    #[test]
    fn upstream_maps_to_provider_error() {
        let err: CheckoutError = IdentityError::Upstream("HTTP 503".into()).into();
        assert!(matches!(
            err,
            CheckoutError::UpstreamProvider { ref provider, .. } if provider == IDENTITY_PROVIDER
        ));
    }
}
