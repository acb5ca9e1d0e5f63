//! Local verification of HS256 access tokens.

use agentpay_core::{Principal, UserId};
use async_trait::async_trait;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use super::{IdentityError, IdentityProvider};

/// Audience carried by access tokens of signed-in users.
pub const AUTHENTICATED_AUDIENCE: &str = "authenticated";

/// Access token claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject (user ID).
    pub sub: String,
    /// Email of the user, absent for phone-only accounts.
    #[serde(default)]
    pub email: Option<String>,
    /// Audience.
    #[serde(default)]
    pub aud: Option<String>,
    /// Role ("authenticated", "anon", "service_role").
    #[serde(default)]
    pub role: Option<String>,
    /// Expiration time.
    pub exp: i64,
}

/// Verifies access tokens with the project's shared JWT secret.
#[derive(Clone)]
pub struct JwtVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl JwtVerifier {
    /// Create a verifier for tokens signed with `secret`.
    #[must_use]
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[AUTHENTICATED_AUDIENCE]);

        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Decode and validate `token`, returning its claims.
    pub fn decode_claims(&self, token: &str) -> Result<AccessClaims, IdentityError> {
        let data = decode::<AccessClaims>(token, &self.key, &self.validation).map_err(|e| {
            tracing::debug!(error = %e, "JWT validation failed");
            IdentityError::Rejected
        })?;
        Ok(data.claims)
    }
}

impl std::fmt::Debug for JwtVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtVerifier").finish_non_exhaustive()
    }
}

#[async_trait]
impl IdentityProvider for JwtVerifier {
    async fn verify(&self, token: &str) -> Result<Principal, IdentityError> {
        let claims = self.decode_claims(token)?;

        let id = claims
            .sub
            .parse::<UserId>()
            .map_err(|_| IdentityError::Rejected)?;

        Ok(Principal {
            id,
            email: claims.email,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    const SECRET: &str = "super-secret-jwt-token-with-at-least-32-characters";

    fn token(secret: &str, exp: i64, email: Option<&str>) -> String {
        let claims = AccessClaims {
            sub: UserId::generate().to_string(),
            email: email.map(String::from),
            aud: Some(AUTHENTICATED_AUDIENCE.into()),
            role: Some("authenticated".into()),
            exp,
        };
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn in_one_hour() -> i64 {
        chrono::Utc::now().timestamp() + 3600
    }

    #[tokio::test]
    async fn valid_token_resolves_principal() {
        let verifier = JwtVerifier::new(SECRET);
        let principal = verifier
            .verify(&token(SECRET, in_one_hour(), Some("user@example.com")))
            .await
            .unwrap();
        assert_eq!(principal.email.as_deref(), Some("user@example.com"));
    }

    #[tokio::test]
    async fn token_without_email_still_verifies() {
        let verifier = JwtVerifier::new(SECRET);
        let principal = verifier
            .verify(&token(SECRET, in_one_hour(), None))
            .await
            .unwrap();
        assert!(principal.email.is_none());
    }

    #[tokio::test]
    async fn expired_token_is_rejected() {
        let verifier = JwtVerifier::new(SECRET);
        let expired = chrono::Utc::now().timestamp() - 3600;
        let result = verifier.verify(&token(SECRET, expired, Some("a@b.c"))).await;
        assert!(matches!(result, Err(IdentityError::Rejected)));
    }

    #[tokio::test]
    async fn wrong_secret_is_rejected() {
        let verifier = JwtVerifier::new(SECRET);
        let forged = token("another-secret-another-secret-another", in_one_hour(), Some("a@b.c"));
        let result = verifier.verify(&forged).await;
        assert!(matches!(result, Err(IdentityError::Rejected)));
    }

    #[tokio::test]
    async fn garbage_is_rejected() {
        let verifier = JwtVerifier::new(SECRET);
        assert!(matches!(
            verifier.verify("not-a-jwt").await,
            Err(IdentityError::Rejected)
        ));
    }
}
