//! Error types for agentpay.
//!
//! The `Display` text of each variant is the message returned to the caller
//! in the `{"error": ...}` envelope, so keep it human-readable.

/// Result type for agentpay operations.
pub type Result<T> = std::result::Result<T, CheckoutError>;

/// Errors that can occur while serving a billing request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CheckoutError {
    /// A required secret or setting is missing. Not user-actionable.
    #[error("{0}")]
    Configuration(String),

    /// Missing or invalid credential, or a principal without email.
    #[error("{0}")]
    AuthenticationRequired(String),

    /// The request body is missing, malformed, or names an unknown plan.
    #[error("{0}")]
    Validation(String),

    /// The identity or billing provider call failed.
    #[error("{message}")]
    UpstreamProvider {
        /// The provider that failed ("identity" or "billing").
        provider: String,
        /// Error message, forwarded from the provider where safe.
        message: String,
    },
}

impl CheckoutError {
    /// Missing billing secret.
    #[must_use]
    pub fn missing_billing_secret() -> Self {
        Self::Configuration("STRIPE_SECRET_KEY is not set".into())
    }

    /// Missing public API key for token introspection.
    #[must_use]
    pub fn missing_identity_key() -> Self {
        Self::Configuration("SUPABASE_ANON_KEY is not set".into())
    }

    /// The request did not finish within the configured deadline.
    #[must_use]
    pub fn timed_out() -> Self {
        Self::upstream("service", "Request timed out")
    }

    /// No `Authorization` header on the request.
    #[must_use]
    pub fn missing_authorization() -> Self {
        Self::AuthenticationRequired("No authorization header provided".into())
    }

    /// The credential was rejected or the principal has no email.
    #[must_use]
    pub fn not_authenticated() -> Self {
        Self::AuthenticationRequired("User not authenticated or email not available".into())
    }

    /// Build an upstream error for the named provider.
    pub fn upstream(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::UpstreamProvider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Short machine-friendly name of the error kind, used in logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "configuration",
            Self::AuthenticationRequired(_) => "authentication_required",
            Self::Validation(_) => "validation",
            Self::UpstreamProvider { .. } => "upstream_provider",
        }
    }
}

impl From<crate::plan::PlanError> for CheckoutError {
    fn from(err: crate::plan::PlanError) -> Self {
        Self::Validation(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_the_bare_message() {
        assert_eq!(
            CheckoutError::missing_authorization().to_string(),
            "No authorization header provided"
        );
        assert_eq!(
            CheckoutError::upstream("billing", "card_declined").to_string(),
            "card_declined"
        );
    }

    #[test]
    fn configuration_messages_name_the_variable() {
        assert_eq!(
            CheckoutError::missing_billing_secret().to_string(),
            "STRIPE_SECRET_KEY is not set"
        );
        assert_eq!(
            CheckoutError::missing_identity_key().kind(),
            "configuration"
        );
        assert_eq!(
            CheckoutError::missing_identity_key().to_string(),
            "SUPABASE_ANON_KEY is not set"
        );
    }
}
