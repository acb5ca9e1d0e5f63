//! Authenticated principals.

use serde::{Deserialize, Serialize};

use crate::error::CheckoutError;
use crate::ids::UserId;

/// A user as resolved by the identity provider.
///
/// Some identity records carry no email (phone sign-ups, unverified
/// accounts). Billing is keyed by email, so such principals cannot check
/// out; see [`Principal::require_email`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// Identity provider user ID.
    pub id: UserId,
    /// Email address, if the identity record has one.
    #[serde(default)]
    pub email: Option<String>,
}

impl Principal {
    /// Require a non-empty email, producing a [`VerifiedPrincipal`].
    pub fn require_email(self) -> Result<VerifiedPrincipal, CheckoutError> {
        match self.email {
            Some(email) if !email.trim().is_empty() => Ok(VerifiedPrincipal { id: self.id, email }),
            _ => Err(CheckoutError::not_authenticated()),
        }
    }
}

/// A principal with a guaranteed email address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedPrincipal {
    /// Identity provider user ID.
    pub id: UserId,
    /// Email address used to key the billing customer.
    pub email: String,
}
