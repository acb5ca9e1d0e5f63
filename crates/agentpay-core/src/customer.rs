//! Billing customer references.

/// How a checkout session identifies its payer.
///
/// The billing provider accepts either an existing customer ID or an email
/// from which it provisions a new customer, never both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CustomerRef {
    /// An existing billing customer found by email lookup.
    Existing(String),
    /// No customer yet; the provider creates one from this email.
    NewFromEmail(String),
}

impl CustomerRef {
    /// Build from the result of a customer lookup.
    #[must_use]
    pub fn resolve(existing_id: Option<String>, email: &str) -> Self {
        existing_id.map_or_else(|| Self::NewFromEmail(email.to_string()), Self::Existing)
    }

    /// The existing customer ID, if any.
    #[must_use]
    pub fn customer_id(&self) -> Option<&str> {
        match self {
            Self::Existing(id) => Some(id),
            Self::NewFromEmail(_) => None,
        }
    }

    /// The email to provision a customer from, if no customer exists.
    #[must_use]
    pub fn customer_email(&self) -> Option<&str> {
        match self {
            Self::Existing(_) => None,
            Self::NewFromEmail(email) => Some(email),
        }
    }
}
