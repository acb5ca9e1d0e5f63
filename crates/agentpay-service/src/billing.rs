//! Billing provider abstraction.
//!
//! Handlers talk to the payment provider only through [`BillingProvider`],
//! so tests can substitute a double for Stripe.

use agentpay_core::{CheckoutError, CustomerRef, PlanTier};
use async_trait::async_trait;

use crate::stripe::{StripeClient, StripeError, Subscription};

/// Name used for billing failures in logs and upstream errors.
pub const BILLING_PROVIDER: &str = "billing";

/// Everything needed to open a subscription Checkout session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionCheckout {
    /// Who pays.
    pub customer: CustomerRef,
    /// Which tier is purchased.
    pub tier: PlanTier,
    /// Redirect after a completed payment.
    pub success_url: String,
    /// Redirect after the user abandons the page.
    pub cancel_url: String,
}

/// Payment provider operations used by the service.
#[async_trait]
pub trait BillingProvider: Send + Sync {
    /// ID of the first customer registered with `email`, if any.
    async fn find_customer_id(&self, email: &str) -> Result<Option<String>, CheckoutError>;

    /// Create a hosted Checkout session and return its redirect URL.
    async fn create_checkout_session(
        &self,
        checkout: &SubscriptionCheckout,
    ) -> Result<String, CheckoutError>;

    /// Create a billing portal session and return its redirect URL.
    async fn create_portal_session(
        &self,
        customer_id: &str,
        return_url: &str,
    ) -> Result<String, CheckoutError>;

    /// The customer's first active subscription, if any.
    async fn active_subscription(
        &self,
        customer_id: &str,
    ) -> Result<Option<Subscription>, CheckoutError>;
}

impl From<StripeError> for CheckoutError {
    fn from(err: StripeError) -> Self {
        match err {
            StripeError::Configuration(msg) => Self::Configuration(msg),
            other => Self::upstream(BILLING_PROVIDER, other.to_string()),
        }
    }
}

#[async_trait]
impl BillingProvider for StripeClient {
    async fn find_customer_id(&self, email: &str) -> Result<Option<String>, CheckoutError> {
        let customer = self.find_customer_by_email(email).await?;
        Ok(customer.map(|c| c.id))
    }

    async fn create_checkout_session(
        &self,
        checkout: &SubscriptionCheckout,
    ) -> Result<String, CheckoutError> {
        let session = self.create_subscription_checkout(checkout).await?;

        tracing::info!(session_id = %session.id, "Checkout session created");

        session.url.ok_or_else(|| {
            CheckoutError::upstream(BILLING_PROVIDER, "Checkout session has no URL")
        })
    }

    async fn create_portal_session(
        &self,
        customer_id: &str,
        return_url: &str,
    ) -> Result<String, CheckoutError> {
        let session = StripeClient::create_portal_session(self, customer_id, return_url).await?;

        tracing::info!(session_id = %session.id, "Portal session created");

        Ok(session.url)
    }

    async fn active_subscription(
        &self,
        customer_id: &str,
    ) -> Result<Option<Subscription>, CheckoutError> {
        Ok(self.find_active_subscription(customer_id).await?)
    }
}
