//! Request orchestration for checkout, portal and subscription lookups.
//!
//! Every operation runs strictly sequentially: configuration check, token
//! verification, then one provider call at a time, each feeding the next.
//! Nothing is retried and nothing is cached across requests.
//!
//! Two concurrent first-time checkouts for the same email can both miss the
//! customer lookup and end up creating two billing customers. No lock or
//! idempotency key guards against this.

use std::sync::Arc;

use agentpay_core::{
    CheckoutError, CheckoutStep, CustomerRef, PlanTier, SubscriptionStatus, VerifiedPrincipal,
};
use serde::Deserialize;

use crate::billing::{BillingProvider, SubscriptionCheckout};
use crate::identity::IdentityProvider;
use crate::redirect::RedirectBase;

/// Body of `POST /create-checkout`.
#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    /// Requested tier name, case-insensitive.
    #[serde(default)]
    pub plan: Option<String>,
}

impl CheckoutRequest {
    /// Parse a raw request body.
    pub fn parse(body: &[u8]) -> Result<Self, CheckoutError> {
        serde_json::from_slice(body).map_err(Self::invalid_body)
    }

    /// Validation error for a body that could not be read or decoded.
    pub fn invalid_body(err: impl std::fmt::Display) -> CheckoutError {
        CheckoutError::Validation(format!("Invalid request body: {err}"))
    }
}

/// Billing operations with injected provider clients.
#[derive(Clone)]
pub struct BillingService {
    identity: Option<Arc<dyn IdentityProvider>>,
    billing: Option<Arc<dyn BillingProvider>>,
}

impl BillingService {
    /// Create a service. A provider is `None` when its secret is not
    /// configured; every operation then fails with a configuration error.
    #[must_use]
    pub fn new(
        identity: Option<Arc<dyn IdentityProvider>>,
        billing: Option<Arc<dyn BillingProvider>>,
    ) -> Self {
        Self { identity, billing }
    }

    /// Whether a billing provider is configured.
    #[must_use]
    pub fn has_billing(&self) -> bool {
        self.billing.is_some()
    }

    /// Turn a bearer credential and a plan into a hosted Checkout URL.
    ///
    /// `body` is the raw request body, or the error met while reading it.
    /// Either way it is only looked at once the caller is authenticated.
    pub async fn create_checkout(
        &self,
        authorization: Option<&str>,
        body: Result<&[u8], CheckoutError>,
        redirect: &RedirectBase,
    ) -> Result<String, CheckoutError> {
        let mut step = CheckoutStep::Start;
        let result = self
            .run_checkout(&mut step, authorization, body, redirect)
            .await;

        if let Err(e) = &result {
            tracing::warn!(
                step = %step,
                next = %CheckoutStep::Failed,
                kind = e.kind(),
                error = %e,
                "Checkout failed"
            );
        }
        result
    }

    async fn run_checkout(
        &self,
        step: &mut CheckoutStep,
        authorization: Option<&str>,
        body: Result<&[u8], CheckoutError>,
        redirect: &RedirectBase,
    ) -> Result<String, CheckoutError> {
        tracing::debug!(step = %step, "Checkout started");
        let billing = self.billing()?;
        let identity = self.identity()?;

        let principal = authenticate(identity, authorization).await?;
        *step = step.advance();
        tracing::info!(step = %step, user_id = %principal.id, "User authenticated");

        let request = CheckoutRequest::parse(body?)?;
        let tier = PlanTier::from_request(request.plan.as_deref())?;
        *step = step.advance();
        tracing::info!(
            step = %step,
            plan = %tier,
            amount_cents = tier.config().amount_cents,
            "Plan resolved"
        );

        let existing = billing.find_customer_id(&principal.email).await?;
        let customer = CustomerRef::resolve(existing, &principal.email);
        *step = step.advance();
        match customer.customer_id() {
            Some(id) => tracing::info!(step = %step, customer_id = %id, "Existing customer found"),
            None => tracing::info!(step = %step, "No customer yet, checkout will create one"),
        }

        let checkout = SubscriptionCheckout {
            customer,
            tier,
            success_url: redirect.checkout_success(),
            cancel_url: redirect.checkout_cancel(),
        };
        let url = billing.create_checkout_session(&checkout).await?;
        *step = step.advance();
        tracing::info!(step = %step, user_id = %principal.id, plan = %tier, "Checkout ready");

        Ok(url)
    }

    /// Open a billing portal session for the caller's existing customer.
    pub async fn open_portal(
        &self,
        authorization: Option<&str>,
        redirect: &RedirectBase,
    ) -> Result<String, CheckoutError> {
        let billing = self.billing()?;
        let principal = authenticate(self.identity()?, authorization).await?;

        let customer_id = billing
            .find_customer_id(&principal.email)
            .await?
            .ok_or_else(|| {
                CheckoutError::Validation("No Stripe customer found for this user".into())
            })?;

        tracing::info!(
            user_id = %principal.id,
            customer_id = %customer_id,
            "Opening billing portal"
        );

        billing
            .create_portal_session(&customer_id, &redirect.portal_return())
            .await
    }

    /// Report the caller's current subscription.
    pub async fn check_subscription(
        &self,
        authorization: Option<&str>,
    ) -> Result<SubscriptionStatus, CheckoutError> {
        let billing = self.billing()?;
        let principal = authenticate(self.identity()?, authorization).await?;

        let Some(customer_id) = billing.find_customer_id(&principal.email).await? else {
            tracing::debug!(user_id = %principal.id, "No customer, reporting free tier");
            return Ok(SubscriptionStatus::unsubscribed());
        };

        let Some(subscription) = billing.active_subscription(&customer_id).await? else {
            tracing::debug!(customer_id = %customer_id, "No active subscription");
            return Ok(SubscriptionStatus::unsubscribed());
        };

        let tier = subscription
            .first_unit_amount()
            .map_or(PlanTier::Basic, PlanTier::from_amount);

        tracing::info!(
            customer_id = %customer_id,
            subscription_id = %subscription.id,
            tier = %tier,
            "Active subscription found"
        );

        Ok(SubscriptionStatus::active(
            tier,
            subscription.current_period_end,
        ))
    }

    fn billing(&self) -> Result<&dyn BillingProvider, CheckoutError> {
        self.billing
            .as_deref()
            .ok_or_else(CheckoutError::missing_billing_secret)
    }

    fn identity(&self) -> Result<&dyn IdentityProvider, CheckoutError> {
        self.identity
            .as_deref()
            .ok_or_else(CheckoutError::missing_identity_key)
    }
}

/// Verify the `Authorization` header and require an email on the principal.
async fn authenticate(
    identity: &dyn IdentityProvider,
    authorization: Option<&str>,
) -> Result<VerifiedPrincipal, CheckoutError> {
    let header = authorization
        .map(str::trim)
        .filter(|h| !h.is_empty())
        .ok_or_else(CheckoutError::missing_authorization)?;

    let token = match header.strip_prefix("Bearer") {
        Some(rest) if rest.is_empty() || rest.starts_with(' ') => rest.trim(),
        _ => header,
    };
    if token.is_empty() {
        return Err(CheckoutError::not_authenticated());
    }

    let principal = identity.verify(token).await?;
    principal.require_email()
}
