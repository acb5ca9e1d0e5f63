//! Stripe API client implementation.

use std::time::Duration;

use agentpay_core::CURRENCY;
use reqwest::Client;

use super::types::{
    CheckoutSession, Customer, PortalSession, StripeErrorResponse, StripeList, Subscription,
};
use crate::billing::SubscriptionCheckout;

/// Stripe API version the request shapes are written against.
const STRIPE_API_VERSION: &str = "2023-10-16";

/// Error type for Stripe operations.
#[derive(Debug, thiserror::Error)]
pub enum StripeError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Stripe API returned an error.
    #[error("{message}")]
    Api {
        /// Error type.
        error_type: String,
        /// Error message.
        message: String,
        /// Error code.
        code: Option<String>,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Stripe API client.
#[derive(Debug, Clone)]
pub struct StripeClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl StripeClient {
    /// Create a new Stripe client against the public API.
    ///
    /// # Arguments
    ///
    /// * `api_key` - Stripe secret API key (`sk_test_...` or `sk_live_...`)
    pub fn new(api_key: impl Into<String>) -> Result<Self, StripeError> {
        Self::with_base_url(api_key, crate::config::DEFAULT_STRIPE_API_BASE)
    }

    /// Create a Stripe client against a custom base URL (mocks, proxies).
    pub fn with_base_url(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, StripeError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(StripeError::Configuration("API key is empty".into()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Find the first customer whose email matches exactly.
    ///
    /// Stripe may hold several customers with one email; only the first
    /// returned is considered.
    pub async fn find_customer_by_email(
        &self,
        email: &str,
    ) -> Result<Option<Customer>, StripeError> {
        let response = self
            .client
            .get(format!("{}/customers", self.base_url))
            .basic_auth(&self.api_key, Option::<&str>::None)
            .header("Stripe-Version", STRIPE_API_VERSION)
            .query(&[("email", email), ("limit", "1")])
            .send()
            .await?;

        let customers: StripeList<Customer> = self.handle_response(response).await?;
        Ok(customers.data.into_iter().next())
    }

    /// Create a Checkout session for a monthly plan subscription.
    pub async fn create_subscription_checkout(
        &self,
        checkout: &SubscriptionCheckout,
    ) -> Result<CheckoutSession, StripeError> {
        let params = checkout_form(checkout);

        tracing::debug!(
            plan = %checkout.tier,
            customer = ?checkout.customer.customer_id(),
            "Creating Stripe checkout session"
        );

        let response = self
            .client
            .post(format!("{}/checkout/sessions", self.base_url))
            .basic_auth(&self.api_key, Option::<&str>::None)
            .header("Stripe-Version", STRIPE_API_VERSION)
            .form(&params)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Create a billing portal session for an existing customer.
    pub async fn create_portal_session(
        &self,
        customer_id: &str,
        return_url: &str,
    ) -> Result<PortalSession, StripeError> {
        let response = self
            .client
            .post(format!("{}/billing_portal/sessions", self.base_url))
            .basic_auth(&self.api_key, Option::<&str>::None)
            .header("Stripe-Version", STRIPE_API_VERSION)
            .form(&[("customer", customer_id), ("return_url", return_url)])
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Get the first active subscription of a customer.
    pub async fn find_active_subscription(
        &self,
        customer_id: &str,
    ) -> Result<Option<Subscription>, StripeError> {
        let response = self
            .client
            .get(format!("{}/subscriptions", self.base_url))
            .basic_auth(&self.api_key, Option::<&str>::None)
            .header("Stripe-Version", STRIPE_API_VERSION)
            .query(&[
                ("customer", customer_id),
                ("status", "active"),
                ("limit", "1"),
            ])
            .send()
            .await?;

        let subscriptions: StripeList<Subscription> = self.handle_response(response).await?;
        Ok(subscriptions.data.into_iter().next())
    }

    /// Handle API response and convert errors.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, StripeError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response.json().await?);
        }

        let error_body: Result<StripeErrorResponse, _> = response.json().await;

        match error_body {
            Ok(stripe_error) => Err(StripeError::Api {
                error_type: stripe_error.error.error_type,
                message: stripe_error.error.message,
                code: stripe_error.error.code,
            }),
            Err(_) => Err(StripeError::Api {
                error_type: "unknown".to_string(),
                message: format!("HTTP {status}"),
                code: None,
            }),
        }
    }
}

/// Form parameters for a subscription Checkout session.
///
/// The line item is priced ad hoc from the plan's catalog product, so no
/// Stripe `Price` objects need to exist beforehand.
fn checkout_form(checkout: &SubscriptionCheckout) -> Vec<(&'static str, String)> {
    let plan = checkout.tier.config();

    let mut params = vec![
        ("mode", "subscription".to_string()),
        ("line_items[0][price_data][currency]", CURRENCY.to_string()),
        ("line_items[0][price_data][product]", plan.product_id.to_string()),
        (
            "line_items[0][price_data][unit_amount]",
            plan.amount_cents.to_string(),
        ),
        (
            "line_items[0][price_data][recurring][interval]",
            plan.interval.as_str().to_string(),
        ),
        ("line_items[0][quantity]", "1".to_string()),
        ("success_url", checkout.success_url.clone()),
        ("cancel_url", checkout.cancel_url.clone()),
    ];

    if let Some(customer_id) = checkout.customer.customer_id() {
        params.push(("customer", customer_id.to_string()));
    }
    if let Some(email) = checkout.customer.customer_email() {
        params.push(("customer_email", email.to_string()));
    }

    params
}
