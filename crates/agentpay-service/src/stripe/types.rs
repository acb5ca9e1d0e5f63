//! Stripe API types.

use serde::Deserialize;

/// Stripe customer object (only the fields we read).
#[derive(Debug, Clone, Deserialize)]
pub struct Customer {
    /// Stripe customer ID.
    pub id: String,
}

/// Stripe Checkout session object.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutSession {
    /// Session ID.
    pub id: String,
    /// Checkout URL to redirect the user to.
    #[serde(default)]
    pub url: Option<String>,
}

/// Stripe billing portal session object.
#[derive(Debug, Clone, Deserialize)]
pub struct PortalSession {
    /// Session ID.
    pub id: String,
    /// Portal URL to redirect the user to.
    pub url: String,
}

/// Stripe subscription object.
#[derive(Debug, Clone, Deserialize)]
pub struct Subscription {
    /// Subscription ID.
    pub id: String,
    /// End of the current billing period (Unix).
    #[serde(default)]
    pub current_period_end: i64,
    /// Subscription line items.
    pub items: StripeList<SubscriptionItem>,
}

impl Subscription {
    /// Unit amount of the first line item's price, if present.
    #[must_use]
    pub fn first_unit_amount(&self) -> Option<i64> {
        self.items.data.first().and_then(|item| item.price.unit_amount)
    }
}

/// A line item of a subscription.
#[derive(Debug, Clone, Deserialize)]
pub struct SubscriptionItem {
    /// Price the item is billed at.
    pub price: Price,
}

/// Stripe price object.
#[derive(Debug, Clone, Deserialize)]
pub struct Price {
    /// Unit amount in minor units. Absent for tiered prices.
    #[serde(default)]
    pub unit_amount: Option<i64>,
}

/// Stripe list response wrapper. Only the first page is ever read.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeList<T> {
    /// Data items.
    pub data: Vec<T>,
}

/// Stripe API error response.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeErrorResponse {
    /// Error details.
    pub error: StripeErrorDetail,
}

/// Stripe error detail.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeErrorDetail {
    /// Error type.
    #[serde(rename = "type")]
    pub error_type: String,
    /// Error message.
    #[serde(default)]
    pub message: String,
    /// Error code.
    #[serde(default)]
    pub code: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscription_first_unit_amount() {
        let sub: Subscription = serde_json::from_value(serde_json::json!({
            "id": "sub_1",
            "status": "active",
            "customer": "cus_1",
            "current_period_end": 1_700_000_000,
            "items": {
                "object": "list",
                "data": [{ "id": "si_1", "price": { "id": "price_1", "unit_amount": 5990 } }],
                "has_more": false
            }
        }))
        .unwrap();
        assert_eq!(sub.first_unit_amount(), Some(5990));
    }

    #[test]
    fn error_response_parses() {
        let err: StripeErrorResponse = serde_json::from_value(serde_json::json!({
            "error": {
                "type": "invalid_request_error",
                "message": "No such customer",
                "param": "customer"
            }
        }))
        .unwrap();
        assert_eq!(err.error.error_type, "invalid_request_error");
        assert_eq!(err.error.message, "No such customer");
        assert!(err.error.code.is_none());
    }
}
