//! Subscription status as reported to the dashboard.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::plan::{PlanTier, FREE_TIER_REQUEST_QUOTA};

/// Current subscription state of a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionStatus {
    /// Whether the user has an active paid subscription.
    pub subscribed: bool,
    /// Tier label ("Basic", "Premium", "Unlimited"), if subscribed.
    pub subscription_tier: Option<String>,
    /// End of the current billing period, if subscribed.
    pub subscription_end: Option<DateTime<Utc>>,
    /// Monthly request quota, `None` when unbounded.
    pub request_quota: Option<u64>,
}

impl SubscriptionStatus {
    /// A user on the free tier.
    #[must_use]
    pub fn unsubscribed() -> Self {
        Self {
            subscribed: false,
            subscription_tier: None,
            subscription_end: None,
            request_quota: Some(FREE_TIER_REQUEST_QUOTA),
        }
    }

    /// An active subscription at `tier` renewing at `period_end` (Unix seconds).
    #[must_use]
    pub fn active(tier: PlanTier, period_end: i64) -> Self {
        Self {
            subscribed: true,
            subscription_tier: Some(tier.label().to_string()),
            subscription_end: DateTime::from_timestamp(period_end, 0),
            request_quota: tier.request_quota(),
        }
    }
}
