//! Plan tier catalog.
//!
//! The paid tiers are a closed set. Each tier maps to an immutable
//! [`PlanConfig`] through an exhaustive `match`, so adding a tier without
//! pricing it is a compile error. The free tier never goes through checkout
//! and has no entry here.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ============================================================================
// Constants
// ============================================================================

/// Currency for every checkout line item.
pub const CURRENCY: &str = "brl";

/// Monthly request quota for users without a paid subscription.
pub const FREE_TIER_REQUEST_QUOTA: u64 = 100;

/// Basic plan monthly price in centavos (R$ 19,90).
const BASIC_PRICE_CENTS: i64 = 1990;

/// Premium plan monthly price in centavos (R$ 59,90).
const PREMIUM_PRICE_CENTS: i64 = 5990;

/// Unlimited plan monthly price in centavos (R$ 199,90).
const UNLIMITED_PRICE_CENTS: i64 = 19990;

/// Error returned when a plan name does not match any tier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlanError {
    /// No plan name was supplied.
    #[error("Plan not specified")]
    Missing,

    /// The plan name is not one of the configured tiers.
    #[error("Invalid plan: {0}")]
    Invalid(String),
}

/// Billing interval of a recurring price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillingInterval {
    /// Billed once a month.
    Month,
}

impl BillingInterval {
    /// Wire name used by the billing provider.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Month => "month",
        }
    }
}

/// Static pricing record for a paid tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanConfig {
    /// Catalog product identifier at the billing provider.
    pub product_id: &'static str,
    /// Monthly price in minor currency units.
    pub amount_cents: i64,
    /// Display name shown on the hosted checkout page.
    pub name: &'static str,
    /// Billing interval.
    pub interval: BillingInterval,
}

/// A paid subscription tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanTier {
    /// Entry paid tier.
    Basic,
    /// Mid tier.
    Premium,
    /// Unbounded requests.
    Unlimited,
}

impl PlanTier {
    /// All paid tiers, cheapest first.
    pub const ALL: [Self; 3] = [Self::Basic, Self::Premium, Self::Unlimited];

    /// Pricing for this tier.
    #[must_use]
    pub const fn config(self) -> PlanConfig {
        match self {
            Self::Basic => PlanConfig {
                product_id: "prod_Sy88pA9yIGooWC",
                amount_cents: BASIC_PRICE_CENTS,
                name: "Plano Basic",
                interval: BillingInterval::Month,
            },
            Self::Premium => PlanConfig {
                product_id: "prod_Sy8J8PQlrEDIsV",
                amount_cents: PREMIUM_PRICE_CENTS,
                name: "Plano Premium",
                interval: BillingInterval::Month,
            },
            Self::Unlimited => PlanConfig {
                product_id: "prod_Sy8PYSqgBRIirG",
                amount_cents: UNLIMITED_PRICE_CENTS,
                name: "Plano Unlimited",
                interval: BillingInterval::Month,
            },
        }
    }

    /// Lowercase key accepted in checkout requests.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Premium => "premium",
            Self::Unlimited => "unlimited",
        }
    }

    /// Tier label reported in subscription status.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Basic => "Basic",
            Self::Premium => "Premium",
            Self::Unlimited => "Unlimited",
        }
    }

    /// Monthly request quota, `None` when unbounded.
    #[must_use]
    pub const fn request_quota(self) -> Option<u64> {
        match self {
            Self::Basic => Some(1_000),
            Self::Premium => Some(10_000),
            Self::Unlimited => None,
        }
    }

    /// Resolve the tier a subscription was sold at from its unit amount.
    ///
    /// Exact catalog prices map directly. Anything else (promotions, old
    /// prices) falls into the highest tier whose price it reaches, and
    /// amounts below Premium are treated as Basic.
    #[must_use]
    pub fn from_amount(amount_cents: i64) -> Self {
        if let Some(tier) = Self::ALL
            .into_iter()
            .find(|t| t.config().amount_cents == amount_cents)
        {
            return tier;
        }

        if amount_cents >= UNLIMITED_PRICE_CENTS {
            Self::Unlimited
        } else if amount_cents >= PREMIUM_PRICE_CENTS {
            Self::Premium
        } else {
            Self::Basic
        }
    }

    /// Parse an optional plan name as sent in a request body.
    ///
    /// Empty or absent names are [`PlanError::Missing`].
    pub fn from_request(plan: Option<&str>) -> Result<Self, PlanError> {
        match plan {
            None | Some("") => Err(PlanError::Missing),
            Some(name) => name.parse(),
        }
    }
}

impl FromStr for PlanTier {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "basic" => Ok(Self::Basic),
            "premium" => Ok(Self::Premium),
            "unlimited" => Ok(Self::Unlimited),
            _ => Err(PlanError::Invalid(s.to_string())),
        }
    }
}

impl fmt::Display for PlanTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("PREMIUM".parse::<PlanTier>(), Ok(PlanTier::Premium));
        assert_eq!("Basic".parse::<PlanTier>(), Ok(PlanTier::Basic));
        assert_eq!("unlimited".parse::<PlanTier>(), Ok(PlanTier::Unlimited));
    }

    #[test]
    fn unknown_plan_echoes_input() {
        let err = "Gold".parse::<PlanTier>().unwrap_err();
        assert_eq!(err, PlanError::Invalid("Gold".into()));
        assert_eq!(err.to_string(), "Invalid plan: Gold");
    }

    #[test]
    fn free_is_not_a_checkout_tier() {
        assert!("free".parse::<PlanTier>().is_err());
    }

    #[test]
    fn missing_plan() {
        assert_eq!(PlanTier::from_request(None), Err(PlanError::Missing));
        assert_eq!(PlanTier::from_request(Some("")), Err(PlanError::Missing));
        assert_eq!(PlanError::Missing.to_string(), "Plan not specified");
    }

    #[test]
    fn catalog_prices() {
        assert_eq!(PlanTier::Basic.config().amount_cents, 1990);
        assert_eq!(PlanTier::Premium.config().amount_cents, 5990);
        assert_eq!(PlanTier::Unlimited.config().amount_cents, 19990);
        for tier in PlanTier::ALL {
            assert_eq!(tier.config().interval, BillingInterval::Month);
            assert!(tier.config().product_id.starts_with("prod_"));
        }
    }

    #[test]
    fn tier_from_amount() {
        assert_eq!(PlanTier::from_amount(1990), PlanTier::Basic);
        assert_eq!(PlanTier::from_amount(5990), PlanTier::Premium);
        assert_eq!(PlanTier::from_amount(19990), PlanTier::Unlimited);
        assert_eq!(PlanTier::from_amount(9990), PlanTier::Premium);
        assert_eq!(PlanTier::from_amount(500), PlanTier::Basic);
        assert_eq!(PlanTier::from_amount(25_000), PlanTier::Unlimited);
    }

    #[test]
    fn keys_round_trip_through_parse() {
        for tier in PlanTier::ALL {
            assert_eq!(tier.key().parse::<PlanTier>(), Ok(tier));
        }
    }
}
