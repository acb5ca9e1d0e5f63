//! Core types and utilities for agentpay.
//!
//! This crate provides the foundational types shared by the agentpay service:
//!
//! - **Plans**: `PlanTier`, `PlanConfig`, `BillingInterval`
//! - **Identity**: `UserId`, `Principal`, `VerifiedPrincipal`
//! - **Billing**: `CustomerRef`, `SubscriptionStatus`
//! - **Flow**: `CheckoutStep`
//! - **Errors**: `CheckoutError`
//!
//! # Amounts
//!
//! All prices are stored as `i64` minor currency units (centavos for BRL):
//! `5990` is R$ 59,90.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod customer;
pub mod error;
pub mod ids;
pub mod plan;
pub mod principal;
pub mod step;
pub mod subscription;

pub use customer::CustomerRef;
pub use error::{CheckoutError, Result};
pub use ids::{IdError, UserId};
pub use plan::{
    BillingInterval, PlanConfig, PlanError, PlanTier, CURRENCY, FREE_TIER_REQUEST_QUOTA,
};
pub use principal::{Principal, VerifiedPrincipal};
pub use step::CheckoutStep;
pub use subscription::SubscriptionStatus;
