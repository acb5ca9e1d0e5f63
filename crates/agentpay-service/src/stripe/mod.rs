//! Stripe integration for subscription checkout.
//!
//! Stripe handles:
//! - Customer lookup by email
//! - Subscription purchases via Checkout
//! - Subscription management via the billing portal

pub mod client;
pub mod types;

pub use client::StripeClient;
pub use client::StripeError;
pub use types::*;
