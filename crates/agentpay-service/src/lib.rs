//! Agentpay HTTP API Service.
//!
//! This crate provides the HTTP functions the agentpay website invokes:
//!
//! - Plan checkout (`POST /create-checkout`)
//! - Billing portal (`POST /customer-portal`)
//! - Subscription status (`POST /check-subscription`)
//!
//! # Authentication
//!
//! Every billing endpoint takes the identity provider's access token as
//! `Authorization: Bearer <token>`. Tokens are verified either through the
//! provider's introspection endpoint or locally with the project's JWT
//! secret.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Allow some pedantic lints that are noisy for Axum handler functions
#![allow(clippy::missing_errors_doc)] // Axum handlers all return Result

pub mod billing;
pub mod config;
pub mod error;
pub mod handlers;
pub mod identity;
pub mod redirect;
pub mod routes;
pub mod service;
pub mod state;
pub mod stripe;

pub use billing::{BillingProvider, SubscriptionCheckout};
pub use config::ServiceConfig;
pub use error::ApiError;
pub use identity::{IdentityError, IdentityProvider, JwtVerifier, SupabaseAuthClient};
pub use routes::create_router;
pub use service::BillingService;
pub use state::{AppState, StateError};
pub use stripe::{StripeClient, StripeError};
