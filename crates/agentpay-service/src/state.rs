//! Application state.

use std::sync::Arc;

use url::Url;

use crate::billing::BillingProvider;
use crate::config::ServiceConfig;
use crate::identity::{IdentityError, IdentityProvider, JwtVerifier, SupabaseAuthClient};
use crate::service::BillingService;
use crate::stripe::StripeClient;

/// Error building application state at startup.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    /// The identity client could not be built.
    #[error("identity provider setup failed: {0}")]
    Identity(#[from] IdentityError),

    /// `SITE_URL` is not an absolute URL.
    #[error("invalid SITE_URL: {0}")]
    SiteUrl(#[from] url::ParseError),
}

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Service configuration.
    pub config: ServiceConfig,

    /// Billing operations with their provider clients.
    pub billing: BillingService,

    /// Parsed `SITE_URL`, the redirect base when a request has no `Origin`.
    pub site_url: Url,
}

impl AppState {
    /// Create application state, building provider clients from `config`.
    pub fn new(config: ServiceConfig) -> Result<Self, StateError> {
        let identity = identity_provider(&config)?;

        let stripe = config.stripe_secret_key.as_ref().and_then(|key| {
            match StripeClient::with_base_url(key, &config.stripe_api_base) {
                Ok(client) => {
                    tracing::info!(
                        api_base = %config.stripe_api_base,
                        "Stripe integration enabled"
                    );
                    Some(Arc::new(client) as Arc<dyn BillingProvider>)
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to create Stripe client");
                    None
                }
            }
        });

        if stripe.is_none() {
            tracing::warn!("Stripe not configured - billing requests will fail");
        }

        Self::with_providers(config, identity, stripe).map_err(StateError::from)
    }

    /// Create application state with explicit provider clients.
    pub fn with_providers(
        config: ServiceConfig,
        identity: Option<Arc<dyn IdentityProvider>>,
        billing: Option<Arc<dyn BillingProvider>>,
    ) -> Result<Self, url::ParseError> {
        let site_url = Url::parse(&config.site_url)?;

        Ok(Self {
            config,
            billing: BillingService::new(identity, billing),
            site_url,
        })
    }

    /// Check if Stripe is configured.
    #[must_use]
    pub fn has_stripe(&self) -> bool {
        self.billing.has_billing()
    }
}

/// Local JWT verification when the secret is set, otherwise introspection,
/// which needs the public API key.
fn identity_provider(
    config: &ServiceConfig,
) -> Result<Option<Arc<dyn IdentityProvider>>, IdentityError> {
    if let Some(secret) = &config.supabase_jwt_secret {
        tracing::info!("Verifying bearer tokens locally with the JWT secret");
        let verifier: Arc<dyn IdentityProvider> = Arc::new(JwtVerifier::new(secret));
        return Ok(Some(verifier));
    }

    let Some(anon_key) = &config.supabase_anon_key else {
        tracing::warn!("SUPABASE_ANON_KEY not set - billing requests will fail");
        return Ok(None);
    };

    tracing::info!(url = %config.supabase_url, "Verifying bearer tokens via introspection");
    let client: Arc<dyn IdentityProvider> = Arc::new(SupabaseAuthClient::new(
        &config.supabase_url,
        anon_key.as_str(),
    )?);
    Ok(Some(client))
}
