//! Service configuration.

use serde::Deserialize;
use std::path::Path;

/// Default Stripe REST API base URL.
pub const DEFAULT_STRIPE_API_BASE: &str = "https://api.stripe.com/v1";

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Address to listen on (default: "0.0.0.0:8080").
    pub listen_addr: String,

    /// Stripe secret API key. Requests fail with a configuration error
    /// while this is unset.
    pub stripe_secret_key: Option<String>,

    /// Stripe API base URL (default: `<https://api.stripe.com/v1>`).
    pub stripe_api_base: String,

    /// Identity provider project URL, e.g. `<https://xyz.supabase.co>`.
    pub supabase_url: String,

    /// Public (anon) API key sent with identity introspection calls.
    pub supabase_anon_key: Option<String>,

    /// JWT signing secret. When set, bearer tokens are verified locally
    /// instead of through the introspection endpoint.
    pub supabase_jwt_secret: Option<String>,

    /// Public site URL, used for redirects when the request has no `Origin`.
    pub site_url: String,

    /// CORS allowed origins.
    pub cors_origins: Vec<String>,

    /// Maximum request body size in bytes.
    pub max_body_bytes: usize,

    /// Request timeout in seconds.
    pub request_timeout_seconds: u64,
}

/// Stripe secrets file structure.
#[derive(Debug, Deserialize)]
struct StripeSecrets {
    secret_key: String,
    #[serde(default)]
    api_base: Option<String>,
}

impl ServiceConfig {
    /// Load configuration from environment variables and secrets files.
    #[must_use]
    pub fn from_env() -> Self {
        let (stripe_secret_key, stripe_api_base) = load_stripe_secrets();

        Self {
            listen_addr: std::env::var("LISTEN_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".into()),
            stripe_secret_key,
            stripe_api_base: stripe_api_base.unwrap_or_else(|| DEFAULT_STRIPE_API_BASE.into()),
            supabase_url: std::env::var("SUPABASE_URL")
                .unwrap_or_else(|_| "http://localhost:54321".into()),
            supabase_anon_key: non_empty_var("SUPABASE_ANON_KEY"),
            supabase_jwt_secret: non_empty_var("SUPABASE_JWT_SECRET"),
            site_url: std::env::var("SITE_URL").unwrap_or_else(|_| "http://localhost:5173".into()),
            cors_origins: std::env::var("CORS_ORIGINS")
                .unwrap_or_else(|_| "*".into())
                .split(',')
                .map(|s| s.trim().to_string())
                .collect(),
            max_body_bytes: std::env::var("MAX_BODY_BYTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(64 * 1024), // 64KB
            request_timeout_seconds: std::env::var("REQUEST_TIMEOUT_SECONDS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
        }
    }

    /// Whether bearer tokens are verified locally with the JWT secret.
    #[must_use]
    pub fn verifies_tokens_locally(&self) -> bool {
        self.supabase_jwt_secret.is_some()
    }
}

/// Read an environment variable, treating empty values as unset.
fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Load Stripe secrets from file or environment.
fn load_stripe_secrets() -> (Option<String>, Option<String>) {
    let secret_paths = [".secrets/stripe.json", "../.secrets/stripe.json"];

    for path in &secret_paths {
        if let Ok(secrets) = load_secrets_file::<StripeSecrets>(path) {
            tracing::info!(path = %path, "Loaded Stripe secrets from file");
            return (Some(secrets.secret_key), secrets.api_base);
        }
    }

    tracing::debug!("Stripe secrets file not found, using environment variables");
    (
        non_empty_var("STRIPE_SECRET_KEY"),
        non_empty_var("STRIPE_API_BASE"),
    )
}

/// Load secrets from a JSON file.
fn load_secrets_file<T: serde::de::DeserializeOwned>(path: &str) -> Result<T, std::io::Error> {
    let path = Path::new(path);
    if !path.exists() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Secrets file not found",
        ));
    }
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".into(),
            stripe_secret_key: None,
            stripe_api_base: DEFAULT_STRIPE_API_BASE.into(),
            supabase_url: "http://localhost:54321".into(),
            supabase_anon_key: None,
            supabase_jwt_secret: None,
            site_url: "http://localhost:5173".into(),
            cors_origins: vec!["*".into()],
            max_body_bytes: 64 * 1024,
            request_timeout_seconds: 30,
        }
    }
}
