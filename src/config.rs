use std::env;

/// Process-wide configuration, read once at startup and never mutated.
#[derive(Clone)]
pub struct Config {
    pub env_mode: String,
    pub site_base_url: String,
    pub auth_domain: String,
    pub auth_client_id: String,
    pub auth_client_secret: String,
    pub auth_callback_url: String,
    pub stripe_secret_key: Option<String>,
    pub stripe_publishable_key: Option<String>,
    pub stripe_webhook_secret: Option<String>,
}

impl Config {
    /// Missing identity-provider or JWT configuration is a fatal startup
    /// error; payment keys are optional so the site can run without the
    /// donation flow enabled.
    pub fn from_env() -> Self {
        env::var("JWT_SECRET").expect("JWT_SECRET must be set");

        Self {
            env_mode: env::var("RUST_ENV").unwrap_or_else(|_| "development".to_string()),
            site_base_url: env::var("SITE_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:8080".to_string()),
            auth_domain: env::var("AUTH_DOMAIN").expect("AUTH_DOMAIN must be set"),
            auth_client_id: env::var("AUTH_CLIENT_ID").expect("AUTH_CLIENT_ID must be set"),
            auth_client_secret: env::var("AUTH_CLIENT_SECRET")
                .expect("AUTH_CLIENT_SECRET must be set"),
            auth_callback_url: env::var("AUTH_CALLBACK_URL")
                .expect("AUTH_CALLBACK_URL must be set"),
            stripe_secret_key: env::var("STRIPE_SECRET_KEY").ok(),
            stripe_publishable_key: env::var("STRIPE_PUBLISHABLE_KEY").ok(),
            stripe_webhook_secret: env::var("STRIPE_WEBHOOK_SECRET").ok(),
        }
    }
}
