//! Configuration management following 12-factor app principles
//!
//! All configuration is loaded from environment variables to ensure
//! clean separation between code and config.

use anyhow::Result;
use std::env;

use wicket_gate::GateConfig;

#[derive(Debug, Clone)]
pub struct Config {
    /// Gate configuration: route lists, sign-in URL, session provider
    pub gate: GateConfig,

    /// Runtime configuration
    pub rust_log: String,
    pub port: u16,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// The gate starts from the portal defaults (landing, sign-in and
    /// sign-up pages public; the webhook endpoint and health check
    /// ignored; mock sessions) and `WICKET_*` variables override them.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if it exists

        let gate = GateConfig::new()
            .with_public_routes(["/", "/signin", "/signup"])
            .with_ignored_routes(["/api/webhook", "/health"])
            .with_session_provider("mock")
            .apply_env()?;

        let config = Self {
            gate,
            rust_log: env::var("RUST_LOG").unwrap_or_else(|_| "wicket=debug".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .unwrap_or(3000),
        };

        Ok(config)
    }
}
