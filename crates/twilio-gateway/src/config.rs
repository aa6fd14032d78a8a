//! Configuration types for twilio-gateway.

use std::env;

use crate::error::GatewayError;

/// Default Twilio REST API base URL.
pub const DEFAULT_API_URL: &str = "https://api.twilio.com";

/// Credentials and sender number for the Twilio API.
#[derive(Clone)]
pub struct GatewayConfig {
    /// Account SID, also the basic-auth user name.
    pub account_sid: String,
    /// Auth token, the basic-auth password.
    pub auth_token: String,
    /// The relay's own number; every outbound message is sent from it.
    pub phone_number: String,
    /// Base URL of the REST API.
    pub api_url: String,
}

impl GatewayConfig {
    /// Create a configuration against the public Twilio API.
    pub fn new(
        account_sid: impl Into<String>,
        auth_token: impl Into<String>,
        phone_number: impl Into<String>,
    ) -> Self {
        Self {
            account_sid: account_sid.into(),
            auth_token: auth_token.into(),
            phone_number: phone_number.into(),
            api_url: DEFAULT_API_URL.to_string(),
        }
    }

    /// Point the client at a different API host.
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Create configuration from environment variables.
    ///
    /// Required: `TWILIO_ACCOUNT_SID`, `TWILIO_AUTH_TOKEN`, `TWILIO_PHONE_NUMBER`.
    /// Optional: `TWILIO_API_URL` (default: https://api.twilio.com).
    pub fn from_env() -> Result<Self, GatewayError> {
        let required = |name: &str| {
            env::var(name).map_err(|_| GatewayError::Config(format!("{} not set", name)))
        };

        let config = Self::new(
            required("TWILIO_ACCOUNT_SID")?,
            required("TWILIO_AUTH_TOKEN")?,
            required("TWILIO_PHONE_NUMBER")?,
        );

        Ok(match env::var("TWILIO_API_URL") {
            Ok(url) => config.with_api_url(url),
            Err(_) => config,
        })
    }

    /// Get the Messages resource URL for this account.
    pub fn messages_url(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.api_url.trim_end_matches('/'),
            self.account_sid
        )
    }
}

impl std::fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("account_sid", &self.account_sid)
            .field("auth_token", &"<redacted>")
            .field("phone_number", &self.phone_number)
            .field("api_url", &self.api_url)
            .finish()
    }
}
