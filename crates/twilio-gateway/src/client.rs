//! Twilio REST API client.

use std::time::Duration;

use reqwest::Client;
use tracing::{debug, info, warn};

use crate::config::GatewayConfig;
use crate::error::GatewayError;
use crate::types::{ApiErrorBody, SendParams, SendResult};

/// Client for sending messages through Twilio.
#[derive(Clone)]
pub struct TwilioClient {
    http: Client,
    config: GatewayConfig,
}

impl TwilioClient {
    /// Create a client for the given account.
    pub fn new(config: GatewayConfig) -> Result<Self, GatewayError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(GatewayError::Http)?;

        info!(
            "Twilio client ready for {} ({})",
            config.phone_number, config.account_sid
        );

        Ok(Self { http, config })
    }

    /// Send a message using the full SendParams structure.
    pub async fn send(&self, mut params: SendParams) -> Result<SendResult, GatewayError> {
        if params.from.is_empty() {
            params.from = self.config.phone_number.clone();
        }
        params.validate()?;

        let url = self.config.messages_url();
        debug!("Sending message to {} via {}", params.to, url);

        let response = self
            .http
            .post(&url)
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .form(&params)
            .send()
            .await
            .map_err(GatewayError::Http)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = match serde_json::from_str::<ApiErrorBody>(&body) {
                Ok(error) => match error.code {
                    Some(code) => format!("{} (code {})", error.message, code),
                    None => error.message,
                },
                Err(_) => body,
            };
            warn!("Twilio send to {} failed: {} {}", params.to, status, message);
            return Err(GatewayError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let result: SendResult = response.json().await.map_err(GatewayError::Http)?;
        debug!("Message {} queued for {}", result.sid, params.to);
        Ok(result)
    }

    /// Send a text message.
    pub async fn send_text(
        &self,
        to: impl Into<String>,
        body: impl Into<String>,
    ) -> Result<SendResult, GatewayError> {
        self.send(SendParams::text(to, body)).await
    }

    /// Send a media-only message.
    pub async fn send_media(
        &self,
        to: impl Into<String>,
        url: impl Into<String>,
    ) -> Result<SendResult, GatewayError> {
        self.send(SendParams::media(to, url)).await
    }

    /// Get the configuration.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}

impl std::fmt::Debug for TwilioClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TwilioClient")
            .field("config", &self.config)
            .finish()
    }
}
