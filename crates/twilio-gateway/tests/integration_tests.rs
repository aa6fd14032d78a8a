//! Integration tests for twilio-gateway.
//!
//! Tests that talk to the real API need credentials:
//!   TWILIO_ACCOUNT_SID, TWILIO_AUTH_TOKEN, TWILIO_PHONE_NUMBER, TWILIO_TEST_RECIPIENT
//!
//! Run ignored tests (require credentials):
//!   cargo test --test integration_tests -- --ignored

use twilio_gateway::{GatewayConfig, GatewayError, InboundWebhook, SendParams, TwilioClient};

// ============================================================================
// Unit tests (no network required)
// ============================================================================

mod config_tests {
    use super::*;

    #[test]
    fn test_config_new() {
        let config = GatewayConfig::new("AC123", "secret", "+15550000000");
        assert_eq!(config.api_url, "https://api.twilio.com");
        assert_eq!(config.phone_number, "+15550000000");
    }

    #[test]
    fn test_messages_url() {
        let config = GatewayConfig::new("AC123", "secret", "+15550000000")
            .with_api_url("http://localhost:4010/");
        assert_eq!(
            config.messages_url(),
            "http://localhost:4010/2010-04-01/Accounts/AC123/Messages.json"
        );
    }

    #[test]
    fn test_debug_hides_token() {
        let config = GatewayConfig::new("AC123", "super-secret", "+15550000000");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("AC123"));
    }
}

mod send_params_tests {
    use super::*;

    #[test]
    fn test_send_params_text() {
        let params = SendParams::text("+15551234567", "Hello");
        assert_eq!(params.body.as_deref(), Some("Hello"));
        assert!(params.media_url.is_none());
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_send_params_media_serializes_media_url() {
        let params = SendParams::media("+15551234567", "https://img.example.com/a.png")
            .with_from("+15550000000");
        let json = serde_json::to_value(&params).unwrap();

        assert_eq!(json["To"], "+15551234567");
        assert_eq!(json["From"], "+15550000000");
        assert_eq!(json["MediaUrl"], "https://img.example.com/a.png");
        assert!(json.get("Body").is_none());
    }

    #[test]
    fn test_body_and_media_are_exclusive() {
        let mut params = SendParams::text("+15551234567", "Hello");
        params.media_url = Some("https://img.example.com/a.png".to_string());
        assert!(matches!(
            params.validate(),
            Err(GatewayError::InvalidMessage(_))
        ));

        let empty = SendParams {
            to: "+15551234567".to_string(),
            ..Default::default()
        };
        assert!(empty.validate().is_err());
    }
}

mod webhook_tests {
    use super::*;

    #[test]
    fn test_parse_text_webhook() {
        let payload = serde_json::json!({
            "MessageSid": "SM1",
            "AccountSid": "AC123",
            "From": "+15551234567",
            "To": "+15550000000",
            "Body": "#help",
            "NumMedia": "0"
        });
        let hook: InboundWebhook = serde_json::from_value(payload).unwrap();

        assert_eq!(hook.message_sid, "SM1");
        assert_eq!(hook.body, "#help");
        assert!(hook.media().is_none());
    }

    #[test]
    fn test_parse_media_webhook_without_body() {
        let payload = serde_json::json!({
            "MessageSid": "MM1",
            "From": "+15551234567",
            "To": "+15550000000",
            "MediaUrl0": "https://api.twilio.com/media/ME1"
        });
        let hook: InboundWebhook = serde_json::from_value(payload).unwrap();

        assert_eq!(hook.body, "");
        assert_eq!(hook.media(), Some("https://api.twilio.com/media/ME1"));
    }
}

// ============================================================================
// Network tests
// ============================================================================

mod client_tests {
    use super::*;

    #[tokio::test]
    async fn test_invalid_message_is_rejected_before_sending() {
        let config = GatewayConfig::new("AC123", "secret", "+15550000000")
            .with_api_url("http://127.0.0.1:59999");
        let client = TwilioClient::new(config).unwrap();

        let params = SendParams {
            to: "+15551234567".to_string(),
            ..Default::default()
        };
        let result = client.send(params).await;
        assert!(matches!(result, Err(GatewayError::InvalidMessage(_))));
    }

    #[tokio::test]
    async fn test_unreachable_api() {
        let config = GatewayConfig::new("AC123", "secret", "+15550000000")
            .with_api_url("http://127.0.0.1:59999");
        let client = TwilioClient::new(config).unwrap();

        let result = client.send_text("+15551234567", "Hello").await;
        match result.unwrap_err() {
            GatewayError::Http(_) => {} // Expected
            e => panic!("Unexpected error type: {:?}", e),
        }
    }

    /// Sends a real message. Requires credentials and a verified recipient.
    #[tokio::test]
    #[ignore = "requires Twilio credentials"]
    async fn test_send_message() {
        let recipient = std::env::var("TWILIO_TEST_RECIPIENT").expect("TWILIO_TEST_RECIPIENT not set");
        let client = TwilioClient::new(GatewayConfig::from_env().unwrap()).unwrap();

        let result = client.send_text(recipient, "twilio-gateway test").await.unwrap();
        assert!(result.sid.starts_with("SM") || result.sid.starts_with("MM"));
    }
}
