//! Error types for provider calls.

use thiserror::Error;

/// Errors returned by LLM and image-generation providers.
#[derive(Debug, Error)]
pub enum BrainError {
    /// The provider is temporarily unavailable (5xx, overloaded, rate limited).
    #[error("provider unavailable: {0}")]
    Unavailable(String),

    /// The provider rejected the request (bad model, bad parameter, bad image).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The request never reached the provider.
    #[error("network error: {0}")]
    Network(String),

    /// The provider answered but the answer could not be used.
    #[error("processing failed: {0}")]
    ProcessingFailed(String),

    /// The provider client is misconfigured.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl BrainError {
    /// Whether retrying the same request later could succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable(_) | Self::Network(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(BrainError::Unavailable("503".into()).is_transient());
        assert!(BrainError::Network("reset".into()).is_transient());
        assert!(!BrainError::InvalidRequest("bad model".into()).is_transient());
        assert!(!BrainError::Configuration("no key".into()).is_transient());
    }

    #[test]
    fn test_display_includes_detail() {
        let err = BrainError::InvalidRequest("model `gpt-9` does not exist".into());
        assert_eq!(err.to_string(), "invalid request: model `gpt-9` does not exist");
    }
}
