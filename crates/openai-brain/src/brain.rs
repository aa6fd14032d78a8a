//! OpenAiBrain implementation using the OpenAI REST API.

use brain_core::{
    async_trait, Brain, BrainError, ChatMessage, ImageGenerator, ImageSize, SamplingParams,
};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::api_types::{
    ApiError, ChatCompletionRequest, ChatCompletionResponse, ImageGenerationRequest,
    ImageResponse, ModelList,
};
use crate::config::OpenAiBrainConfig;

/// Provider client for OpenAI chat completions and image generation.
///
/// The client is stateless: every call carries the full conversation and
/// sampling parameters chosen by the caller.
pub struct OpenAiBrain {
    client: Client,
    config: OpenAiBrainConfig,
}

impl OpenAiBrain {
    /// Create a new OpenAiBrain with the given configuration.
    pub fn new(config: OpenAiBrainConfig) -> Result<Self, BrainError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| BrainError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        info!("OpenAiBrain initialized with API URL: {}", config.api_url);

        Ok(Self { client, config })
    }

    /// Create an OpenAiBrain from environment variables.
    ///
    /// See [`OpenAiBrainConfig::from_env`] for required environment variables.
    pub fn from_env() -> Result<Self, BrainError> {
        let config = OpenAiBrainConfig::from_env()?;
        Self::new(config)
    }

    /// Get the configuration.
    pub fn config(&self) -> &OpenAiBrainConfig {
        &self.config
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request.bearer_auth(&self.config.api_key)
    }

    /// Send a request and decode a successful JSON body.
    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, BrainError> {
        let response = self
            .authorized(request)
            .send()
            .await
            .map_err(|e| BrainError::Network(format!("Failed to send request: {}", e)))?;

        let response = check_status(response).await?;

        response
            .json()
            .await
            .map_err(|e| BrainError::ProcessingFailed(format!("Failed to parse response: {}", e)))
    }

    async fn image_url(&self, request: RequestBuilder) -> Result<String, BrainError> {
        let images: ImageResponse = self.send_json(request).await?;
        images
            .data
            .into_iter()
            .find_map(|image| image.url)
            .ok_or_else(|| BrainError::ProcessingFailed("No image URL in response".to_string()))
    }
}

/// Map a non-success response to the error taxonomy.
///
/// Rate limits and server errors mean the provider is unavailable; any other
/// client error means the request itself was rejected.
async fn check_status(response: Response) -> Result<Response, BrainError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let error_text = response.text().await.unwrap_or_default();
    let detail = serde_json::from_str::<ApiError>(&error_text)
        .map(|api_error| api_error.error.message)
        .unwrap_or(error_text);
    let message = format!("API error ({}): {}", status.as_u16(), detail);

    warn!("OpenAI request failed: {}", message);
    Err(classify_status(status, message))
}

fn classify_status(status: StatusCode, message: String) -> BrainError {
    if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
        BrainError::Unavailable(message)
    } else {
        BrainError::InvalidRequest(message)
    }
}

fn png_part(bytes: Vec<u8>, file_name: &'static str) -> Result<Part, BrainError> {
    Part::bytes(bytes)
        .file_name(file_name)
        .mime_str("image/png")
        .map_err(|e| BrainError::Configuration(format!("Invalid MIME type: {}", e)))
}

#[async_trait]
impl Brain for OpenAiBrain {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        params: &SamplingParams,
    ) -> Result<String, BrainError> {
        let request = ChatCompletionRequest::new(messages, params);
        debug!("Sending chat completion: {:?}", request);

        let completion: ChatCompletionResponse = self
            .send_json(
                self.client
                    .post(self.config.endpoint("/v1/chat/completions"))
                    .json(&request),
            )
            .await?;

        if let Some(usage) = &completion.usage {
            debug!(
                "Token usage ({}) - prompt: {}, completion: {}, total: {}",
                completion.model, usage.prompt_tokens, usage.completion_tokens, usage.total_tokens
            );
        }

        let choice = completion
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| BrainError::ProcessingFailed("No choices in response".to_string()))?;

        if let Some(reason) = choice.finish_reason.as_deref() {
            debug!("Completion finished: {}", reason);
        }

        Ok(choice.message.content.unwrap_or_default())
    }

    async fn list_models(&self) -> Result<Vec<String>, BrainError> {
        let models: ModelList = self
            .send_json(self.client.get(self.config.endpoint("/v1/models")))
            .await?;

        let mut names: Vec<String> = models.data.into_iter().map(|m| m.id).collect();
        names.sort();
        names.dedup();
        info!("Provider advertises {} models", names.len());
        Ok(names)
    }

    fn name(&self) -> &str {
        "OpenAiBrain"
    }
}

#[async_trait]
impl ImageGenerator for OpenAiBrain {
    async fn create(&self, prompt: &str, size: ImageSize) -> Result<String, BrainError> {
        let request = ImageGenerationRequest {
            prompt,
            n: 1,
            size: size.as_str(),
        };
        self.image_url(
            self.client
                .post(self.config.endpoint("/v1/images/generations"))
                .json(&request),
        )
        .await
    }

    async fn edit(
        &self,
        prompt: &str,
        size: ImageSize,
        image: Vec<u8>,
        mask: Vec<u8>,
    ) -> Result<String, BrainError> {
        let form = Form::new()
            .part("image", png_part(image, "image.png")?)
            .part("mask", png_part(mask, "mask.png")?)
            .text("prompt", prompt.to_string())
            .text("n", "1")
            .text("size", size.as_str());

        self.image_url(
            self.client
                .post(self.config.endpoint("/v1/images/edits"))
                .multipart(form),
        )
        .await
    }

    async fn variation(&self, image: Vec<u8>, size: ImageSize) -> Result<String, BrainError> {
        let form = Form::new()
            .part("image", png_part(image, "image.png")?)
            .text("n", "1")
            .text("size", size.as_str());

        self.image_url(
            self.client
                .post(self.config.endpoint("/v1/images/variations"))
                .multipart(form),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brain_name() {
        let config = OpenAiBrainConfig::builder().api_key("sk-test").build();
        let brain = OpenAiBrain::new(config).unwrap();
        assert_eq!(brain.name(), "OpenAiBrain");
    }

    #[test]
    fn test_status_classification() {
        let unavailable = classify_status(StatusCode::SERVICE_UNAVAILABLE, "down".into());
        assert!(matches!(unavailable, BrainError::Unavailable(_)));

        let limited = classify_status(StatusCode::TOO_MANY_REQUESTS, "slow down".into());
        assert!(matches!(limited, BrainError::Unavailable(_)));

        let invalid = classify_status(StatusCode::BAD_REQUEST, "bad size".into());
        assert!(matches!(invalid, BrainError::InvalidRequest(_)));

        let missing = classify_status(StatusCode::NOT_FOUND, "no such model".into());
        assert!(matches!(missing, BrainError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn test_unreachable_api_is_network_error() {
        let config = OpenAiBrainConfig::builder()
            .api_key("sk-test")
            .api_url("http://127.0.0.1:9")
            .build();
        let brain = OpenAiBrain::new(config).unwrap();

        let result = brain.list_models().await;
        assert!(matches!(result, Err(BrainError::Network(_))));
    }
}
