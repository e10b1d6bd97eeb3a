//! Gemini API client
//!
//! Thin reqwest wrapper over:
//! - `POST {endpoint}/v1beta/models/{model}:generateContent`
//! - `GET {endpoint}/v1beta/models/{model}` (health check only)
//!
//! The credential is sent as-is; an empty key is not rejected locally and
//! surfaces as an auth failure from the service.

use crate::errors::{Result, SchoaError};
use crate::gateway::transport::ModelTransport;
use crate::gateway::wire::{GenerateContentRequest, GenerateContentResponse};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Default Gemini API endpoint
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";

/// Default model (text and multimodal)
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Gemini HTTP client, built once and shared read-only
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    /// Client against the default endpoint and model
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(DEFAULT_ENDPOINT, DEFAULT_MODEL, api_key, None)
    }

    /// Client with custom endpoint, model and optional request timeout.
    ///
    /// Without a timeout the transport's own defaults apply.
    pub fn with_config(
        endpoint: &str,
        model: &str,
        api_key: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(SchoaError::HttpError)?;

        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.into(),
        })
    }

    fn generate_url(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.endpoint, self.model)
    }

    fn model_url(&self) -> String {
        format!("{}/v1beta/models/{}", self.endpoint, self.model)
    }

    /// Check that the endpoint answers for the configured model and key
    pub async fn health_check(&self) -> Result<bool> {
        match self
            .client
            .get(self.model_url())
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await
        {
            Ok(response) => Ok(response.status().is_success()),
            Err(_) => Ok(false),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn has_api_key(&self) -> bool {
        !self.api_key.is_empty()
    }
}

#[async_trait]
impl ModelTransport for GeminiClient {
    async fn generate_content(&self, request: &GenerateContentRequest) -> Result<GenerateContentResponse> {
        let response = self
            .client
            .post(self.generate_url())
            .header(API_KEY_HEADER, &self.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(status_error(status, message));
        }

        response
            .json::<GenerateContentResponse>()
            .await
            .map_err(|e| SchoaError::DecodeError(e.to_string()))
    }

    fn model(&self) -> &str {
        &self.model
    }
}

fn status_error(status: StatusCode, message: String) -> SchoaError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => SchoaError::AuthError {
            status: status.as_u16(),
            message,
        },
        _ => SchoaError::ServiceError {
            status: status.as_u16(),
            message,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = GeminiClient::new("key").unwrap();
        assert_eq!(client.model(), DEFAULT_MODEL);
        assert_eq!(client.endpoint(), DEFAULT_ENDPOINT);
        assert!(client.has_api_key());
    }

    #[test]
    fn test_client_with_config_trims_slash() {
        let client = GeminiClient::with_config(
            "http://localhost:8080/",
            "gemini-test",
            "",
            Some(Duration::from_secs(5)),
        )
        .unwrap();
        assert_eq!(client.endpoint(), "http://localhost:8080");
        assert_eq!(
            client.generate_url(),
            "http://localhost:8080/v1beta/models/gemini-test:generateContent"
        );
        assert!(!client.has_api_key());
    }

    #[test]
    fn test_status_mapping() {
        assert!(status_error(StatusCode::UNAUTHORIZED, String::new()).is_auth());
        assert!(status_error(StatusCode::FORBIDDEN, String::new()).is_auth());
        assert!(matches!(
            status_error(StatusCode::TOO_MANY_REQUESTS, "quota".to_string()),
            SchoaError::ServiceError { status: 429, .. }
        ));
    }
}
