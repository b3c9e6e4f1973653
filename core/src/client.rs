use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

use crate::config::{SousChefConfig, DEFAULT_API_BASE, DEFAULT_MODEL};
use crate::errors::{SousChefError, SousChefResult};
use crate::types::*;

/// The seam between the widgets and the hosted model.
///
/// Implementations resolve every failure mode into the tagged
/// [`GenerationOutcome`]; callers never see a transport error as anything
/// other than a value to degrade on.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Issue one single-turn generation request. One outbound call at most;
    /// no caching, no retry, no coordination between in-flight calls.
    async fn generate(&self, request: GenerationRequest) -> GenerationOutcome;

    /// Model identifier, for logging.
    fn model_name(&self) -> String;

    /// Configured persona instruction for chat turns, if any.
    fn persona(&self) -> Option<String> {
        None
    }
}

/// Client for the hosted generateContent API
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    config: SousChefConfig,
}

impl GeminiClient {
    /// Create a new client. Construction succeeds without a credential;
    /// a keyless client simply answers `Unavailable` to every request.
    pub fn new(config: SousChefConfig) -> SousChefResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| {
                SousChefError::ConfigError(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { client, config })
    }

    fn api_key(&self) -> Option<&str> {
        self.config.api_key.as_deref().filter(|k| !k.is_empty())
    }

    fn api_url(&self, api_key: &str) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.config.api_base.as_deref().unwrap_or(DEFAULT_API_BASE),
            self.config.model_name.as_deref().unwrap_or(DEFAULT_MODEL),
            api_key
        )
    }

    fn build_request(request: &GenerationRequest) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content::text(request.prompt.clone())],
            system_instruction: request
                .system_instruction
                .as_ref()
                .map(|instruction| Content::text(instruction.clone())),
        }
    }

    async fn generate_content(
        &self,
        api_key: &str,
        body: &GenerateContentRequest,
    ) -> SousChefResult<GenerateContentResponse> {
        let url = self.api_url(api_key);

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| SousChefError::RequestError(format!("Failed to send request: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.map_err(|e| {
                SousChefError::ResponseError(format!("Failed to read error response: {}", e))
            })?;

            return Err(SousChefError::HttpError {
                status_code: status.as_u16(),
                message: format!("API request failed: {}", error_body),
            });
        }

        let response_body = response
            .json::<GenerateContentResponse>()
            .await
            .map_err(|e| SousChefError::ResponseError(format!("Failed to parse response: {}", e)))?;

        Ok(response_body)
    }

    /// First candidate's first part, if the response carries usable text.
    /// An empty string is as unusable as an absent one.
    fn extract_text(response: &GenerateContentResponse) -> Option<String> {
        response
            .candidates
            .first()
            .and_then(|candidate| candidate.content.as_ref())
            .and_then(|content| content.parts.first())
            .and_then(|part| part.text.clone())
            .filter(|text| !text.is_empty())
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, request: GenerationRequest) -> GenerationOutcome {
        // Demo-mode gate: no credential, no network. Not an error path.
        let Some(api_key) = self.api_key() else {
            warn!("No API key configured; running in demo mode");
            return GenerationOutcome::Unavailable;
        };

        debug!(
            model = %self.model_name(),
            prompt_len = request.prompt.len(),
            "Sending generation request"
        );

        let body = Self::build_request(&request);
        match self.generate_content(api_key, &body).await {
            Ok(response) => match Self::extract_text(&response) {
                Some(text) => GenerationOutcome::Success(text),
                None => {
                    warn!("Response carried no extractable text");
                    GenerationOutcome::Unavailable
                }
            },
            Err(e) => {
                warn!(error = %e, "Generation request failed");
                GenerationOutcome::TransportError(e.to_string())
            }
        }
    }

    fn model_name(&self) -> String {
        self.config
            .model_name
            .clone()
            .unwrap_or_else(|| DEFAULT_MODEL.to_string())
    }

    fn persona(&self) -> Option<String> {
        self.config.persona.clone()
    }
}
