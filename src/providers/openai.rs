//! OpenAI chat-completion provider implementation for Genie
//!
//! This module implements the Provider trait for the OpenAI chat completions
//! API. The API accepts a flat `{role, content}` message list with a
//! dedicated system slot, so turns are forwarded without relabeling.

use crate::config::OpenAiConfig;
use crate::error::{ErrorCategory, GenieError, Result};
use crate::providers::base::category_for_status;
use crate::providers::{CompletionResponse, Provider, TokenUsage, Turn};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

/// OpenAI chat-completion provider
///
/// # Examples
///
/// ```
/// use genie::config::OpenAiConfig;
/// use genie::providers::{OpenAiProvider, Provider};
///
/// let provider = OpenAiProvider::new(OpenAiConfig::default(), "sk-test".to_string()).unwrap();
/// assert_eq!(provider.model(), "gpt-4.1");
/// ```
pub struct OpenAiProvider {
    client: Client,
    config: OpenAiConfig,
    api_key: String,
}

/// Request structure for the chat completions API
#[derive(Debug, Serialize)]
struct OpenAiRequest {
    model: String,
    messages: Vec<OpenAiMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

/// Message structure for the chat completions API
#[derive(Debug, Serialize, Deserialize)]
struct OpenAiMessage {
    role: String,
    #[serde(default)]
    content: Option<String>,
}

/// Response structure from the chat completions API
#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
    #[serde(default)]
    usage: Option<OpenAiUsage>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAiUsage {
    #[serde(default)]
    prompt_tokens: usize,
    #[serde(default)]
    completion_tokens: usize,
}

/// Error envelope returned on non-2xx responses
#[derive(Debug, Deserialize)]
struct OpenAiErrorResponse {
    error: OpenAiErrorBody,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default, rename = "type")]
    error_type: Option<String>,
    #[serde(default)]
    code: Option<String>,
}

impl OpenAiProvider {
    /// Create a new OpenAI provider instance
    ///
    /// # Arguments
    ///
    /// * `config` - OpenAI configuration (model, base URL, sampling)
    /// * `api_key` - API key sent as a bearer token
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails
    pub fn new(config: OpenAiConfig, api_key: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("genie/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                GenieError::provider(
                    ErrorCategory::TransientFailure,
                    format!("Failed to create HTTP client: {}", e),
                )
            })?;

        tracing::info!("Initialized OpenAI provider: model={}", config.model);

        Ok(Self {
            client,
            config,
            api_key,
        })
    }

    fn endpoint(&self) -> String {
        let base = self.config.api_base.as_deref().unwrap_or(DEFAULT_API_BASE);
        format!("{}/chat/completions", base.trim_end_matches('/'))
    }

    /// Convert Genie turns to chat completion messages
    fn convert_turns(&self, turns: &[Turn]) -> Vec<OpenAiMessage> {
        turns
            .iter()
            .map(|t| OpenAiMessage {
                role: t.role().as_str().to_string(),
                content: Some(t.content().to_string()),
            })
            .collect()
    }

    fn build_request(&self, turns: &[Turn]) -> OpenAiRequest {
        let sampling = &self.config.sampling;
        OpenAiRequest {
            model: self.config.model.clone(),
            messages: self.convert_turns(turns),
            temperature: sampling.temperature,
            top_p: sampling.top_p,
            max_tokens: sampling.max_output_tokens,
        }
    }
}

/// Map a failed chat completion response onto a categorized error
fn format_openai_api_error(status: reqwest::StatusCode, body: &str) -> GenieError {
    let parsed = serde_json::from_str::<OpenAiErrorResponse>(body).ok();
    let code = parsed
        .as_ref()
        .and_then(|p| p.error.code.clone().or_else(|| p.error.error_type.clone()))
        .unwrap_or_default();
    let detail = parsed
        .map(|p| p.error.message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| body.to_string());

    let category = match code.as_str() {
        "insufficient_quota" | "rate_limit_exceeded" => ErrorCategory::QuotaExceeded,
        "invalid_api_key" => ErrorCategory::InvalidCredential,
        "model_not_found" => ErrorCategory::ModelUnavailable,
        _ => category_for_status(status),
    };

    GenieError::provider(
        category,
        format!("OpenAI returned error {}: {}", status, detail),
    )
}

#[async_trait]
impl Provider for OpenAiProvider {
    async fn complete(&self, turns: &[Turn]) -> Result<CompletionResponse> {
        let request = self.build_request(turns);

        tracing::debug!(
            model = %request.model,
            messages = request.messages.len(),
            "Sending OpenAI chat completion request"
        );

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("OpenAI request failed: {}", e);
                GenieError::provider(
                    ErrorCategory::TransientFailure,
                    format!("OpenAI request failed: {}", e),
                )
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("OpenAI returned error {}: {}", status, error_text);
            return Err(format_openai_api_error(status, &error_text).into());
        }

        let body: OpenAiResponse = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse OpenAI response: {}", e);
            GenieError::provider(
                ErrorCategory::TransientFailure,
                format!("Failed to parse OpenAI response: {}", e),
            )
        })?;

        let text = body
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| {
                GenieError::provider(
                    ErrorCategory::TransientFailure,
                    "OpenAI response contained no choices",
                )
            })?
            .message
            .content
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(GenieError::provider(
                ErrorCategory::TransientFailure,
                "OpenAI returned an empty message",
            )
            .into());
        }

        let response = match body.usage {
            Some(usage) => {
                tracing::debug!(
                    prompt_tokens = usage.prompt_tokens,
                    completion_tokens = usage.completion_tokens,
                    "OpenAI token usage"
                );
                CompletionResponse::with_usage(
                    text,
                    TokenUsage::new(usage.prompt_tokens, usage.completion_tokens),
                )
            }
            None => CompletionResponse::new(text),
        };

        Ok(response)
    }

    fn name(&self) -> &'static str {
        "openai"
    }

    fn model(&self) -> String {
        self.config.model.clone()
    }
}
