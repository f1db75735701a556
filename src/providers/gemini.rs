//! Gemini generative-model provider implementation for Genie
//!
//! This module implements the Provider trait for the Gemini `generateContent`
//! API. Two translation rules apply:
//!
//! - assistant turns are sent under the `model` role;
//! - there is no system slot, so the system text is prefixed onto the first
//!   user turn as a bracketed instruction. [`SystemPromptMode`] decides
//!   whether the prefix is sent on every request or only during the first
//!   exchange.

use crate::config::{GeminiConfig, SamplingParameters, SystemPromptMode};
use crate::error::{ErrorCategory, GenieError, Result};
use crate::providers::base::category_for_status;
use crate::providers::{CompletionResponse, Provider, Role, TokenUsage, Turn};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini generative-model provider
pub struct GeminiProvider {
    client: Client,
    config: GeminiConfig,
    api_key: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GeminiGenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_k: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(default)]
    usage_metadata: Option<GeminiUsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiUsageMetadata {
    #[serde(default)]
    prompt_token_count: usize,
    #[serde(default)]
    candidates_token_count: usize,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorResponse {
    error: GeminiError,
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: Option<String>,
}

/// Wrap user text with the system instructions
fn with_instruction_prefix(system: &str, text: &str) -> String {
    format!("[Instructions: {}]\n\n{}", system, text)
}

impl GeminiProvider {
    /// Create a new Gemini provider instance
    ///
    /// # Arguments
    ///
    /// * `config` - Gemini configuration (model, base URL, sampling, prompt mode)
    /// * `api_key` - API key sent in the `x-goog-api-key` header
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails
    ///
    /// # Examples
    ///
    /// ```
    /// use genie::config::GeminiConfig;
    /// use genie::providers::{GeminiProvider, Provider};
    ///
    /// let provider = GeminiProvider::new(GeminiConfig::default(), "key".to_string()).unwrap();
    /// assert_eq!(provider.name(), "gemini");
    /// ```
    pub fn new(config: GeminiConfig, api_key: String) -> Result<Self> {
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

        tracing::info!(
            "Initialized Gemini provider: model={}, system_prompt_mode={:?}",
            config.model,
            config.system_prompt_mode
        );

        Ok(Self {
            client,
            config,
            api_key,
        })
    }

    fn endpoint(&self) -> String {
        let base = self.config.api_base.as_deref().unwrap_or(DEFAULT_API_BASE);
        format!(
            "{}/models/{}:generateContent",
            base.trim_end_matches('/'),
            self.config.model
        )
    }

    /// Convert Genie turns to Gemini contents
    ///
    /// The system turn is never sent as its own content. Whether its text is
    /// folded into the first user turn depends on the configured mode.
    fn convert_turns(&self, turns: &[Turn]) -> Vec<GeminiContent> {
        let system = turns
            .iter()
            .find(|t| t.role() == Role::System)
            .map(|t| t.content());
        let user_turns = turns.iter().filter(|t| t.role() == Role::User).count();

        let send_prefix = match self.config.system_prompt_mode {
            SystemPromptMode::EveryTurn => system.is_some(),
            SystemPromptMode::FirstTurnOnly => system.is_some() && user_turns == 1,
        };

        let mut prefixed = false;
        turns
            .iter()
            .filter_map(|t| {
                let (role, text) = match t.role() {
                    Role::System => return None,
                    Role::Assistant => ("model", t.content().to_string()),
                    Role::User => {
                        let text = match system {
                            Some(system) if send_prefix && !prefixed => {
                                prefixed = true;
                                with_instruction_prefix(system, t.content())
                            }
                            _ => t.content().to_string(),
                        };
                        ("user", text)
                    }
                };
                Some(GeminiContent {
                    role: Some(role.to_string()),
                    parts: vec![GeminiPart { text }],
                })
            })
            .collect()
    }

    fn build_request(&self, turns: &[Turn]) -> GeminiRequest {
        let sampling = &self.config.sampling;
        let generation_config = if *sampling == SamplingParameters::default() {
            None
        } else {
            Some(GeminiGenerationConfig {
                max_output_tokens: sampling.max_output_tokens,
                temperature: sampling.temperature,
                top_p: sampling.top_p,
                top_k: sampling.top_k,
            })
        };

        GeminiRequest {
            contents: self.convert_turns(turns),
            generation_config,
        }
    }
}

/// Map a failed generateContent response onto a categorized error
fn format_gemini_api_error(status: reqwest::StatusCode, body: &str) -> GenieError {
    let parsed = serde_json::from_str::<GeminiErrorResponse>(body).ok();
    let api_status = parsed
        .as_ref()
        .and_then(|p| p.error.status.clone())
        .unwrap_or_default();
    let detail = parsed
        .map(|p| p.error.message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| body.to_string());

    let category = if detail.contains("API key not valid") || detail.contains("API_KEY_INVALID") {
        ErrorCategory::InvalidCredential
    } else {
        match api_status.as_str() {
            "RESOURCE_EXHAUSTED" => ErrorCategory::QuotaExceeded,
            "UNAUTHENTICATED" | "PERMISSION_DENIED" => ErrorCategory::InvalidCredential,
            "NOT_FOUND" => ErrorCategory::ModelUnavailable,
            _ => category_for_status(status),
        }
    };

    GenieError::provider(
        category,
        format!("Gemini returned error {}: {}", status, detail),
    )
}

#[async_trait]
impl Provider for GeminiProvider {
    async fn complete(&self, turns: &[Turn]) -> Result<CompletionResponse> {
        let request = self.build_request(turns);

        tracing::debug!(
            model = %self.config.model,
            contents = request.contents.len(),
            "Sending Gemini generateContent request"
        );

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Gemini request failed: {}", e);
                GenieError::provider(
                    ErrorCategory::TransientFailure,
                    format!("Gemini request failed: {}", e),
                )
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("Gemini returned error {}: {}", status, error_text);
            return Err(format_gemini_api_error(status, &error_text).into());
        }

        let body: GeminiResponse = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse Gemini response: {}", e);
            GenieError::provider(
                ErrorCategory::TransientFailure,
                format!("Failed to parse Gemini response: {}", e),
            )
        })?;

        let candidate = body.candidates.into_iter().next().ok_or_else(|| {
            GenieError::provider(
                ErrorCategory::TransientFailure,
                "Gemini response contained no candidates",
            )
        })?;

        let text = candidate
            .content
            .map(|c| {
                c.parts
                    .into_iter()
                    .map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.is_empty() {
            return Err(GenieError::provider(
                ErrorCategory::TransientFailure,
                format!(
                    "Gemini returned an empty candidate (finish_reason={})",
                    candidate.finish_reason.as_deref().unwrap_or("unknown")
                ),
            )
            .into());
        }

        let response = match body.usage_metadata {
            Some(usage) => CompletionResponse::with_usage(
                text,
                TokenUsage::new(usage.prompt_token_count, usage.candidates_token_count),
            ),
            None => CompletionResponse::new(text),
        };

        Ok(response)
    }

    fn name(&self) -> &'static str {
        "gemini"
    }

    fn model(&self) -> String {
        self.config.model.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    fn provider_with_mode(mode: SystemPromptMode) -> GeminiProvider {
        let config = GeminiConfig {
            system_prompt_mode: mode,
            ..Default::default()
        };
        GeminiProvider::new(config, "key".to_string()).unwrap()
    }

    fn seed() -> Vec<Turn> {
        vec![Turn::system("Be DG"), Turn::assistant("Hello! I am DG.")]
    }

    #[test]
    fn test_endpoint_includes_model() {
        let provider = provider_with_mode(SystemPromptMode::EveryTurn);
        assert_eq!(
            provider.endpoint(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash:generateContent"
        );
    }

    #[test]
    fn test_assistant_turns_relabeled_as_model() {
        let provider = provider_with_mode(SystemPromptMode::EveryTurn);
        let mut turns = seed();
        turns.push(Turn::user("Hi"));

        let contents = provider.convert_turns(&turns);
        assert_eq!(contents.len(), 2);
        assert_eq!(contents[0].role.as_deref(), Some("model"));
        assert_eq!(contents[1].role.as_deref(), Some("user"));
    }

    #[test]
    fn test_first_exchange_gets_instruction_prefix() {
        for mode in [SystemPromptMode::EveryTurn, SystemPromptMode::FirstTurnOnly] {
            let provider = provider_with_mode(mode);
            let mut turns = seed();
            turns.push(Turn::user("Top attractions?"));

            let contents = provider.convert_turns(&turns);
            assert_eq!(
                contents[1].parts[0].text,
                "[Instructions: Be DG]\n\nTop attractions?"
            );
        }
    }

    #[test]
    fn test_first_turn_only_drops_prefix_on_later_exchanges() {
        let provider = provider_with_mode(SystemPromptMode::FirstTurnOnly);
        let mut turns = seed();
        turns.push(Turn::user("First"));
        turns.push(Turn::assistant("Reply"));
        turns.push(Turn::user("Second"));

        let contents = provider.convert_turns(&turns);
        assert_eq!(contents.len(), 4);
        assert!(contents
            .iter()
            .all(|c| !c.parts[0].text.contains("[Instructions:")));
    }

    #[test]
    fn test_every_turn_keeps_prefix_on_first_user_turn() {
        let provider = provider_with_mode(SystemPromptMode::EveryTurn);
        let mut turns = seed();
        turns.push(Turn::user("First"));
        turns.push(Turn::assistant("Reply"));
        turns.push(Turn::user("Second"));

        let contents = provider.convert_turns(&turns);
        assert_eq!(contents[1].parts[0].text, "[Instructions: Be DG]\n\nFirst");
        assert_eq!(contents[3].parts[0].text, "Second");
    }

    #[test]
    fn test_generation_config_omitted_when_unset() {
        let provider = provider_with_mode(SystemPromptMode::EveryTurn);
        let json = serde_json::to_value(provider.build_request(&seed())).unwrap();
        assert!(json.get("generationConfig").is_none());
    }

    #[test]
    fn test_generation_config_camel_case() {
        let config = GeminiConfig {
            sampling: SamplingParameters {
                temperature: Some(0.7),
                top_p: Some(0.9),
                top_k: Some(32),
                max_output_tokens: Some(256),
            },
            ..Default::default()
        };
        let provider = GeminiProvider::new(config, "key".to_string()).unwrap();
        let json = serde_json::to_value(provider.build_request(&seed())).unwrap();

        let generation = &json["generationConfig"];
        assert_eq!(generation["maxOutputTokens"], 256);
        assert_eq!(generation["topK"], 32);
        assert!(generation.get("temperature").is_some());
    }

    fn category_of(err: GenieError) -> ErrorCategory {
        match err {
            GenieError::Provider { category, .. } => category,
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_error_mapping_invalid_key_on_400() {
        let body = r#"{"error":{"code":400,"message":"API key not valid. Please pass a valid API key.","status":"INVALID_ARGUMENT"}}"#;
        let err = format_gemini_api_error(StatusCode::BAD_REQUEST, body);
        assert_eq!(category_of(err), ErrorCategory::InvalidCredential);
    }

    #[test]
    fn test_error_mapping_resource_exhausted() {
        let body = r#"{"error":{"code":429,"message":"Quota exceeded","status":"RESOURCE_EXHAUSTED"}}"#;
        let err = format_gemini_api_error(StatusCode::TOO_MANY_REQUESTS, body);
        assert_eq!(category_of(err), ErrorCategory::QuotaExceeded);
    }

    #[test]
    fn test_error_mapping_model_not_found() {
        let body = r#"{"error":{"code":404,"message":"models/gemini-9 is not found","status":"NOT_FOUND"}}"#;
        let err = format_gemini_api_error(StatusCode::NOT_FOUND, body);
        assert_eq!(category_of(err), ErrorCategory::ModelUnavailable);
    }

    #[test]
    fn test_error_mapping_server_error() {
        let err = format_gemini_api_error(StatusCode::INTERNAL_SERVER_ERROR, "");
        assert_eq!(category_of(err), ErrorCategory::TransientFailure);
    }
}
