//! Model gateway: adapter from conversation state to a remote model call
//!
//! The gateway owns the provider and the retry policy. Its `send` contract
//! never fails: every provider fault is folded into the fixed message of an
//! [`ErrorCategory`], so the caller always gets text to show the user.

use crate::agent::Conversation;
use crate::config::{ProviderConfig, RetryConfig};
use crate::error::{ErrorCategory, GenieError, Result};
use crate::providers::{self, Provider};
use std::time::Duration;

/// Adapter between a conversation and a remote model provider
///
/// A gateway built without a provider is in the not-configured state: every
/// call answers with the [`ErrorCategory::NotConfigured`] message and no
/// network request is made.
pub struct ModelGateway {
    provider: Option<Box<dyn Provider>>,
    retry: RetryConfig,
}

impl ModelGateway {
    /// Creates a gateway around a provider
    ///
    /// # Arguments
    ///
    /// * `provider` - Provider that performs the wire translation
    /// * `retry` - Retry policy for transient failures
    pub fn new(provider: Box<dyn Provider>, retry: RetryConfig) -> Self {
        Self {
            provider: Some(provider),
            retry,
        }
    }

    /// Creates a gateway that answers every call with the not-configured message
    ///
    /// # Examples
    ///
    /// ```
    /// use genie::agent::{Conversation, ModelGateway};
    /// use genie::error::ErrorCategory;
    ///
    /// # #[tokio::main]
    /// # async fn main() {
    /// let gateway = ModelGateway::not_configured();
    /// let reply = gateway.send(&Conversation::default()).await;
    /// assert_eq!(reply, ErrorCategory::NotConfigured.user_message());
    /// # }
    /// ```
    pub fn not_configured() -> Self {
        Self {
            provider: None,
            retry: RetryConfig::default(),
        }
    }

    /// Builds a gateway from configuration, reading the API key from the environment
    ///
    /// A missing or empty key is not an error: it is logged and the gateway
    /// starts in the not-configured state.
    ///
    /// # Errors
    ///
    /// Returns error if the provider type is unknown or the HTTP client
    /// cannot be created
    pub fn from_config(config: &ProviderConfig) -> Result<Self> {
        let provider_type = config.provider_type.as_str();
        let key_env = providers::api_key_env(provider_type, config).ok_or_else(|| {
            GenieError::Config(format!("Unknown provider type: {}", provider_type))
        })?;

        let api_key = match std::env::var(key_env) {
            Ok(key) if !key.trim().is_empty() => key,
            _ => {
                tracing::warn!(
                    provider = provider_type,
                    env = key_env,
                    "No API key found; the assistant will run in not-configured mode"
                );
                return Ok(Self::not_configured());
            }
        };

        let provider = providers::create_provider(provider_type, config, api_key)?;
        Ok(Self::new(provider, config.retry.clone()))
    }

    /// Whether a provider is available
    pub fn is_configured(&self) -> bool {
        self.provider.is_some()
    }

    /// Name of the provider, if configured
    pub fn provider_name(&self) -> Option<&'static str> {
        self.provider.as_ref().map(|p| p.name())
    }

    /// Model identifier, if configured
    pub fn model(&self) -> Option<String> {
        self.provider.as_ref().map(|p| p.model())
    }

    /// Sends the full conversation and returns the reply or the failure category
    ///
    /// Only [`ErrorCategory::TransientFailure`] is retried, at most
    /// `retry.max_retries` times, with exponential backoff.
    pub async fn dispatch(
        &self,
        conversation: &Conversation,
    ) -> std::result::Result<String, ErrorCategory> {
        let provider = match &self.provider {
            Some(provider) => provider,
            None => {
                tracing::warn!(session = %conversation.id(), "Model call skipped: not configured");
                return Err(ErrorCategory::NotConfigured);
            }
        };

        let mut attempt: u32 = 0;
        loop {
            tracing::debug!(
                session = %conversation.id(),
                provider = provider.name(),
                turns = conversation.len(),
                attempt,
                "Dispatching conversation to model"
            );

            match provider.complete(conversation.turns()).await {
                Ok(response) => {
                    if let Some(usage) = response.usage {
                        tracing::debug!(
                            session = %conversation.id(),
                            total_tokens = usage.total_tokens,
                            "Model call completed"
                        );
                    }
                    return Ok(response.text);
                }
                Err(err) => {
                    let category = ErrorCategory::classify(&err);
                    if category.is_retryable() && attempt < self.retry.max_retries {
                        let delay = self.backoff(attempt);
                        tracing::warn!(
                            session = %conversation.id(),
                            attempt,
                            delay_ms = delay.as_millis() as u64,
                            "Transient model failure, retrying: {:#}",
                            err
                        );
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                        continue;
                    }

                    tracing::error!(
                        session = %conversation.id(),
                        provider = provider.name(),
                        category = %category,
                        "Model call failed: {:#}",
                        err
                    );
                    return Err(category);
                }
            }
        }
    }

    /// Sends the full conversation and returns text to show the user
    ///
    /// Failures become the fixed message of their category.
    pub async fn send(&self, conversation: &Conversation) -> String {
        match self.dispatch(conversation).await {
            Ok(text) => text,
            Err(category) => category.user_message().to_string(),
        }
    }

    fn backoff(&self, attempt: u32) -> Duration {
        let factor = 2u64.saturating_pow(attempt);
        Duration::from_millis(self.retry.initial_backoff_ms.saturating_mul(factor))
    }
}

impl std::fmt::Debug for ModelGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelGateway")
            .field("provider", &self.provider_name())
            .field("retry", &self.retry)
            .finish()
    }
}
