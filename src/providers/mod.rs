//! Provider module for Genie
//!
//! This module contains the model provider abstraction and implementations
//! for the OpenAI chat-completions API and the Gemini generateContent API.

pub mod base;
pub mod gemini;
pub mod openai;

pub use base::{CompletionResponse, Provider, Role, TokenUsage, Turn};
pub use gemini::GeminiProvider;
pub use openai::OpenAiProvider;

use crate::config::ProviderConfig;
use crate::error::{GenieError, Result};

/// Create a provider instance based on configuration
///
/// # Arguments
///
/// * `provider_type` - Type of provider ("openai" or "gemini")
/// * `config` - Provider configuration
/// * `api_key` - Credential read from the provider's environment variable
///
/// # Returns
///
/// Returns a boxed provider instance
///
/// # Errors
///
/// Returns error if provider type is invalid or initialization fails
///
/// # Examples
///
/// ```
/// use genie::config::Config;
/// use genie::providers::create_provider;
///
/// let config = Config::default();
/// let provider = create_provider("gemini", &config.provider, "key".to_string()).unwrap();
/// assert_eq!(provider.name(), "gemini");
/// ```
pub fn create_provider(
    provider_type: &str,
    config: &ProviderConfig,
    api_key: String,
) -> Result<Box<dyn Provider>> {
    match provider_type {
        "openai" => Ok(Box::new(OpenAiProvider::new(
            config.openai.clone(),
            api_key,
        )?)),
        "gemini" => Ok(Box::new(GeminiProvider::new(
            config.gemini.clone(),
            api_key,
        )?)),
        _ => Err(GenieError::Config(format!("Unknown provider type: {}", provider_type)).into()),
    }
}

/// Name of the environment variable holding the key for a provider type
///
/// Returns `None` for unknown provider types.
pub fn api_key_env<'a>(provider_type: &str, config: &'a ProviderConfig) -> Option<&'a str> {
    match provider_type {
        "openai" => Some(config.openai.api_key_env.as_str()),
        "gemini" => Some(config.gemini.api_key_env.as_str()),
        _ => None,
    }
}
