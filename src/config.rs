//! Configuration management for Genie
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.
//! Credentials are never stored in the configuration file; only the name of
//! the environment variable that holds them is.

use crate::error::{GenieError, Result};
use crate::prompts;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Provider type names accepted by the configuration
pub const VALID_PROVIDERS: [&str; 2] = ["openai", "gemini"];

/// Main configuration structure for Genie
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Provider configuration (OpenAI, Gemini)
    pub provider: ProviderConfig,
    /// Session seed and presentation settings
    #[serde(default)]
    pub session: SessionConfig,
}

/// Provider configuration
///
/// Specifies which AI provider to use and its settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Type of provider to use
    #[serde(rename = "type")]
    pub provider_type: String,

    /// OpenAI chat-completion configuration
    #[serde(default)]
    pub openai: OpenAiConfig,

    /// Gemini generative-model configuration
    #[serde(default)]
    pub gemini: GeminiConfig,

    /// Retry policy for transient failures
    #[serde(default)]
    pub retry: RetryConfig,
}

/// Sampling parameters forwarded to the model
///
/// Unset values are omitted from the request so the provider default applies.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SamplingParameters {
    /// Sampling temperature
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    /// Nucleus sampling probability mass
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    /// Top-k sampling (ignored by providers that do not support it)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
    /// Maximum tokens in the reply
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
}

impl SamplingParameters {
    fn validate(&self, section: &str) -> Result<()> {
        if let Some(t) = self.temperature {
            if !(0.0..=2.0).contains(&t) {
                return Err(GenieError::Config(format!(
                    "{}.sampling.temperature must be between 0.0 and 2.0",
                    section
                ))
                .into());
            }
        }
        if let Some(p) = self.top_p {
            if p <= 0.0 || p > 1.0 {
                return Err(GenieError::Config(format!(
                    "{}.sampling.top_p must be between 0.0 (exclusive) and 1.0",
                    section
                ))
                .into());
            }
        }
        if self.top_k == Some(0) {
            return Err(GenieError::Config(format!(
                "{}.sampling.top_k must be greater than 0",
                section
            ))
            .into());
        }
        if self.max_output_tokens == Some(0) {
            return Err(GenieError::Config(format!(
                "{}.sampling.max_output_tokens must be greater than 0",
                section
            ))
            .into());
        }
        Ok(())
    }
}

/// OpenAI chat-completion provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiConfig {
    /// Model identifier
    #[serde(default = "default_openai_model")]
    pub model: String,

    /// Optional API base URL (useful for tests and compatible gateways)
    #[serde(default)]
    pub api_base: Option<String>,

    /// Environment variable holding the API key
    #[serde(default = "default_openai_key_env")]
    pub api_key_env: String,

    /// Sampling parameters
    #[serde(default)]
    pub sampling: SamplingParameters,

    /// Per-request timeout (seconds)
    #[serde(default = "default_request_timeout")]
    pub timeout_seconds: u64,
}

fn default_openai_model() -> String {
    "gpt-4.1".to_string()
}

fn default_openai_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_request_timeout() -> u64 {
    120
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            model: default_openai_model(),
            api_base: None,
            api_key_env: default_openai_key_env(),
            sampling: SamplingParameters::default(),
            timeout_seconds: default_request_timeout(),
        }
    }
}

/// How system instructions reach a provider without a system slot
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SystemPromptMode {
    /// Prefix the instructions onto the first user turn only during the
    /// first exchange; later requests carry no system content
    FirstTurnOnly,
    /// Prefix the instructions onto the first user turn on every request
    #[default]
    EveryTurn,
}

impl SystemPromptMode {
    /// Parse a mode name as used in config files and environment variables
    ///
    /// # Examples
    ///
    /// ```
    /// use genie::config::SystemPromptMode;
    ///
    /// let mode = SystemPromptMode::parse_str("first_turn_only").unwrap();
    /// assert_eq!(mode, SystemPromptMode::FirstTurnOnly);
    ///
    /// let mode = SystemPromptMode::parse_str("EVERY-TURN").unwrap();
    /// assert_eq!(mode, SystemPromptMode::EveryTurn);
    /// assert!(SystemPromptMode::parse_str("sometimes").is_err());
    /// ```
    pub fn parse_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "first_turn_only" | "first_turn" => Ok(Self::FirstTurnOnly),
            "every_turn" | "always" => Ok(Self::EveryTurn),
            other => Err(GenieError::Config(format!(
                "Invalid system prompt mode: {}. Must be one of: first_turn_only, every_turn",
                other
            ))
            .into()),
        }
    }
}

/// Gemini generative-model provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// Model identifier
    #[serde(default = "default_gemini_model")]
    pub model: String,

    /// Optional API base URL (useful for tests and gateways)
    #[serde(default)]
    pub api_base: Option<String>,

    /// Environment variable holding the API key
    #[serde(default = "default_gemini_key_env")]
    pub api_key_env: String,

    /// Sampling parameters
    #[serde(default)]
    pub sampling: SamplingParameters,

    /// When to resend the system instructions
    #[serde(default)]
    pub system_prompt_mode: SystemPromptMode,

    /// Per-request timeout (seconds)
    #[serde(default = "default_request_timeout")]
    pub timeout_seconds: u64,
}

fn default_gemini_model() -> String {
    "gemini-1.5-flash".to_string()
}

fn default_gemini_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            model: default_gemini_model(),
            api_base: None,
            api_key_env: default_gemini_key_env(),
            sampling: SamplingParameters::default(),
            system_prompt_mode: SystemPromptMode::default(),
            timeout_seconds: default_request_timeout(),
        }
    }
}

/// Retry policy for transient provider failures
///
/// Defaults to no retries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Additional attempts after the first failure
    #[serde(default)]
    pub max_retries: u32,

    /// Delay before the first retry, doubled on each further attempt
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,
}

fn default_initial_backoff_ms() -> u64 {
    500
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 0,
            initial_backoff_ms: default_initial_backoff_ms(),
        }
    }
}

/// Session seed and presentation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Display name of the assistant
    #[serde(default = "default_assistant_name")]
    pub assistant_name: String,

    /// System instructions seeded into every conversation
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,

    /// Opening assistant message
    #[serde(default = "default_greeting")]
    pub greeting: String,

    /// Canned prompts offered to the user
    #[serde(default = "default_quick_prompts")]
    pub quick_prompts: Vec<String>,

    /// Directory that transcript exports are written to
    #[serde(default = "default_export_dir")]
    pub export_dir: PathBuf,
}

fn default_assistant_name() -> String {
    prompts::DEFAULT_ASSISTANT_NAME.to_string()
}

fn default_system_prompt() -> String {
    prompts::DEFAULT_SYSTEM_PROMPT.to_string()
}

fn default_greeting() -> String {
    prompts::DEFAULT_GREETING.to_string()
}

fn default_quick_prompts() -> Vec<String> {
    prompts::DEFAULT_QUICK_PROMPTS
        .iter()
        .map(|p| p.to_string())
        .collect()
}

fn default_export_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            assistant_name: default_assistant_name(),
            system_prompt: default_system_prompt(),
            greeting: default_greeting(),
            quick_prompts: default_quick_prompts(),
            export_dir: default_export_dir(),
        }
    }
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// # Arguments
    ///
    /// * `path` - Path to configuration file
    /// * `cli` - CLI arguments for overrides
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default_config()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn default_config() -> Self {
        Self {
            provider: ProviderConfig {
                provider_type: "openai".to_string(),
                openai: OpenAiConfig::default(),
                gemini: GeminiConfig::default(),
                retry: RetryConfig::default(),
            },
            session: SessionConfig::default(),
        }
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| GenieError::Config(format!("Failed to read config file: {}", e)))?;
        Self::from_yaml(&contents)
    }

    /// Parse configuration from a YAML document
    pub fn from_yaml(contents: &str) -> Result<Self> {
        serde_yaml::from_str(contents)
            .map_err(|e| GenieError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(provider_type) = std::env::var("GENIE_PROVIDER") {
            self.provider.provider_type = provider_type;
        }

        if let Ok(model) = std::env::var("GENIE_OPENAI_MODEL") {
            self.provider.openai.model = model;
        }

        if let Ok(model) = std::env::var("GENIE_GEMINI_MODEL") {
            self.provider.gemini.model = model;
        }

        if let Ok(mode) = std::env::var("GENIE_SYSTEM_PROMPT_MODE") {
            match SystemPromptMode::parse_str(&mode) {
                Ok(value) => {
                    self.provider.gemini.system_prompt_mode = value;
                    tracing::debug!(mode = %mode, "Env override: GENIE_SYSTEM_PROMPT_MODE");
                }
                Err(_) => tracing::warn!("Invalid GENIE_SYSTEM_PROMPT_MODE: {}", mode),
            }
        }

        if let Ok(retries) = std::env::var("GENIE_MAX_RETRIES") {
            if let Ok(value) = retries.parse() {
                self.provider.retry.max_retries = value;
            } else {
                tracing::warn!("Invalid GENIE_MAX_RETRIES: {}", retries);
            }
        }

        if let Ok(dir) = std::env::var("GENIE_EXPORT_DIR") {
            self.session.export_dir = PathBuf::from(dir);
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if let Some(provider) = cli.provider_override() {
            tracing::debug!("Using provider override: {}", provider);
            self.provider.provider_type = provider.to_string();
        }
        if cli.verbose {
            tracing::debug!("Verbose mode enabled");
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns error if any validation check fails
    pub fn validate(&self) -> Result<()> {
        if self.provider.provider_type.is_empty() {
            return Err(GenieError::Config("Provider type cannot be empty".to_string()).into());
        }

        if !VALID_PROVIDERS.contains(&self.provider.provider_type.as_str()) {
            return Err(GenieError::Config(format!(
                "Invalid provider type: {}. Must be one of: {}",
                self.provider.provider_type,
                VALID_PROVIDERS.join(", ")
            ))
            .into());
        }

        let openai = &self.provider.openai;
        validate_endpoint(
            "openai",
            &openai.model,
            openai.api_base.as_deref(),
            openai.timeout_seconds,
        )?;
        openai.sampling.validate("openai")?;

        let gemini = &self.provider.gemini;
        validate_endpoint(
            "gemini",
            &gemini.model,
            gemini.api_base.as_deref(),
            gemini.timeout_seconds,
        )?;
        gemini.sampling.validate("gemini")?;

        if self.provider.retry.max_retries > 10 {
            return Err(GenieError::Config(
                "retry.max_retries must be less than or equal to 10".to_string(),
            )
            .into());
        }

        if self.session.system_prompt.trim().is_empty() {
            return Err(
                GenieError::Config("session.system_prompt cannot be empty".to_string()).into(),
            );
        }

        if self.session.greeting.trim().is_empty() {
            return Err(GenieError::Config("session.greeting cannot be empty".to_string()).into());
        }

        if self.session.assistant_name.trim().is_empty() {
            return Err(
                GenieError::Config("session.assistant_name cannot be empty".to_string()).into(),
            );
        }

        Ok(())
    }
}

fn validate_endpoint(
    section: &str,
    model: &str,
    api_base: Option<&str>,
    timeout_seconds: u64,
) -> Result<()> {
    if model.trim().is_empty() {
        return Err(GenieError::Config(format!("{}.model cannot be empty", section)).into());
    }

    if let Some(base) = api_base {
        url::Url::parse(base).map_err(|e| {
            GenieError::Config(format!("{}.api_base is not a valid URL: {}", section, e))
        })?;
    }

    if timeout_seconds == 0 {
        return Err(GenieError::Config(format!(
            "{}.timeout_seconds must be greater than 0",
            section
        ))
        .into());
    }

    Ok(())
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}
