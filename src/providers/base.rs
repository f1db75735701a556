//! Base provider trait and common types for Genie
//!
//! This module defines the Provider trait that all model providers must
//! implement, along with the provider-neutral turn types that the rest of the
//! crate speaks and the response structure providers hand back.

use crate::error::{ErrorCategory, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Role of a turn in the conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Hidden instructions that seed the conversation
    System,
    /// A message typed (or injected) by the user
    User,
    /// A reply produced by the assistant
    Assistant,
}

impl Role {
    /// Lowercase wire name of the role
    pub fn as_str(self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One message in a conversation, tagged with a role
///
/// Turns are immutable once created: fields are private and only exposed
/// through accessors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    role: Role,
    content: String,
}

impl Turn {
    /// Creates a new system turn
    ///
    /// # Examples
    ///
    /// ```
    /// use genie::providers::{Role, Turn};
    ///
    /// let turn = Turn::system("You are a trip planner");
    /// assert_eq!(turn.role(), Role::System);
    /// ```
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    /// Creates a new user turn
    ///
    /// # Examples
    ///
    /// ```
    /// use genie::providers::{Role, Turn};
    ///
    /// let turn = Turn::user("Hello!");
    /// assert_eq!(turn.role(), Role::User);
    /// assert_eq!(turn.content(), "Hello!");
    /// ```
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Creates a new assistant turn
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }

    /// Role of the turn
    pub fn role(&self) -> Role {
        self.role
    }

    /// Text of the turn
    pub fn content(&self) -> &str {
        &self.content
    }
}

/// Token usage information from a completion
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Number of tokens in the prompt
    pub prompt_tokens: usize,
    /// Number of tokens in the completion
    pub completion_tokens: usize,
    /// Total tokens used (prompt + completion)
    pub total_tokens: usize,
}

impl TokenUsage {
    /// Create a new TokenUsage instance
    ///
    /// # Examples
    ///
    /// ```
    /// use genie::providers::TokenUsage;
    ///
    /// let usage = TokenUsage::new(100, 50);
    /// assert_eq!(usage.total_tokens, 150);
    /// ```
    pub fn new(prompt_tokens: usize, completion_tokens: usize) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }
}

/// Completion response with reply text and optional token usage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionResponse {
    /// Plain text of the model's reply
    pub text: String,
    /// Optional token usage information
    pub usage: Option<TokenUsage>,
}

impl CompletionResponse {
    /// Create a new CompletionResponse without usage data
    ///
    /// # Examples
    ///
    /// ```
    /// use genie::providers::CompletionResponse;
    ///
    /// let response = CompletionResponse::new("Hello!");
    /// assert_eq!(response.text, "Hello!");
    /// assert!(response.usage.is_none());
    /// ```
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            usage: None,
        }
    }

    /// Create a new CompletionResponse with token usage
    pub fn with_usage(text: impl Into<String>, usage: TokenUsage) -> Self {
        Self {
            text: text.into(),
            usage: Some(usage),
        }
    }
}

/// Provider trait for remote model APIs
///
/// Implementations own the translation from provider-neutral [`Turn`]s to
/// their wire format and back. Failures should be raised as
/// [`GenieError::Provider`](crate::error::GenieError::Provider) so the
/// gateway can categorize them; anything else is treated as transient.
///
/// # Examples
///
/// ```no_run
/// use genie::providers::{CompletionResponse, Provider, Turn};
/// use genie::error::Result;
/// use async_trait::async_trait;
///
/// struct EchoProvider;
///
/// #[async_trait]
/// impl Provider for EchoProvider {
///     async fn complete(&self, turns: &[Turn]) -> Result<CompletionResponse> {
///         let last = turns.last().map(|t| t.content()).unwrap_or_default();
///         Ok(CompletionResponse::new(last))
///     }
///
///     fn name(&self) -> &'static str {
///         "echo"
///     }
///
///     fn model(&self) -> String {
///         "echo-1".to_string()
///     }
/// }
/// ```
#[async_trait]
pub trait Provider: Send + Sync {
    /// Completes a conversation, returning the assistant's reply
    ///
    /// # Arguments
    ///
    /// * `turns` - Full conversation history, system turn first
    ///
    /// # Errors
    ///
    /// Returns error if the API call fails or the response is invalid
    async fn complete(&self, turns: &[Turn]) -> Result<CompletionResponse>;

    /// Short provider identifier used in logs and status output
    fn name(&self) -> &'static str;

    /// Identifier of the model requests are sent to
    fn model(&self) -> String;
}

/// Baseline mapping from an HTTP status to a user-facing category
///
/// Providers refine this with error codes from the response body.
pub fn category_for_status(status: reqwest::StatusCode) -> ErrorCategory {
    match status.as_u16() {
        401 | 403 => ErrorCategory::InvalidCredential,
        404 => ErrorCategory::ModelUnavailable,
        429 => ErrorCategory::QuotaExceeded,
        _ => ErrorCategory::TransientFailure,
    }
}
