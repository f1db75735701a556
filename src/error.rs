//! Error types for Genie
//!
//! This module defines the internal error type used throughout the
//! application, using `thiserror` for ergonomic error handling, and the
//! user-facing [`ErrorCategory`] taxonomy that provider failures are folded
//! into before they reach the conversation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// User-facing category of a model gateway failure
///
/// Every provider failure is mapped onto exactly one of these categories.
/// Each category carries a fixed, user-readable message that becomes the
/// assistant's reply in place of a model answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// No API key was available; the gateway never attempts a call
    NotConfigured,
    /// Provider reported billing or rate-limit exhaustion
    QuotaExceeded,
    /// Provider rejected the API key
    InvalidCredential,
    /// Requested model identifier is not accessible
    ModelUnavailable,
    /// Any other transport or runtime fault
    TransientFailure,
}

impl ErrorCategory {
    /// Fixed message shown to the user for this category
    ///
    /// # Examples
    ///
    /// ```
    /// use genie::error::ErrorCategory;
    ///
    /// assert!(ErrorCategory::QuotaExceeded.user_message().contains("quota"));
    /// ```
    pub fn user_message(self) -> &'static str {
        match self {
            Self::NotConfigured => {
                "Dubai Genie is not configured yet: no API key was found. Please set the provider API key and restart the session."
            }
            Self::QuotaExceeded => {
                "The model provider reports that the usage quota has been exceeded. Please check your plan and billing details, then try again later."
            }
            Self::InvalidCredential => {
                "The model provider rejected the API key. Please check that the configured key is correct."
            }
            Self::ModelUnavailable => {
                "The requested model is not available for this API key. Please configure a different model."
            }
            Self::TransientFailure => {
                "Sorry, something went wrong while contacting the model provider. Please try again."
            }
        }
    }

    /// Whether a failure of this category may succeed when retried
    pub fn is_retryable(self) -> bool {
        matches!(self, Self::TransientFailure)
    }

    /// Classify an arbitrary error raised while talking to a provider
    ///
    /// Provider errors keep their category. Raw HTTP errors and anything
    /// else unknown are treated as transient.
    pub fn classify(err: &anyhow::Error) -> Self {
        match err.downcast_ref::<GenieError>() {
            Some(GenieError::Provider { category, .. }) => *category,
            _ => Self::TransientFailure,
        }
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotConfigured => write!(f, "not_configured"),
            Self::QuotaExceeded => write!(f, "quota_exceeded"),
            Self::InvalidCredential => write!(f, "invalid_credential"),
            Self::ModelUnavailable => write!(f, "model_unavailable"),
            Self::TransientFailure => write!(f, "transient_failure"),
        }
    }
}

/// Main error type for Genie operations
#[derive(Error, Debug)]
pub enum GenieError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Conversation invariant violations
    #[error("Session error: {0}")]
    Session(String),

    /// Transcript export errors
    #[error("Export error: {0}")]
    Export(String),

    /// Provider failures, already categorized for the user
    #[error("Provider error ({category}): {message}")]
    Provider {
        /// User-facing category of the failure
        category: ErrorCategory,
        /// Provider-specific detail for logs
        message: String,
    },

    /// Interactive command errors
    #[error("Command error: {0}")]
    Command(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl GenieError {
    /// Build a categorized provider error
    pub fn provider(category: ErrorCategory, message: impl Into<String>) -> Self {
        Self::Provider {
            category,
            message: message.into(),
        }
    }
}

/// Result type alias for Genie operations
///
/// Uses `anyhow::Error` so call sites can attach context freely; typed
/// [`GenieError`] values are recovered with `downcast_ref` where needed.
pub type Result<T> = anyhow::Result<T>;
