//! Test utilities for Genie
//!
//! This module provides a scripted stub provider, temporary directory
//! management, and assertion helpers shared by unit tests.

use crate::error::{ErrorCategory, GenieError, Result};
use crate::providers::{CompletionResponse, Provider, Turn};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Create a temporary directory for testing
///
/// # Returns
///
/// Returns a TempDir that will be cleaned up when dropped
pub fn temp_dir() -> TempDir {
    TempDir::new().expect("Failed to create temporary directory")
}

/// Shared count of calls made to a [`StubProvider`]
#[derive(Debug, Clone, Default)]
pub struct CallCounter(Arc<AtomicUsize>);

impl CallCounter {
    /// Number of calls so far
    pub fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }

    fn bump(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

type ScriptedReply = std::result::Result<String, ErrorCategory>;

/// Provider that plays back scripted replies without any network access
///
/// Replies are consumed in order; the last one repeats once the script runs
/// out.
pub struct StubProvider {
    script: Mutex<VecDeque<ScriptedReply>>,
    calls: CallCounter,
    seen: Arc<Mutex<Vec<usize>>>,
}

impl StubProvider {
    /// Stub answering with the given replies in order
    pub fn replying<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::scripted(replies.into_iter().map(|r| Ok(r.into())).collect())
    }

    /// Stub failing every call with the given category
    pub fn failing(category: ErrorCategory) -> Self {
        Self::scripted(vec![Err(category)])
    }

    /// Stub playing back a mix of replies and failures
    pub fn scripted(script: Vec<ScriptedReply>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            calls: CallCounter::default(),
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Handle to the number of calls made
    pub fn call_counter(&self) -> CallCounter {
        self.calls.clone()
    }

    /// Handle to the conversation length seen on each call
    pub fn seen_lengths(&self) -> Arc<Mutex<Vec<usize>>> {
        Arc::clone(&self.seen)
    }
}

#[async_trait]
impl Provider for StubProvider {
    async fn complete(&self, turns: &[Turn]) -> Result<CompletionResponse> {
        self.calls.bump();
        self.seen.lock().unwrap().push(turns.len());

        let next = {
            let mut script = self.script.lock().unwrap();
            if script.len() > 1 {
                script.pop_front()
            } else {
                script.front().cloned()
            }
        };

        match next {
            Some(Ok(text)) => Ok(CompletionResponse::new(text)),
            Some(Err(category)) => {
                Err(GenieError::provider(category, "scripted stub failure").into())
            }
            None => Err(GenieError::provider(
                ErrorCategory::TransientFailure,
                "stub provider has no script",
            )
            .into()),
        }
    }

    fn name(&self) -> &'static str {
        "stub"
    }

    fn model(&self) -> String {
        "stub-model".to_string()
    }
}

/// Assert that an error contains the expected message
///
/// # Panics
///
/// Panics if the result is Ok or if the error doesn't contain the expected message
pub fn assert_error_contains<T: std::fmt::Debug>(result: Result<T>, expected: &str) {
    match result {
        Ok(value) => panic!("Expected error containing '{}', got Ok({:?})", expected, value),
        Err(e) => {
            let msg = e.to_string();
            assert!(
                msg.contains(expected),
                "Error message '{}' does not contain '{}'",
                msg,
                expected
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_stub_plays_script_then_repeats_last() {
        let stub = StubProvider::replying(["one", "two"]);
        let turns = [Turn::user("hi")];

        assert_eq!(stub.complete(&turns).await.unwrap().text, "one");
        assert_eq!(stub.complete(&turns).await.unwrap().text, "two");
        assert_eq!(stub.complete(&turns).await.unwrap().text, "two");
        assert_eq!(stub.call_counter().get(), 3);
    }

    #[tokio::test]
    async fn test_stub_failure_carries_category() {
        let stub = StubProvider::failing(ErrorCategory::ModelUnavailable);
        let err = stub.complete(&[]).await.unwrap_err();
        assert_eq!(ErrorCategory::classify(&err), ErrorCategory::ModelUnavailable);
    }

    #[test]
    fn test_assert_error_contains() {
        let result: Result<()> = Err(GenieError::Config("invalid".to_string()).into());
        assert_error_contains(result, "invalid");
    }

    #[test]
    fn test_temp_dir_exists() {
        let dir = temp_dir();
        assert!(dir.path().is_dir());
    }
}
