//! Conversation controller: the request/response loop of one chat session
//!
//! The controller owns a [`Conversation`] and drives it through exactly one
//! user turn and one assistant turn per accepted input. Local commands are
//! answered here without touching the model gateway.

use crate::agent::{Conversation, ModelGateway, SessionSeed};
use crate::config::SessionConfig;
use crate::error::Result;
use crate::export;
use crate::prompts;
use crate::providers::Turn;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Where the controller is in its request/response cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    /// Ready for the next user input
    AwaitingInput,
    /// A model call is in flight
    Dispatching,
}

/// Input answered locally, without a model call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalCommand {
    /// Canned description of the assistant and its quick prompts
    Help,
}

impl LocalCommand {
    /// Recognize a local command in raw user input
    ///
    /// Matching ignores surrounding whitespace and letter case.
    ///
    /// # Examples
    ///
    /// ```
    /// use genie::agent::LocalCommand;
    ///
    /// assert_eq!(LocalCommand::parse("  HeLp "), Some(LocalCommand::Help));
    /// assert_eq!(LocalCommand::parse("help me plan"), None);
    /// ```
    pub fn parse(input: &str) -> Option<Self> {
        if input.trim().eq_ignore_ascii_case("help") {
            Some(Self::Help)
        } else {
            None
        }
    }
}

/// Drives one chat session
///
/// Takes `&mut self` for every mutation, so a session never has more than
/// one model call in flight. The gateway holds no conversation state and can
/// be shared between sessions.
#[derive(Debug)]
pub struct ConversationController {
    gateway: Arc<ModelGateway>,
    conversation: Conversation,
    assistant_name: String,
    quick_prompts: Vec<String>,
    state: ControllerState,
}

impl ConversationController {
    /// Creates a controller with a freshly seeded conversation
    ///
    /// # Arguments
    ///
    /// * `gateway` - Model gateway shared with other sessions
    /// * `session` - Seed, assistant name and quick prompts
    pub fn new(gateway: Arc<ModelGateway>, session: &SessionConfig) -> Self {
        let conversation = Conversation::new(SessionSeed::from(session));
        tracing::info!(session = %conversation.id(), "Started chat session");

        Self {
            gateway,
            conversation,
            assistant_name: session.assistant_name.clone(),
            quick_prompts: session.quick_prompts.clone(),
            state: ControllerState::AwaitingInput,
        }
    }

    /// Handles one user input and returns the assistant's reply turn
    ///
    /// Returns `Ok(None)` without changing anything when the input is empty
    /// or whitespace. Otherwise the input is appended verbatim as a user
    /// turn, then exactly one assistant turn is appended: the help text for
    /// `help`, or the gateway's reply (possibly a failure message).
    ///
    /// # Errors
    ///
    /// Returns error only if the conversation rejects a turn
    pub async fn handle_user_message(&mut self, text: &str) -> Result<Option<Turn>> {
        if text.trim().is_empty() {
            tracing::debug!(session = %self.conversation.id(), "Ignoring empty input");
            return Ok(None);
        }

        self.conversation.append(Turn::user(text))?;

        let reply = match LocalCommand::parse(text) {
            Some(LocalCommand::Help) => {
                tracing::debug!(session = %self.conversation.id(), "Answering help locally");
                prompts::build_help_text(&self.assistant_name, &self.quick_prompts)
            }
            None => {
                self.state = ControllerState::Dispatching;
                let reply = self.gateway.send(&self.conversation).await;
                self.state = ControllerState::AwaitingInput;
                reply
            }
        };

        let turn = Turn::assistant(reply);
        self.conversation.append(turn.clone())?;

        tracing::debug!(
            session = %self.conversation.id(),
            turns = self.conversation.len(),
            "Exchange complete"
        );

        Ok(Some(turn))
    }

    /// Sends quick prompt `index` (zero-based) as if the user had typed it
    ///
    /// Returns `Ok(None)` if there is no such prompt.
    pub async fn send_quick_prompt(&mut self, index: usize) -> Result<Option<Turn>> {
        match self.quick_prompts.get(index).cloned() {
            Some(prompt) => self.handle_user_message(&prompt).await,
            None => Ok(None),
        }
    }

    /// Clears the conversation back to its seed
    pub fn reset(&mut self) {
        self.conversation.reset();
        tracing::info!(session = %self.conversation.id(), "Conversation cleared");
    }

    /// Writes the transcript into `dir`
    ///
    /// Returns `Ok(None)` when there is nothing to export yet.
    pub fn export(&self, dir: &Path) -> Result<Option<PathBuf>> {
        export::export_conversation(&self.conversation, &self.assistant_name, dir)
    }

    /// Current state of the request/response cycle
    pub fn state(&self) -> ControllerState {
        self.state
    }

    /// The conversation owned by this session
    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// Configured quick prompts
    pub fn quick_prompts(&self) -> &[String] {
        &self.quick_prompts
    }

    /// Display name of the assistant
    pub fn assistant_name(&self) -> &str {
        &self.assistant_name
    }

    /// Gateway used for model calls
    pub fn gateway(&self) -> &ModelGateway {
        &self.gateway
    }
}
