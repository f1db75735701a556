//! Conversation history for a single chat session
//!
//! A conversation always starts from a two-turn seed: the hidden system
//! instructions followed by the assistant's greeting. Turns are only ever
//! appended, one at a time, and the system turn can never be added twice.

use crate::config::SessionConfig;
use crate::error::{GenieError, Result};
use crate::providers::{Role, Turn};
use uuid::Uuid;

/// Seed content every conversation starts from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSeed {
    /// Hidden system instructions
    pub system_prompt: String,
    /// Opening assistant message shown to the user
    pub greeting: String,
}

impl SessionSeed {
    /// Creates a new seed
    pub fn new(system_prompt: impl Into<String>, greeting: impl Into<String>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            greeting: greeting.into(),
        }
    }

    fn turns(&self) -> [Turn; 2] {
        [
            Turn::system(self.system_prompt.clone()),
            Turn::assistant(self.greeting.clone()),
        ]
    }
}

impl From<&SessionConfig> for SessionSeed {
    fn from(config: &SessionConfig) -> Self {
        Self::new(config.system_prompt.clone(), config.greeting.clone())
    }
}

impl Default for SessionSeed {
    fn default() -> Self {
        Self::from(&SessionConfig::default())
    }
}

/// Ordered turn history of one session
///
/// The first turn is always the system turn and it is the only one.
///
/// # Examples
///
/// ```
/// use genie::agent::{Conversation, SessionSeed};
/// use genie::providers::Turn;
///
/// let mut conversation = Conversation::new(SessionSeed::new("Be helpful", "Hi there!"));
/// assert_eq!(conversation.len(), 2);
///
/// conversation.append(Turn::user("Hello")).unwrap();
/// assert!(conversation.has_exchanges());
///
/// conversation.reset();
/// assert_eq!(conversation.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct Conversation {
    id: Uuid,
    seed: SessionSeed,
    turns: Vec<Turn>,
}

impl Conversation {
    /// Creates a conversation holding only the seed turns
    pub fn new(seed: SessionSeed) -> Self {
        let turns = seed.turns().to_vec();
        Self {
            id: Uuid::new_v4(),
            seed,
            turns,
        }
    }

    /// Session identifier used in log output
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Restores the conversation to its two seed turns
    pub fn reset(&mut self) {
        tracing::debug!(session = %self.id, dropped = self.turns.len() - 2, "Conversation reset");
        self.turns.clear();
        self.turns.extend(self.seed.turns());
    }

    /// Appends exactly one turn
    ///
    /// # Errors
    ///
    /// Returns `GenieError::Session` if the turn has the system role
    pub fn append(&mut self, turn: Turn) -> Result<()> {
        if turn.role() == Role::System {
            return Err(GenieError::Session(
                "conversation already has a system turn".to_string(),
            )
            .into());
        }
        self.turns.push(turn);
        Ok(())
    }

    /// All turns, system turn first
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Turns shown to the user (everything except the system turn)
    pub fn visible_turns(&self) -> impl Iterator<Item = &Turn> {
        self.turns.iter().filter(|t| t.role() != Role::System)
    }

    /// Number of turns including the system turn
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Always false: a conversation holds at least its seed
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Number of user turns
    pub fn user_turn_count(&self) -> usize {
        self.turns.iter().filter(|t| t.role() == Role::User).count()
    }

    /// Whether the user has sent anything since the last reset
    pub fn has_exchanges(&self) -> bool {
        self.user_turn_count() > 0
    }

    /// Text of the system turn
    pub fn system_prompt(&self) -> &str {
        &self.seed.system_prompt
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new(SessionSeed::default())
    }
}
