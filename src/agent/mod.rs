//! Agent module for Genie
//!
//! This module contains the chat session core: the conversation history, the
//! model gateway that talks to providers, and the controller that ties them
//! together for one session.

pub mod controller;
pub mod conversation;
pub mod gateway;

pub use controller::{ControllerState, ConversationController, LocalCommand};
pub use conversation::{Conversation, SessionSeed};
pub use gateway::ModelGateway;
