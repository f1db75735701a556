//! Genie - Dubai trip-planner chat assistant library
//!
//! This library provides the core of the Genie chat: conversation state, the
//! model gateway that talks to hosted language models, the controller that
//! runs one session, transcript export, and configuration.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `agent`: Conversation history, model gateway, and session controller
//! - `providers`: Provider abstraction and implementations (OpenAI, Gemini)
//! - `export`: Plain-text transcript export
//! - `prompts`: Default seed prompts and the local help reply
//! - `commands`: Interactive chat and one-shot command handlers
//! - `config`: Configuration management and validation
//! - `error`: Error types, user-facing categories, and result aliases
//! - `cli`: Command-line interface definition
//!
//! # Example
//!
//! ```no_run
//! use genie::{Config, ConversationController, ModelGateway};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config/config.yaml", &Default::default())?;
//!     config.validate()?;
//!
//!     let gateway = Arc::new(ModelGateway::from_config(&config.provider)?);
//!     let mut controller = ConversationController::new(gateway, &config.session);
//!     if let Some(reply) = controller.handle_user_message("Top attractions?").await? {
//!         println!("{}", reply.content());
//!     }
//!     Ok(())
//! }
//! ```

pub mod agent;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod export;
pub mod prompts;
pub mod providers;

// Re-export commonly used types
pub use agent::{Conversation, ConversationController, ModelGateway};
pub use config::Config;
pub use error::{ErrorCategory, GenieError, Result};

#[cfg(test)]
pub mod test_utils;
