//! Command-line interface definition for Genie
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for an interactive chat and a one-shot question.

use clap::{Parser, Subcommand};

/// Genie - Dubai trip-planner chat assistant
///
/// Chat with a hosted language model (OpenAI or Gemini) that plays the
/// Dubai Genie trip planner.
#[derive(Parser, Debug, Clone)]
#[command(name = "genie")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for Genie
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start an interactive chat session
    Chat {
        /// Override the provider from config (openai, gemini)
        #[arg(short, long)]
        provider: Option<String>,
    },

    /// Ask a single question and print the reply
    Ask {
        /// Question to send
        prompt: String,

        /// Override the provider from config (openai, gemini)
        #[arg(short, long)]
        provider: Option<String>,
    },
}

impl Cli {
    /// Parse command line arguments
    ///
    /// # Returns
    ///
    /// Returns the parsed CLI structure
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Provider override given on the command line, if any
    pub fn provider_override(&self) -> Option<&str> {
        match &self.command {
            Commands::Chat { provider } | Commands::Ask { provider, .. } => provider.as_deref(),
        }
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            config: Some("config/config.yaml".to_string()),
            verbose: false,
            command: Commands::Chat { provider: None },
        }
    }
}
