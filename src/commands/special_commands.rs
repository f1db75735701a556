//! Special commands parser for interactive chat mode
//!
//! This module parses the REPL commands that act on the session instead of
//! being sent to the assistant:
//! - List or send the quick prompts
//! - Clear the conversation
//! - Export the transcript
//! - View session status
//! - Exit the session
//!
//! Commands are prefixed with `/` and are case-insensitive. Plain `help`
//! (without a slash) is not a special command: it goes to the conversation,
//! where it is answered locally.

use thiserror::Error;

/// Errors that can occur when parsing special commands
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Unknown command was entered
    #[error("Unknown command: {0}\n\nType '/help' to see available commands")]
    UnknownCommand(String),

    /// Command was given an unsupported argument
    #[error("Unsupported argument for {command}: {arg}\n\nType '/help' to see valid usage")]
    UnsupportedArgument { command: String, arg: String },

    /// Command requires an argument but none was provided
    #[error("Command {command} requires an argument\n\nUsage: {usage}")]
    MissingArgument { command: String, usage: String },
}

/// Special commands that can be executed during interactive chat
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecialCommand {
    /// List the quick prompts with their numbers
    ListPrompts,

    /// Send quick prompt `n` (1-based) as if the user typed it
    SendPrompt(usize),

    /// Reset the conversation to its greeting
    Clear,

    /// Write the transcript to the export directory
    Export,

    /// Display provider, model and conversation size
    ShowStatus,

    /// Display the list of special commands
    Help,

    /// Exit the interactive session
    Exit,

    /// Not a special command
    ///
    /// The input should be sent to the conversation.
    None,
}

/// Parse a user input string into a special command
///
/// # Returns
///
/// Returns Ok(SpecialCommand) for valid commands or SpecialCommand::None for
/// ordinary messages.
///
/// # Errors
///
/// Returns CommandError::UnknownCommand if input starts with "/" but is not a valid command.
/// Returns CommandError::UnsupportedArgument if a command receives an invalid argument.
/// Returns CommandError::MissingArgument if a command requires an argument but none was provided.
///
/// # Examples
///
/// ```
/// use genie::commands::special_commands::{parse_special_command, SpecialCommand};
///
/// assert_eq!(parse_special_command("/prompt 2").unwrap(), SpecialCommand::SendPrompt(2));
/// assert_eq!(parse_special_command("/CLEAR").unwrap(), SpecialCommand::Clear);
/// assert_eq!(parse_special_command("help").unwrap(), SpecialCommand::None);
/// assert!(parse_special_command("/foo").is_err());
/// ```
pub fn parse_special_command(input: &str) -> Result<SpecialCommand, CommandError> {
    let trimmed = input.trim();
    let lower = trimmed.to_lowercase();

    if !trimmed.starts_with('/') && lower != "exit" && lower != "quit" {
        return Ok(SpecialCommand::None);
    }

    match lower.as_str() {
        "exit" | "quit" | "/exit" | "/quit" => Ok(SpecialCommand::Exit),
        "/help" | "/?" => Ok(SpecialCommand::Help),
        "/status" => Ok(SpecialCommand::ShowStatus),
        "/clear" | "/reset" => Ok(SpecialCommand::Clear),
        "/export" => Ok(SpecialCommand::Export),
        "/prompts" => Ok(SpecialCommand::ListPrompts),

        "/prompt" => Err(CommandError::MissingArgument {
            command: "/prompt".to_string(),
            usage: "/prompt <number>".to_string(),
        }),
        input if input.starts_with("/prompt ") => {
            let arg = input[8..].trim();
            match arg.parse::<usize>() {
                Ok(n) if n > 0 => Ok(SpecialCommand::SendPrompt(n)),
                _ => Err(CommandError::UnsupportedArgument {
                    command: "/prompt".to_string(),
                    arg: arg.to_string(),
                }),
            }
        }

        _ => Err(CommandError::UnknownCommand(trimmed.to_string())),
    }
}

/// Display help for the special commands
pub fn print_help() {
    println!(
        r#"
Special Commands for Interactive Chat Mode
==========================================

QUICK PROMPTS:
  /prompts        - List the quick prompts
  /prompt <n>     - Send quick prompt number n

SESSION:
  /clear          - Clear the conversation (also /reset)
  /export         - Save the conversation to a text file
  /status         - Show provider, model and conversation size
  /help           - Show this help message

  help            - Ask the assistant what it can do (answered locally)
  exit, quit      - Exit the session
"#
    );
}
