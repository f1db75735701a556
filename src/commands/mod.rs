/*!
Command handlers for the CLI

This module provides command handlers invoked by the CLI entrypoint.

It exposes two top-level command modules:

- `chat`: interactive chat session
- `ask`: single question, single answer

Both are thin presentation layers over the conversation controller.
*/

use crate::agent::{ConversationController, ModelGateway};
use crate::config::Config;
use crate::error::Result;
use crate::providers::{Role, Turn};
use colored::Colorize;
use std::sync::Arc;

// Special commands parser for the interactive session
pub mod special_commands;

/// Build a controller for one session from configuration
///
/// A missing API key does not fail: the session starts and every model
/// call answers with the not-configured message.
///
/// # Errors
///
/// Returns error if the provider type is unknown or the HTTP client cannot
/// be created
pub fn build_controller(config: &Config) -> Result<ConversationController> {
    let gateway = Arc::new(ModelGateway::from_config(&config.provider)?);
    Ok(ConversationController::new(gateway, &config.session))
}

fn render_turn(turn: &Turn, assistant_name: &str) {
    match turn.role() {
        Role::User => println!("{} {}", "You:".bold().cyan(), turn.content()),
        Role::Assistant => println!(
            "{} {}",
            format!("{}:", assistant_name).bold().green(),
            turn.content()
        ),
        Role::System => {}
    }
}

// Chat command handler
pub mod chat {
    //! Interactive chat session handler.
    //!
    //! Creates a conversation controller and runs a readline-based loop that
    //! submits user input to it, handling the special commands locally.

    use super::*;
    use crate::commands::special_commands::{parse_special_command, print_help, SpecialCommand};
    use rustyline::error::ReadlineError;
    use rustyline::DefaultEditor;

    /// Start an interactive chat session
    ///
    /// # Arguments
    ///
    /// * `config` - Global configuration (consumed)
    ///
    /// # Examples
    ///
    /// ```
    /// use genie::commands::chat;
    /// use genie::config::Config;
    ///
    /// // In application code:
    /// // chat::run_chat(Config::default()).await?;
    /// ```
    pub async fn run_chat(config: Config) -> Result<()> {
        tracing::info!("Starting interactive chat session");

        let mut controller = build_controller(&config)?;
        let mut rl = DefaultEditor::new()?;

        print_welcome_banner(&controller);
        if let Some(greeting) = controller.conversation().visible_turns().next() {
            render_turn(greeting, controller.assistant_name());
        }
        println!();

        loop {
            match rl.readline(&format!("{} ", "You >".cyan())) {
                Ok(line) => {
                    if line.trim().is_empty() {
                        continue;
                    }
                    rl.add_history_entry(line.as_str())?;

                    let command = match parse_special_command(&line) {
                        Ok(command) => command,
                        Err(e) => {
                            eprintln!("{}\n", e.to_string().red());
                            continue;
                        }
                    };

                    match command {
                        SpecialCommand::Exit => break,
                        SpecialCommand::Help => print_help(),
                        SpecialCommand::ShowStatus => print_status_info(&controller),
                        SpecialCommand::ListPrompts => print_quick_prompts(&controller),
                        SpecialCommand::Clear => {
                            controller.reset();
                            println!("{}\n", "Conversation cleared.".yellow());
                            if let Some(greeting) =
                                controller.conversation().visible_turns().next()
                            {
                                render_turn(greeting, controller.assistant_name());
                                println!();
                            }
                        }
                        SpecialCommand::Export => {
                            match controller.export(&config.session.export_dir) {
                                Ok(Some(path)) => println!(
                                    "{} {}\n",
                                    "Conversation exported to".green(),
                                    path.display()
                                ),
                                Ok(None) => println!(
                                    "{}\n",
                                    "Nothing to export yet: start a conversation first."
                                        .yellow()
                                ),
                                Err(e) => eprintln!("{}\n", format!("Error: {}", e).red()),
                            }
                        }
                        SpecialCommand::SendPrompt(n) => {
                            send_quick_prompt(&mut controller, n).await
                        }
                        SpecialCommand::None => submit(&mut controller, &line).await,
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("CTRL-C");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    println!("CTRL-D");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {:?}", err);
                    break;
                }
            }
        }

        println!("Goodbye!");
        Ok(())
    }

    async fn submit(controller: &mut ConversationController, text: &str) {
        match controller.handle_user_message(text).await {
            Ok(Some(reply)) => print_reply(controller, &reply),
            Ok(None) => {}
            Err(e) => eprintln!("{}\n", format!("Error: {}", e).red()),
        }
    }

    /// Send quick prompt `n` (one-based, as listed by `/prompts`)
    async fn send_quick_prompt(controller: &mut ConversationController, n: usize) {
        if let Some(prompt) = controller.quick_prompts().get(n - 1) {
            println!("{} {}", "You:".bold().cyan(), prompt);
        }
        match controller.send_quick_prompt(n - 1).await {
            Ok(Some(reply)) => print_reply(controller, &reply),
            Ok(None) => eprintln!(
                "{}\n",
                format!("No quick prompt {}; type '/prompts' to list them", n).red()
            ),
            Err(e) => eprintln!("{}\n", format!("Error: {}", e).red()),
        }
    }

    fn print_reply(controller: &ConversationController, reply: &Turn) {
        println!();
        render_turn(reply, controller.assistant_name());
        println!();
    }

    /// Display welcome banner at the start of an interactive session
    fn print_welcome_banner(controller: &ConversationController) {
        let title = format!("{} - Interactive Chat", controller.assistant_name());
        println!("\n╔══════════════════════════════════════════════════════════════╗");
        println!("║ {:^60} ║", title);
        println!("╚══════════════════════════════════════════════════════════════╝\n");

        if !controller.gateway().is_configured() {
            println!(
                "{}\n",
                "Warning: no API key found, replies will explain how to configure one."
                    .yellow()
            );
        }
        println!("Type 'help' to ask what I can do, '/help' for commands, 'exit' to quit\n");
    }

    fn print_quick_prompts(controller: &ConversationController) {
        if controller.quick_prompts().is_empty() {
            println!("{}\n", "No quick prompts configured.".yellow());
            return;
        }
        println!("{}", "Quick prompts:".bold());
        for (idx, prompt) in controller.quick_prompts().iter().enumerate() {
            println!("  {}. {}", idx + 1, prompt);
        }
        println!("\nUse '/prompt <n>' to send one.\n");
    }

    /// Display detailed status information about the current session
    fn print_status_info(controller: &ConversationController) {
        let gateway = controller.gateway();
        let provider = gateway.provider_name().unwrap_or("not configured");
        let model = gateway.model().unwrap_or_else(|| "-".to_string());

        println!("\n╔══════════════════════════════════════════════════════════════╗");
        println!("║                        Session Status                        ║");
        println!("╚══════════════════════════════════════════════════════════════╝\n");
        println!("Session:           {}", controller.conversation().id());
        println!("Provider:          {}", provider.cyan());
        println!("Model:             {}", model.cyan());
        println!(
            "Conversation Size: {} turns ({} from you)",
            controller.conversation().len(),
            controller.conversation().user_turn_count()
        );
        println!();
    }

}

// One-shot command handler
pub mod ask {
    //! Single-exchange handler: one question in, one assistant reply out.

    use super::*;
    use crate::error::GenieError;

    /// Ask a single question and print the reply
    ///
    /// # Arguments
    ///
    /// * `config` - Global configuration (consumed)
    /// * `prompt` - Question to send
    ///
    /// # Errors
    ///
    /// Returns error if the prompt is empty or the controller cannot be built
    pub async fn run_ask(config: Config, prompt: String) -> Result<()> {
        let mut controller = build_controller(&config)?;
        let reply = ask(&mut controller, &prompt).await?;
        println!("{}", reply.content());
        Ok(())
    }

    /// Run one exchange through the controller
    ///
    /// # Errors
    ///
    /// Returns `GenieError::Command` if the prompt is empty
    pub async fn ask(controller: &mut ConversationController, prompt: &str) -> Result<Turn> {
        controller
            .handle_user_message(prompt)
            .await?
            .ok_or_else(|| GenieError::Command("Prompt cannot be empty".to_string()).into())
    }

}
