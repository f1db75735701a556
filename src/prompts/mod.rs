//! Seed prompts and canned replies for the trip planner
//!
//! This module holds the default system instructions, the opening greeting,
//! the quick prompts offered to the user, and the help reply produced by the
//! local `help` command.

/// Default display name of the assistant
pub const DEFAULT_ASSISTANT_NAME: &str = "Dubai Genie";

/// Default system instructions for the trip planner
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a trip planner in Dubai. You are very knowledgeable \
about the city and can provide detailed information about attractions, restaurants, and activities. \
You are able to suggest itineraries based on user preferences and interests. You are also able to \
provide information about local customs, transportation, and safety tips. Your goal is to help users \
plan the perfect trip to Dubai. You should respond professionally and politely, and you should always \
provide accurate and helpful information. You should also be able to handle any questions or concerns \
that users may have about their trip. You are a friendly and approachable trip planner who is always \
willing to help. Your name is Dubai Genie. Short name is DG. Responses should not exceed 200 words. \
Always ask questions to the user and help them to plan their trip. Finally give a day wise itinerary. \
Deal with the user professionally and politely.";

/// Default opening assistant message
pub const DEFAULT_GREETING: &str =
    "Hello! I am DG, your trip planner in Dubai. How can I assist you today?";

/// Default quick prompts
pub const DEFAULT_QUICK_PROMPTS: [&str; 4] = [
    "What are the top attractions in Dubai?",
    "Plan a 3-day itinerary for a family trip to Dubai.",
    "What local customs should I be aware of when visiting Dubai?",
    "What is the best way to get around Dubai?",
];

/// Builds the reply for the local `help` command
///
/// The text depends only on its inputs, so a given configuration always
/// yields the same help turn.
///
/// # Examples
///
/// ```
/// use genie::prompts::build_help_text;
///
/// let help = build_help_text("Dubai Genie", &["Where should I eat?".to_string()]);
/// assert!(help.contains("Dubai Genie"));
/// assert!(help.contains("1. Where should I eat?"));
/// ```
pub fn build_help_text(assistant_name: &str, quick_prompts: &[String]) -> String {
    let mut text = format!(
        "I am {}, your trip planner. Ask me about attractions, restaurants, activities, \
local customs, transportation, or safety, and I will help you build a day-by-day itinerary.",
        assistant_name
    );

    if !quick_prompts.is_empty() {
        text.push_str("\n\nTry one of these to get started:");
        for (idx, prompt) in quick_prompts.iter().enumerate() {
            text.push_str(&format!("\n{}. {}", idx + 1, prompt));
        }
    }

    text
}
