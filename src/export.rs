//! Plain-text transcript export
//!
//! A transcript is a two-line header (title and generation time) followed by
//! every non-system turn, each preceded by a blank line:
//!
//! ```text
//! Dubai Genie Conversation
//! Generated: 2024-05-01 14:03:22
//!
//! Dubai Genie: Hello! I am DG, your trip planner in Dubai. How can I assist you today?
//!
//! You: What are the top attractions in Dubai?
//! ```

use crate::agent::Conversation;
use crate::error::{GenieError, Result};
use crate::providers::Role;
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};

/// Label used for user turns
pub const USER_LABEL: &str = "You";

const FILE_PREFIX: &str = "dubai_genie_chat_";

/// Render the transcript of a conversation
///
/// Line breaks inside a turn are folded into spaces so every turn stays on
/// one line.
///
/// # Examples
///
/// ```
/// use chrono::{Local, TimeZone};
/// use genie::agent::{Conversation, SessionSeed};
/// use genie::export::render_transcript;
/// use genie::providers::Turn;
///
/// let mut conversation = Conversation::new(SessionSeed::new("secret", "Hi!"));
/// conversation.append(Turn::user("Hello")).unwrap();
///
/// let at = Local.with_ymd_and_hms(2024, 5, 1, 14, 3, 22).unwrap();
/// let text = render_transcript(&conversation, "DG", at);
/// assert!(text.starts_with("DG Conversation\nGenerated: 2024-05-01 14:03:22\n"));
/// assert!(text.contains("\nYou: Hello\n"));
/// assert!(!text.contains("secret"));
/// ```
pub fn render_transcript(
    conversation: &Conversation,
    assistant_name: &str,
    generated_at: DateTime<Local>,
) -> String {
    let mut out = format!(
        "{} Conversation\nGenerated: {}\n",
        assistant_name,
        generated_at.format("%Y-%m-%d %H:%M:%S")
    );

    for turn in conversation.visible_turns() {
        let label = match turn.role() {
            Role::User => USER_LABEL,
            _ => assistant_name,
        };
        out.push('\n');
        out.push_str(label);
        out.push_str(": ");
        out.push_str(&single_line(turn.content()));
        out.push('\n');
    }

    out
}

fn single_line(text: &str) -> String {
    text.lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join(" ")
}

/// File name for an export taken at `at`
pub fn export_file_name(at: DateTime<Local>) -> String {
    format!("{}{}.txt", FILE_PREFIX, at.format("%Y%m%d_%H%M%S"))
}

/// Write the transcript of a conversation into `dir`
///
/// Returns `Ok(None)` and writes nothing when the conversation holds only
/// its seed. Otherwise returns the path of the new file.
///
/// # Errors
///
/// Returns `GenieError::Export` if the directory cannot be created or the
/// file cannot be written
pub fn export_conversation(
    conversation: &Conversation,
    assistant_name: &str,
    dir: &Path,
) -> Result<Option<PathBuf>> {
    if !conversation.has_exchanges() {
        tracing::info!(session = %conversation.id(), "Nothing to export yet");
        return Ok(None);
    }

    std::fs::create_dir_all(dir).map_err(|e| {
        GenieError::Export(format!("Failed to create {}: {}", dir.display(), e))
    })?;

    let now = Local::now();
    let path = dir.join(export_file_name(now));
    let transcript = render_transcript(conversation, assistant_name, now);

    std::fs::write(&path, transcript).map_err(|e| {
        GenieError::Export(format!("Failed to write {}: {}", path.display(), e))
    })?;

    tracing::info!(
        session = %conversation.id(),
        path = %path.display(),
        turns = conversation.len() - 1,
        "Exported conversation"
    );

    Ok(Some(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::SessionSeed;
    use crate::providers::Turn;
    use crate::test_utils::temp_dir;
    use chrono::TimeZone;

    fn fixed_time() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap()
    }

    fn conversation(exchanges: usize) -> Conversation {
        let mut conversation = Conversation::new(SessionSeed::new("hidden", "Hello!"));
        for i in 0..exchanges {
            conversation.append(Turn::user(format!("q{}", i))).unwrap();
            conversation.append(Turn::assistant(format!("a{}", i))).unwrap();
        }
        conversation
    }

    #[test]
    fn test_export_file_name() {
        assert_eq!(
            export_file_name(fixed_time()),
            "dubai_genie_chat_20240102_030405.txt"
        );
    }

    #[test]
    fn test_render_line_count() {
        let conversation = conversation(2);
        let text = render_transcript(&conversation, "Dubai Genie", fixed_time());
        let visible = conversation.visible_turns().count();
        assert_eq!(visible, 5);
        assert_eq!(text.lines().count(), 2 * visible + 2);
    }

    #[test]
    fn test_render_labels_and_header() {
        let text = render_transcript(&conversation(1), "Dubai Genie", fixed_time());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Dubai Genie Conversation");
        assert_eq!(lines[1], "Generated: 2024-01-02 03:04:05");
        assert_eq!(lines[3], "Dubai Genie: Hello!");
        assert_eq!(lines[5], "You: q0");
        assert_eq!(lines[7], "Dubai Genie: a0");
        assert!(!text.contains("hidden"));
    }

    #[test]
    fn test_render_folds_multiline_content() {
        let mut conversation = conversation(0);
        conversation.append(Turn::user("one")).unwrap();
        conversation
            .append(Turn::assistant("Day 1: Burj Khalifa\nDay 2: Desert safari"))
            .unwrap();

        let text = render_transcript(&conversation, "DG", fixed_time());
        assert!(text.contains("DG: Day 1: Burj Khalifa Day 2: Desert safari"));
        assert_eq!(text.lines().count(), 2 * 3 + 2);
    }

    #[test]
    fn test_export_refused_for_seed_only() {
        let dir = temp_dir();
        let result = export_conversation(&conversation(0), "DG", dir.path()).unwrap();
        assert!(result.is_none());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_export_writes_file() {
        let dir = temp_dir();
        let path = export_conversation(&conversation(1), "DG", dir.path())
            .unwrap()
            .unwrap();

        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("dubai_genie_chat_"));
        assert!(name.ends_with(".txt"));

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 2 * 3 + 2);
    }

    #[test]
    fn test_export_creates_missing_directory() {
        let dir = temp_dir();
        let nested = dir.path().join("exports").join("today");
        let path = export_conversation(&conversation(1), "DG", &nested)
            .unwrap()
            .unwrap();
        assert!(path.starts_with(&nested));
    }
}
