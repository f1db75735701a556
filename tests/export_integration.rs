use std::sync::Arc;

use tempfile::TempDir;

use genie::agent::{ConversationController, ModelGateway};
use genie::config::SessionConfig;

fn offline_controller(session: &SessionConfig) -> ConversationController {
    ConversationController::new(Arc::new(ModelGateway::not_configured()), session)
}

#[tokio::test]
async fn test_export_refused_before_first_exchange() {
    let dir = TempDir::new().unwrap();
    let controller = offline_controller(&SessionConfig::default());

    assert!(controller.export(dir.path()).unwrap().is_none());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_export_line_count_and_labels() {
    let dir = TempDir::new().unwrap();
    let session = SessionConfig {
        assistant_name: "Dubai Genie".to_string(),
        ..Default::default()
    };
    let mut controller = offline_controller(&session);

    controller.handle_user_message("help").await.unwrap();
    controller.handle_user_message("Hi").await.unwrap();

    let path = controller.export(dir.path()).unwrap().unwrap();
    let contents = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();

    let visible = controller.conversation().visible_turns().count();
    assert_eq!(visible, 5);
    assert_eq!(lines.len(), 2 * visible + 2);

    assert_eq!(lines[0], "Dubai Genie Conversation");
    assert!(lines[1].starts_with("Generated: "));
    assert!(lines[3].starts_with("Dubai Genie: Hello! I am DG"));
    assert_eq!(lines[5], "You: help");
    assert_eq!(lines[9], "You: Hi");
    assert!(!contents.contains(&session.system_prompt));
}

#[tokio::test]
async fn test_export_uses_configured_assistant_name() {
    let dir = TempDir::new().unwrap();
    let session = SessionConfig {
        assistant_name: "DG".to_string(),
        ..Default::default()
    };
    let mut controller = offline_controller(&session);
    controller.handle_user_message("Hi").await.unwrap();

    let path = controller.export(dir.path()).unwrap().unwrap();
    let contents = std::fs::read_to_string(&path).unwrap();
    assert!(contents.starts_with("DG Conversation\n"));
    assert!(contents.contains("\nDG: "));
    assert!(contents.contains("\nYou: Hi\n"));
}
