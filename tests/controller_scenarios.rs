mod common;

use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use genie::agent::{ConversationController, ModelGateway};
use genie::config::{RetryConfig, SessionConfig};
use genie::error::ErrorCategory;
use genie::providers::Role;

/// Help is answered locally in any letter case and never reaches the network
#[tokio::test]
async fn test_help_never_calls_the_model() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let config = common::mock_config(&server, "openai");
    let mut controller = common::controller_for(&config, RetryConfig::default());

    let mut replies = Vec::new();
    for input in ["help", "Help", "  HELP\t"] {
        replies.push(controller.handle_user_message(input).await.unwrap().unwrap());
    }

    assert!(replies.iter().all(|r| r.role() == Role::Assistant));
    assert!(replies.windows(2).all(|w| w[0] == w[1]));
    assert!(replies[0].content().contains("Dubai Genie"));
    assert_eq!(controller.conversation().len(), 2 + 2 * 3);
}

#[tokio::test]
async fn test_not_configured_makes_no_request() {
    let gateway = Arc::new(ModelGateway::not_configured());
    let mut controller = ConversationController::new(gateway, &SessionConfig::default());

    let reply = controller
        .handle_user_message("What are the top attractions in Dubai?")
        .await
        .unwrap()
        .unwrap();

    assert_eq!(reply.content(), ErrorCategory::NotConfigured.user_message());
    assert_eq!(controller.conversation().len(), 4);
}

#[tokio::test]
async fn test_mixed_session_keeps_strict_alternation() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "message": { "role": "assistant", "content": "Happy to help." } }]
        })))
        .expect(3)
        .mount(&server)
        .await;

    let config = common::mock_config(&server, "openai");
    let mut controller = common::controller_for(&config, RetryConfig::default());

    let inputs = ["Hi", "help", "Plan 3 days", "", "Thanks"];
    for input in inputs {
        controller.handle_user_message(input).await.unwrap();
    }

    // Empty input is a no-op; the other four each add a pair
    let turns = controller.conversation().turns();
    assert_eq!(turns.len(), 2 + 2 * 4);
    assert_eq!(turns[0].role(), Role::System);
    assert_eq!(
        turns.iter().filter(|t| t.role() == Role::System).count(),
        1
    );
    for (i, turn) in turns.iter().enumerate().skip(2) {
        let expected = if i % 2 == 0 { Role::User } else { Role::Assistant };
        assert_eq!(turn.role(), expected, "turn {} out of order", i);
    }
}

#[tokio::test]
async fn test_clear_restores_seed() {
    let gateway = Arc::new(ModelGateway::not_configured());
    let mut controller = ConversationController::new(gateway, &SessionConfig::default());

    controller.handle_user_message("Hi").await.unwrap();
    controller.handle_user_message("help").await.unwrap();
    controller.reset();

    let turns = controller.conversation().turns();
    assert_eq!(turns.len(), 2);
    assert_eq!(turns[0].role(), Role::System);
    assert_eq!(turns[1].content(), SessionConfig::default().greeting);
}
