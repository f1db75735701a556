use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;
use wiremock::MockServer;

use genie::agent::{ConversationController, ModelGateway};
use genie::config::{Config, RetryConfig, SystemPromptMode};
use genie::providers::create_provider;

pub const TEST_KEY: &str = "test-key";

/// Config pointing both providers at the mock server
#[allow(dead_code)]
pub fn mock_config(server: &MockServer, provider_type: &str) -> Config {
    let mut config = Config::default();
    config.provider.provider_type = provider_type.to_string();
    config.provider.openai.api_base = Some(format!("{}/v1", server.uri()));
    config.provider.gemini.api_base = Some(format!("{}/v1beta", server.uri()));
    config
}

/// Controller wired straight to a provider with the test key
#[allow(dead_code)]
pub fn controller_for(config: &Config, retry: RetryConfig) -> ConversationController {
    let provider = create_provider(
        &config.provider.provider_type,
        &config.provider,
        TEST_KEY.to_string(),
    )
    .expect("failed to create provider");
    let gateway = Arc::new(ModelGateway::new(provider, retry));
    ConversationController::new(gateway, &config.session)
}

#[allow(dead_code)]
pub fn gemini_controller(server: &MockServer, mode: SystemPromptMode) -> ConversationController {
    let mut config = mock_config(server, "gemini");
    config.provider.gemini.system_prompt_mode = mode;
    controller_for(&config, RetryConfig::default())
}

/// JSON bodies of every request the mock server received, in order
#[allow(dead_code)]
pub async fn received_bodies(server: &MockServer) -> Vec<Value> {
    server
        .received_requests()
        .await
        .expect("request recording is enabled")
        .iter()
        .map(|r| serde_json::from_slice(&r.body).expect("request body is JSON"))
        .collect()
}

#[allow(dead_code)]
pub fn temp_config_file(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, contents).expect("failed to write config file");
    (temp_dir, config_path)
}
