//! HTTP oracle adapter.
//!
//! Implements the [`TextOracle`] port against an OpenAI-compatible
//! chat-completions endpoint. The adapter only moves bytes: whatever text
//! the endpoint returns is handed to the application layer untouched,
//! where the defensive parsing lives.

use async_trait::async_trait;
use blueprint_application::ports::oracle::{OracleError, TextOracle};
use blueprint_domain::{Message, Role};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::file_config::FileOracleConfig;
use super::OracleSetupError;

/// OpenAI-compatible chat-completions client.
pub struct HttpOracle {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
    temperature: f32,
}

impl HttpOracle {
    /// Build the adapter from file configuration.
    ///
    /// The API key is read from the environment variable named in the
    /// config. A missing variable is allowed (local endpoints often need
    /// none) and simply omits the Authorization header.
    pub fn from_config(config: &FileOracleConfig) -> Result<Self, OracleSetupError> {
        let api_key = std::env::var(&config.api_key_env).ok();
        let http = reqwest::Client::builder()
            .build()
            .map_err(OracleSetupError::HttpClient)?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            model: config.model.clone(),
            temperature: config.temperature,
        })
    }

    fn build_request_body<'a>(&'a self, messages: &'a [Message]) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.model,
            messages: messages
                .iter()
                .map(|m| WireMessage {
                    role: wire_role(m.role),
                    content: &m.content,
                })
                .collect(),
            temperature: self.temperature,
        }
    }
}

fn wire_role(role: Role) -> &'static str {
    match role {
        Role::System => "system",
        Role::User => "user",
        Role::Assistant => "assistant",
    }
}

#[async_trait]
impl TextOracle for HttpOracle {
    async fn generate(&self, messages: &[Message]) -> Result<String, OracleError> {
        let url = format!("{}/chat/completions", self.base_url);
        debug!(%url, model = %self.model, message_count = messages.len(), "oracle request");

        let mut request = self.http.post(&url).json(&self.build_request_body(messages));
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                OracleError::Timeout
            } else {
                OracleError::ConnectionError(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(OracleError::RequestFailed(format!(
                "HTTP {}: {}",
                status,
                body.chars().take(200).collect::<String>()
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| OracleError::RequestFailed(format!("invalid response body: {}", e)))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| OracleError::RequestFailed("response contained no choices".to_string()))
    }
}

// ==================== Wire types ====================

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    temperature: f32,
}

#[derive(Serialize)]
struct WireMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}
