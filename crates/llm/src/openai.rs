//! OpenAI chat completions adapter.

use crate::provider::{decode, send, CompletionProvider, ProviderConfig};
use deck_core::{Error, Result};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

/// Default API host.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";

const NAME: &str = "OpenAI";

/// Chat completions in JSON mode.
pub struct OpenAiProvider {
    client: Client,
    config: ProviderConfig,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    response_format: ResponseFormat,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiProvider {
    /// Create an adapter around a configured HTTP client.
    pub fn new(client: Client, config: ProviderConfig) -> Self {
        Self { client, config }
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/chat/completions", self.config.base_url.trim_end_matches('/'))
    }

    /// Request body: system and user messages, JSON output enforced.
    pub fn request_body(model: &str, system_prompt: &str, user_text: &str) -> serde_json::Value {
        let request = ChatRequest {
            model,
            response_format: ResponseFormat { kind: "json_object" },
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: user_text,
                },
            ],
        };
        serde_json::to_value(request).unwrap_or_default()
    }

    /// Text of the first choice.
    pub fn parse_response(body: &str) -> Result<String> {
        let response: ChatResponse = decode(NAME, body)?;
        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| Error::EmptyResponse(NAME.to_string()))
    }
}

impl CompletionProvider for OpenAiProvider {
    fn name(&self) -> &str {
        NAME
    }

    fn complete(&self, system_prompt: &str, user_text: &str) -> Result<String> {
        log::info!("Requesting slide plan from {} ({})", NAME, self.config.model);
        let body = Self::request_body(&self.config.model, system_prompt, user_text);
        let request = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(&body);

        let text = send(NAME, request)?;
        Self::parse_response(&text)
    }
}
