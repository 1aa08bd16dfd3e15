//! Anthropic messages adapter.

use crate::provider::{decode, send, CompletionProvider, ProviderConfig};
use deck_core::{Error, Result};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

/// Default API host.
pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";

/// API version header value.
pub const API_VERSION: &str = "2023-06-01";

/// Output token cap for one plan.
const MAX_TOKENS: u32 = 4096;

const NAME: &str = "Anthropic";

/// Messages API, with the system prompt folded into the user turn.
pub struct AnthropicProvider {
    client: Client,
    config: ProviderConfig,
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

impl AnthropicProvider {
    /// Create an adapter around a configured HTTP client.
    pub fn new(client: Client, config: ProviderConfig) -> Self {
        Self { client, config }
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/messages", self.config.base_url.trim_end_matches('/'))
    }

    /// Request body: a single user message carrying prompt and text.
    pub fn request_body(model: &str, system_prompt: &str, user_text: &str) -> serde_json::Value {
        let request = MessagesRequest {
            model,
            max_tokens: MAX_TOKENS,
            messages: vec![Message {
                role: "user",
                content: format!("{}\n\n{}", system_prompt, user_text),
            }],
        };
        serde_json::to_value(request).unwrap_or_default()
    }

    /// Text of the first text block.
    pub fn parse_response(body: &str) -> Result<String> {
        let response: MessagesResponse = decode(NAME, body)?;
        response
            .content
            .into_iter()
            .filter(|block| block.kind == "text")
            .find_map(|block| block.text)
            .ok_or_else(|| Error::EmptyResponse(NAME.to_string()))
    }
}

impl CompletionProvider for AnthropicProvider {
    fn name(&self) -> &str {
        NAME
    }

    fn complete(&self, system_prompt: &str, user_text: &str) -> Result<String> {
        log::info!("Requesting slide plan from {} ({})", NAME, self.config.model);
        let body = Self::request_body(&self.config.model, system_prompt, user_text);
        let request = self
            .client
            .post(self.endpoint())
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&body);

        let text = send(NAME, request)?;
        Self::parse_response(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body() {
        let body = AnthropicProvider::request_body("claude", "SYSTEM", "TEXT");
        assert_eq!(body["model"], "claude");
        assert_eq!(body["max_tokens"], 4096);
        assert_eq!(body["messages"].as_array().unwrap().len(), 1);
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "SYSTEM\n\nTEXT");
        assert!(body.get("system").is_none());
    }

    #[test]
    fn test_parse_response() {
        let body = r#"{"id":"msg_1","type":"message","role":"assistant","content":[{"type":"text","text":"{\"slides\":[]}"}],"stop_reason":"end_turn"}"#;
        assert_eq!(AnthropicProvider::parse_response(body).unwrap(), r#"{"slides":[]}"#);
    }

    #[test]
    fn test_parse_response_skips_non_text_blocks() {
        let body = r#"{"content":[{"type":"thinking","thinking":"hmm"},{"type":"text","text":"ok"}]}"#;
        assert_eq!(AnthropicProvider::parse_response(body).unwrap(), "ok");
    }

    #[test]
    fn test_parse_response_empty() {
        let err = AnthropicProvider::parse_response(r#"{"content":[]}"#).unwrap_err();
        assert!(matches!(err, Error::EmptyResponse(_)));
    }
}
