//! Google Gemini generate-content adapter.

use crate::provider::{decode, send, CompletionProvider, ProviderConfig};
use deck_core::{Error, Result};
use reqwest::blocking::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};

/// Default API host.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

const NAME: &str = "Google Gemini";

/// Header carrying the API key.
const API_KEY_HEADER: &str = "x-goog-api-key";

/// generateContent with a JSON response MIME type.
pub struct GeminiProvider {
    client: Client,
    config: ProviderConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

impl GeminiProvider {
    /// Create an adapter around a configured HTTP client.
    pub fn new(client: Client, config: ProviderConfig) -> Self {
        Self { client, config }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    fn request(&self, body: &serde_json::Value) -> RequestBuilder {
        self.client
            .post(self.endpoint())
            .header(API_KEY_HEADER, &self.config.api_key)
            .json(body)
    }

    /// Request body: one text part, JSON output requested.
    pub fn request_body(system_prompt: &str, user_text: &str) -> serde_json::Value {
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some(format!("{}\n\nText to convert:\n{}", system_prompt, user_text)),
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
            },
        };
        serde_json::to_value(request).unwrap_or_default()
    }

    /// All text parts of the first candidate, joined.
    pub fn parse_response(body: &str) -> Result<String> {
        let response: GenerateResponse = decode(NAME, body)?;
        let text: String = response
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| content.parts.into_iter().filter_map(|part| part.text).collect())
            .unwrap_or_default();

        if text.is_empty() {
            return Err(Error::EmptyResponse(NAME.to_string()));
        }
        Ok(text)
    }
}

impl CompletionProvider for GeminiProvider {
    fn name(&self) -> &str {
        NAME
    }

    fn complete(&self, system_prompt: &str, user_text: &str) -> Result<String> {
        log::info!("Requesting slide plan from {} ({})", NAME, self.config.model);
        let body = Self::request_body(system_prompt, user_text);
        let text = send(NAME, self.request(&body))?;
        Self::parse_response(&text)
    }
}
