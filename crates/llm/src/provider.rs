//! The provider seam: one trait, one adapter per vendor.

use crate::anthropic::AnthropicProvider;
use crate::gemini::GeminiProvider;
use crate::openai::OpenAiProvider;
use deck_core::{Error, Provider, Result};
use reqwest::blocking::{Client, RequestBuilder};
use serde::Deserialize;
use std::time::Duration;

/// API key that short-circuits to a canned plan instead of the network.
pub const TEST_KEY: &str = "TEST_KEY";

/// Longest slice of an unparseable error body we put in a message.
const MAX_ERROR_BODY: usize = 300;

/// Something that turns a system prompt plus user text into raw model text.
pub trait CompletionProvider {
    /// Vendor name for logs and errors.
    fn name(&self) -> &str;

    /// Send one request and return the model's text, undecorated.
    fn complete(&self, system_prompt: &str, user_text: &str) -> Result<String>;
}

/// Connection details shared by all adapters.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// API key or token.
    pub api_key: String,

    /// Model identifier.
    pub model: String,

    /// Scheme and host to send requests to.
    pub base_url: String,

    /// Per-request timeout.
    pub timeout: Duration,
}

/// Build the adapter for `provider`.
///
/// The sentinel [`TEST_KEY`] yields a [`SampleProvider`] so the whole
/// pipeline can be exercised offline.
pub fn build_provider(provider: Provider, config: ProviderConfig) -> Result<Box<dyn CompletionProvider>> {
    if config.api_key == TEST_KEY {
        log::info!("Using the built-in sample plan instead of {}", provider);
        return Ok(Box::new(SampleProvider));
    }

    let client = Client::builder()
        .timeout(config.timeout)
        .build()
        .map_err(|e| transport_error(&provider.to_string(), e))?;

    Ok(match provider {
        Provider::OpenAi => Box::new(OpenAiProvider::new(client, config)),
        Provider::Anthropic => Box::new(AnthropicProvider::new(client, config)),
        Provider::Gemini => Box::new(GeminiProvider::new(client, config)),
    })
}

/// Offline provider that always answers with the same two slides.
#[derive(Debug, Clone, Copy, Default)]
pub struct SampleProvider;

impl SampleProvider {
    /// The canned response, exactly as a model would send it.
    pub const RESPONSE: &'static str = r#"{"slides": [
  {"title": "Intro to AI", "content": ["AI is changing the world", "It helps coders"], "notes": "Start with a strong hook."},
  {"title": "The Solution", "content": ["Automated coding", "Smart presentations"], "notes": "Explain the value prop."}
]}"#;
}

impl CompletionProvider for SampleProvider {
    fn name(&self) -> &str {
        "Sample"
    }

    fn complete(&self, _system_prompt: &str, _user_text: &str) -> Result<String> {
        Ok(Self::RESPONSE.to_string())
    }
}

/// Send a request and return the body of a successful response.
pub(crate) fn send(provider: &str, request: RequestBuilder) -> Result<String> {
    let response = request.send().map_err(|e| transport_error(provider, e))?;
    let status = response.status();
    let body = response.text().map_err(|e| transport_error(provider, e))?;

    if !status.is_success() {
        return Err(Error::Api {
            provider: provider.to_string(),
            status: status.as_u16(),
            message: api_error_message(&body),
        });
    }

    log::debug!("{} answered with {} bytes", provider, body.len());
    Ok(body)
}

/// Decode a successful response body.
pub(crate) fn decode<'de, T: Deserialize<'de>>(provider: &str, body: &'de str) -> Result<T> {
    serde_json::from_str(body).map_err(|e| Error::UnexpectedShape(format!("{} response: {}", provider, e)))
}

fn transport_error(provider: &str, e: reqwest::Error) -> Error {
    Error::Transport {
        provider: provider.to_string(),
        message: e.without_url().to_string(),
    }
}

/// All three vendors wrap failures as `{"error": {"message": ...}}`.
#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Pull the human-readable message out of an error body.
pub(crate) fn api_error_message(body: &str) -> String {
    if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(body) {
        return envelope.error.message;
    }

    let trimmed = body.trim();
    if trimmed.chars().count() > MAX_ERROR_BODY {
        let cut: String = trimmed.chars().take(MAX_ERROR_BODY).collect();
        format!("{}...", cut)
    } else {
        trimmed.to_string()
    }
}
