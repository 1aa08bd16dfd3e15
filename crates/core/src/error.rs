//! Error types for text-to-deck generation.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while structuring text or building a deck.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to open or read a file.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// The input text was empty.
    #[error("No text to convert")]
    EmptyInput,

    /// The provider name is not one we know how to call.
    #[error("Unknown provider: {0}")]
    UnknownProvider(String),

    /// The HTTP request never produced a response.
    #[error("Network error talking to {provider}: {message}")]
    Transport { provider: String, message: String },

    /// The provider answered with a non-success status.
    #[error("{provider} API error (HTTP {status}): {message}")]
    Api {
        provider: String,
        status: u16,
        message: String,
    },

    /// The provider answered, but without any text we could use.
    #[error("{0} returned an empty response")]
    EmptyResponse(String),

    /// The model response was not valid JSON.
    #[error("AI response was not valid JSON: {0}")]
    MalformedJson(#[from] serde_json::Error),

    /// The model response was JSON but not a slide list.
    #[error("AI returned valid JSON but incorrect structure: {0}")]
    UnexpectedShape(String),

    /// The template is missing a part or relationship we need.
    #[error("Invalid template: {0}")]
    TemplateError(String),

    /// ZIP archive error.
    #[error("ZIP error: {0}")]
    ZipError(String),

    /// XML parsing or writing error.
    #[error("XML error: {0}")]
    XmlError(String),

    /// An image referenced by a slide could not be embedded.
    #[error("Image error: {0}")]
    ImageError(String),
}

impl Error {
    /// Whether the failed operation is worth attempting again.
    ///
    /// Network failures, rate limits, server-side errors and empty answers
    /// are transient. Authentication and request errors are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Transport { .. } | Error::EmptyResponse(_) => true,
            Error::Api { status, .. } => *status == 408 || *status == 429 || *status >= 500,
            _ => false,
        }
    }
}
