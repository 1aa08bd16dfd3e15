//! Language model adapters and slide structuring.
//!
//! Talks to OpenAI, Anthropic or Google Gemini over HTTPS and turns the
//! answer into a [`deck_core::SlidePlan`].

pub mod anthropic;
pub mod gemini;
pub mod openai;
pub mod prompt;
pub mod provider;
pub mod structurer;

pub use prompt::{build_system_prompt, GuidancePreset, DEFAULT_GUIDANCE};
pub use provider::{build_provider, CompletionProvider, ProviderConfig, SampleProvider, TEST_KEY};
pub use structurer::{LlmSettings, Structurer};
