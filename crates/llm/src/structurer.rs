//! Turning free-form text into a slide plan through a model.

use crate::prompt::build_system_prompt;
use crate::provider::{build_provider, CompletionProvider, ProviderConfig};
use crate::{anthropic, gemini, openai};
use deck_core::{parse_plan, Error, Provider, Result, RetryPolicy, SlidePlan, TextNormalizer};
use std::time::Duration;

/// Default per-request timeout; plans for long texts take a while.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Everything needed to reach a model.
#[derive(Debug, Clone)]
pub struct LlmSettings {
    /// Which vendor to call.
    pub provider: Provider,

    /// The vendor API key.
    pub api_key: String,

    /// Model override; the vendor default otherwise.
    pub model: Option<String>,

    /// Host override, e.g. for a proxy.
    pub base_url: Option<String>,

    /// Per-request timeout.
    pub timeout: Duration,

    /// Retry policy for transient failures.
    pub retry: RetryPolicy,
}

impl LlmSettings {
    /// Settings for `provider` with vendor defaults.
    pub fn new(provider: Provider, api_key: impl Into<String>) -> Self {
        Self {
            provider,
            api_key: api_key.into(),
            model: None,
            base_url: None,
            timeout: DEFAULT_TIMEOUT,
            retry: RetryPolicy::default(),
        }
    }

    /// Use a specific model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Send requests to a different host.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// The model that will actually be requested.
    pub fn effective_model(&self) -> &str {
        self.model
            .as_deref()
            .unwrap_or_else(|| self.provider.default_model())
    }

    fn provider_config(&self) -> ProviderConfig {
        let base_url = self.base_url.clone().unwrap_or_else(|| {
            match self.provider {
                Provider::OpenAi => openai::DEFAULT_BASE_URL,
                Provider::Anthropic => anthropic::DEFAULT_BASE_URL,
                Provider::Gemini => gemini::DEFAULT_BASE_URL,
            }
            .to_string()
        });

        ProviderConfig {
            api_key: self.api_key.clone(),
            model: self.effective_model().to_string(),
            base_url,
            timeout: self.timeout,
        }
    }
}

/// Asks a model for a slide plan and cleans up what comes back.
pub struct Structurer {
    provider: Box<dyn CompletionProvider>,
    retry: RetryPolicy,
    normalizer: TextNormalizer,
}

impl Structurer {
    /// Build a structurer talking to the provider in `settings`.
    pub fn new(settings: &LlmSettings) -> Result<Self> {
        let provider = build_provider(settings.provider, settings.provider_config())?;
        Ok(Self::with_provider(provider, settings.retry))
    }

    /// Build a structurer around any provider implementation.
    pub fn with_provider(provider: Box<dyn CompletionProvider>, retry: RetryPolicy) -> Self {
        Self {
            provider,
            retry,
            normalizer: TextNormalizer::new(),
        }
    }

    /// Name of the provider in use.
    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Structure `text` into slides.
    ///
    /// `guidance` sets the tone; `target_slides` is a length hint. A model
    /// that keeps answering with nothing yields an empty plan.
    pub fn structure(&self, text: &str, guidance: &str, target_slides: usize) -> Result<SlidePlan> {
        if text.trim().is_empty() {
            return Err(Error::EmptyInput);
        }

        let system_prompt = build_system_prompt(guidance, target_slides.max(1));

        let raw = self.retry.run(Error::is_retryable, || {
            let raw = self.provider.complete(&system_prompt, text)?;
            if raw.trim().is_empty() {
                return Err(Error::EmptyResponse(self.provider.name().to_string()));
            }
            Ok(raw)
        });

        let raw = match raw {
            Ok(raw) => raw,
            Err(Error::EmptyResponse(provider)) => {
                log::warn!("{} never returned any text", provider);
                return Ok(SlidePlan::default());
            }
            Err(e) => return Err(e),
        };

        let plan = parse_plan(&raw)?;
        log::info!(
            "{} proposed {} slides",
            self.provider.name(),
            plan.len()
        );

        Ok(self.normalizer.normalize_plan(&plan))
    }
}
