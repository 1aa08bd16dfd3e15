//! Domain types for representing a structured slide plan.

use crate::Error;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Title used when the model leaves a slide without one.
pub const UNTITLED: &str = "Untitled";

/// Characters of input text per estimated slide.
const CHARS_PER_SLIDE: usize = 500;

/// One slide as proposed by the model: a title, bullet points and notes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawSlideRecord")]
pub struct SlideRecord {
    /// Slide headline.
    pub title: String,

    /// Bullet points, in order.
    pub content: Vec<String>,

    /// Speaker notes, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    /// Path to a picture to place next to the bullets.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl SlideRecord {
    /// Create a slide with a title and bullet points.
    pub fn new<I, S>(title: impl Into<String>, content: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            title: title.into(),
            content: content.into_iter().map(Into::into).collect(),
            notes: None,
            image: None,
        }
    }

    /// Attach speaker notes.
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Attach a picture path.
    pub fn with_image(mut self, path: impl Into<String>) -> Self {
        self.image = Some(path.into());
        self
    }
}

/// Shape of a slide as it arrives from a model, before defaults are applied.
#[derive(Deserialize)]
struct RawSlideRecord {
    #[serde(default)]
    title: Option<Value>,
    #[serde(default)]
    content: Option<RawContent>,
    #[serde(default)]
    notes: Option<Value>,
    #[serde(default)]
    image: Option<String>,
}

/// Models sometimes return the bullets as one block of text.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawContent {
    Lines(Vec<Value>),
    Text(String),
}

impl From<RawSlideRecord> for SlideRecord {
    fn from(raw: RawSlideRecord) -> Self {
        let title = raw
            .title
            .and_then(value_to_text)
            .unwrap_or_else(|| UNTITLED.to_string());

        let content = match raw.content {
            Some(RawContent::Lines(items)) => items.into_iter().filter_map(value_to_text).collect(),
            Some(RawContent::Text(text)) => text
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(str::to_string)
                .collect(),
            None => Vec::new(),
        };

        Self {
            title,
            content,
            notes: raw.notes.and_then(value_to_text),
            image: raw.image,
        }
    }
}

/// Render a scalar JSON value as text; null becomes `None`.
fn value_to_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

/// A full deck plan, as produced by the model or stored on disk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlidePlan {
    /// Slides in presentation order.
    pub slides: Vec<SlideRecord>,
}

impl SlidePlan {
    /// Wrap a list of slides.
    pub fn new(slides: Vec<SlideRecord>) -> Self {
        Self { slides }
    }

    /// Number of slides in the plan.
    pub fn len(&self) -> usize {
        self.slides.len()
    }

    /// Whether the plan has no slides.
    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }
}

/// Estimate how many slides a block of text deserves.
pub fn estimate_slide_count(text: &str) -> usize {
    (text.chars().count() / CHARS_PER_SLIDE).max(1)
}

/// The language model vendors we can structure text with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Provider {
    /// OpenAI chat completions.
    OpenAi,
    /// Anthropic messages.
    Anthropic,
    /// Google Gemini generate-content.
    Gemini,
}

impl Provider {
    /// All providers, in the order they are offered to users.
    pub const ALL: [Provider; 3] = [Provider::Gemini, Provider::OpenAi, Provider::Anthropic];

    /// Model used when the caller doesn't pick one.
    pub fn default_model(&self) -> &'static str {
        match self {
            Provider::OpenAi => "gpt-4o",
            Provider::Anthropic => "claude-3-5-sonnet-20240620",
            Provider::Gemini => "gemini-2.5-flash",
        }
    }

    /// Environment variable conventionally holding this vendor's API key.
    pub fn api_key_env(&self) -> &'static str {
        match self {
            Provider::OpenAi => "OPENAI_API_KEY",
            Provider::Anthropic => "ANTHROPIC_API_KEY",
            Provider::Gemini => "GEMINI_API_KEY",
        }
    }

    /// Short lowercase identifier, as accepted by `from_str`.
    pub fn id(&self) -> &'static str {
        match self {
            Provider::OpenAi => "openai",
            Provider::Anthropic => "anthropic",
            Provider::Gemini => "gemini",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Provider::OpenAi => "OpenAI",
            Provider::Anthropic => "Anthropic",
            Provider::Gemini => "Google Gemini",
        };
        f.write_str(name)
    }
}

impl FromStr for Provider {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect();
        match key.as_str() {
            "openai" | "gpt" => Ok(Provider::OpenAi),
            "anthropic" | "claude" => Ok(Provider::Anthropic),
            "gemini" | "google" | "googlegemini" => Ok(Provider::Gemini),
            _ => Err(Error::UnknownProvider(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_defaults() {
        let record: SlideRecord = serde_json::from_str("{}").unwrap();
        assert_eq!(record.title, "Untitled");
        assert!(record.content.is_empty());
        assert_eq!(record.notes, None);
        assert_eq!(record.image, None);
    }

    #[test]
    fn test_record_full() {
        let json = r#"{"title": "Intro", "content": ["a", "b"], "notes": "say hi"}"#;
        let record: SlideRecord = serde_json::from_str(json).unwrap();
        assert_eq!(
            record,
            SlideRecord::new("Intro", ["a", "b"]).with_notes("say hi")
        );
    }

    #[test]
    fn test_content_as_text_block() {
        let json = r#"{"title": "T", "content": "first\n\n  second  \n"}"#;
        let record: SlideRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.content, vec!["first", "second"]);
    }

    #[test]
    fn test_non_string_values_are_stringified() {
        let json = r#"{"title": 2024, "content": ["growth", 42, null], "notes": null}"#;
        let record: SlideRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.title, "2024");
        assert_eq!(record.content, vec!["growth", "42"]);
        assert_eq!(record.notes, None);
    }

    #[test]
    fn test_plan_serializes_with_slides_key() {
        let plan = SlidePlan::new(vec![SlideRecord::new("Only", ["point"])]);
        let json = serde_json::to_string(&plan).unwrap();
        assert_eq!(json, r#"{"slides":[{"title":"Only","content":["point"]}]}"#);

        let back: SlidePlan = serde_json::from_str(&json).unwrap();
        assert_eq!(back, plan);
    }

    #[test]
    fn test_estimate_slide_count() {
        assert_eq!(estimate_slide_count(""), 1);
        assert_eq!(estimate_slide_count(&"a".repeat(499)), 1);
        assert_eq!(estimate_slide_count(&"a".repeat(1000)), 2);
        assert_eq!(estimate_slide_count(&"a".repeat(2600)), 5);
    }

    #[test]
    fn test_provider_from_str() {
        assert_eq!("openai".parse::<Provider>().unwrap(), Provider::OpenAi);
        assert_eq!("OpenAI".parse::<Provider>().unwrap(), Provider::OpenAi);
        assert_eq!("Anthropic".parse::<Provider>().unwrap(), Provider::Anthropic);
        assert_eq!("Google Gemini".parse::<Provider>().unwrap(), Provider::Gemini);
        assert_eq!("google".parse::<Provider>().unwrap(), Provider::Gemini);
        assert!("mistral".parse::<Provider>().is_err());
    }

    #[test]
    fn test_provider_display_round_trips() {
        for provider in Provider::ALL {
            assert_eq!(provider.to_string().parse::<Provider>().unwrap(), provider);
            assert_eq!(provider.id().parse::<Provider>().unwrap(), provider);
        }
    }
}
