//! The system prompt that asks a model for a slide plan.

use std::fmt;
use std::str::FromStr;

/// Tone used when the caller gives no guidance.
pub const DEFAULT_GUIDANCE: &str = "Professional";

/// Canned tone/style guidance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuidancePreset {
    Corporate,
    Educational,
    Startup,
    Story,
}

impl GuidancePreset {
    /// All presets.
    pub const ALL: [GuidancePreset; 4] = [
        GuidancePreset::Corporate,
        GuidancePreset::Educational,
        GuidancePreset::Startup,
        GuidancePreset::Story,
    ];

    /// The guidance text handed to the model.
    pub fn guidance(&self) -> &'static str {
        match self {
            GuidancePreset::Corporate => "Corporate Professional",
            GuidancePreset::Educational => "Educational and Detailed",
            GuidancePreset::Startup => "Investor Pitch Deck",
            GuidancePreset::Story => "Engaging and Visual",
        }
    }

    /// Short identifier.
    pub fn id(&self) -> &'static str {
        match self {
            GuidancePreset::Corporate => "corporate",
            GuidancePreset::Educational => "educational",
            GuidancePreset::Startup => "startup",
            GuidancePreset::Story => "story",
        }
    }
}

impl fmt::Display for GuidancePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for GuidancePreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "corporate" | "corp" => Ok(GuidancePreset::Corporate),
            "educational" | "edu" => Ok(GuidancePreset::Educational),
            "startup" | "pitch" => Ok(GuidancePreset::Startup),
            "story" => Ok(GuidancePreset::Story),
            other => Err(format!(
                "unknown preset '{}' (expected one of: corporate, educational, startup, story)",
                other
            )),
        }
    }
}

/// Build the system prompt for a slide plan.
///
/// Empty guidance falls back to [`DEFAULT_GUIDANCE`]. `target_slides` is
/// a suggestion; the model may adapt it for flow.
pub fn build_system_prompt(guidance: &str, target_slides: usize) -> String {
    let guidance = match guidance.trim() {
        "" => DEFAULT_GUIDANCE,
        g => g,
    };

    format!(
        r#"You are an expert presentation designer and content strategist.

**Goal:** Convert the input text into a structured PowerPoint presentation.
**User Guidance:** "{guidance}"
**Target Length:** Approximately {target_slides} slides (adapt if necessary for flow).

**Instructions:**
1. **Structure:** Create a logical flow (e.g., Intro -> Problem -> Solution -> Conclusion).
2. **Content:** Summarize long text into concise, punchy bullet points. Do NOT paste long paragraphs.
3. **Tone:** Adapt the language to match the requested "{guidance}" tone.
4. **Speaker Notes:** Write detailed script-like notes for the speaker to explain the slide.

Output strictly VALID JSON.
**JSON Output Format (Strict):**
{{
  "slides": [
    {{
      "title": "Compelling Headline",
      "content": [
        "Short bullet point 1",
        "Short bullet point 2",
        "Key statistic or insight"
      ],
      "notes": "Detailed speaker notes explaining the context of these bullets."
    }}
  ]
}}
Ensure the first slide is an Intro/Title slide."#
    )
}
