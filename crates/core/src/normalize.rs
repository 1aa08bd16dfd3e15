//! Text cleanup for model-generated slide content.
//!
//! Handles Unicode composition, characters that can't live in XML,
//! whitespace runs and the bullet glyphs models like to prepend even
//! though the template already draws its own.

use crate::{SlidePlan, SlideRecord, UNTITLED};
use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

/// Regex to collapse multiple whitespace characters into one.
static WHITESPACE_COLLAPSE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t]+").unwrap());

/// Leading bullet markers: "- ", "* ", "• ", "– ", "· ", possibly repeated.
static BULLET_PREFIX_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[-*•–·▪►]\s+)+").unwrap());

/// Text normalizer for slide titles, bullets and notes.
#[derive(Debug, Clone)]
pub struct TextNormalizer {
    /// Whether to strip leading bullet glyphs from bullet points.
    strip_bullets: bool,
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextNormalizer {
    /// Create a new text normalizer with default settings.
    pub fn new() -> Self {
        Self {
            strip_bullets: true,
        }
    }

    /// Set whether to strip bullet glyphs from the start of bullet points.
    pub fn with_strip_bullets(mut self, strip: bool) -> Self {
        self.strip_bullets = strip;
        self
    }

    /// Normalize a block of text, keeping its line breaks.
    ///
    /// - Composes to Unicode NFC
    /// - Drops control characters other than tab and newline, and anything
    ///   XML 1.0 cannot carry
    /// - Collapses whitespace runs to single spaces
    /// - Trims every line and the block as a whole
    pub fn normalize_text(&self, text: &str) -> String {
        let text = text.replace("\r\n", "\n").replace('\r', "\n");

        let composed: String = text
            .nfc()
            .filter(|c| is_xml_char(*c) && (*c == '\n' || *c == '\t' || !c.is_control()))
            .collect();

        composed
            .lines()
            .map(|line| WHITESPACE_COLLAPSE_REGEX.replace_all(line, " ").trim().to_string())
            .collect::<Vec<_>>()
            .join("\n")
            .trim()
            .to_string()
    }

    /// Normalize a single bullet point onto one line.
    pub fn normalize_bullet(&self, text: &str) -> String {
        let flat = self.normalize_text(text).replace('\n', " ");
        if self.strip_bullets {
            BULLET_PREFIX_REGEX.replace(&flat, "").trim().to_string()
        } else {
            flat
        }
    }

    /// Normalize a slide, dropping bullets that end up empty.
    pub fn normalize_record(&self, record: &SlideRecord) -> SlideRecord {
        let title = self.normalize_text(&record.title);

        SlideRecord {
            title: if title.is_empty() {
                UNTITLED.to_string()
            } else {
                title
            },
            content: record
                .content
                .iter()
                .map(|point| self.normalize_bullet(point))
                .filter(|point| !point.is_empty())
                .collect(),
            notes: record
                .notes
                .as_deref()
                .map(|notes| self.normalize_text(notes))
                .filter(|notes| !notes.is_empty()),
            image: record
                .image
                .as_deref()
                .map(str::trim)
                .filter(|path| !path.is_empty())
                .map(str::to_string),
        }
    }

    /// Normalize every slide in a plan.
    pub fn normalize_plan(&self, plan: &SlidePlan) -> SlidePlan {
        SlidePlan::new(
            plan.slides
                .iter()
                .map(|record| self.normalize_record(record))
                .collect(),
        )
    }
}

/// The XML 1.0 `Char` production.
fn is_xml_char(c: char) -> bool {
    matches!(c,
        '\t' | '\n' | '\r'
        | '\u{20}'..='\u{D7FF}'
        | '\u{E000}'..='\u{FFFD}'
        | '\u{10000}'..='\u{10FFFF}')
}
