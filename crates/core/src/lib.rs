//! Core slide types, model-response normalization, retry and layout
//! geometry for turning free-form text into a slide deck.

pub mod error;
pub mod layout;
pub mod normalize;
pub mod response;
pub mod retry;
pub mod types;

pub use error::{Error, Result};
pub use layout::{Emu, FontSize, Rect};
pub use normalize::TextNormalizer;
pub use response::{extract_json, parse_plan};
pub use retry::{retry, RetryPolicy};
pub use types::{estimate_slide_count, Provider, SlidePlan, SlideRecord, UNTITLED};
