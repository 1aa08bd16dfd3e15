//! PPTX (Office Open XML) template reading and deck writing.
//!
//! A .pptx file is a ZIP archive of XML parts. This crate reads a
//! template's masters and layouts, then replaces its slides with generated
//! ones.

pub mod package;
pub mod parser;
pub mod slide;
pub mod template;
pub mod writer;

#[cfg(test)]
mod fixture;

pub use package::Package;
pub use parser::{read_shapes, Placeholder, ShapeInfo, SlideText};
pub use template::{ExistingSlide, LayoutInfo, LayoutPlaceholder, Template};
pub use writer::DeckWriter;
