//! Reading the structure of a template presentation.

use crate::package::{attr_i64, attr_value, local_name, resolve_target, Package};
use crate::parser::{read_shapes, Placeholder, ShapeInfo, SlideText};
use deck_core::{Emu, Error, FontSize, Rect, Result};
use quick_xml::events::Event;
use quick_xml::Reader;
use serde::Serialize;

/// Default slide size (10in x 7.5in) when `p:sldSz` is missing.
const DEFAULT_SLIDE_SIZE: (i64, i64) = (9_144_000, 6_858_000);

/// Default notes page size (7.5in x 10in).
const DEFAULT_NOTES_SIZE: (i64, i64) = (6_858_000, 9_144_000);

/// A placeholder on a layout, with geometry resolved against the master.
#[derive(Debug, Clone, Serialize)]
pub struct LayoutPlaceholder {
    pub name: String,
    #[serde(flatten)]
    pub placeholder: Placeholder,
    /// Own geometry, or the master's when the layout leaves it out.
    pub geometry: Option<Rect>,
    /// First-level font size from the layout's list style.
    pub default_size: Option<FontSize>,
}

/// A slide layout.
#[derive(Debug, Clone, Serialize)]
pub struct LayoutInfo {
    pub part: String,
    pub name: String,
    pub placeholders: Vec<LayoutPlaceholder>,
}

impl LayoutInfo {
    /// The title placeholder, if any.
    pub fn title(&self) -> Option<&LayoutPlaceholder> {
        self.placeholders.iter().find(|p| p.placeholder.is_title())
    }

    /// The body placeholder: the one with idx 1.
    pub fn body(&self) -> Option<&LayoutPlaceholder> {
        self.placeholders.iter().find(|p| p.placeholder.idx == 1)
    }
}

/// An existing slide in the template.
#[derive(Debug, Clone, Serialize)]
pub struct ExistingSlide {
    pub part: String,
    #[serde(flatten)]
    pub text: SlideText,
}

/// Everything the writer needs to know about a template.
#[derive(Debug, Clone, Serialize)]
pub struct Template {
    /// Main part, usually `ppt/presentation.xml`.
    pub presentation_part: String,
    pub slide_width: Emu,
    pub slide_height: Emu,
    pub notes_width: Emu,
    pub notes_height: Emu,
    pub master_part: String,
    pub layouts: Vec<LayoutInfo>,
    /// Slide parts in presentation order.
    pub slides: Vec<String>,
    pub notes_master_part: Option<String>,
}

#[derive(Debug, Default)]
struct PresentationXml {
    slide_size: Option<(i64, i64)>,
    notes_size: Option<(i64, i64)>,
    master_ids: Vec<String>,
    notes_master_ids: Vec<String>,
    slide_ids: Vec<String>,
}

impl Template {
    /// Read a template from a package.
    pub fn read(package: &Package) -> Result<Self> {
        let presentation_part = main_part(package)?;
        let presentation = parse_presentation(&package.part_str(&presentation_part)?)?;
        let rels = package.relationships(&presentation_part)?;

        let master_part = presentation
            .master_ids
            .iter()
            .find_map(|id| rels.by_id(id))
            .or_else(|| rels.first_of_kind("slideMaster"))
            .map(|rel| resolve_target(&presentation_part, &rel.target))
            .ok_or_else(|| Error::TemplateError("template has no slide master".to_string()))?;

        let notes_master_part = presentation
            .notes_master_ids
            .iter()
            .find_map(|id| rels.by_id(id))
            .or_else(|| rels.first_of_kind("notesMaster"))
            .map(|rel| resolve_target(&presentation_part, &rel.target))
            .filter(|part| package.contains(part));

        let slides = presentation
            .slide_ids
            .iter()
            .filter_map(|id| rels.by_id(id))
            .map(|rel| resolve_target(&presentation_part, &rel.target))
            .collect();

        let layouts = read_layouts(package, &master_part)?;
        if layouts.is_empty() {
            return Err(Error::TemplateError(format!(
                "slide master '{}' has no layouts",
                master_part
            )));
        }

        let (slide_width, slide_height) = presentation.slide_size.unwrap_or(DEFAULT_SLIDE_SIZE);
        let (notes_width, notes_height) = presentation.notes_size.unwrap_or(DEFAULT_NOTES_SIZE);

        log::debug!(
            "Template: {} layouts, {} existing slides, master {}",
            layouts.len(),
            presentation.slide_ids.len(),
            master_part
        );

        Ok(Self {
            presentation_part,
            slide_width: Emu(slide_width),
            slide_height: Emu(slide_height),
            notes_width: Emu(notes_width),
            notes_height: Emu(notes_height),
            master_part,
            layouts,
            slides,
            notes_master_part,
        })
    }

    /// Index of the layout new slides use: the second if there is more
    /// than one ("Title and Content" in stock templates), else the first.
    pub fn content_layout_index(&self) -> usize {
        if self.layouts.len() > 1 {
            1
        } else {
            0
        }
    }

    /// The layout new slides use.
    pub fn content_layout(&self) -> &LayoutInfo {
        &self.layouts[self.content_layout_index()]
    }

    /// Title and body text of the slides already in the template.
    pub fn existing_slides(&self, package: &Package) -> Result<Vec<ExistingSlide>> {
        self.slides
            .iter()
            .map(|part| {
                let shapes = read_shapes(&package.part_str(part)?)?;
                Ok(ExistingSlide {
                    part: part.clone(),
                    text: SlideText::from_shapes(&shapes),
                })
            })
            .collect()
    }
}

/// Target of the package's officeDocument relationship.
fn main_part(package: &Package) -> Result<String> {
    let rels = package.relationships("")?;
    Ok(rels
        .first_of_kind("officeDocument")
        .map(|rel| resolve_target("", &rel.target))
        .unwrap_or_else(|| "ppt/presentation.xml".to_string()))
}

fn parse_presentation(xml: &str) -> Result<PresentationXml> {
    let mut reader = Reader::from_str(xml);
    let mut out = PresentationXml::default();

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                let name = e.name();
                match local_name(name.as_ref()) {
                    b"sldMasterId" => out.master_ids.extend(rel_id(e)),
                    b"notesMasterId" => out.notes_master_ids.extend(rel_id(e)),
                    b"sldId" => out.slide_ids.extend(rel_id(e)),
                    b"sldSz" => out.slide_size = extent(e),
                    b"notesSz" => out.notes_size = extent(e),
                    _ => {}
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::XmlError(format!(
                    "Error parsing presentation: {}",
                    e
                )));
            }
            _ => {}
        }
    }

    Ok(out)
}

/// The `r:id` attribute of an element.
pub(crate) fn rel_id(e: &quick_xml::events::BytesStart) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() != b"id" && local_name(attr.key.as_ref()) == b"id")
        .map(|attr| attr_value(&attr))
}

fn extent(e: &quick_xml::events::BytesStart) -> Option<(i64, i64)> {
    let mut cx = None;
    let mut cy = None;
    for attr in e.attributes().flatten() {
        match attr.key.as_ref() {
            b"cx" => cx = attr_i64(&attr),
            b"cy" => cy = attr_i64(&attr),
            _ => {}
        }
    }
    Some((cx?, cy?))
}

/// Layout parts in the master's `sldLayoutIdLst` order.
fn layout_parts(package: &Package, master_part: &str) -> Result<Vec<String>> {
    let xml = package.part_str(master_part)?;
    let rels = package.relationships(master_part)?;
    let mut reader = Reader::from_str(&xml);
    let mut ids = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e))
                if local_name(e.name().as_ref()) == b"sldLayoutId" =>
            {
                ids.extend(rel_id(e));
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::XmlError(format!(
                    "Error parsing slide master: {}",
                    e
                )));
            }
            _ => {}
        }
    }

    let mut parts: Vec<String> = ids
        .iter()
        .filter_map(|id| rels.by_id(id))
        .map(|rel| resolve_target(master_part, &rel.target))
        .collect();

    if parts.is_empty() {
        parts = rels
            .items
            .iter()
            .filter(|rel| rel.kind() == "slideLayout")
            .map(|rel| resolve_target(master_part, &rel.target))
            .collect();
    }

    Ok(parts)
}

fn read_layouts(package: &Package, master_part: &str) -> Result<Vec<LayoutInfo>> {
    let master_shapes = read_shapes(&package.part_str(master_part)?)?;

    layout_parts(package, master_part)?
        .into_iter()
        .map(|part| {
            let xml = package.part_str(&part)?;
            let name = layout_name(&xml)?;
            let placeholders = read_shapes(&xml)?
                .into_iter()
                .filter_map(|shape| resolve_placeholder(shape, &master_shapes))
                .collect();
            Ok(LayoutInfo {
                part,
                name,
                placeholders,
            })
        })
        .collect()
}

fn layout_name(xml: &str) -> Result<String> {
    let mut reader = Reader::from_str(xml);
    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e))
                if local_name(e.name().as_ref()) == b"cSld" =>
            {
                return Ok(e
                    .attributes()
                    .flatten()
                    .find(|attr| attr.key.as_ref() == b"name")
                    .map(|attr| attr_value(&attr))
                    .unwrap_or_default());
            }
            Ok(Event::Eof) => return Ok(String::new()),
            Err(e) => {
                return Err(Error::XmlError(format!("Error parsing slide layout: {}", e)));
            }
            _ => {}
        }
    }
}

fn resolve_placeholder(shape: ShapeInfo, master_shapes: &[ShapeInfo]) -> Option<LayoutPlaceholder> {
    let placeholder = shape.placeholder?;
    let geometry = shape.geometry.or_else(|| {
        master_shapes
            .iter()
            .find(|m| {
                m.placeholder
                    .as_ref()
                    .is_some_and(|p| p.kind == placeholder.base_kind())
            })
            .and_then(|m| m.geometry)
    });

    Some(LayoutPlaceholder {
        name: shape.name,
        placeholder,
        geometry,
        default_size: shape.default_size,
    })
}
