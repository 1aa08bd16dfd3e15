//! Laying slide records onto a template.

use crate::package::{
    content_types, local_name, rel_types, rels_path_for, relative_target, resolve_target,
    ContentTypes, Package, Relationships, XmlWriter, CONTENT_TYPES_PART,
};
use crate::slide::{notes_master_xml, notes_slide_xml, slide_xml, BodyShape, PictureShape, TitleShape};
use crate::template::{LayoutInfo, Template};
use deck_core::layout::{
    body_font_size, compute_safe_top, default_body_area, fit_body, fit_in_box, split_for_image,
};
use deck_core::{Error, Rect, Result, SlideRecord};
use image::{ImageFormat, ImageReader};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::io::Cursor;
use std::path::{Path, PathBuf};

/// PowerPoint's section list extension; its entries name slide ids.
const SECTION_LIST_URI: &str = "{521415D9-36F7-43E2-AB2F-B90AF26B5E84}";

/// Slide ids start here.
const FIRST_SLIDE_ID: u32 = 256;

/// Writes decks: one slide per record on the template's content layout.
#[derive(Debug, Clone, Default)]
pub struct DeckWriter {
    image_dir: Option<PathBuf>,
}

/// Where things go for one generated slide.
struct SlideParts {
    slide: String,
    notes: Option<String>,
}

impl DeckWriter {
    /// Create a writer that resolves image paths against the working directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve relative image paths against `dir`.
    pub fn with_image_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.image_dir = Some(dir.into());
        self
    }

    /// Read a template from disk, render, and write the deck to `output`.
    pub fn render_file(&self, template: &Path, slides: &[SlideRecord], output: &Path) -> Result<()> {
        let bytes = std::fs::read(template)?;
        let deck = self.render(&bytes, slides)?;
        std::fs::write(output, deck)?;
        log::info!("Wrote {} slides to {}", slides.len(), output.display());
        Ok(())
    }

    /// Render `slides` onto the template in `template` and return the deck.
    ///
    /// Every slide already in the template is dropped first.
    pub fn render(&self, template: &[u8], slides: &[SlideRecord]) -> Result<Vec<u8>> {
        let mut package = Package::from_bytes(template)?;
        let info = Template::read(&package)?;
        let layout = info.content_layout().clone();
        log::info!(
            "Using layout '{}' ({} of {}) for {} slides",
            layout.name,
            info.content_layout_index() + 1,
            info.layouts.len(),
            slides.len()
        );

        let mut types = ContentTypes::parse(&package.part_str(CONTENT_TYPES_PART)?)?;
        let mut presentation_rels = package.relationships(&info.presentation_part)?;
        let base = part_dir(&info.presentation_part);

        remove_slides(&mut package, &mut types, &mut presentation_rels, &base);

        let wants_notes = slides.iter().any(|s| notes_text(s).is_some());
        let mut new_notes_master = None;
        let notes_master = match (&info.notes_master_part, wants_notes) {
            (Some(part), _) => Some(part.clone()),
            (None, true) => {
                let (part, rel_id) =
                    add_notes_master(&mut package, &mut types, &mut presentation_rels, &info, &base)?;
                new_notes_master = Some(rel_id);
                Some(part)
            }
            (None, false) => None,
        };

        let mut slide_rel_ids = Vec::with_capacity(slides.len());
        for (index, record) in slides.iter().enumerate() {
            let parts = SlideParts {
                slide: format!("{}/slides/slide{}.xml", base, index + 1),
                notes: notes_master
                    .as_ref()
                    .filter(|_| notes_text(record).is_some())
                    .map(|_| format!("{}/notesSlides/notesSlide{}.xml", base, index + 1)),
            };

            self.add_slide(
                &mut package,
                &mut types,
                &info,
                &layout,
                index,
                record,
                &parts,
                notes_master.as_deref(),
            )?;

            slide_rel_ids.push(presentation_rels.add(
                rel_types::SLIDE,
                relative_target(&info.presentation_part, &parts.slide),
            ));
        }

        let presentation = rewrite_presentation(
            &package.part_str(&info.presentation_part)?,
            &slide_rel_ids,
            new_notes_master.as_deref(),
        )?;
        package.set_part(info.presentation_part.clone(), presentation);
        package.set_part(
            rels_path_for(&info.presentation_part),
            presentation_rels.to_xml()?,
        );

        if types
            .override_for(&info.presentation_part)
            .is_some_and(|ct| ct.contains(".template.main+xml"))
        {
            log::debug!("Converting template content type to presentation");
            types.set_override(&info.presentation_part, content_types::PRESENTATION);
        }
        package.set_part(CONTENT_TYPES_PART, types.to_xml()?);

        package.write()
    }

    #[allow(clippy::too_many_arguments)]
    fn add_slide(
        &self,
        package: &mut Package,
        types: &mut ContentTypes,
        info: &Template,
        layout: &LayoutInfo,
        index: usize,
        record: &SlideRecord,
        parts: &SlideParts,
        notes_master: Option<&str>,
    ) -> Result<()> {
        let mut rels = Relationships::default();
        rels.add(
            rel_types::SLIDE_LAYOUT,
            relative_target(&parts.slide, &layout.part),
        );

        let title_ph = layout.title();
        let body_ph = layout.body();
        if title_ph.is_none() {
            log::debug!("Layout '{}' has no title placeholder", layout.name);
        }

        let safe_top = compute_safe_top(title_ph.and_then(|t| t.geometry), &record.title);
        // New paragraphs carry no size of their own.
        let font_size = body_font_size(index, None);
        let mut body_rect = body_ph.map(|b| {
            let area = b.geometry.unwrap_or_else(|| {
                log::warn!(
                    "Layout '{}' never positions its body; placing it below the title",
                    layout.name
                );
                default_body_area(info.slide_width, info.slide_height, safe_top)
            });
            fit_body(area, safe_top, info.slide_height)
        });

        let mut picture = None;
        if let Some(path) = &record.image {
            match body_rect {
                Some(rect) => {
                    let (text_box, image_box) = split_for_image(rect);
                    let (rel_id, geometry) =
                        self.embed_image(package, types, &parts.slide, &mut rels, path, image_box)?;
                    body_rect = Some(text_box);
                    picture = Some((rel_id, geometry));
                }
                None => log::warn!(
                    "Slide {}: layout '{}' has no body area, skipping image {}",
                    index + 1,
                    layout.name,
                    path
                ),
            }
        }

        log::debug!(
            "Slide {}: safe top {}, body {:?}, font {}pt",
            index + 1,
            safe_top,
            body_rect,
            font_size.hundredths() / 100
        );

        let title = title_ph.map(|ph| TitleShape {
            placeholder: &ph.placeholder,
            text: &record.title,
        });
        let body = body_ph.map(|ph| BodyShape {
            placeholder: &ph.placeholder,
            geometry: body_rect,
            bullets: &record.content,
            font_size,
        });
        let picture = picture.as_ref().map(|(rel_id, geometry)| PictureShape {
            rel_id,
            geometry: *geometry,
            description: record.image.as_deref().unwrap_or_default(),
        });

        if let (Some(notes_part), Some(master), Some(text)) =
            (&parts.notes, notes_master, notes_text(record))
        {
            package.set_part(notes_part.clone(), notes_slide_xml(text)?);
            let mut notes_rels = Relationships::default();
            notes_rels.add(rel_types::NOTES_MASTER, relative_target(notes_part, master));
            notes_rels.add(rel_types::SLIDE, relative_target(notes_part, &parts.slide));
            package.set_part(rels_path_for(notes_part), notes_rels.to_xml()?);
            types.set_override(notes_part, content_types::NOTES_SLIDE);

            rels.add(rel_types::NOTES_SLIDE, relative_target(&parts.slide, notes_part));
        }

        package.set_part(
            parts.slide.clone(),
            slide_xml(title.as_ref(), body.as_ref(), picture.as_ref())?,
        );
        package.set_part(rels_path_for(&parts.slide), rels.to_xml()?);
        types.set_override(&parts.slide, content_types::SLIDE);

        Ok(())
    }

    /// Copy an image into the package and fit it into `bounds`.
    fn embed_image(
        &self,
        package: &mut Package,
        types: &mut ContentTypes,
        slide_part: &str,
        rels: &mut Relationships,
        path: &str,
        bounds: Rect,
    ) -> Result<(String, Rect)> {
        let full_path = match &self.image_dir {
            Some(dir) => dir.join(path),
            None => PathBuf::from(path),
        };
        let bytes = std::fs::read(&full_path)
            .map_err(|e| Error::ImageError(format!("{}: {}", full_path.display(), e)))?;

        let reader = ImageReader::new(Cursor::new(bytes.as_slice()))
            .with_guessed_format()
            .map_err(|e| Error::ImageError(format!("{}: {}", full_path.display(), e)))?;
        let (extension, mime) = match reader.format() {
            Some(ImageFormat::Png) => ("png", "image/png"),
            Some(ImageFormat::Jpeg) => ("jpeg", "image/jpeg"),
            other => {
                return Err(Error::ImageError(format!(
                    "{}: unsupported image format {:?}",
                    full_path.display(),
                    other
                )));
            }
        };
        let (width, height) = reader
            .into_dimensions()
            .map_err(|e| Error::ImageError(format!("{}: {}", full_path.display(), e)))?;

        let base = part_dir(slide_part);
        let media_dir = part_dir(&base);
        let media_part =
            package.next_free_name(&format!("{}/media/image", media_dir), &format!(".{}", extension));
        package.set_part(media_part.clone(), bytes);
        types.ensure_default(extension, mime);

        let rel_id = rels.add(rel_types::IMAGE, relative_target(slide_part, &media_part));
        log::debug!("Embedded {} ({}x{}) as {}", path, width, height, media_part);

        Ok((rel_id, fit_in_box(width, height, bounds)))
    }
}

fn notes_text(record: &SlideRecord) -> Option<&str> {
    record.notes.as_deref().filter(|n| !n.trim().is_empty())
}

/// Directory of a part, e.g. `ppt` for `ppt/presentation.xml`.
fn part_dir(part: &str) -> String {
    part.rsplit_once('/')
        .map(|(dir, _)| dir.to_string())
        .unwrap_or_default()
}

/// Drop every slide and notes slide with their relationships and overrides.
fn remove_slides(
    package: &mut Package,
    types: &mut ContentTypes,
    presentation_rels: &mut Relationships,
    base: &str,
) {
    let slides_dir = format!("{}/slides/", base);
    let notes_dir = format!("{}/notesSlides/", base);

    let before = package.part_names().count();
    package.retain(|name| !name.starts_with(&slides_dir) && !name.starts_with(&notes_dir));
    let removed = before - package.part_names().count();

    types.retain_overrides(|part| {
        let part = part.trim_start_matches('/');
        !part.starts_with(&slides_dir) && !part.starts_with(&notes_dir)
    });
    presentation_rels.retain(|rel| rel.kind() != "slide");

    if removed > 0 {
        log::debug!("Removed {} template slide parts", removed);
    }
}

/// Add a notes master (with a copy of the slide master's theme).
fn add_notes_master(
    package: &mut Package,
    types: &mut ContentTypes,
    presentation_rels: &mut Relationships,
    info: &Template,
    base: &str,
) -> Result<(String, String)> {
    let part = package.next_free_name(&format!("{}/notesMasters/notesMaster", base), ".xml");
    package.set_part(
        part.clone(),
        notes_master_xml(info.notes_width, info.notes_height)?,
    );
    types.set_override(&part, content_types::NOTES_MASTER);

    let mut rels = Relationships::default();
    let master_rels = package.relationships(&info.master_part)?;
    let theme = master_rels
        .first_of_kind("theme")
        .map(|rel| resolve_target(&info.master_part, &rel.target))
        .and_then(|source| package.part(&source).map(<[u8]>::to_vec));
    match theme {
        Some(data) => {
            let theme_part = package.next_free_name(&format!("{}/theme/theme", base), ".xml");
            package.set_part(theme_part.clone(), data);
            types.set_override(&theme_part, content_types::THEME);
            rels.add(rel_types::THEME, relative_target(&part, &theme_part));
        }
        None => log::warn!("Slide master has no theme; notes master created without one"),
    }
    package.set_part(rels_path_for(&part), rels.to_xml()?);

    let rel_id = presentation_rels.add(
        rel_types::NOTES_MASTER,
        relative_target(&info.presentation_part, &part),
    );
    log::debug!("Created notes master {}", part);
    Ok((part, rel_id))
}

/// Elements of presentation.xml that list or group the old slides.
fn is_slide_listing(e: &BytesStart) -> bool {
    match local_name(e.name().as_ref()) {
        b"sldIdLst" | b"custShowLst" => true,
        b"ext" => e
            .attributes()
            .flatten()
            .any(|attr| attr.key.as_ref() == b"uri" && attr.value.as_ref() == SECTION_LIST_URI.as_bytes()),
        _ => false,
    }
}

/// Stream presentation.xml through, replacing the slide list.
fn rewrite_presentation(
    xml: &str,
    slide_rel_ids: &[String],
    notes_master_rel: Option<&str>,
) -> Result<Vec<u8>> {
    let mut reader = Reader::from_str(xml);
    let mut w = XmlWriter::bare();
    let mut slide_list_written = false;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| Error::XmlError(format!("Error parsing presentation: {}", e)))?;

        match &event {
            Event::Start(e) if is_slide_listing(e) => {
                let end = e.to_end().into_owned();
                reader
                    .read_to_end(end.name())
                    .map_err(|e| Error::XmlError(format!("Error parsing presentation: {}", e)))?;
                continue;
            }
            Event::Empty(e) if is_slide_listing(e) => continue,
            Event::Start(e) | Event::Empty(e)
                if !slide_list_written && local_name(e.name().as_ref()) == b"sldSz" =>
            {
                write_slide_list(&mut w, slide_rel_ids)?;
                slide_list_written = true;
            }
            Event::Eof => break,
            _ => {}
        }

        let closes_master_list = matches!(
            &event,
            Event::End(e) if local_name(e.name().as_ref()) == b"sldMasterIdLst"
        );
        w.event(event)?;

        if closes_master_list {
            if let Some(rel_id) = notes_master_rel {
                w.start("p:notesMasterIdLst", &[])?;
                w.empty("p:notesMasterId", &[("r:id", rel_id)])?;
                w.end("p:notesMasterIdLst")?;
            }
        }
    }

    if !slide_list_written {
        return Err(Error::TemplateError(
            "presentation.xml has no slide size".to_string(),
        ));
    }
    Ok(w.finish())
}

fn write_slide_list(w: &mut XmlWriter, slide_rel_ids: &[String]) -> Result<()> {
    if slide_rel_ids.is_empty() {
        return Ok(());
    }
    w.start("p:sldIdLst", &[])?;
    for (i, rel_id) in slide_rel_ids.iter().enumerate() {
        let id = (FIRST_SLIDE_ID + i as u32).to_string();
        w.empty("p:sldId", &[("id", id.as_str()), ("r:id", rel_id.as_str())])?;
    }
    w.end("p:sldIdLst")
}
