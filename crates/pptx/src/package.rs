//! The OOXML package: a ZIP of parts wired together by relationship files.

use deck_core::{Error, Result};
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::io::{Cursor, Read, Seek, Write};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// Namespaces used in the parts we write.
pub const NS_PRESENTATION: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";
pub const NS_DRAWING: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
pub const NS_RELATIONSHIPS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const NS_PACKAGE_RELATIONSHIPS: &str =
    "http://schemas.openxmlformats.org/package/2006/relationships";
const NS_CONTENT_TYPES: &str = "http://schemas.openxmlformats.org/package/2006/content-types";

/// Relationship type URIs (transitional), keyed by what they point at.
pub mod rel_types {
    pub const OFFICE_DOCUMENT: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
    pub const SLIDE: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide";
    pub const SLIDE_LAYOUT: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout";
    pub const NOTES_SLIDE: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/notesSlide";
    pub const NOTES_MASTER: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/notesMaster";
    pub const THEME: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme";
    pub const IMAGE: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";
}

/// Content types of the parts we add or rewrite.
pub mod content_types {
    pub const PRESENTATION: &str =
        "application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml";
    pub const SLIDE: &str = "application/vnd.openxmlformats-officedocument.presentationml.slide+xml";
    pub const NOTES_SLIDE: &str =
        "application/vnd.openxmlformats-officedocument.presentationml.notesSlide+xml";
    pub const NOTES_MASTER: &str =
        "application/vnd.openxmlformats-officedocument.presentationml.notesMaster+xml";
    pub const THEME: &str = "application/vnd.openxmlformats-officedocument.theme+xml";
    pub const RELATIONSHIPS: &str = "application/vnd.openxmlformats-package.relationships+xml";
}

/// Name of the content types part.
pub const CONTENT_TYPES_PART: &str = "[Content_Types].xml";

/// Most we reserve up front for one part; ZIP headers can lie about sizes.
const MAX_PART_RESERVE: u64 = 16 * 1024 * 1024;

/// Every part of a package, in archive order.
#[derive(Debug, Clone, Default)]
pub struct Package {
    parts: Vec<(String, Vec<u8>)>,
}

impl Package {
    /// Read a package from a ZIP archive.
    pub fn read<R: Read + Seek>(reader: R) -> Result<Self> {
        let mut archive = ZipArchive::new(reader)
            .map_err(|e| Error::ZipError(format!("Failed to open ZIP: {}", e)))?;

        let mut parts = Vec::with_capacity(archive.len());
        for i in 0..archive.len() {
            let mut file = archive
                .by_index(i)
                .map_err(|e| Error::ZipError(format!("Failed to read entry {}: {}", i, e)))?;
            if file.is_dir() {
                continue;
            }
            let name = file.name().to_string();
            let mut data = Vec::with_capacity(file.size().min(MAX_PART_RESERVE) as usize);
            file.read_to_end(&mut data)
                .map_err(|e| Error::ZipError(format!("Failed to read '{}': {}", name, e)))?;
            parts.push((name, data));
        }

        log::debug!("Read package with {} parts", parts.len());
        Ok(Self { parts })
    }

    /// Read a package from bytes already in memory.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::read(Cursor::new(bytes))
    }

    /// Whether a part exists.
    pub fn contains(&self, name: &str) -> bool {
        self.parts.iter().any(|(n, _)| n == name)
    }

    /// Raw bytes of a part.
    pub fn part(&self, name: &str) -> Option<&[u8]> {
        self.parts
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, data)| data.as_slice())
    }

    /// A part decoded as UTF-8 text.
    pub fn part_str(&self, name: &str) -> Result<String> {
        let data = self
            .part(name)
            .ok_or_else(|| Error::TemplateError(format!("missing part '{}'", name)))?;
        String::from_utf8(data.to_vec())
            .map_err(|e| Error::XmlError(format!("'{}' is not UTF-8: {}", name, e)))
    }

    /// Relationships of a part; empty when the part has none.
    pub fn relationships(&self, part: &str) -> Result<Relationships> {
        let rels_name = rels_path_for(part);
        if !self.contains(&rels_name) {
            return Ok(Relationships::default());
        }
        Relationships::parse(&self.part_str(&rels_name)?)
    }

    /// Add a part, replacing any existing part with the same name.
    pub fn set_part(&mut self, name: impl Into<String>, data: Vec<u8>) {
        let name = name.into();
        match self.parts.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = data,
            None => self.parts.push((name, data)),
        }
    }

    /// Drop every part for which `keep` returns false.
    pub fn retain<F: FnMut(&str) -> bool>(&mut self, mut keep: F) {
        self.parts.retain(|(name, _)| keep(name));
    }

    /// Part names, in archive order.
    pub fn part_names(&self) -> impl Iterator<Item = &str> {
        self.parts.iter().map(|(n, _)| n.as_str())
    }

    /// First unused part name of the form `{prefix}{n}{suffix}`, n from 1.
    pub fn next_free_name(&self, prefix: &str, suffix: &str) -> String {
        (1..)
            .map(|n| format!("{}{}{}", prefix, n, suffix))
            .find(|name| !self.contains(name))
            .unwrap_or_else(|| format!("{}0{}", prefix, suffix))
    }

    /// Serialize the package as a ZIP archive, content types first.
    pub fn write(&self) -> Result<Vec<u8>> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

        let ordered = self
            .parts
            .iter()
            .filter(|(n, _)| n == CONTENT_TYPES_PART)
            .chain(self.parts.iter().filter(|(n, _)| n != CONTENT_TYPES_PART));

        for (name, data) in ordered {
            zip.start_file(name.as_str(), options)
                .map_err(|e| Error::ZipError(format!("Failed to add '{}': {}", name, e)))?;
            zip.write_all(data)?;
        }

        let cursor = zip
            .finish()
            .map_err(|e| Error::ZipError(format!("Failed to finish ZIP: {}", e)))?;
        Ok(cursor.into_inner())
    }
}

/// A single relationship from a source part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    pub id: String,
    pub rel_type: String,
    pub target: String,
    pub external: bool,
}

impl Relationship {
    /// Last segment of the type URI, e.g. `slideLayout`.
    ///
    /// Strict and transitional documents use different URI prefixes for
    /// the same relationship, so callers compare on this instead.
    pub fn kind(&self) -> &str {
        self.rel_type.rsplit('/').next().unwrap_or(&self.rel_type)
    }
}

/// The contents of one `_rels/*.rels` part.
#[derive(Debug, Clone, Default)]
pub struct Relationships {
    pub items: Vec<Relationship>,
}

impl Relationships {
    /// Parse a relationships part.
    pub fn parse(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        let mut items = Vec::new();

        loop {
            match reader.read_event() {
                Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                    if local_name(e.name().as_ref()) == b"Relationship" =>
                {
                    let mut rel = Relationship {
                        id: String::new(),
                        rel_type: String::new(),
                        target: String::new(),
                        external: false,
                    };
                    for attr in e.attributes().flatten() {
                        match attr.key.as_ref() {
                            b"Id" => rel.id = attr_value(&attr),
                            b"Type" => rel.rel_type = attr_value(&attr),
                            b"Target" => rel.target = attr_value(&attr),
                            b"TargetMode" => rel.external = attr_value(&attr) == "External",
                            _ => {}
                        }
                    }
                    items.push(rel);
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(Error::XmlError(format!(
                        "Error parsing relationships: {}",
                        e
                    )));
                }
                _ => {}
            }
        }

        Ok(Self { items })
    }

    /// Serialize back to a relationships part.
    pub fn to_xml(&self) -> Result<Vec<u8>> {
        let mut w = XmlWriter::new()?;
        w.start("Relationships", &[("xmlns", NS_PACKAGE_RELATIONSHIPS)])?;
        for rel in &self.items {
            let mut attrs = vec![
                ("Id", rel.id.as_str()),
                ("Type", rel.rel_type.as_str()),
                ("Target", rel.target.as_str()),
            ];
            if rel.external {
                attrs.push(("TargetMode", "External"));
            }
            w.empty("Relationship", &attrs)?;
        }
        w.end("Relationships")?;
        Ok(w.finish())
    }

    /// Look up a relationship by id.
    pub fn by_id(&self, id: &str) -> Option<&Relationship> {
        self.items.iter().find(|r| r.id == id)
    }

    /// First relationship of a kind (see [`Relationship::kind`]).
    pub fn first_of_kind(&self, kind: &str) -> Option<&Relationship> {
        self.items.iter().find(|r| r.kind() == kind)
    }

    /// Add a relationship under a fresh `rIdN` id and return that id.
    pub fn add(&mut self, rel_type: &str, target: impl Into<String>) -> String {
        let next = self
            .items
            .iter()
            .filter_map(|r| r.id.strip_prefix("rId"))
            .filter_map(|n| n.parse::<u32>().ok())
            .max()
            .unwrap_or(0)
            + 1;
        let id = format!("rId{}", next);
        self.items.push(Relationship {
            id: id.clone(),
            rel_type: rel_type.to_string(),
            target: target.into(),
            external: false,
        });
        id
    }

    /// Drop every relationship for which `keep` returns false.
    pub fn retain<F: FnMut(&Relationship) -> bool>(&mut self, keep: F) {
        self.items.retain(keep);
    }
}

/// The `[Content_Types].xml` part.
#[derive(Debug, Clone, Default)]
pub struct ContentTypes {
    /// (extension, content type)
    pub defaults: Vec<(String, String)>,
    /// (part name with leading '/', content type)
    pub overrides: Vec<(String, String)>,
}

impl ContentTypes {
    /// Parse the content types part.
    pub fn parse(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        let mut types = ContentTypes::default();

        loop {
            match reader.read_event() {
                Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e)) => {
                    let name = e.name();
                    let key_attr: &[u8] = match local_name(name.as_ref()) {
                        b"Default" => b"Extension",
                        b"Override" => b"PartName",
                        _ => continue,
                    };
                    let mut key = String::new();
                    let mut content_type = String::new();
                    for attr in e.attributes().flatten() {
                        if attr.key.as_ref() == key_attr {
                            key = attr_value(&attr);
                        } else if attr.key.as_ref() == b"ContentType" {
                            content_type = attr_value(&attr);
                        }
                    }
                    if key_attr == b"Extension" {
                        types.defaults.push((key, content_type));
                    } else {
                        types.overrides.push((key, content_type));
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(Error::XmlError(format!(
                        "Error parsing content types: {}",
                        e
                    )));
                }
                _ => {}
            }
        }

        Ok(types)
    }

    /// Serialize back to XML.
    pub fn to_xml(&self) -> Result<Vec<u8>> {
        let mut w = XmlWriter::new()?;
        w.start("Types", &[("xmlns", NS_CONTENT_TYPES)])?;
        for (ext, ct) in &self.defaults {
            w.empty(
                "Default",
                &[("Extension", ext.as_str()), ("ContentType", ct.as_str())],
            )?;
        }
        for (part, ct) in &self.overrides {
            w.empty(
                "Override",
                &[("PartName", part.as_str()), ("ContentType", ct.as_str())],
            )?;
        }
        w.end("Types")?;
        Ok(w.finish())
    }

    /// Content type override for a part name (with or without leading '/').
    pub fn override_for(&self, part: &str) -> Option<&str> {
        let part = absolute_part_name(part);
        self.overrides
            .iter()
            .find(|(p, _)| *p == part)
            .map(|(_, ct)| ct.as_str())
    }

    /// Set the override for a part, replacing any existing one.
    pub fn set_override(&mut self, part: &str, content_type: &str) {
        let part = absolute_part_name(part);
        match self.overrides.iter_mut().find(|(p, _)| *p == part) {
            Some(entry) => entry.1 = content_type.to_string(),
            None => self.overrides.push((part, content_type.to_string())),
        }
    }

    /// Register a default for an extension unless one exists.
    pub fn ensure_default(&mut self, extension: &str, content_type: &str) {
        let exists = self
            .defaults
            .iter()
            .any(|(ext, _)| ext.eq_ignore_ascii_case(extension));
        if !exists {
            self.defaults
                .push((extension.to_string(), content_type.to_string()));
        }
    }

    /// Drop every override for which `keep` returns false.
    pub fn retain_overrides<F: FnMut(&str) -> bool>(&mut self, mut keep: F) {
        self.overrides.retain(|(part, _)| keep(part));
    }
}

/// Thin wrapper around a quick-xml writer for building parts.
pub struct XmlWriter {
    inner: Writer<Vec<u8>>,
}

impl XmlWriter {
    /// Start a document with the standard declaration.
    pub fn new() -> Result<Self> {
        let mut w = Self::bare();
        w.event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
        Ok(w)
    }

    /// Writer without a declaration, for streaming rewrites.
    pub fn bare() -> Self {
        Self {
            inner: Writer::new(Vec::new()),
        }
    }

    /// Write any event.
    pub fn event<'a, E: AsRef<Event<'a>>>(&mut self, event: E) -> Result<()> {
        self.inner
            .write_event(event)
            .map_err(|e| Error::XmlError(format!("Failed to write XML: {}", e)))
    }

    /// Open an element.
    pub fn start(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
        self.event(Event::Start(
            BytesStart::new(name).with_attributes(attrs.iter().copied()),
        ))
    }

    /// Write a self-closing element.
    pub fn empty(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
        self.event(Event::Empty(
            BytesStart::new(name).with_attributes(attrs.iter().copied()),
        ))
    }

    /// Close an element.
    pub fn end(&mut self, name: &str) -> Result<()> {
        self.event(Event::End(BytesEnd::new(name)))
    }

    /// Write escaped character data.
    pub fn text(&mut self, text: &str) -> Result<()> {
        self.event(Event::Text(BytesText::new(text)))
    }

    /// `<name>text</name>`.
    pub fn text_element(&mut self, name: &str, text: &str) -> Result<()> {
        self.start(name, &[])?;
        self.text(text)?;
        self.end(name)
    }

    /// The finished document.
    pub fn finish(self) -> Vec<u8> {
        self.inner.into_inner()
    }
}

/// Extract the local name from a potentially namespaced XML element name.
pub fn local_name(name: &[u8]) -> &[u8] {
    if let Some(pos) = name.iter().position(|&b| b == b':') {
        &name[pos + 1..]
    } else {
        name
    }
}

/// Unescaped attribute value.
pub fn attr_value(attr: &Attribute) -> String {
    attr.unescape_value()
        .map(|v| v.into_owned())
        .unwrap_or_else(|_| String::from_utf8_lossy(&attr.value).to_string())
}

/// Parse an attribute as an integer, ignoring junk.
pub fn attr_i64(attr: &Attribute) -> Option<i64> {
    String::from_utf8_lossy(&attr.value).trim().parse().ok()
}

/// `ppt/slides/slide1.xml` -> `ppt/slides/_rels/slide1.xml.rels`.
pub fn rels_path_for(part: &str) -> String {
    match part.rsplit_once('/') {
        Some((dir, file)) => format!("{}/_rels/{}.rels", dir, file),
        None => format!("_rels/{}.rels", part),
    }
}

/// Resolve a relationship target against the part that owns it.
pub fn resolve_target(source_part: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }

    let mut segments: Vec<&str> = match source_part.rsplit_once('/') {
        Some((dir, _)) => dir.split('/').collect(),
        None => Vec::new(),
    };
    for segment in target.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }
    segments.join("/")
}

/// Relative target from `source_part` to `target_part`.
pub fn relative_target(source_part: &str, target_part: &str) -> String {
    let source_dir: Vec<&str> = match source_part.rsplit_once('/') {
        Some((dir, _)) => dir.split('/').collect(),
        None => Vec::new(),
    };
    let target: Vec<&str> = target_part.split('/').collect();

    let common = source_dir
        .iter()
        .zip(target.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<&str> = vec![".."; source_dir.len() - common];
    parts.extend_from_slice(&target[common..]);
    parts.join("/")
}

fn absolute_part_name(part: &str) -> String {
    if part.starts_with('/') {
        part.to_string()
    } else {
        format!("/{}", part)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_name() {
        assert_eq!(local_name(b"p:sp"), b"sp");
        assert_eq!(local_name(b"a:t"), b"t");
        assert_eq!(local_name(b"sp"), b"sp");
    }

    #[test]
    fn test_rels_path_for() {
        assert_eq!(
            rels_path_for("ppt/slides/slide1.xml"),
            "ppt/slides/_rels/slide1.xml.rels"
        );
        assert_eq!(rels_path_for("ppt/presentation.xml"), "ppt/_rels/presentation.xml.rels");
        assert_eq!(rels_path_for(""), "_rels/.rels");
    }

    #[test]
    fn test_resolve_target() {
        assert_eq!(
            resolve_target("ppt/presentation.xml", "slides/slide1.xml"),
            "ppt/slides/slide1.xml"
        );
        assert_eq!(
            resolve_target("ppt/slideMasters/slideMaster1.xml", "../slideLayouts/slideLayout2.xml"),
            "ppt/slideLayouts/slideLayout2.xml"
        );
        assert_eq!(
            resolve_target("ppt/slides/slide1.xml", "/ppt/media/image1.png"),
            "ppt/media/image1.png"
        );
        assert_eq!(resolve_target("", "ppt/presentation.xml"), "ppt/presentation.xml");
    }

    #[test]
    fn test_relative_target() {
        assert_eq!(
            relative_target("ppt/slides/slide1.xml", "ppt/slideLayouts/slideLayout2.xml"),
            "../slideLayouts/slideLayout2.xml"
        );
        assert_eq!(
            relative_target("ppt/presentation.xml", "ppt/slides/slide3.xml"),
            "slides/slide3.xml"
        );
        assert_eq!(
            relative_target("ppt/notesSlides/notesSlide1.xml", "ppt/notesMasters/notesMaster1.xml"),
            "../notesMasters/notesMaster1.xml"
        );
    }

    #[test]
    fn test_relationships_round_trip() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster" Target="slideMasters/slideMaster1.xml"/>
  <Relationship Id="rId7" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink" Target="https://example.com/?a=1&amp;b=2" TargetMode="External"/>
</Relationships>"#;

        let mut rels = Relationships::parse(xml).unwrap();
        assert_eq!(rels.items.len(), 2);
        assert_eq!(rels.items[0].kind(), "slideMaster");
        assert_eq!(rels.items[1].target, "https://example.com/?a=1&b=2");
        assert!(rels.items[1].external);

        let id = rels.add(rel_types::SLIDE, "slides/slide1.xml");
        assert_eq!(id, "rId8");

        let written = String::from_utf8(rels.to_xml().unwrap()).unwrap();
        let back = Relationships::parse(&written).unwrap();
        assert_eq!(back.items, rels.items);
    }

    #[test]
    fn test_content_types() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="xml" ContentType="application/xml"/>
  <Override PartName="/ppt/slides/slide1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slide+xml"/>
</Types>"#;

        let mut types = ContentTypes::parse(xml).unwrap();
        assert_eq!(types.defaults.len(), 1);
        assert_eq!(types.override_for("ppt/slides/slide1.xml"), Some(content_types::SLIDE));

        types.retain_overrides(|part| !part.starts_with("/ppt/slides/"));
        types.set_override("ppt/slides/slide9.xml", content_types::SLIDE);
        types.ensure_default("png", "image/png");
        types.ensure_default("XML", "text/xml");

        let back = ContentTypes::parse(&String::from_utf8(types.to_xml().unwrap()).unwrap()).unwrap();
        assert_eq!(back.defaults.len(), 2);
        assert_eq!(back.overrides, vec![("/ppt/slides/slide9.xml".to_string(), content_types::SLIDE.to_string())]);
    }

    #[test]
    fn test_package_round_trip() {
        let mut package = Package::default();
        package.set_part("ppt/presentation.xml", b"<p/>".to_vec());
        package.set_part(CONTENT_TYPES_PART, b"<Types/>".to_vec());
        package.set_part("ppt/presentation.xml", b"<p:presentation/>".to_vec());

        let bytes = package.write().unwrap();
        let back = Package::from_bytes(&bytes).unwrap();

        let names: Vec<&str> = back.part_names().collect();
        assert_eq!(names, vec![CONTENT_TYPES_PART, "ppt/presentation.xml"]);
        assert_eq!(back.part("ppt/presentation.xml"), Some(&b"<p:presentation/>"[..]));
    }

    #[test]
    fn test_oversized_header_is_not_trusted() {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = FileOptions::default().compression_method(CompressionMethod::Stored);
        zip.start_file("ppt/presentation.xml", options).unwrap();
        zip.write_all(b"<p:presentation/>").unwrap();
        let mut bytes = zip.finish().unwrap().into_inner();

        // Claim a ~4 GiB uncompressed size in the central directory.
        let central = bytes
            .windows(4)
            .position(|w| w == [0x50, 0x4b, 0x01, 0x02])
            .unwrap();
        bytes[central + 24..central + 28].copy_from_slice(&0xFFFF_FFF0u32.to_le_bytes());

        let package = Package::from_bytes(&bytes).unwrap();
        assert_eq!(package.part("ppt/presentation.xml"), Some(&b"<p:presentation/>"[..]));
    }

    #[test]
    fn test_next_free_name() {
        let mut package = Package::default();
        package.set_part("ppt/media/image1.png", Vec::new());
        package.set_part("ppt/media/image2.jpeg", Vec::new());
        assert_eq!(package.next_free_name("ppt/media/image", ".png"), "ppt/media/image2.png");
    }

    #[test]
    fn test_escaped_text() {
        let mut w = XmlWriter::bare();
        w.text_element("a:t", "Q&A <now>").unwrap();
        assert_eq!(String::from_utf8(w.finish()).unwrap(), "<a:t>Q&amp;A &lt;now&gt;</a:t>");
    }
}
