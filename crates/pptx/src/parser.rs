//! Shape extraction from slide, layout and master XML.

use crate::package::{attr_i64, attr_value, local_name};
use deck_core::{Error, FontSize, Rect, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde::Serialize;

/// A placeholder reference (`p:ph`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Placeholder {
    /// `type` attribute; `obj` when absent.
    pub kind: String,
    /// `idx` attribute; 0 when absent.
    pub idx: u32,
    /// Whether `type` was written out.
    #[serde(skip)]
    pub explicit_kind: bool,
    /// Whether `idx` was written out.
    #[serde(skip)]
    pub explicit_idx: bool,
}

impl Default for Placeholder {
    fn default() -> Self {
        Self {
            kind: "obj".to_string(),
            idx: 0,
            explicit_kind: false,
            explicit_idx: false,
        }
    }
}

impl Placeholder {
    /// Title or centered title.
    pub fn is_title(&self) -> bool {
        matches!(self.kind.as_str(), "title" | "ctrTitle")
    }

    /// The master placeholder type a layout placeholder inherits from.
    pub fn base_kind(&self) -> &str {
        match self.kind.as_str() {
            "title" | "ctrTitle" => "title",
            "dt" | "ftr" | "sldNum" | "hdr" => &self.kind,
            _ => "body",
        }
    }

    /// Attributes to write on a `p:ph` that clones this placeholder.
    pub fn attributes(&self) -> Vec<(&'static str, String)> {
        let mut attrs = Vec::new();
        if self.explicit_kind {
            attrs.push(("type", self.kind.clone()));
        }
        if self.explicit_idx {
            attrs.push(("idx", self.idx.to_string()));
        }
        attrs
    }
}

/// A shape found in a shape tree.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ShapeInfo {
    pub id: u32,
    pub name: String,
    pub placeholder: Option<Placeholder>,
    pub geometry: Option<Rect>,
    /// Text of each paragraph; `a:br` becomes a newline.
    pub paragraphs: Vec<String>,
    /// `sz` of every run, in document order.
    #[serde(skip)]
    pub run_sizes: Vec<FontSize>,
    /// First-level default size from the shape's own list style.
    pub default_size: Option<FontSize>,
    pub is_picture: bool,
}

impl ShapeInfo {
    /// All paragraphs joined by newlines.
    pub fn text(&self) -> String {
        self.paragraphs.join("\n")
    }
}

#[derive(Debug, Default)]
struct ParseState {
    in_xfrm: bool,
    in_text_body: bool,
    in_list_style: bool,
    in_level_one: bool,
    in_paragraph: bool,
    in_text: bool,
}

/// Extract shapes (`p:sp`, `p:pic`) with text and position from part XML.
pub fn read_shapes(xml_content: &str) -> Result<Vec<ShapeInfo>> {
    let mut shapes = Vec::new();
    let mut reader = Reader::from_str(xml_content);

    let mut current_shape: Option<ShapeInfo> = None;
    let mut state = ParseState::default();
    let mut current_text = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                let name = e.name();
                match local_name(name.as_ref()) {
                    b"sp" | b"pic" => {
                        current_shape = Some(ShapeInfo {
                            is_picture: local_name(name.as_ref()) == b"pic",
                            ..Default::default()
                        });
                        state = ParseState::default();
                    }
                    b"xfrm" => state.in_xfrm = true,
                    b"txBody" => state.in_text_body = true,
                    b"lstStyle" => state.in_list_style = true,
                    b"lvl1pPr" => state.in_level_one = true,
                    b"p" if state.in_text_body => {
                        state.in_paragraph = true;
                        current_text.clear();
                    }
                    b"t" if state.in_paragraph => state.in_text = true,
                    local => {
                        if let Some(ref mut shape) = current_shape {
                            apply_attributes(shape, local, e, &state);
                        }
                    }
                }
            }
            Ok(Event::Empty(ref e)) => {
                let name = e.name();
                match local_name(name.as_ref()) {
                    b"br" if state.in_paragraph => current_text.push('\n'),
                    b"p" if state.in_text_body => {
                        if let Some(ref mut shape) = current_shape {
                            shape.paragraphs.push(String::new());
                        }
                    }
                    local => {
                        if let Some(ref mut shape) = current_shape {
                            apply_attributes(shape, local, e, &state);
                        }
                    }
                }
            }
            Ok(Event::Text(ref e)) => {
                if state.in_text {
                    let text = e.unescape().unwrap_or_default();
                    current_text.push_str(&text);
                }
            }
            Ok(Event::End(ref e)) => {
                let name = e.name();
                match local_name(name.as_ref()) {
                    b"sp" | b"pic" => {
                        if let Some(shape) = current_shape.take() {
                            shapes.push(shape);
                        }
                        state = ParseState::default();
                    }
                    b"xfrm" => state.in_xfrm = false,
                    b"txBody" => state.in_text_body = false,
                    b"lstStyle" => state.in_list_style = false,
                    b"lvl1pPr" => state.in_level_one = false,
                    b"t" => state.in_text = false,
                    b"p" if state.in_paragraph => {
                        state.in_paragraph = false;
                        if let Some(ref mut shape) = current_shape {
                            shape.paragraphs.push(std::mem::take(&mut current_text));
                        }
                    }
                    _ => {}
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::XmlError(format!(
                    "Error at position {}: {}",
                    reader.buffer_position(),
                    e
                )));
            }
            _ => {}
        }
    }

    Ok(shapes)
}

/// Record what an element's attributes say about the enclosing shape.
fn apply_attributes(shape: &mut ShapeInfo, local: &[u8], e: &BytesStart, state: &ParseState) {
    match local {
        b"cNvPr" => {
            for attr in e.attributes().flatten() {
                match attr.key.as_ref() {
                    b"id" => shape.id = attr_i64(&attr).unwrap_or(0) as u32,
                    b"name" => shape.name = attr_value(&attr),
                    _ => {}
                }
            }
        }
        b"ph" => {
            let mut placeholder = Placeholder::default();
            for attr in e.attributes().flatten() {
                match attr.key.as_ref() {
                    b"type" => {
                        placeholder.kind = attr_value(&attr);
                        placeholder.explicit_kind = true;
                    }
                    b"idx" => {
                        placeholder.idx = attr_i64(&attr).unwrap_or(0) as u32;
                        placeholder.explicit_idx = true;
                    }
                    _ => {}
                }
            }
            shape.placeholder = Some(placeholder);
        }
        b"off" if state.in_xfrm => {
            let rect = shape.geometry.get_or_insert_with(Rect::default);
            for attr in e.attributes().flatten() {
                match attr.key.as_ref() {
                    b"x" => rect.x.0 = attr_i64(&attr).unwrap_or(0),
                    b"y" => rect.y.0 = attr_i64(&attr).unwrap_or(0),
                    _ => {}
                }
            }
        }
        b"ext" if state.in_xfrm => {
            let rect = shape.geometry.get_or_insert_with(Rect::default);
            for attr in e.attributes().flatten() {
                match attr.key.as_ref() {
                    b"cx" => rect.cx.0 = attr_i64(&attr).unwrap_or(0),
                    b"cy" => rect.cy.0 = attr_i64(&attr).unwrap_or(0),
                    _ => {}
                }
            }
        }
        b"rPr" if state.in_paragraph => {
            if let Some(size) = size_attribute(e) {
                shape.run_sizes.push(size);
            }
        }
        b"defRPr" if state.in_list_style && state.in_level_one => {
            if let Some(size) = size_attribute(e) {
                shape.default_size = Some(size);
            }
        }
        _ => {}
    }
}

fn size_attribute(e: &BytesStart) -> Option<FontSize> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == b"sz")
        .and_then(|attr| attr_i64(&attr))
        .filter(|sz| *sz > 0)
        .map(|sz| FontSize(sz as u32))
}

/// Text of a slide, title first and the rest top-to-bottom, left-to-right.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SlideText {
    pub title: Option<String>,
    pub body: Vec<String>,
}

impl SlideText {
    /// Summarize the shapes of one slide.
    pub fn from_shapes(shapes: &[ShapeInfo]) -> Self {
        let title = shapes
            .iter()
            .find(|s| s.placeholder.as_ref().is_some_and(Placeholder::is_title))
            .map(ShapeInfo::text)
            .filter(|t| !t.trim().is_empty());

        let mut others: Vec<&ShapeInfo> = shapes
            .iter()
            .filter(|s| !s.placeholder.as_ref().is_some_and(Placeholder::is_title))
            .collect();
        others.sort_by_key(|s| {
            let rect = s.geometry.unwrap_or_default();
            (rect.y.0, rect.x.0)
        });

        let body = others
            .into_iter()
            .flat_map(|s| s.paragraphs.iter())
            .map(|p| p.trim())
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect();

        Self { title, body }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SLIDE: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sld xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main">
  <p:cSld><p:spTree>
    <p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>
    <p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/></a:xfrm></p:grpSpPr>
    <p:sp>
      <p:nvSpPr><p:cNvPr id="3" name="Content Placeholder 2"/><p:cNvSpPr/><p:nvPr><p:ph idx="1"/></p:nvPr></p:nvSpPr>
      <p:spPr><a:xfrm><a:off x="457200" y="1600200"/><a:ext cx="8229600" cy="4525963"/></a:xfrm></p:spPr>
      <p:txBody><a:bodyPr/>
        <a:lstStyle><a:lvl1pPr><a:defRPr sz="2400"/></a:lvl1pPr><a:lvl2pPr><a:defRPr sz="1800"/></a:lvl2pPr></a:lstStyle>
        <a:p><a:r><a:rPr lang="en-US" sz="2000"/><a:t>First  point</a:t></a:r></a:p>
        <a:p/>
        <a:p><a:r><a:t>Q&amp;A</a:t></a:r><a:br/><a:r><a:t>later</a:t></a:r></a:p>
      </p:txBody>
    </p:sp>
    <p:sp>
      <p:nvSpPr><p:cNvPr id="2" name="Title 1"/><p:cNvSpPr/><p:nvPr><p:ph type="title"/></p:nvPr></p:nvSpPr>
      <p:spPr/>
      <p:txBody><a:bodyPr/><a:lstStyle/><a:p><a:r><a:t>Quarterly Review</a:t></a:r></a:p></p:txBody>
    </p:sp>
    <p:pic>
      <p:nvPicPr><p:cNvPr id="4" name="Picture 3"/><p:cNvPicPr/><p:nvPr/></p:nvPicPr>
      <p:spPr><a:xfrm><a:off x="10" y="20"/><a:ext cx="30" cy="40"/></a:xfrm>
        <a:extLst><a:ext uri="{0000}"/></a:extLst></p:spPr>
    </p:pic>
  </p:spTree></p:cSld>
</p:sld>"#;

    #[test]
    fn test_read_shapes() {
        let shapes = read_shapes(SLIDE).unwrap();
        assert_eq!(shapes.len(), 3);

        let body = &shapes[0];
        assert_eq!(body.id, 3);
        assert_eq!(body.name, "Content Placeholder 2");
        let ph = body.placeholder.as_ref().unwrap();
        assert_eq!(ph.kind, "obj");
        assert_eq!(ph.idx, 1);
        assert!(!ph.explicit_kind);
        assert_eq!(body.geometry, Some(Rect::new(457200, 1600200, 8229600, 4525963)));
        assert_eq!(body.paragraphs, vec!["First  point", "", "Q&A\nlater"]);
        assert_eq!(body.run_sizes, vec![FontSize(2000)]);
        assert_eq!(body.default_size, Some(FontSize(2400)));

        let title = &shapes[1];
        assert!(title.placeholder.as_ref().unwrap().is_title());
        assert_eq!(title.geometry, None);
        assert_eq!(title.text(), "Quarterly Review");

        let picture = &shapes[2];
        assert!(picture.is_picture);
        assert_eq!(picture.geometry, Some(Rect::new(10, 20, 30, 40)));
    }

    #[test]
    fn test_slide_text() {
        let shapes = read_shapes(SLIDE).unwrap();
        let text = SlideText::from_shapes(&shapes);
        assert_eq!(text.title.as_deref(), Some("Quarterly Review"));
        assert_eq!(text.body, vec!["First  point", "Q&A\nlater"]);
    }

    #[test]
    fn test_placeholder_inheritance_kind() {
        let ph = |kind: &str| Placeholder {
            kind: kind.to_string(),
            ..Default::default()
        };
        assert_eq!(ph("ctrTitle").base_kind(), "title");
        assert_eq!(ph("subTitle").base_kind(), "body");
        assert_eq!(ph("obj").base_kind(), "body");
        assert_eq!(ph("sldNum").base_kind(), "sldNum");
    }

    #[test]
    fn test_placeholder_attributes() {
        let ph = Placeholder {
            kind: "body".to_string(),
            idx: 1,
            explicit_kind: false,
            explicit_idx: true,
        };
        assert_eq!(ph.attributes(), vec![("idx", "1".to_string())]);
    }

    #[test]
    fn test_malformed_xml() {
        assert!(matches!(
            read_shapes("<p:sld><p:sp></p:sld>"),
            Err(Error::XmlError(_))
        ));
    }
}
