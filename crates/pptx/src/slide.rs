//! XML for the parts a generated deck adds: slides, notes slides and a
//! notes master.

use crate::package::{XmlWriter, NS_DRAWING, NS_PRESENTATION, NS_RELATIONSHIPS};
use crate::parser::Placeholder;
use deck_core::{Emu, FontSize, Rect, Result};

/// Space before each bullet, in hundredths of a point.
const BULLET_SPACE_BEFORE: &str = "600";

const LANG: &str = "en-US";

/// The title placeholder of a slide.
pub struct TitleShape<'a> {
    pub placeholder: &'a Placeholder,
    pub text: &'a str,
}

/// The body placeholder of a slide.
pub struct BodyShape<'a> {
    pub placeholder: &'a Placeholder,
    /// Explicit position; inherited from the layout when `None`.
    pub geometry: Option<Rect>,
    pub bullets: &'a [String],
    pub font_size: FontSize,
}

/// An embedded picture.
pub struct PictureShape<'a> {
    pub rel_id: &'a str,
    pub geometry: Rect,
    pub description: &'a str,
}

/// A `p:sld` holding at most a title, a body and a picture.
pub fn slide_xml(
    title: Option<&TitleShape>,
    body: Option<&BodyShape>,
    picture: Option<&PictureShape>,
) -> Result<Vec<u8>> {
    let mut w = XmlWriter::new()?;
    w.start(
        "p:sld",
        &[
            ("xmlns:a", NS_DRAWING),
            ("xmlns:r", NS_RELATIONSHIPS),
            ("xmlns:p", NS_PRESENTATION),
        ],
    )?;
    w.start("p:cSld", &[])?;
    w.start("p:spTree", &[])?;
    write_group_properties(&mut w)?;

    let mut next_id = 2;

    if let Some(title) = title {
        write_placeholder_start(&mut w, next_id, "Title", title.placeholder, &[])?;
        w.empty("p:spPr", &[])?;
        write_text_body_start(&mut w)?;
        for line in title.text.split('\n') {
            write_run_paragraph(&mut w, line, None, None)?;
        }
        w.end("p:txBody")?;
        w.end("p:sp")?;
        next_id += 1;
    }

    if let Some(body) = body {
        write_placeholder_start(&mut w, next_id, "Content Placeholder", body.placeholder, &[])?;
        match body.geometry {
            Some(rect) => {
                w.start("p:spPr", &[])?;
                write_xfrm(&mut w, "a:xfrm", rect)?;
                w.end("p:spPr")?;
            }
            None => w.empty("p:spPr", &[])?,
        }
        write_text_body_start(&mut w)?;
        let size = body.font_size.hundredths().to_string();
        if body.bullets.is_empty() {
            write_run_paragraph(&mut w, "", Some(size.as_str()), None)?;
        }
        for bullet in body.bullets {
            write_run_paragraph(&mut w, bullet, Some(size.as_str()), Some(BULLET_SPACE_BEFORE))?;
        }
        w.end("p:txBody")?;
        w.end("p:sp")?;
        next_id += 1;
    }

    if let Some(picture) = picture {
        let id = next_id.to_string();
        let name = format!("Picture {}", next_id - 1);
        w.start("p:pic", &[])?;
        w.start("p:nvPicPr", &[])?;
        w.empty(
            "p:cNvPr",
            &[
                ("id", id.as_str()),
                ("name", name.as_str()),
                ("descr", picture.description),
            ],
        )?;
        w.start("p:cNvPicPr", &[])?;
        w.empty("a:picLocks", &[("noChangeAspect", "1")])?;
        w.end("p:cNvPicPr")?;
        w.empty("p:nvPr", &[])?;
        w.end("p:nvPicPr")?;
        w.start("p:blipFill", &[])?;
        w.empty("a:blip", &[("r:embed", picture.rel_id)])?;
        w.start("a:stretch", &[])?;
        w.empty("a:fillRect", &[])?;
        w.end("a:stretch")?;
        w.end("p:blipFill")?;
        w.start("p:spPr", &[])?;
        write_xfrm(&mut w, "a:xfrm", picture.geometry)?;
        write_rect_geometry(&mut w)?;
        w.end("p:spPr")?;
        w.end("p:pic")?;
    }

    w.end("p:spTree")?;
    w.end("p:cSld")?;
    write_color_map_override(&mut w)?;
    w.end("p:sld")?;
    Ok(w.finish())
}

/// A `p:notes` with the slide image and the speaker notes text.
pub fn notes_slide_xml(notes: &str) -> Result<Vec<u8>> {
    let mut w = XmlWriter::new()?;
    w.start(
        "p:notes",
        &[
            ("xmlns:a", NS_DRAWING),
            ("xmlns:r", NS_RELATIONSHIPS),
            ("xmlns:p", NS_PRESENTATION),
        ],
    )?;
    w.start("p:cSld", &[])?;
    w.start("p:spTree", &[])?;
    write_group_properties(&mut w)?;

    let slide_image = Placeholder {
        kind: "sldImg".to_string(),
        explicit_kind: true,
        ..Default::default()
    };
    write_placeholder_start(
        &mut w,
        2,
        "Slide Image Placeholder",
        &slide_image,
        &[("noRot", "1"), ("noChangeAspect", "1")],
    )?;
    w.empty("p:spPr", &[])?;
    w.end("p:sp")?;

    let body = Placeholder {
        kind: "body".to_string(),
        idx: 1,
        explicit_kind: true,
        explicit_idx: true,
    };
    write_placeholder_start(&mut w, 3, "Notes Placeholder", &body, &[])?;
    w.empty("p:spPr", &[])?;
    write_text_body_start(&mut w)?;
    for line in notes.split('\n') {
        write_run_paragraph(&mut w, line, None, None)?;
    }
    w.end("p:txBody")?;
    w.end("p:sp")?;

    w.end("p:spTree")?;
    w.end("p:cSld")?;
    write_color_map_override(&mut w)?;
    w.end("p:notes")?;
    Ok(w.finish())
}

/// A minimal `p:notesMaster` for templates that ship without one.
pub fn notes_master_xml(width: Emu, height: Emu) -> Result<Vec<u8>> {
    let mut w = XmlWriter::new()?;
    w.start(
        "p:notesMaster",
        &[
            ("xmlns:a", NS_DRAWING),
            ("xmlns:r", NS_RELATIONSHIPS),
            ("xmlns:p", NS_PRESENTATION),
        ],
    )?;
    w.start("p:cSld", &[])?;
    w.start("p:bg", &[])?;
    w.start("p:bgRef", &[("idx", "1001")])?;
    w.empty("a:schemeClr", &[("val", "bg1")])?;
    w.end("p:bgRef")?;
    w.end("p:bg")?;
    w.start("p:spTree", &[])?;
    write_group_properties(&mut w)?;

    // Slide image in the top half, notes text below it.
    let margin_x = Emu(width.0 / 8);
    let slide_image = Rect {
        x: margin_x,
        y: Emu(height.0 / 12),
        cx: Emu(width.0 - 2 * margin_x.0),
        cy: Emu(height.0 * 3 / 8),
    };
    let notes_body = Rect {
        x: Emu(width.0 / 10),
        y: Emu(height.0 * 19 / 40),
        cx: Emu(width.0 * 4 / 5),
        cy: Emu(height.0 * 9 / 20),
    };

    let image_ph = Placeholder {
        kind: "sldImg".to_string(),
        idx: 2,
        explicit_kind: true,
        explicit_idx: true,
    };
    write_placeholder_start(
        &mut w,
        2,
        "Slide Image Placeholder",
        &image_ph,
        &[("noRot", "1"), ("noChangeAspect", "1")],
    )?;
    w.start("p:spPr", &[])?;
    write_xfrm(&mut w, "a:xfrm", slide_image)?;
    write_rect_geometry(&mut w)?;
    w.end("p:spPr")?;
    w.end("p:sp")?;

    let body_ph = Placeholder {
        kind: "body".to_string(),
        idx: 3,
        explicit_kind: true,
        explicit_idx: true,
    };
    write_placeholder_start(&mut w, 3, "Notes Placeholder", &body_ph, &[])?;
    w.start("p:spPr", &[])?;
    write_xfrm(&mut w, "a:xfrm", notes_body)?;
    write_rect_geometry(&mut w)?;
    w.end("p:spPr")?;
    write_text_body_start(&mut w)?;
    write_run_paragraph(&mut w, "", None, None)?;
    w.end("p:txBody")?;
    w.end("p:sp")?;

    w.end("p:spTree")?;
    w.end("p:cSld")?;

    w.empty(
        "p:clrMap",
        &[
            ("bg1", "lt1"),
            ("tx1", "dk1"),
            ("bg2", "lt2"),
            ("tx2", "dk2"),
            ("accent1", "accent1"),
            ("accent2", "accent2"),
            ("accent3", "accent3"),
            ("accent4", "accent4"),
            ("accent5", "accent5"),
            ("accent6", "accent6"),
            ("hlink", "hlink"),
            ("folHlink", "folHlink"),
        ],
    )?;

    w.start("p:notesStyle", &[])?;
    w.start(
        "a:lvl1pPr",
        &[("marL", "0"), ("algn", "l"), ("defTabSz", "914400"), ("rtl", "0")],
    )?;
    w.start("a:defRPr", &[("sz", "1200"), ("kern", "1200")])?;
    w.start("a:solidFill", &[])?;
    w.empty("a:schemeClr", &[("val", "tx1")])?;
    w.end("a:solidFill")?;
    w.empty("a:latin", &[("typeface", "+mn-lt")])?;
    w.empty("a:ea", &[("typeface", "+mn-ea")])?;
    w.empty("a:cs", &[("typeface", "+mn-cs")])?;
    w.end("a:defRPr")?;
    w.end("a:lvl1pPr")?;
    w.end("p:notesStyle")?;

    w.end("p:notesMaster")?;
    Ok(w.finish())
}

fn write_group_properties(w: &mut XmlWriter) -> Result<()> {
    w.start("p:nvGrpSpPr", &[])?;
    w.empty("p:cNvPr", &[("id", "1"), ("name", "")])?;
    w.empty("p:cNvGrpSpPr", &[])?;
    w.empty("p:nvPr", &[])?;
    w.end("p:nvGrpSpPr")?;

    w.start("p:grpSpPr", &[])?;
    w.start("a:xfrm", &[])?;
    w.empty("a:off", &[("x", "0"), ("y", "0")])?;
    w.empty("a:ext", &[("cx", "0"), ("cy", "0")])?;
    w.empty("a:chOff", &[("x", "0"), ("y", "0")])?;
    w.empty("a:chExt", &[("cx", "0"), ("cy", "0")])?;
    w.end("a:xfrm")?;
    w.end("p:grpSpPr")
}

/// Opens `p:sp` and writes its non-visual properties.
fn write_placeholder_start(
    w: &mut XmlWriter,
    id: u32,
    name: &str,
    placeholder: &Placeholder,
    extra_locks: &[(&str, &str)],
) -> Result<()> {
    let id_str = id.to_string();
    let name = format!("{} {}", name, id - 1);

    w.start("p:sp", &[])?;
    w.start("p:nvSpPr", &[])?;
    w.empty("p:cNvPr", &[("id", id_str.as_str()), ("name", name.as_str())])?;
    w.start("p:cNvSpPr", &[])?;
    let mut locks = vec![("noGrp", "1")];
    locks.extend_from_slice(extra_locks);
    w.empty("a:spLocks", &locks)?;
    w.end("p:cNvSpPr")?;
    w.start("p:nvPr", &[])?;
    let attrs = placeholder.attributes();
    let attrs: Vec<(&str, &str)> = attrs.iter().map(|(k, v)| (*k, v.as_str())).collect();
    w.empty("p:ph", &attrs)?;
    w.end("p:nvPr")?;
    w.end("p:nvSpPr")
}

fn write_text_body_start(w: &mut XmlWriter) -> Result<()> {
    w.start("p:txBody", &[])?;
    w.empty("a:bodyPr", &[])?;
    w.empty("a:lstStyle", &[])
}

/// One paragraph with a single run; an empty line gets only end properties.
fn write_run_paragraph(
    w: &mut XmlWriter,
    text: &str,
    size: Option<&str>,
    space_before: Option<&str>,
) -> Result<()> {
    let mut run_attrs = vec![("lang", LANG)];
    if let Some(size) = size {
        run_attrs.push(("sz", size));
    }
    run_attrs.push(("dirty", "0"));

    w.start("a:p", &[])?;
    if let Some(space) = space_before {
        w.start("a:pPr", &[("lvl", "0")])?;
        w.start("a:spcBef", &[])?;
        w.empty("a:spcPts", &[("val", space)])?;
        w.end("a:spcBef")?;
        w.end("a:pPr")?;
    }
    if text.is_empty() {
        w.empty("a:endParaRPr", &run_attrs)?;
    } else {
        w.start("a:r", &[])?;
        w.empty("a:rPr", &run_attrs)?;
        w.text_element("a:t", text)?;
        w.end("a:r")?;
    }
    w.end("a:p")
}

fn write_xfrm(w: &mut XmlWriter, name: &str, rect: Rect) -> Result<()> {
    let (x, y, cx, cy) = (
        rect.x.0.to_string(),
        rect.y.0.to_string(),
        rect.cx.0.to_string(),
        rect.cy.0.to_string(),
    );
    w.start(name, &[])?;
    w.empty("a:off", &[("x", x.as_str()), ("y", y.as_str())])?;
    w.empty("a:ext", &[("cx", cx.as_str()), ("cy", cy.as_str())])?;
    w.end(name)
}

fn write_rect_geometry(w: &mut XmlWriter) -> Result<()> {
    w.start("a:prstGeom", &[("prst", "rect")])?;
    w.empty("a:avLst", &[])?;
    w.end("a:prstGeom")
}

fn write_color_map_override(w: &mut XmlWriter) -> Result<()> {
    w.start("p:clrMapOvr", &[])?;
    w.empty("a:masterClrMapping", &[])?;
    w.end("p:clrMapOvr")
}
