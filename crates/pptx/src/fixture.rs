//! A small but complete template presentation, assembled in memory.

use crate::package::{Package, CONTENT_TYPES_PART};
use deck_core::Rect;
use image::{DynamicImage, ImageFormat, RgbImage};
use std::io::Cursor;
use std::path::PathBuf;

const NS: &str = r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main""#;
const DECL: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;
const REL_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

const GROUP: &str = r#"<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/>"#;

pub struct TemplateBuilder {
    single_layout: bool,
    notes_master: bool,
    potx: bool,
    body_size: Option<u32>,
    body_position: bool,
}

impl TemplateBuilder {
    pub const MASTER_TITLE: Rect = rect(838_200, 365_125, 10_515_600, 1_325_563);
    pub const MASTER_BODY: Rect = rect(609_600, 1_600_200, 10_972_800, 4_525_963);
    pub const LAYOUT_BODY: Rect = rect(838_200, 1_825_625, 10_515_600, 4_351_338);

    pub fn new() -> Self {
        Self {
            single_layout: false,
            notes_master: false,
            potx: false,
            body_size: None,
            body_position: true,
        }
    }

    pub fn single_layout(mut self) -> Self {
        self.single_layout = true;
        self
    }

    pub fn with_notes_master(mut self) -> Self {
        self.notes_master = true;
        self
    }

    pub fn as_potx(mut self) -> Self {
        self.potx = true;
        self
    }

    /// Give the content layout's body a first-level list style size.
    pub fn with_body_size(mut self, hundredths: u32) -> Self {
        self.body_size = Some(hundredths);
        self
    }

    /// Leave the body without `a:xfrm` on both the layout and the master.
    pub fn without_body_position(mut self) -> Self {
        self.body_position = false;
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut package = Package::default();
        package.set_part(CONTENT_TYPES_PART, self.content_types().into_bytes());
        package.set_part(
            "_rels/.rels",
            rels(&[("rId1", "officeDocument", "ppt/presentation.xml")]).into_bytes(),
        );
        package.set_part("ppt/presentation.xml", self.presentation().into_bytes());

        let mut presentation_rels = vec![
            ("rId1", "slideMaster", "slideMasters/slideMaster1.xml"),
            ("rId2", "slide", "slides/slide1.xml"),
            ("rId3", "theme", "theme/theme1.xml"),
        ];
        if self.notes_master {
            presentation_rels.push(("rId4", "notesMaster", "notesMasters/notesMaster1.xml"));
        }
        package.set_part(
            "ppt/_rels/presentation.xml.rels",
            rels(&presentation_rels).into_bytes(),
        );

        package.set_part("ppt/slideMasters/slideMaster1.xml", self.master().into_bytes());
        let mut master_rels = vec![("rId1", "slideLayout", "../slideLayouts/slideLayout1.xml")];
        if !self.single_layout {
            master_rels.push(("rId2", "slideLayout", "../slideLayouts/slideLayout2.xml"));
        }
        master_rels.push(("rId3", "theme", "../theme/theme1.xml"));
        package.set_part(
            "ppt/slideMasters/_rels/slideMaster1.xml.rels",
            rels(&master_rels).into_bytes(),
        );

        let to_master = rels(&[("rId1", "slideMaster", "../slideMasters/slideMaster1.xml")]);
        package.set_part("ppt/slideLayouts/slideLayout1.xml", title_layout().into_bytes());
        package.set_part(
            "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
            to_master.clone().into_bytes(),
        );
        if !self.single_layout {
            package.set_part("ppt/slideLayouts/slideLayout2.xml", content_layout(self).into_bytes());
            package.set_part(
                "ppt/slideLayouts/_rels/slideLayout2.xml.rels",
                to_master.into_bytes(),
            );
        }

        package.set_part("ppt/slides/slide1.xml", old_slide().into_bytes());
        let layout = if self.single_layout {
            "../slideLayouts/slideLayout1.xml"
        } else {
            "../slideLayouts/slideLayout2.xml"
        };
        let mut slide_rels = vec![("rId1", "slideLayout", layout)];
        if self.notes_master {
            slide_rels.push(("rId2", "notesSlide", "../notesSlides/notesSlide1.xml"));
        }
        package.set_part("ppt/slides/_rels/slide1.xml.rels", rels(&slide_rels).into_bytes());

        package.set_part("ppt/theme/theme1.xml", theme("Fixture Theme").into_bytes());

        if self.notes_master {
            package.set_part(
                "ppt/notesMasters/notesMaster1.xml",
                format!(
                    r#"{DECL}<p:notesMaster {NS}><p:cSld><p:spTree>{GROUP}</p:spTree></p:cSld><p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink"/></p:notesMaster>"#
                )
                .into_bytes(),
            );
            package.set_part(
                "ppt/notesMasters/_rels/notesMaster1.xml.rels",
                rels(&[("rId1", "theme", "../theme/theme2.xml")]).into_bytes(),
            );
            package.set_part("ppt/theme/theme2.xml", theme("Notes Theme").into_bytes());
            package.set_part(
                "ppt/notesSlides/notesSlide1.xml",
                format!(
                    r#"{DECL}<p:notes {NS}><p:cSld><p:spTree>{GROUP}<p:sp><p:nvSpPr><p:cNvPr id="3" name="Notes Placeholder 2"/><p:cNvSpPr/><p:nvPr><p:ph type="body" idx="1"/></p:nvPr></p:nvSpPr><p:spPr/><p:txBody><a:bodyPr/><a:lstStyle/><a:p><a:r><a:t>Old notes</a:t></a:r></a:p></p:txBody></p:sp></p:spTree></p:cSld></p:notes>"#
                )
                .into_bytes(),
            );
            package.set_part(
                "ppt/notesSlides/_rels/notesSlide1.xml.rels",
                rels(&[
                    ("rId1", "notesMaster", "../notesMasters/notesMaster1.xml"),
                    ("rId2", "slide", "../slides/slide1.xml"),
                ])
                .into_bytes(),
            );
        }

        package.write().unwrap()
    }

    fn content_types(&self) -> String {
        let main = if self.potx {
            "application/vnd.openxmlformats-officedocument.presentationml.template.main+xml"
        } else {
            "application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml"
        };
        let pml = "application/vnd.openxmlformats-officedocument.presentationml";
        let mut overrides = vec![
            ("/ppt/presentation.xml".to_string(), main.to_string()),
            ("/ppt/slideMasters/slideMaster1.xml".to_string(), format!("{pml}.slideMaster+xml")),
            ("/ppt/slideLayouts/slideLayout1.xml".to_string(), format!("{pml}.slideLayout+xml")),
            ("/ppt/slides/slide1.xml".to_string(), format!("{pml}.slide+xml")),
            (
                "/ppt/theme/theme1.xml".to_string(),
                "application/vnd.openxmlformats-officedocument.theme+xml".to_string(),
            ),
        ];
        if !self.single_layout {
            overrides.push(("/ppt/slideLayouts/slideLayout2.xml".to_string(), format!("{pml}.slideLayout+xml")));
        }
        if self.notes_master {
            overrides.push(("/ppt/notesMasters/notesMaster1.xml".to_string(), format!("{pml}.notesMaster+xml")));
            overrides.push(("/ppt/notesSlides/notesSlide1.xml".to_string(), format!("{pml}.notesSlide+xml")));
            overrides.push((
                "/ppt/theme/theme2.xml".to_string(),
                "application/vnd.openxmlformats-officedocument.theme+xml".to_string(),
            ));
        }

        let overrides: String = overrides
            .iter()
            .map(|(part, ct)| format!(r#"<Override PartName="{part}" ContentType="{ct}"/>"#))
            .collect();
        format!(
            r#"{DECL}<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/>{overrides}</Types>"#
        )
    }

    fn presentation(&self) -> String {
        let notes = if self.notes_master {
            r#"<p:notesMasterIdLst><p:notesMasterId r:id="rId4"/></p:notesMasterIdLst>"#
        } else {
            ""
        };
        format!(
            r#"{DECL}<p:presentation {NS} saveSubsetFonts="1"><p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst>{notes}<p:sldIdLst><p:sldId id="256" r:id="rId2"/></p:sldIdLst><p:sldSz cx="12192000" cy="6858000"/><p:notesSz cx="6858000" cy="9144000"/><p:custShowLst><p:custShow name="Short" id="0"><p:sldLst><p:sld r:id="rId2"/></p:sldLst></p:custShow></p:custShowLst><p:defaultTextStyle><a:defPPr><a:defRPr lang="en-US"/></a:defPPr></p:defaultTextStyle><p:extLst><p:ext uri="{{521415D9-36F7-43E2-AB2F-B90AF26B5E84}}"><p14:sectionLst xmlns:p14="http://schemas.microsoft.com/office/powerpoint/2010/main"><p14:section name="Default Section" id="{{8D5A4E4E-0000-4000-8000-000000000001}}"><p14:sldIdLst><p14:sldId id="256"/></p14:sldIdLst></p14:section></p14:sectionLst></p:ext><p:ext uri="{{EFAFB233-063F-42B5-8137-9DF3F51BA10A}}"><p15:sldGuideLst xmlns:p15="http://schemas.microsoft.com/office/powerpoint/2012/main"/></p:ext></p:extLst></p:presentation>"#
        )
    }

    fn master(&self) -> String {
        let title = placeholder_sp(2, "Title Placeholder 1", r#"type="title""#, Some(Self::MASTER_TITLE), "Click to edit Master title style");
        let body = placeholder_sp(3, "Text Placeholder 2", r#"type="body" idx="1""#, self.body_position.then_some(Self::MASTER_BODY), "Click to edit Master text styles");
        let layouts = if self.single_layout {
            r#"<p:sldLayoutId id="2147483649" r:id="rId1"/>"#.to_string()
        } else {
            r#"<p:sldLayoutId id="2147483649" r:id="rId1"/><p:sldLayoutId id="2147483650" r:id="rId2"/>"#.to_string()
        };
        format!(
            r#"{DECL}<p:sldMaster {NS}><p:cSld><p:spTree>{GROUP}{title}{body}</p:spTree></p:cSld><p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink"/><p:sldLayoutIdLst>{layouts}</p:sldLayoutIdLst><p:txStyles><p:titleStyle/><p:bodyStyle/><p:otherStyle/></p:txStyles></p:sldMaster>"#
        )
    }
}

const fn rect(x: i64, y: i64, cx: i64, cy: i64) -> Rect {
    Rect {
        x: deck_core::Emu(x),
        y: deck_core::Emu(y),
        cx: deck_core::Emu(cx),
        cy: deck_core::Emu(cy),
    }
}

fn rels(items: &[(&str, &str, &str)]) -> String {
    let items: String = items
        .iter()
        .map(|(id, kind, target)| {
            format!(r#"<Relationship Id="{id}" Type="{REL_NS}/{kind}" Target="{target}"/>"#)
        })
        .collect();
    format!(
        r#"{DECL}<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{items}</Relationships>"#
    )
}

fn placeholder_sp(id: u32, name: &str, ph: &str, geometry: Option<Rect>, text: &str) -> String {
    let sp_pr = match geometry {
        Some(r) => format!(
            r#"<p:spPr><a:xfrm><a:off x="{}" y="{}"/><a:ext cx="{}" cy="{}"/></a:xfrm></p:spPr>"#,
            r.x.0, r.y.0, r.cx.0, r.cy.0
        ),
        None => "<p:spPr/>".to_string(),
    };
    format!(
        r#"<p:sp><p:nvSpPr><p:cNvPr id="{id}" name="{name}"/><p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr><p:nvPr><p:ph {ph}/></p:nvPr></p:nvSpPr>{sp_pr}<p:txBody><a:bodyPr/><a:lstStyle/><a:p><a:r><a:rPr lang="en-US"/><a:t>{text}</a:t></a:r></a:p></p:txBody></p:sp>"#
    )
}

fn title_layout() -> String {
    let title = placeholder_sp(2, "Title 1", r#"type="ctrTitle""#, Some(rect(1_524_000, 1_122_363, 9_144_000, 2_387_600)), "Click to edit title");
    let date = placeholder_sp(3, "Date Placeholder 2", r#"type="dt" sz="half" idx="10""#, None, "1/1/2024");
    format!(
        r#"{DECL}<p:sldLayout {NS} type="title" preserve="1"><p:cSld name="Title Slide"><p:spTree>{GROUP}{title}{date}</p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sldLayout>"#
    )
}

fn content_layout(builder: &TemplateBuilder) -> String {
    let title = placeholder_sp(2, "Title 1", r#"type="title""#, None, "Click to edit title");
    let geometry = builder.body_position.then_some(TemplateBuilder::LAYOUT_BODY);
    let mut body = placeholder_sp(3, "Content Placeholder 2", r#"idx="1""#, geometry, "Click to edit text");
    if let Some(size) = builder.body_size {
        body = body.replacen(
            "<a:lstStyle/>",
            &format!(r#"<a:lstStyle><a:lvl1pPr><a:defRPr sz="{size}"/></a:lvl1pPr></a:lstStyle>"#),
            1,
        );
    }
    let footer = placeholder_sp(4, "Footer Placeholder 3", r#"type="ftr" sz="quarter" idx="11""#, None, "");
    format!(
        r#"{DECL}<p:sldLayout {NS} type="obj" preserve="1"><p:cSld name="Title and Content"><p:spTree>{GROUP}{title}{body}{footer}</p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sldLayout>"#
    )
}

fn old_slide() -> String {
    let title = placeholder_sp(2, "Title 1", r#"type="title""#, None, "Old deck");
    let body = placeholder_sp(3, "Content Placeholder 2", r#"idx="1""#, None, "Stale bullet");
    format!(
        r#"{DECL}<p:sld {NS}><p:cSld><p:spTree>{GROUP}{title}{body}</p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sld>"#
    )
}

fn theme(name: &str) -> String {
    format!(
        r#"{DECL}<a:theme xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" name="{name}"><a:themeElements/></a:theme>"#
    )
}

/// Write a solid PNG to the temp directory and return its path.
pub fn png_file(name: &str, width: u32, height: u32) -> PathBuf {
    let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, image::Rgb([30, 90, 160])));
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();

    let path = std::env::temp_dir().join(format!("text2deck-{}-{}", std::process::id(), name));
    std::fs::write(&path, bytes).unwrap();
    path
}
