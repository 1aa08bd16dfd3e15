//! Slide geometry: keeping the body text clear of the title.
//!
//! All positions are English Metric Units (EMU), the unit OOXML stores
//! shape offsets and extents in.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Sub};

/// EMU per inch.
pub const EMU_PER_INCH: i64 = 914_400;

/// EMU per typographic point.
pub const EMU_PER_POINT: i64 = 12_700;

/// Where the body starts when the layout has no title to measure.
const DEFAULT_SAFE_TOP: Emu = Emu::inches_x10(20);

/// Gap kept under the title.
const TITLE_GAP: Emu = Emu::inches_x10(2);

/// Extra room for titles likely to wrap.
const LONG_TITLE_GAP: Emu = Emu::inches_x10(4);

/// Minimum distance between the title bottom and the body.
const TITLE_BARRIER: Emu = Emu::inches_x10(5);

/// Extra room for titles very likely to wrap twice.
const VERY_LONG_TITLE_GAP: Emu = Emu::inches_x10(5);

/// Margin kept free at the bottom of the slide.
const BOTTOM_MARGIN: Emu = Emu::inches_x10(5);

/// Side margins for a body area built from scratch.
const SIDE_MARGIN: Emu = Emu::inches_x10(5);

/// Horizontal gutter between text and picture.
const IMAGE_GUTTER: Emu = Emu(228_600);

const LONG_TITLE_CHARS: usize = 40;
const VERY_LONG_TITLE_CHARS: usize = 50;

/// A length in English Metric Units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Emu(pub i64);

impl Emu {
    /// Length from whole inches.
    pub const fn inches(n: i64) -> Self {
        Emu(n * EMU_PER_INCH)
    }

    /// Length from tenths of an inch.
    const fn inches_x10(tenths: i64) -> Self {
        Emu(tenths * EMU_PER_INCH / 10)
    }

    /// Length from points.
    pub const fn points(n: i64) -> Self {
        Emu(n * EMU_PER_POINT)
    }

    /// Value in inches, for display.
    pub fn as_inches(&self) -> f64 {
        self.0 as f64 / EMU_PER_INCH as f64
    }
}

impl Add for Emu {
    type Output = Emu;

    fn add(self, rhs: Emu) -> Emu {
        Emu(self.0 + rhs.0)
    }
}

impl AddAssign for Emu {
    fn add_assign(&mut self, rhs: Emu) {
        self.0 += rhs.0;
    }
}

impl Sub for Emu {
    type Output = Emu;

    fn sub(self, rhs: Emu) -> Emu {
        Emu(self.0 - rhs.0)
    }
}

impl fmt::Display for Emu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}in", self.as_inches())
    }
}

/// A shape's position and size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: Emu,
    pub y: Emu,
    pub cx: Emu,
    pub cy: Emu,
}

impl Rect {
    /// Create a rectangle from raw EMU values.
    pub fn new(x: i64, y: i64, cx: i64, cy: i64) -> Self {
        Self {
            x: Emu(x),
            y: Emu(y),
            cx: Emu(cx),
            cy: Emu(cy),
        }
    }

    /// Bottom edge.
    pub fn bottom(&self) -> Emu {
        self.y + self.cy
    }
}

/// A font size in hundredths of a point, as `a:rPr/@sz` stores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FontSize(pub u32);

impl FontSize {
    /// Size from whole points.
    pub const fn points(pt: u32) -> Self {
        FontSize(pt * 100)
    }

    /// Value for the `sz` attribute.
    pub fn hundredths(&self) -> u32 {
        self.0
    }
}

/// Body size for ordinary slides.
pub const BODY_FONT: FontSize = FontSize::points(20);

/// Body size for the opening slide.
pub const OPENING_FONT: FontSize = FontSize::points(24);

/// Anything bigger than this is unreadable for bullets.
pub const MAX_BODY_FONT: FontSize = FontSize::points(32);

/// Where the body text may start so it clears the title.
///
/// Long titles are assumed to wrap, so the offset grows with the
/// title's length in characters.
pub fn compute_safe_top(title: Option<Rect>, title_text: &str) -> Emu {
    let Some(title) = title else {
        return DEFAULT_SAFE_TOP;
    };

    let chars = title_text.chars().count();
    let title_bottom = title.bottom();

    let mut safe_top = title_bottom + TITLE_GAP;
    if chars > LONG_TITLE_CHARS {
        safe_top += LONG_TITLE_GAP;
    }

    let barrier = title_bottom + TITLE_BARRIER;
    if barrier > safe_top {
        safe_top = barrier;
    }

    if chars > VERY_LONG_TITLE_CHARS {
        safe_top += VERY_LONG_TITLE_GAP;
    }

    safe_top
}

/// Push the body below `safe_top` and keep it on the slide.
pub fn fit_body(body: Rect, safe_top: Emu, slide_height: Emu) -> Rect {
    let mut fitted = body;

    if fitted.y < safe_top {
        fitted.y = safe_top;
    }

    let remaining = slide_height - safe_top - BOTTOM_MARGIN;
    let remaining = if remaining.0 < 0 {
        log::warn!(
            "Title leaves no room for the body (safe top {}, slide height {})",
            safe_top,
            slide_height
        );
        Emu(0)
    } else {
        remaining
    };

    if fitted.cy > remaining {
        fitted.cy = remaining;
    }

    fitted
}

/// Body area for a placeholder the template never positions: the slide
/// width less side margins, from `top` to the bottom edge.
pub fn default_body_area(slide_width: Emu, slide_height: Emu, top: Emu) -> Rect {
    Rect {
        x: SIDE_MARGIN,
        y: top,
        cx: slide_width - SIDE_MARGIN - SIDE_MARGIN,
        cy: slide_height - top,
    }
}

/// Pick a readable body font size.
///
/// `inherited` is the size the paragraph itself carries. Sizes above 32pt
/// are replaced with 20pt, as is no size at all; the first slide always
/// gets 24pt.
pub fn body_font_size(slide_index: usize, inherited: Option<FontSize>) -> FontSize {
    if slide_index == 0 {
        return OPENING_FONT;
    }
    match inherited {
        Some(size) if size <= MAX_BODY_FONT => size,
        _ => BODY_FONT,
    }
}

/// Split the body area into a text column and a picture box.
pub fn split_for_image(body: Rect) -> (Rect, Rect) {
    let half = Emu(body.cx.0 / 2);
    let text = Rect {
        cx: Emu((half - Emu(IMAGE_GUTTER.0 / 2)).0.max(0)),
        ..body
    };
    let image = Rect {
        x: body.x + half + Emu(IMAGE_GUTTER.0 / 2),
        cx: Emu((body.cx - half - Emu(IMAGE_GUTTER.0 / 2)).0.max(0)),
        ..body
    };
    (text, image)
}

/// Fit a picture into a box, keeping its aspect ratio and centering it.
///
/// The picture is scaled to the box width first; if that makes it too
/// tall it is scaled to the box height and centered horizontally,
/// otherwise it is centered vertically.
pub fn fit_in_box(width_px: u32, height_px: u32, bounds: Rect) -> Rect {
    if width_px == 0 || height_px == 0 {
        return bounds;
    }

    let aspect = height_px as f64 / width_px as f64;
    let height_at_full_width = (bounds.cx.0 as f64 * aspect).round() as i64;

    if height_at_full_width > bounds.cy.0 {
        let width = (bounds.cy.0 as f64 / aspect).round() as i64;
        Rect {
            x: bounds.x + Emu((bounds.cx.0 - width) / 2),
            y: bounds.y,
            cx: Emu(width),
            cy: bounds.cy,
        }
    } else {
        Rect {
            x: bounds.x,
            y: bounds.y + Emu((bounds.cy.0 - height_at_full_width) / 2),
            cx: bounds.cx,
            cy: Emu(height_at_full_width),
        }
    }
}
