//! SVG rendering of the pages a pager currently shows.
//!
//! The renderer only paints: it takes the paint-ordered [`VisibleItems`] as
//! they are and draws each visible element at its slot offset plus its
//! page position. It never reorders, filters by kind or lays anything out.

mod svg_builder;

use crate::layout::{Element, ElementKind, Point};
use crate::pager::VisibleItems;
use svg_builder::{empty_svg, SvgBuilder};

const PAGE_COLOR: &str = "#ffffff";
const PAGE_BORDER_COLOR: &str = "#cccccc";
const NOTE_COLOR: &str = "#1a1a1a";
const STAFF_COLOR: &str = "#555555";
const BARLINE_COLOR: &str = "#333333";
const HEADER_COLOR: &str = "#1a1a1a";
const LYRIC_COLOR: &str = "#333333";
const FRAME_COLOR: &str = "#9a9a9a";

const STAFF_LINES: usize = 5;
/// Baseline of a text element, as a fraction of its box height.
const TEXT_BASELINE: f64 = 0.8;

/// Paint the visible pages side by side into one SVG document.
///
/// `page_width` and `page_height` are the size of one physical page in
/// device pixels; each slot gets a white page background.
pub fn render_visible_items_to_svg(items: &VisibleItems, page_width: f64, page_height: f64) -> String {
    let Some(&last_offset) = items.page_offsets.last() else {
        return empty_svg("No pages to display");
    };

    let mut svg = SvgBuilder::new(last_offset + page_width, page_height);
    for &offset in &items.page_offsets {
        svg.rect(offset, 0.0, page_width, page_height, PAGE_COLOR, PAGE_BORDER_COLOR, 0.5);
    }
    for (element, pos) in items.positioned() {
        draw_element(&mut svg, element, pos);
    }
    svg.build()
}

fn draw_element(svg: &mut SvgBuilder, element: &Element, pos: Point) {
    let (x, y) = (pos.x, pos.y);
    let (w, h) = (element.bbox.width, element.bbox.height);

    match element.kind {
        ElementKind::StaffLines => {
            let spacing = h / (STAFF_LINES - 1) as f64;
            let thickness = (spacing * 0.08).max(0.5);
            for i in 0..STAFF_LINES {
                let ly = y + i as f64 * spacing;
                svg.line(x, ly, x + w, ly, STAFF_COLOR, thickness);
            }
        }
        ElementKind::Barline | ElementKind::Bracket => {
            svg.rect(x, y, w, h, BARLINE_COLOR, "none", 0.0);
        }
        ElementKind::Stem => {
            svg.line(x + w / 2.0, y, x + w / 2.0, y + h, NOTE_COLOR, w.max(0.5));
        }
        ElementKind::Note => {
            svg.notehead(x + w / 2.0, y + h / 2.0, w / 2.0, h / 2.0, NOTE_COLOR);
        }
        ElementKind::Rest => {
            // Blocky stand-in: a thick bar in the middle third of the box.
            svg.rect(x, y + h / 3.0, w, h / 3.0, NOTE_COLOR, "none", 0.0);
        }
        ElementKind::Frame => {
            svg.rect(x, y, w, h, "none", FRAME_COLOR, 0.5);
        }
        kind if kind.is_text() => draw_text(svg, element, x, y, w, h),
        _ => {}
    }
}

fn draw_text(svg: &mut SvgBuilder, element: &Element, x: f64, y: f64, w: f64, h: f64) {
    let Some(text) = element.text.as_deref() else {
        return;
    };
    let baseline = y + h * TEXT_BASELINE;
    match element.kind {
        ElementKind::Title => {
            svg.text(x + w / 2.0, baseline, text, h, "bold", HEADER_COLOR, "middle")
        }
        ElementKind::Composer | ElementKind::InstrumentName => {
            svg.text(x + w, baseline, text, h * 0.8, "normal", HEADER_COLOR, "end")
        }
        ElementKind::Lyric => svg.text(x, baseline, text, h * 0.8, "normal", LYRIC_COLOR, "start"),
        // Glyph-like kinds fill their staff-high box.
        ElementKind::Clef | ElementKind::KeySignature | ElementKind::TimeSignature => {
            svg.text(x, baseline, text, h * 0.6, "bold", NOTE_COLOR, "start")
        }
        _ => svg.text(x, baseline, text, h * 0.8, "normal", HEADER_COLOR, "start"),
    }
}
