//! Engraving engine contract: what a laid-out score looks like.
//!
//! An [`Engraver`] turns a score plus a [`PageFormat`] and a spacing unit into
//! [`Page`]s of [`System`]s carrying drawable [`Element`]s. All coordinates are
//! device pixels, relative to the top-left corner of the owning page.

mod constants;
mod engraver;
mod format;

use std::cmp::Ordering;

use serde::Serialize;

use crate::model::Score;

pub use engraver::SystemEngraver;
pub use format::{Margins, PageFormat};

/// Lays a score out into pages. Must be a full, synchronous layout.
pub trait Engraver {
    fn engrave(&self, score: &Score, format: &PageFormat, spatium: f64) -> Vec<Page>;
}

// ═══════════════════════════════════════════════════════════════════════
// Geometry primitives
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Edge-inclusive overlap test, so zero-width lines still intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x <= other.right()
            && other.x <= self.right()
            && self.y <= other.bottom()
            && other.y <= self.bottom()
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Elements
// ═══════════════════════════════════════════════════════════════════════

/// Every kind of drawable the engine produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ElementKind {
    Frame,
    Title,
    Composer,
    Header,
    Footer,
    PageNumber,
    InstrumentName,
    StaffLines,
    Bracket,
    Barline,
    Clef,
    KeySignature,
    TimeSignature,
    Rest,
    Stem,
    Note,
    Lyric,
}

impl ElementKind {
    /// Stacking order: lower values are painted first.
    pub fn z(self) -> i32 {
        match self {
            ElementKind::Frame => 0,
            ElementKind::StaffLines => 100,
            ElementKind::Bracket => 150,
            ElementKind::Barline => 200,
            ElementKind::Clef | ElementKind::KeySignature | ElementKind::TimeSignature => 300,
            ElementKind::Stem => 400,
            ElementKind::Rest => 450,
            ElementKind::Note => 500,
            ElementKind::Lyric => 600,
            ElementKind::InstrumentName => 700,
            ElementKind::Title
            | ElementKind::Composer
            | ElementKind::Header
            | ElementKind::Footer
            | ElementKind::PageNumber => 800,
        }
    }

    /// Kinds drawn as text by a renderer.
    pub fn is_text(self) -> bool {
        matches!(
            self,
            ElementKind::Title
                | ElementKind::Composer
                | ElementKind::Header
                | ElementKind::Footer
                | ElementKind::PageNumber
                | ElementKind::InstrumentName
                | ElementKind::Clef
                | ElementKind::KeySignature
                | ElementKind::TimeSignature
                | ElementKind::Lyric
        )
    }
}

/// A drawable unit positioned on its page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Element {
    pub kind: ElementKind,
    /// Page-relative bounding box
    pub bbox: Rect,
    pub visible: bool,
    /// Text content for text-like kinds
    pub text: Option<String>,
    /// Index of the part this element belongs to, if any
    pub part: Option<usize>,
}

impl Element {
    pub fn new(kind: ElementKind, bbox: Rect) -> Self {
        Self {
            kind,
            bbox,
            visible: true,
            text: None,
            part: None,
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn for_part(mut self, part: usize) -> Self {
        self.part = Some(part);
        self
    }

    /// Page-relative position (top-left of the bounding box).
    pub fn page_pos(&self) -> Point {
        Point {
            x: self.bbox.x,
            y: self.bbox.y,
        }
    }

    /// Natural paint order between two elements.
    pub fn draw_order(&self, other: &Element) -> Ordering {
        self.kind.z().cmp(&other.kind.z())
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Systems and pages
// ═══════════════════════════════════════════════════════════════════════

/// One row of music on a page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct System {
    /// Top of the system on its page
    pub y: f64,
    pub height: f64,
    /// Whether vertical justification added space after this system
    pub add_stretch: bool,
    stretch_distance: f64,
    /// Indices of the measures engraved in this system
    pub measures: std::ops::Range<usize>,
    pub elements: Vec<Element>,
}

impl System {
    pub fn new(measures: std::ops::Range<usize>, height: f64, elements: Vec<Element>) -> Self {
        Self {
            y: 0.0,
            height,
            add_stretch: false,
            stretch_distance: 0.0,
            measures,
            elements,
        }
    }

    /// Shift the system and everything in it vertically.
    pub fn move_by(&mut self, dy: f64) {
        if dy == 0.0 {
            return;
        }
        self.y += dy;
        for el in &mut self.elements {
            el.bbox.y += dy;
        }
    }

    /// Extra space inserted after this system (0 when it does not stretch).
    pub fn stretch_distance(&self) -> f64 {
        if self.add_stretch {
            self.stretch_distance
        } else {
            0.0
        }
    }

    pub fn set_stretch_distance(&mut self, distance: f64) {
        self.stretch_distance = distance;
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

/// One physical page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    /// 0-based page number
    pub index: usize,
    pub bbox: Rect,
    pub systems: Vec<System>,
    /// Page-level elements (frames, header, footer, page number)
    pub elements: Vec<Element>,
}

impl Page {
    pub fn width(&self) -> f64 {
        self.bbox.width
    }

    /// Every element intersecting `bounds`, page-level elements first.
    pub fn items(&self, bounds: &Rect) -> Vec<&Element> {
        self.elements
            .iter()
            .chain(self.systems.iter().flat_map(|s| s.elements.iter()))
            .filter(|el| el.bbox.intersects(bounds))
            .collect()
    }
}
