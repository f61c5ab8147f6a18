//! The working view: an owned clone of the document (or of a part/excerpt)
//! together with the layout state the engraving engine produced for it.

use crate::layout::{Engraver, Page, PageFormat};
use crate::model::Score;

/// Mutable, exclusively owned copy of a score plus its current layout.
#[derive(Debug, Clone)]
pub struct WorkingView {
    score: Score,
    format: Option<PageFormat>,
    spatium: f64,
    pages: Vec<Page>,
    layout_all: bool,
}

impl WorkingView {
    /// Take ownership of an already cloned score. Nothing is laid out yet.
    pub fn new(score: Score) -> Self {
        Self {
            score,
            format: None,
            spatium: 0.0,
            pages: Vec::new(),
            layout_all: true,
        }
    }

    pub fn score(&self) -> &Score {
        &self.score
    }

    pub fn score_mut(&mut self) -> &mut Score {
        self.layout_all = true;
        &mut self.score
    }

    pub fn page_format(&self) -> Option<&PageFormat> {
        self.format.as_ref()
    }

    pub fn set_page_format(&mut self, format: PageFormat) {
        self.format = Some(format);
    }

    pub fn spatium(&self) -> f64 {
        self.spatium
    }

    pub fn set_spatium(&mut self, spatium: f64) {
        self.spatium = spatium;
    }

    /// Request a full (non-incremental) layout on the next `relayout`.
    pub fn set_layout_all(&mut self) {
        self.layout_all = true;
    }

    /// Re-engrave the whole score synchronously. Without a page format there
    /// is nothing to lay out against and the pages are left as they are.
    pub fn relayout<E: Engraver + ?Sized>(&mut self, engraver: &E) {
        let Some(ref format) = self.format else {
            log::warn!("relayout requested before a page format was set");
            return;
        };
        if !self.layout_all {
            return;
        }
        self.pages = engraver.engrave(&self.score, format, self.spatium);
        self.layout_all = false;
        log::debug!(
            "layout: {} pages at spatium {:.2}px",
            self.pages.len(),
            self.spatium
        );
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn pages_mut(&mut self) -> &mut [Page] {
        &mut self.pages
    }

    pub fn page(&self, index: usize) -> Option<&Page> {
        self.pages.get(index)
    }
}
