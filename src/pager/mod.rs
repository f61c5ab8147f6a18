//! The pager: turns a loaded document into laid-out pages for a viewport.
//!
//! The [`Pager`] owns the document, a single [`WorkingView`] cloned from it
//! (or from one of its parts or excerpts) and the viewport state. Every
//! geometry-, zoom- or style-affecting setter funnels through one private
//! layout pass, which re-engraves the view, aligns the last page with its
//! facing page and notifies subscribers.

mod align;
mod collect;
mod filter;
mod geometry;
mod selection;
mod style;

use std::path::Path;

use crate::config::PagerConfig;
use crate::error::LoadError;
use crate::layout::{Engraver, SystemEngraver};
use crate::loader::{DocumentLoader, MusicXmlLoader};
use crate::model::Document;
use crate::view::WorkingView;

pub use align::align_last_page_systems;
pub use collect::{collect_visible_items, PageItem, VisibleItems};
pub use filter::{apply_concert_pitch, strip_lyrics};
pub use geometry::{compute_page_geometry, PageGeometry, MM_PER_INCH, SPATIUM_BASE_MM};
pub use selection::{isolate_part, selectable_names, ViewSource};
pub use style::configure_view_style;

/// Zoom change applied by [`Pager::zoom_in`] and [`Pager::zoom_out`].
pub const ZOOM_STEP: f64 = 0.1;
/// Scale changes smaller than this are ignored.
const SCALE_EPSILON: f64 = 1e-3;

/// Notifications delivered to subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagerEvent {
    /// Pages were laid out again or the page index moved.
    LayoutUpdated,
    /// A different part or excerpt is now displayed.
    PartChanged,
}

type Observer = Box<dyn FnMut(&PagerEvent)>;

/// Pagination state machine over a document.
pub struct Pager<E = SystemEngraver, L = MusicXmlLoader> {
    engraver: E,
    loader: L,
    config: PagerConfig,
    document: Option<Document>,
    view: Option<WorkingView>,
    source: ViewSource,
    page_idx: usize,
    observers: Vec<Observer>,
}

impl Pager {
    /// A pager using the built-in engraver and the MusicXML loader.
    pub fn new(config: PagerConfig) -> Self {
        Self::with_collaborators(SystemEngraver, MusicXmlLoader, config)
    }
}

impl Default for Pager {
    fn default() -> Self {
        Self::new(PagerConfig::default())
    }
}

impl<E: Engraver, L: DocumentLoader> Pager<E, L> {
    pub fn with_collaborators(engraver: E, loader: L, mut config: PagerConfig) -> Self {
        let defaults = PagerConfig::default();
        if config.scale <= 0.0 {
            log::warn!("invalid initial scale {}, using {}", config.scale, defaults.scale);
            config.scale = defaults.scale;
        }
        if config.dpi <= 0.0 {
            log::warn!("invalid initial dpi {}, using {}", config.dpi, defaults.dpi);
            config.dpi = defaults.dpi;
        }
        Self {
            engraver,
            loader,
            config,
            document: None,
            view: None,
            source: ViewSource::WholeDocument,
            page_idx: 0,
            observers: Vec::new(),
        }
    }

    /// Register a callback for [`PagerEvent`]s. Callbacks run synchronously,
    /// in registration order, before the triggering call returns.
    pub fn subscribe<F>(&mut self, observer: F)
    where
        F: FnMut(&PagerEvent) + 'static,
    {
        self.observers.push(Box::new(observer));
    }

    fn emit(&mut self, event: PagerEvent) {
        for observer in &mut self.observers {
            observer(&event);
        }
    }

    pub fn config(&self) -> &PagerConfig {
        &self.config
    }

    // ───────────────────────────────────────────────────────────────────
    // Documents and parts
    // ───────────────────────────────────────────────────────────────────

    /// Load a document through the loader and display the whole score.
    ///
    /// On failure nothing changes: the previous document and view, if any,
    /// stay installed.
    pub fn load_document(&mut self, path: impl AsRef<Path>) -> Result<(), LoadError> {
        let path = path.as_ref();
        let document = self.loader.load(path).map_err(|e| {
            log::warn!("failed to load '{}': {e}", path.display());
            e
        })?;
        self.open_document(document);
        Ok(())
    }

    /// Install an already loaded document and display the whole score from
    /// its first page.
    pub fn open_document(&mut self, document: Document) {
        self.document = Some(document);
        self.page_idx = 0;
        self.select_part(None);
    }

    pub fn document(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    pub fn view(&self) -> Option<&WorkingView> {
        self.view.as_ref()
    }

    pub fn title(&self) -> Option<&str> {
        self.document.as_ref().map(Document::title)
    }

    /// Display one excerpt (or one part, when the document has no excerpts).
    /// `None` selects the whole document. Out-of-range indices are clamped.
    ///
    /// Replaces the working view with a fresh clone, lays it out, then emits
    /// [`PagerEvent::LayoutUpdated`] followed by [`PagerEvent::PartChanged`].
    pub fn select_part(&mut self, index: Option<usize>) {
        let Some(document) = self.document.as_ref() else {
            log::debug!("part selection ignored, no document loaded");
            return;
        };
        let source = ViewSource::resolve(document, index);
        log::info!("selected {source:?}");
        self.view = Some(build_view(document, &source, &self.config));
        self.source = source;
        self.update_layout();
        self.emit(PagerEvent::PartChanged);
    }

    /// Index of the displayed excerpt or part, `None` for the whole document.
    pub fn selected_part(&self) -> Option<usize> {
        self.source.index()
    }

    pub fn source(&self) -> &ViewSource {
        &self.source
    }

    pub fn part_name(&self) -> Option<&str> {
        self.source.display_name()
    }

    pub fn solo_instrument(&self) -> bool {
        self.source.solo_instrument()
    }

    /// Names of everything [`select_part`](Self::select_part) can choose from.
    pub fn part_names(&self) -> Vec<String> {
        self.document
            .as_ref()
            .map(selectable_names)
            .unwrap_or_default()
    }

    /// Clone the current source again, dropping any filters applied to the old view.
    fn rebuild_view(&mut self) {
        let Some(document) = self.document.as_ref() else {
            return;
        };
        self.view = Some(build_view(document, &self.source, &self.config));
        self.update_layout();
    }

    // ───────────────────────────────────────────────────────────────────
    // Geometry
    // ───────────────────────────────────────────────────────────────────

    /// Resize the viewport. Always lays out again.
    pub fn set_viewport_size(&mut self, width: f64, height: f64) {
        self.config.viewport_width = width;
        self.config.viewport_height = height;
        self.update_layout();
    }

    pub fn set_dpi(&mut self, dpi: f64) {
        if dpi <= 0.0 {
            log::warn!("rejected dpi {dpi}");
            return;
        }
        if dpi != self.config.dpi {
            self.config.dpi = dpi;
            self.update_layout();
        }
    }

    pub fn scale(&self) -> f64 {
        self.config.scale
    }

    /// Set the zoom factor. Non-positive values are rejected and changes
    /// below 0.001 are ignored.
    pub fn set_scale(&mut self, scale: f64) {
        if scale <= 0.0 {
            log::warn!("rejected scale {scale}");
            return;
        }
        if (scale - self.config.scale).abs() > SCALE_EPSILON {
            self.config.scale = scale;
            self.update_layout();
        }
    }

    pub fn two_sided(&self) -> bool {
        self.config.two_sided
    }

    pub fn set_two_sided(&mut self, two_sided: bool) {
        if two_sided != self.config.two_sided {
            self.config.two_sided = two_sided;
            self.update_layout();
        }
    }

    /// Page format and spatium for the current viewport and zoom.
    pub fn page_geometry(&self) -> PageGeometry {
        let c = &self.config;
        compute_page_geometry(
            c.viewport_width,
            c.viewport_height,
            c.dpi,
            c.scale,
            c.two_sided,
        )
    }

    // ───────────────────────────────────────────────────────────────────
    // Display toggles
    // ───────────────────────────────────────────────────────────────────

    pub fn set_show_instrument_names(&mut self, show: bool) {
        if show == self.config.show_instrument_names {
            return;
        }
        self.config.show_instrument_names = show;
        let solo = self.source.solo_instrument();
        let concert = self.config.concert_pitch;
        if let Some(view) = self.view.as_mut() {
            configure_view_style(&mut view.score_mut().style, show, concert, solo);
            self.update_layout();
        }
    }

    /// Show or hide lyrics. Showing them again needs a fresh clone, so both
    /// directions rebuild the view.
    pub fn set_show_lyrics(&mut self, show: bool) {
        if show != self.config.show_lyrics {
            self.config.show_lyrics = show;
            self.rebuild_view();
        }
    }

    pub fn set_concert_pitch(&mut self, concert: bool) {
        if concert != self.config.concert_pitch {
            self.config.concert_pitch = concert;
            self.rebuild_view();
        }
    }

    // ───────────────────────────────────────────────────────────────────
    // Navigation
    // ───────────────────────────────────────────────────────────────────

    /// Physical index of the first page shown.
    pub fn page_index(&self) -> usize {
        self.page_idx
    }

    /// Jump to a physical page. Indices outside `0..num_phys_pages()` are ignored.
    pub fn set_page_index(&mut self, index: isize) {
        let count = self.num_phys_pages();
        let index = match usize::try_from(index) {
            Ok(i) if i < count => i,
            _ => {
                log::debug!("ignored page index {index} ({count} pages)");
                return;
            }
        };
        if index != self.page_idx {
            self.page_idx = index;
            self.emit(PagerEvent::LayoutUpdated);
        }
    }

    pub fn num_phys_pages(&self) -> usize {
        self.view.as_ref().map_or(0, |v| v.pages().len())
    }

    /// Navigation steps: spreads when two-sided, pages otherwise.
    pub fn num_pages(&self) -> usize {
        let pages = self.num_phys_pages();
        if self.config.two_sided {
            (pages + 1) / 2
        } else {
            pages
        }
    }

    pub fn num_pages_shown(&self) -> usize {
        if self.config.two_sided {
            2
        } else {
            1
        }
    }

    pub fn first_page(&mut self) {
        self.set_page_index(0);
    }

    /// Go to the last page, or to the start of the last spread when two-sided.
    pub fn last_page(&mut self) {
        let Some(last) = self.num_phys_pages().checked_sub(1) else {
            return;
        };
        let index = if self.config.two_sided {
            let shown = self.num_pages_shown();
            last / shown * shown
        } else {
            last
        };
        self.set_page_index(index as isize);
    }

    pub fn next_page(&mut self) {
        self.set_page_index(self.page_idx as isize + self.num_pages_shown() as isize);
    }

    pub fn previous_page(&mut self) {
        self.set_page_index(self.page_idx as isize - self.num_pages_shown() as isize);
    }

    pub fn zoom_in(&mut self) {
        self.set_scale(self.config.scale + ZOOM_STEP);
    }

    pub fn zoom_out(&mut self) {
        self.set_scale(self.config.scale - ZOOM_STEP);
    }

    // ───────────────────────────────────────────────────────────────────
    // Drawing
    // ───────────────────────────────────────────────────────────────────

    /// Paint-ordered elements of the pages currently shown.
    pub fn visible_items(&self) -> VisibleItems<'_> {
        match self.view.as_ref() {
            Some(view) => collect_visible_items(view.pages(), self.page_idx, self.num_pages_shown()),
            None => VisibleItems::default(),
        }
    }

    /// Push geometry into the view, engrave it, align the last page and
    /// clamp the page index. Without a view only the settings are kept.
    fn update_layout(&mut self) {
        let geometry = self.page_geometry();
        let Some(view) = self.view.as_mut() else {
            return;
        };
        view.set_page_format(geometry.format);
        view.set_spatium(geometry.spatium);
        view.set_layout_all();
        view.relayout(&self.engraver);
        align_last_page_systems(view.pages_mut());

        let count = view.pages().len();
        if self.page_idx >= count {
            let clamped = count.saturating_sub(1);
            if clamped != self.page_idx {
                log::debug!("page index {} clamped to {clamped}", self.page_idx);
            }
            self.page_idx = clamped;
        }
        self.emit(PagerEvent::LayoutUpdated);
    }
}

/// Materialize the working view for `source`: clone, isolate, style, filter.
fn build_view(document: &Document, source: &ViewSource, config: &PagerConfig) -> WorkingView {
    let mut score = source.base(document).clone();
    if let ViewSource::Part { index, .. } = source {
        isolate_part(&mut score, *index);
    }
    let native_concert = score.style.concert_pitch;
    configure_view_style(
        &mut score.style,
        config.show_instrument_names,
        config.concert_pitch,
        source.solo_instrument(),
    );
    apply_concert_pitch(&mut score, native_concert, config.concert_pitch);
    if !config.show_lyrics {
        strip_lyrics(&mut score);
    }
    WorkingView::new(score)
}
