//! scorepager: paginated score viewing on top of an engraving engine.
//!
//! A [`Pager`] loads a MusicXML document, lays a working copy of it out into
//! pages sized for a viewport, and hands the elements of the page (or pair of
//! facing pages) currently shown to a renderer in paint order.
//!
//! # Example
//! ```no_run
//! use scorepager::{Pager, PagerConfig};
//!
//! let mut pager = Pager::new(PagerConfig::default());
//! pager.subscribe(|event| println!("{event:?}"));
//! pager.load_document("path/to/score.musicxml").unwrap();
//! println!("Title: {:?}", pager.title());
//! println!("Pages: {}", pager.num_phys_pages());
//! pager.next_page();
//! for (element, pos) in pager.visible_items().positioned() {
//!     println!("{:?} at {:?}", element.kind, pos);
//! }
//! ```

pub mod config;
pub mod error;
pub mod layout;
pub mod loader;
pub mod model;
pub mod mxl;
pub mod pager;
pub mod parser;
pub mod renderer;
pub mod view;

use std::path::Path;

pub use config::PagerConfig;
pub use error::{ConfigError, LoadError};
pub use layout::{Element, ElementKind, Engraver, Page, PageFormat, SystemEngraver};
pub use loader::{parse_bytes, DocumentLoader, MusicXmlLoader};
pub use model::*;
pub use mxl::parse_mxl;
pub use pager::{Pager, PagerEvent, VisibleItems, ViewSource};
pub use parser::parse_musicxml;
pub use renderer::render_visible_items_to_svg;
pub use view::WorkingView;

/// Load a score and render the page (or spread) starting at `page_index`.
///
/// An out-of-range index is ignored and the first page is rendered.
pub fn render_file_page_to_svg<P: AsRef<Path>>(
    path: P,
    config: &PagerConfig,
    page_index: usize,
) -> Result<String, LoadError> {
    let mut pager = Pager::new(config.clone());
    pager.load_document(path)?;
    pager.set_page_index(isize::try_from(page_index).unwrap_or(isize::MAX));

    let format = pager.page_geometry().format;
    Ok(render_visible_items_to_svg(
        &pager.visible_items(),
        format.width_px(),
        format.height_px(),
    ))
}

// ═══════════════════════════════════════════════════════════════════════
// C FFI: for iOS (static library) and other native hosts
// ═══════════════════════════════════════════════════════════════════════

use std::ffi::{CStr, CString};
use std::os::raw::c_char;

/// Load a score, paginate it for a `width` × `height` pixel viewport at `dpi`
/// and return the SVG of the page starting at `page_index` as a C string.
/// The caller must free the returned string with `scorepager_free_string`.
///
/// Non-positive `width`, `height` or `dpi` fall back to the defaults.
/// Returns null if the path is invalid or the score cannot be loaded.
///
/// # Safety
/// `path` must be a valid null-terminated UTF-8 C string.
#[no_mangle]
pub unsafe extern "C" fn scorepager_render_page(
    path: *const c_char,
    width: f64,
    height: f64,
    dpi: f64,
    page_index: u32,
) -> *mut c_char {
    if path.is_null() {
        return std::ptr::null_mut();
    }
    let c_str = unsafe { CStr::from_ptr(path) };
    let path_str = match c_str.to_str() {
        Ok(s) => s,
        Err(_) => return std::ptr::null_mut(),
    };

    let defaults = PagerConfig::default();
    let config = PagerConfig {
        viewport_width: if width > 0.0 { width } else { defaults.viewport_width },
        viewport_height: if height > 0.0 { height } else { defaults.viewport_height },
        dpi: if dpi > 0.0 { dpi } else { defaults.dpi },
        ..defaults
    };

    match render_file_page_to_svg(path_str, &config, page_index as usize) {
        Ok(svg) => CString::new(svg).unwrap_or_default().into_raw(),
        Err(e) => {
            log::warn!("scorepager_render_page failed: {e}");
            std::ptr::null_mut()
        }
    }
}

/// Free a string previously returned by scorepager functions.
///
/// # Safety
/// `ptr` must be a string previously returned by a scorepager function, or null.
#[no_mangle]
pub unsafe extern "C" fn scorepager_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        unsafe {
            let _ = CString::from_raw(ptr);
        }
    }
}
