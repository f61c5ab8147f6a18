//! Page geometry: derive the page format and staff space from the viewport.

use serde::Serialize;

use crate::layout::{Margins, PageFormat};

pub const MM_PER_INCH: f64 = 25.4;
/// Staff space at zoom 1.0.
pub const SPATIUM_BASE_MM: f64 = 2.0;

const VERTICAL_MARGIN_RATIO: f64 = 0.005;
const HORIZONTAL_MARGIN_RATIO: f64 = 0.015;
// Facing pages share the spine, so the inner margins are narrower and the
// outer ones wider. Together they still add up to two plain margins.
const OUTER_MARGIN_FACTOR: f64 = 1.5;
const INNER_MARGIN_FACTOR: f64 = 0.5;

/// Output of the geometry calculation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PageGeometry {
    pub format: PageFormat,
    /// Spacing unit in device pixels
    pub spatium: f64,
}

/// Compute the page format for a viewport of `width` × `height` device pixels.
///
/// In two-sided mode each physical page takes half of the viewport width.
pub fn compute_page_geometry(
    width: f64,
    height: f64,
    dpi: f64,
    scale: f64,
    two_sided: bool,
) -> PageGeometry {
    let mut width_inch = width / dpi;
    let height_inch = height / dpi;
    if two_sided {
        width_inch *= 0.5;
    }

    let vertical = height_inch * VERTICAL_MARGIN_RATIO;
    let horizontal = width_inch * HORIZONTAL_MARGIN_RATIO;
    let (outer, inner) = if two_sided {
        (horizontal * OUTER_MARGIN_FACTOR, horizontal * INNER_MARGIN_FACTOR)
    } else {
        (horizontal, horizontal)
    };

    // Page 0 sits left of the spine, page 1 right of it.
    let odd = Margins {
        top: vertical,
        bottom: vertical,
        left: outer,
    };
    let even = Margins {
        top: vertical,
        bottom: vertical,
        left: inner,
    };

    PageGeometry {
        format: PageFormat {
            width: width_inch,
            height: height_inch,
            even,
            odd,
            printable_width: width_inch - outer - inner,
            two_sided,
            dpi,
        },
        spatium: scale * SPATIUM_BASE_MM / MM_PER_INCH * dpi,
    }
}
