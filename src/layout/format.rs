//! Page format handed to the engraving engine.

use serde::Serialize;

/// Margins of one page side, in inches.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Margins {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
}

/// Physical page description. Sizes are in inches; `dpi` converts to pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PageFormat {
    pub width: f64,
    pub height: f64,
    /// Margins of even pages (page indices 1, 3, 5, ...)
    pub even: Margins,
    /// Margins of odd pages (page indices 0, 2, 4, ...)
    pub odd: Margins,
    /// Width available for music
    pub printable_width: f64,
    pub two_sided: bool,
    pub dpi: f64,
}

impl PageFormat {
    /// Margins for the page at `index` (0-based).
    pub fn margins(&self, index: usize) -> &Margins {
        if index % 2 == 0 {
            &self.odd
        } else {
            &self.even
        }
    }

    pub fn right_margin(&self, index: usize) -> f64 {
        self.width - self.margins(index).left - self.printable_width
    }

    pub fn to_px(&self, inches: f64) -> f64 {
        inches * self.dpi
    }

    pub fn width_px(&self) -> f64 {
        self.to_px(self.width)
    }

    pub fn height_px(&self) -> f64 {
        self.to_px(self.height)
    }
}
