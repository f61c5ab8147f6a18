//! Collect and order the drawable elements of the pages currently shown.

use serde::Serialize;

use crate::layout::{Element, Page, Point};

/// One element together with the display slot (0 = left page) it came from.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PageItem<'a> {
    pub element: &'a Element,
    pub slot: usize,
}

/// Paint-ordered elements of the visible pages plus each slot's x offset.
#[derive(Debug, Clone, Default, Serialize)]
pub struct VisibleItems<'a> {
    pub items: Vec<PageItem<'a>>,
    pub page_offsets: Vec<f64>,
}

impl<'a> VisibleItems<'a> {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Visible elements with their position in display coordinates.
    pub fn positioned(&self) -> impl Iterator<Item = (&'a Element, Point)> + '_ {
        self.items.iter().filter_map(|item| {
            if !item.element.visible {
                return None;
            }
            let offset = *self.page_offsets.get(item.slot)?;
            let pos = item.element.page_pos();
            Some((
                item.element,
                Point {
                    x: pos.x + offset,
                    y: pos.y,
                },
            ))
        })
    }
}

/// Gather the elements of up to `shown` pages starting at `page_index`.
///
/// Slots tile rightwards, each offset by the width of the page before it.
/// The result is sorted by the engine's natural element order, ties broken by
/// slot; the sort is stable so equal elements keep their discovery order.
pub fn collect_visible_items(pages: &[Page], page_index: usize, shown: usize) -> VisibleItems<'_> {
    let mut visible = VisibleItems::default();
    let mut offset = 0.0;
    let mut prev_width = None;

    for slot in 0..shown {
        let Some(page) = pages.get(page_index + slot) else {
            break;
        };
        if let Some(width) = prev_width {
            offset += width;
        }
        visible.page_offsets.push(offset);
        visible.items.extend(
            page.items(&page.bbox)
                .into_iter()
                .map(|element| PageItem { element, slot }),
        );
        prev_width = Some(page.width());
    }

    visible.items.sort_by(|a, b| {
        a.element
            .draw_order(b.element)
            .then_with(|| a.slot.cmp(&b.slot))
    });
    visible
}
