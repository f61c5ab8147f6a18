//! Post-layout alignment of the last page against its facing page.

use crate::layout::Page;

/// Keep the last page's systems from spreading further apart than the
/// systems of the page before it.
///
/// Walking the last page's systems, any stretch larger than the stretch of
/// the system at the same position on the previous page is clamped down to
/// it, and every following system moves up by the difference. Spacing is
/// only ever compressed. Systems past the previous page's system count are
/// shifted along but not clamped.
pub fn align_last_page_systems(pages: &mut [Page]) {
    let count = pages.len();
    if count < 2 {
        return;
    }
    let (head, tail) = pages.split_at_mut(count - 1);
    let prev_distances: Vec<f64> = head[count - 2]
        .systems
        .iter()
        .map(|s| s.stretch_distance())
        .collect();

    let mut y_offset = 0.0;
    for (i, system) in tail[0].systems.iter_mut().enumerate() {
        system.move_by(y_offset);

        let Some(&prev) = prev_distances.get(i) else {
            continue;
        };
        let dist = system.stretch_distance();
        if dist > prev {
            // Stretch sits after the system, so only later systems move.
            system.set_stretch_distance(prev);
            y_offset += prev - dist;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{Element, ElementKind, Rect, System};

    fn page(index: usize, stretches: &[f64]) -> Page {
        let mut y = 0.0;
        let systems = stretches
            .iter()
            .enumerate()
            .map(|(i, &stretch)| {
                let mut sys = System::new(
                    i..i + 1,
                    50.0,
                    vec![Element::new(ElementKind::StaffLines, Rect::new(0.0, 0.0, 100.0, 40.0))],
                );
                sys.move_by(y);
                if stretch > 0.0 {
                    sys.add_stretch = true;
                    sys.set_stretch_distance(stretch);
                }
                y += 50.0 + 20.0 + stretch;
                sys
            })
            .collect();
        Page {
            index,
            bbox: Rect::new(0.0, 0.0, 500.0, 800.0),
            systems,
            elements: Vec::new(),
        }
    }

    fn ys(page: &Page) -> Vec<f64> {
        page.systems.iter().map(|s| s.y).collect()
    }

    #[test]
    fn clamps_excess_stretch_and_shifts_following_systems() {
        let mut pages = vec![page(0, &[10.0, 10.0, 0.0]), page(1, &[30.0, 25.0, 0.0])];
        let before = ys(&pages[1]);
        align_last_page_systems(&mut pages);

        let last = &pages[1];
        assert_eq!(last.systems[0].stretch_distance(), 10.0);
        assert_eq!(last.systems[1].stretch_distance(), 10.0);
        let after = ys(last);
        assert_eq!(after[0], before[0]);
        assert_eq!(after[1], before[1] - 20.0);
        assert_eq!(after[2], before[2] - 35.0);
        assert_eq!(last.systems[2].elements[0].bbox.y, after[2]);
    }

    #[test]
    fn never_expands_spacing() {
        let mut pages = vec![page(0, &[40.0, 40.0, 0.0]), page(1, &[5.0, 0.0])];
        let before = pages[1].clone();
        align_last_page_systems(&mut pages);
        assert_eq!(pages[1], before);
    }

    #[test]
    fn extra_systems_follow_but_are_not_clamped() {
        let mut pages = vec![page(0, &[8.0]), page(1, &[20.0, 30.0, 0.0])];
        let before = ys(&pages[1]);
        align_last_page_systems(&mut pages);
        let last = &pages[1];
        assert_eq!(last.systems[0].stretch_distance(), 8.0);
        assert_eq!(last.systems[1].stretch_distance(), 30.0);
        assert_eq!(ys(last)[1], before[1] - 12.0);
        assert_eq!(ys(last)[2], before[2] - 12.0);
    }

    #[test]
    fn earlier_pages_are_untouched() {
        let mut pages = vec![
            page(0, &[50.0, 0.0]),
            page(1, &[10.0, 0.0]),
            page(2, &[30.0, 0.0]),
        ];
        let first = pages[0].clone();
        align_last_page_systems(&mut pages);
        assert_eq!(pages[0], first);
        assert_eq!(pages[2].systems[0].stretch_distance(), 10.0);
    }

    #[test]
    fn single_page_is_a_no_op() {
        let mut pages = vec![page(0, &[30.0, 0.0])];
        let before = pages.clone();
        align_last_page_systems(&mut pages);
        assert_eq!(pages, before);
    }
}
