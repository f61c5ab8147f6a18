//! Integration tests: page geometry, navigation and layout notifications.

mod common;

use common::*;
use pretty_assertions::assert_eq;
use scorepager::*;

#[test]
fn forced_breaks_give_one_page_per_measure() {
    let pager = pager_with(paged_document(7));
    assert_eq!(pager.num_phys_pages(), 7);
    assert_eq!(pager.num_pages(), 4);
    assert_eq!(pager.num_pages_shown(), 2);
}

#[test]
fn out_of_range_indices_are_ignored_silently() {
    let mut pager = pager_with(paged_document(7));
    let events = record(&mut pager);

    for index in [7, 12, -1] {
        pager.set_page_index(index);
        assert_eq!(pager.page_index(), 0);
    }
    assert!(events.borrow().is_empty());

    pager.set_page_index(6);
    assert_eq!(pager.page_index(), 6);
    assert_eq!(*events.borrow(), vec![PagerEvent::LayoutUpdated]);
}

#[test]
fn setting_the_current_index_does_not_notify() {
    let mut pager = pager_with(paged_document(3));
    let events = record(&mut pager);
    pager.set_page_index(0);
    pager.first_page();
    assert!(events.borrow().is_empty());
}

#[test]
fn two_sided_steps_by_spreads() {
    let mut pager = pager_with(paged_document(7));
    let mut visited = vec![pager.page_index()];
    for _ in 0..5 {
        pager.next_page();
        visited.push(pager.page_index());
    }
    assert_eq!(visited, vec![0, 2, 4, 6, 6, 6]);

    pager.previous_page();
    assert_eq!(pager.page_index(), 4);
}

#[test]
fn last_page_lands_on_the_last_spread() {
    let mut pager = pager_with(paged_document(8));
    pager.last_page();
    assert_eq!(pager.page_index(), 6);

    let mut pager = pager_with(paged_document(7));
    pager.last_page();
    assert_eq!(pager.page_index(), 6);
    pager.first_page();
    assert_eq!(pager.page_index(), 0);
}

#[test]
fn one_sided_steps_page_by_page() {
    let mut pager = pager_with(paged_document(5));
    pager.set_two_sided(false);
    assert_eq!(pager.num_pages(), 5);
    assert_eq!(pager.num_pages_shown(), 1);

    pager.next_page();
    assert_eq!(pager.page_index(), 1);
    pager.last_page();
    assert_eq!(pager.page_index(), 4);
    pager.next_page();
    assert_eq!(pager.page_index(), 4);
}

#[test]
fn visible_items_cover_both_facing_pages() {
    let pager = pager_with(paged_document(3));
    let items = pager.visible_items();
    assert_eq!(items.page_offsets.len(), 2);
    assert_eq!(items.page_offsets[0], 0.0);
    let page_width = pager.view().unwrap().pages()[0].width();
    assert_eq!(items.page_offsets[1], page_width);
    assert!(items.items.iter().any(|i| i.slot == 1));

    // Paint order never decreases.
    let z: Vec<i32> = items.items.iter().map(|i| i.element.kind.z()).collect();
    assert!(z.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn last_spread_of_an_odd_document_has_one_page() {
    let mut pager = pager_with(paged_document(3));
    pager.last_page();
    let items = pager.visible_items();
    assert_eq!(items.page_offsets, vec![0.0]);
    assert!(items.items.iter().all(|i| i.slot == 0));
}

#[test]
fn zoom_in_grows_the_spatium_and_relayouts() {
    let mut pager = pager_with(paged_document(2));
    let events = record(&mut pager);
    let before = pager.page_geometry().spatium;

    pager.zoom_in();
    assert!((pager.scale() - 1.1).abs() < 1e-9);
    assert!(pager.page_geometry().spatium > before);
    assert!((pager.view().unwrap().spatium() - pager.page_geometry().spatium).abs() < 1e-9);
    assert_eq!(*events.borrow(), vec![PagerEvent::LayoutUpdated]);

    pager.zoom_out();
    assert!((pager.scale() - 1.0).abs() < 1e-9);
    assert!((pager.page_geometry().spatium - before).abs() < 1e-9);
}

#[test]
fn invalid_or_tiny_scale_changes_are_ignored() {
    let mut pager = pager_with(paged_document(2));
    let events = record(&mut pager);
    pager.set_scale(0.0);
    pager.set_scale(-2.0);
    pager.set_scale(1.0005);
    assert_eq!(pager.scale(), 1.0);
    assert!(events.borrow().is_empty());
}

#[test]
fn two_sided_toggle_only_relayouts_on_change() {
    let mut pager = pager_with(paged_document(2));
    let events = record(&mut pager);
    pager.set_two_sided(true);
    assert!(events.borrow().is_empty());
    pager.set_two_sided(false);
    assert_eq!(events.borrow().len(), 1);
    let format = pager.view().unwrap().page_format().copied().unwrap();
    assert!(!format.two_sided);
    assert!((format.width - 1920.0 / 96.0).abs() < 1e-9);
}

#[test]
fn repeated_layout_with_same_inputs_is_stable() {
    let mut pager = pager_with(ensemble(&["Flute", "Oboe"], 40));
    pager.set_viewport_size(1280.0, 720.0);
    let geometry = pager.page_geometry();
    let pages = pager.num_phys_pages();
    let first = pager.view().unwrap().pages().to_vec();

    let events = record(&mut pager);
    pager.set_viewport_size(1280.0, 720.0);
    assert_eq!(pager.page_geometry(), geometry);
    assert_eq!(pager.num_phys_pages(), pages);
    assert_eq!(pager.view().unwrap().pages(), first.as_slice());
    assert_eq!(*events.borrow(), vec![PagerEvent::LayoutUpdated]);
}

#[test]
fn page_index_is_clamped_when_the_layout_shrinks() {
    let mut pager = Pager::new(PagerConfig {
        viewport_width: 800.0,
        viewport_height: 600.0,
        two_sided: false,
        ..PagerConfig::default()
    });
    pager.open_document(ensemble(&["Flute"], 120));
    let before = pager.num_phys_pages();
    assert!(before > 1, "expected several pages, got {before}");
    pager.last_page();
    assert_eq!(pager.page_index(), before - 1);

    pager.set_viewport_size(3000.0, 4000.0);
    let after = pager.num_phys_pages();
    assert!(after < before);
    assert_eq!(pager.page_index(), after - 1);
}

#[test]
fn facing_pages_share_system_spacing_after_alignment() {
    let mut pager = Pager::new(PagerConfig {
        viewport_width: 1600.0,
        viewport_height: 900.0,
        ..PagerConfig::default()
    });
    pager.open_document(ensemble(&["Flute", "Oboe"], 90));
    let pages = pager.view().unwrap().pages();
    assert!(pages.len() >= 2);
    let prev = &pages[pages.len() - 2];
    let last = &pages[pages.len() - 1];
    for (i, system) in last.systems.iter().enumerate() {
        if let Some(facing) = prev.systems.get(i) {
            assert!(system.stretch_distance() <= facing.stretch_distance() + 1e-9);
        }
    }
}
