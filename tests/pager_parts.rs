//! Integration tests: part and excerpt views, lyric and concert-pitch filters.

mod common;

use common::*;
use pretty_assertions::assert_eq;
use scorepager::*;

fn shown(pager: &Pager) -> Vec<bool> {
    pager.view().unwrap().score().parts.iter().map(|p| p.show).collect()
}

fn visible_kinds(pager: &Pager, kind: ElementKind) -> usize {
    pager
        .view()
        .unwrap()
        .pages()
        .iter()
        .flat_map(|p| p.items(&p.bbox))
        .filter(|e| e.kind == kind)
        .count()
}

#[test]
fn soloing_a_part_hides_the_others() {
    let mut pager = pager_with(ensemble(&["Flute", "Oboe", "Cello"], 4));
    pager.select_part(Some(1));

    assert_eq!(shown(&pager), vec![false, true, false]);
    assert!(pager.solo_instrument());
    assert_eq!(pager.selected_part(), Some(1));
    assert_eq!(pager.part_name(), Some("Oboe"));
    assert!(!pager.view().unwrap().score().style.show_instrument_names);
    assert_eq!(visible_kinds(&pager, ElementKind::InstrumentName), 0);

    // The loaded document keeps every instrument.
    assert!(pager.document().unwrap().score.parts.iter().all(|p| p.show));
}

#[test]
fn whole_document_restores_every_instrument() {
    let mut pager = pager_with(ensemble(&["Flute", "Oboe", "Cello"], 4));
    pager.select_part(Some(2));
    pager.select_part(None);

    assert_eq!(shown(&pager), vec![true, true, true]);
    assert!(!pager.solo_instrument());
    assert_eq!(pager.part_name(), None);
    assert!(visible_kinds(&pager, ElementKind::InstrumentName) > 0);
}

#[test]
fn part_index_is_clamped() {
    let mut pager = pager_with(ensemble(&["Flute", "Oboe"], 2));
    pager.select_part(Some(9));
    assert_eq!(pager.selected_part(), Some(1));
    assert_eq!(pager.part_name(), Some("Oboe"));
}

#[test]
fn part_switch_relayouts_before_reporting() {
    let mut pager = pager_with(ensemble(&["Flute", "Oboe"], 2));
    let events = record(&mut pager);
    pager.select_part(Some(0));
    assert_eq!(
        *events.borrow(),
        vec![PagerEvent::LayoutUpdated, PagerEvent::PartChanged]
    );
}

#[test]
fn excerpts_replace_part_selection() {
    let mut document = ensemble(&["Flute", "Oboe", "Cello"], 4);
    let winds = Excerpt::from_parts(&document.score, "Winds", &[0, 1]);
    let strings = Excerpt::from_parts(&document.score, "Strings", &[2]);
    document.excerpts = vec![winds, strings];

    let mut pager = pager_with(document);
    assert_eq!(pager.part_names(), vec!["Winds", "Strings"]);

    pager.select_part(Some(0));
    assert_eq!(pager.part_name(), Some("Winds"));
    assert!(!pager.solo_instrument());
    let names: Vec<&str> = pager
        .view()
        .unwrap()
        .score()
        .parts
        .iter()
        .map(|p| p.name.as_str())
        .collect();
    assert_eq!(names, vec!["Flute", "Oboe"]);

    pager.select_part(Some(5));
    assert_eq!(pager.selected_part(), Some(1));
    assert_eq!(pager.part_name(), Some("Strings"));
    assert_eq!(shown(&pager), vec![true]);
}

#[test]
fn part_names_without_excerpts_list_instruments() {
    let pager = pager_with(ensemble(&["Flute", "Oboe"], 1));
    assert_eq!(pager.part_names(), vec!["Flute", "Oboe"]);
    assert_eq!(pager.title(), Some("Ensemble"));
}

#[test]
fn hiding_instrument_names_relayouts_without_recloning() {
    let mut pager = pager_with(ensemble(&["Flute", "Oboe"], 4));
    assert!(visible_kinds(&pager, ElementKind::InstrumentName) > 0);

    let events = record(&mut pager);
    pager.set_show_instrument_names(false);
    assert_eq!(visible_kinds(&pager, ElementKind::InstrumentName), 0);
    assert_eq!(*events.borrow(), vec![PagerEvent::LayoutUpdated]);

    pager.set_show_instrument_names(true);
    assert!(visible_kinds(&pager, ElementKind::InstrumentName) > 0);
}

#[test]
fn lyrics_come_back_after_being_hidden() {
    let mut pager = pager_with(ensemble(&["Voice"], 4));
    assert_eq!(visible_kinds(&pager, ElementKind::Lyric), 4);

    let events = record(&mut pager);
    pager.set_show_lyrics(false);
    assert_eq!(visible_kinds(&pager, ElementKind::Lyric), 0);
    assert!(!pager.view().unwrap().score().parts[0].has_lyrics());
    assert!(pager.document().unwrap().score.parts[0].has_lyrics());
    assert_eq!(*events.borrow(), vec![PagerEvent::LayoutUpdated]);

    pager.set_show_lyrics(true);
    assert_eq!(visible_kinds(&pager, ElementKind::Lyric), 4);
}

#[test]
fn hiding_lyrics_covers_parts_longer_than_the_first() {
    let score = Score {
        parts: vec![melody("Flute", 1, false), melody("Voice", 3, false)],
        ..Score::new()
    };
    let mut pager = pager_with(Document::new("uneven", score));
    pager.set_show_lyrics(false);

    let view = pager.view().unwrap().score();
    assert!(view.parts.iter().all(|p| !p.has_lyrics()));
    assert!(pager.document().unwrap().score.parts[1].has_lyrics());
}

#[test]
fn hidden_lyrics_stay_hidden_across_part_switches() {
    let mut pager = pager_with(ensemble(&["Voice", "Piano"], 2));
    pager.set_show_lyrics(false);
    pager.select_part(Some(0));
    assert_eq!(visible_kinds(&pager, ElementKind::Lyric), 0);
}

#[test]
fn concert_pitch_transposes_only_the_view() {
    let mut pager = pager_with(clarinet_and_voice());
    assert_eq!(view_keys(&pager, 0), vec![2]);

    pager.set_concert_pitch(true);
    assert_eq!(view_keys(&pager, 0), vec![0]);
    assert_eq!(view_keys(&pager, 1), vec![2]);
    assert!(pager.view().unwrap().score().style.concert_pitch);

    assert!(!pager.document().unwrap().native_concert_pitch());
    let original = &pager.document().unwrap().score;
    let key = original.parts[0].measures[0].attributes.as_ref().unwrap().key.as_ref().unwrap();
    assert_eq!(key.fifths, 2);

    // Turning it off again starts from a fresh clone rather than undoing.
    pager.set_concert_pitch(false);
    assert_eq!(view_keys(&pager, 0), vec![2]);
}

#[test]
fn concert_pitch_applies_to_a_soloed_part() {
    let mut pager = pager_with(clarinet_and_voice());
    pager.set_concert_pitch(true);
    pager.select_part(Some(0));
    assert_eq!(view_keys(&pager, 0), vec![0]);
    let first = pager.view().unwrap().score().parts[0].measures[0].notes[0]
        .pitch
        .clone()
        .unwrap();
    assert_eq!((first.step.as_str(), first.octave), ("C", 5));
}

#[test]
fn page_index_survives_a_part_switch_when_still_valid() {
    let mut document = paged_document(6);
    document.score.parts.push(melody("Oboe", 6, false));
    let mut pager = pager_with(document);
    pager.set_page_index(4);
    pager.select_part(Some(1));
    assert_eq!(pager.num_phys_pages(), 6);
    assert_eq!(pager.page_index(), 4);
    let view = pager.view().unwrap();
    assert_eq!(view.page(5).map(|p| p.index), Some(5));
    assert!(view.page(6).is_none());
}
