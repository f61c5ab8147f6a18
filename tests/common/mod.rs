//! Programmatic score builders shared by the integration tests.

#![allow(dead_code)]

use scorepager::*;

pub fn note(step: &str, octave: i32, lyric: Option<&str>) -> Note {
    Note {
        pitch: Some(Pitch {
            step: step.into(),
            octave,
            alter: None,
        }),
        duration: 1,
        voice: None,
        note_type: Some("quarter".into()),
        rest: false,
        chord: false,
        dot: false,
        staff: None,
        print_object: true,
        lyrics: lyric
            .map(|text| Lyric {
                number: 1,
                text: text.into(),
                syllabic: None,
            })
            .into_iter()
            .collect(),
    }
}

/// A 4/4 melody with one syllable per measure. With `page_per_measure` every
/// measure after the first forces a new page.
pub fn melody(name: &str, measures: usize, page_per_measure: bool) -> Part {
    Part {
        id: format!("P-{name}"),
        name: name.into(),
        abbreviation: None,
        show: true,
        transpose: None,
        measures: (0..measures)
            .map(|i| Measure {
                number: i as i32 + 1,
                implicit: false,
                attributes: (i == 0).then(|| Attributes {
                    divisions: Some(1),
                    key: Some(Key { fifths: 2, mode: None }),
                    time: Some(TimeSignature { beats: 4, beat_type: 4 }),
                    ..Attributes::default()
                }),
                notes: vec![
                    note("D", 5, Some("la")),
                    note("E", 5, None),
                    note("F", 5, None),
                    note("G", 5, None),
                ],
                new_system: false,
                new_page: page_per_measure && i > 0,
            })
            .collect(),
    }
}

/// A single-part document laid out as exactly `pages` pages.
pub fn paged_document(pages: usize) -> Document {
    let score = Score {
        title: Some("Paged".into()),
        parts: vec![melody("Flute", pages, true)],
        ..Score::new()
    };
    Document::new("paged", score)
}

/// A document with one part per name, no forced breaks.
pub fn ensemble(names: &[&str], measures: usize) -> Document {
    let score = Score {
        title: Some("Ensemble".into()),
        composer: Some("Anon.".into()),
        parts: names.iter().map(|n| melody(n, measures, false)).collect(),
        ..Score::new()
    };
    Document::new("ensemble", score)
}

/// Clarinet in B-flat (written a major second above sounding) plus a voice.
pub fn clarinet_and_voice() -> Document {
    let mut clarinet = melody("Clarinet in Bb", 4, false);
    clarinet.transpose = Some(Transpose {
        diatonic: -1,
        chromatic: -2,
        octave_change: None,
    });
    let score = Score {
        parts: vec![clarinet, melody("Voice", 4, false)],
        ..Score::new()
    };
    Document::new("duet", score)
}

/// Key signatures of part `index` in the pager's working view.
pub fn view_keys<E: Engraver, L: DocumentLoader>(pager: &Pager<E, L>, index: usize) -> Vec<i32> {
    pager
        .view()
        .map(|v| {
            v.score().parts[index]
                .measures
                .iter()
                .filter_map(|m| m.attributes.as_ref()?.key.as_ref())
                .map(|k| k.fifths)
                .collect()
        })
        .unwrap_or_default()
}

pub fn pager_with(document: Document) -> Pager {
    let mut pager = Pager::new(PagerConfig::default());
    pager.open_document(document);
    pager
}

/// Record every event the pager emits from now on.
pub fn record<E: Engraver, L: DocumentLoader>(
    pager: &mut Pager<E, L>,
) -> std::rc::Rc<std::cell::RefCell<Vec<PagerEvent>>> {
    let events = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
    let sink = std::rc::Rc::clone(&events);
    pager.subscribe(move |event| sink.borrow_mut().push(*event));
    events
}
