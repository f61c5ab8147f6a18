//! MusicXML parser: converts score-partwise XML into the Score data model.

use roxmltree::{Document, Node};

use crate::error::LoadError;
use crate::model::*;

/// Parse a MusicXML XML string into a Score.
pub fn parse_musicxml(xml: &str) -> Result<Score, LoadError> {
    // MusicXML files include a DOCTYPE declaration, so we must allow DTDs
    let options = roxmltree::ParsingOptions {
        allow_dtd: true,
        ..Default::default()
    };
    let doc =
        Document::parse_with_options(xml, options).map_err(|e| LoadError::Xml(e.to_string()))?;
    let root = doc.root_element();

    if root.tag_name().name() != "score-partwise" {
        return Err(LoadError::UnsupportedRoot(root.tag_name().name().to_string()));
    }

    let mut score = Score::new();
    for child in root.children().filter(|n| n.is_element()) {
        match child.tag_name().name() {
            "work" => parse_work(&child, &mut score),
            "identification" => parse_identification(&child, &mut score),
            "credit" => parse_credit(&child, &mut score),
            "part-list" => parse_part_list(&child, &mut score),
            "part" => parse_part(&child, &mut score),
            _ => {}
        }
    }

    Ok(score)
}

// ─── Header ──────────────────────────────────────────────────────────

fn parse_work(node: &Node, score: &mut Score) {
    for child in node.children().filter(|n| n.is_element()) {
        // <credit type="title"> takes priority over <work-title>.
        if child.tag_name().name() == "work-title" && score.title.is_none() {
            score.title = text_of(&child);
        }
    }
}

fn parse_identification(node: &Node, score: &mut Score) {
    for child in node.children().filter(|n| n.is_element()) {
        if child.tag_name().name() == "creator"
            && child.attribute("type") == Some("composer")
            && score.composer.is_none()
        {
            score.composer = text_of(&child);
        }
    }
}

fn parse_credit(node: &Node, score: &mut Score) {
    let mut credit_type = String::new();
    let mut words = Vec::new();
    for child in node.children().filter(|n| n.is_element()) {
        match child.tag_name().name() {
            "credit-type" => credit_type = child.text().unwrap_or("").trim().to_string(),
            "credit-words" => {
                if let Some(text) = text_of(&child) {
                    words.push(text);
                }
            }
            _ => {}
        }
    }
    if words.is_empty() {
        return;
    }
    let text = words.join("\n");
    match credit_type.as_str() {
        "title" => score.title = Some(text),
        "subtitle" => score.subtitle = Some(text),
        "composer" => score.composer = Some(text),
        _ => {}
    }
}

// ─── Part list ───────────────────────────────────────────────────────

fn parse_part_list(node: &Node, score: &mut Score) {
    for child in node.children().filter(|n| n.is_element()) {
        if child.tag_name().name() != "score-part" {
            continue;
        }
        let mut part = Part {
            id: child.attribute("id").unwrap_or("").to_string(),
            name: String::new(),
            abbreviation: None,
            show: true,
            transpose: None,
            measures: Vec::new(),
        };
        for sp_child in child.children().filter(|n| n.is_element()) {
            match sp_child.tag_name().name() {
                "part-name" => part.name = text_of(&sp_child).unwrap_or_default(),
                "part-abbreviation" => part.abbreviation = text_of(&sp_child),
                _ => {}
            }
        }
        score.parts.push(part);
    }
}

// ─── Part (measures) ─────────────────────────────────────────────────

fn parse_part(node: &Node, score: &mut Score) {
    let part_id = node.attribute("id").unwrap_or("");
    let Some(part) = score.parts.iter_mut().find(|p| p.id == part_id) else {
        return;
    };

    for child in node.children().filter(|n| n.is_element()) {
        if child.tag_name().name() != "measure" {
            continue;
        }
        let (measure, transpose) = parse_measure(&child);
        // The first <transpose> seen describes the instrument.
        if part.transpose.is_none() {
            part.transpose = transpose;
        }
        part.measures.push(measure);
    }
}

fn parse_measure(node: &Node) -> (Measure, Option<Transpose>) {
    let mut measure = Measure {
        number: node
            .attribute("number")
            .and_then(|n| n.parse().ok())
            .unwrap_or(0),
        implicit: node.attribute("implicit") == Some("yes"),
        attributes: None,
        notes: Vec::new(),
        new_system: false,
        new_page: false,
    };
    let mut transpose = None;

    for child in node.children().filter(|n| n.is_element()) {
        match child.tag_name().name() {
            "attributes" => {
                let (attrs, t) = parse_attributes(&child);
                measure.attributes = Some(attrs);
                transpose = transpose.or(t);
            }
            "note" => measure.notes.push(parse_note(&child)),
            "print" => {
                measure.new_system |= child.attribute("new-system") == Some("yes");
                measure.new_page |= child.attribute("new-page") == Some("yes");
            }
            _ => {}
        }
    }

    (measure, transpose)
}

fn parse_attributes(node: &Node) -> (Attributes, Option<Transpose>) {
    let mut attrs = Attributes::default();
    let mut transpose = None;

    for child in node.children().filter(|n| n.is_element()) {
        match child.tag_name().name() {
            "divisions" => attrs.divisions = parse_i32(&child),
            "key" => attrs.key = Some(parse_key(&child)),
            "time" => attrs.time = Some(parse_time(&child)),
            "staves" => attrs.staves = parse_i32(&child),
            "clef" => attrs.clefs.push(parse_clef(&child)),
            "transpose" => transpose = Some(parse_transpose(&child)),
            _ => {}
        }
    }

    (attrs, transpose)
}

fn parse_key(node: &Node) -> Key {
    let mut key = Key { fifths: 0, mode: None };
    for child in node.children().filter(|n| n.is_element()) {
        match child.tag_name().name() {
            "fifths" => key.fifths = parse_i32(&child).unwrap_or(0),
            "mode" => key.mode = text_of(&child),
            _ => {}
        }
    }
    key
}

fn parse_time(node: &Node) -> TimeSignature {
    let mut ts = TimeSignature { beats: 4, beat_type: 4 };
    for child in node.children().filter(|n| n.is_element()) {
        match child.tag_name().name() {
            // Compound numerators such as "3+2" are summed.
            "beats" => {
                ts.beats = child
                    .text()
                    .unwrap_or("4")
                    .split('+')
                    .filter_map(|b| b.trim().parse::<i32>().ok())
                    .sum::<i32>()
                    .max(1)
            }
            "beat-type" => ts.beat_type = parse_i32(&child).unwrap_or(4),
            _ => {}
        }
    }
    ts
}

fn parse_clef(node: &Node) -> Clef {
    let mut clef = Clef {
        number: node
            .attribute("number")
            .and_then(|n| n.parse().ok())
            .unwrap_or(1),
        sign: "G".to_string(),
        line: 2,
        octave_change: None,
    };
    for child in node.children().filter(|n| n.is_element()) {
        match child.tag_name().name() {
            "sign" => clef.sign = text_of(&child).unwrap_or_else(|| "G".to_string()),
            "line" => clef.line = parse_i32(&child).unwrap_or(2),
            "clef-octave-change" => clef.octave_change = parse_i32(&child),
            _ => {}
        }
    }
    clef
}

fn parse_transpose(node: &Node) -> Transpose {
    let mut t = Transpose {
        diatonic: 0,
        chromatic: 0,
        octave_change: None,
    };
    for child in node.children().filter(|n| n.is_element()) {
        match child.tag_name().name() {
            "diatonic" => t.diatonic = parse_i32(&child).unwrap_or(0),
            "chromatic" => t.chromatic = parse_i32(&child).unwrap_or(0),
            "octave-change" => t.octave_change = parse_i32(&child),
            _ => {}
        }
    }
    t
}

// ─── Note ────────────────────────────────────────────────────────────

fn parse_note(node: &Node) -> Note {
    let mut note = Note {
        pitch: None,
        duration: 0,
        voice: None,
        note_type: None,
        rest: false,
        chord: false,
        dot: false,
        staff: None,
        print_object: node.attribute("print-object") != Some("no"),
        lyrics: Vec::new(),
    };

    for child in node.children().filter(|n| n.is_element()) {
        match child.tag_name().name() {
            "pitch" => note.pitch = Some(parse_pitch(&child)),
            "duration" => note.duration = parse_i32(&child).unwrap_or(0),
            "voice" => note.voice = parse_i32(&child),
            "staff" => note.staff = parse_i32(&child),
            "type" => note.note_type = text_of(&child),
            "rest" => note.rest = true,
            "chord" => note.chord = true,
            "dot" => note.dot = true,
            "lyric" => {
                if let Some(lyric) = parse_lyric(&child) {
                    note.lyrics.push(lyric);
                }
            }
            _ => {}
        }
    }

    note
}

fn parse_pitch(node: &Node) -> Pitch {
    let mut pitch = Pitch {
        step: "C".to_string(),
        octave: 4,
        alter: None,
    };
    for child in node.children().filter(|n| n.is_element()) {
        match child.tag_name().name() {
            "step" => pitch.step = text_of(&child).unwrap_or_else(|| "C".to_string()),
            "octave" => pitch.octave = parse_i32(&child).unwrap_or(4),
            "alter" => pitch.alter = parse_f64(&child),
            _ => {}
        }
    }
    pitch
}

fn parse_lyric(node: &Node) -> Option<Lyric> {
    let number = node
        .attribute("number")
        .and_then(|n| n.parse().ok())
        .unwrap_or(1);
    let mut text = String::new();
    let mut syllabic = None;
    for child in node.children().filter(|n| n.is_element()) {
        match child.tag_name().name() {
            "text" => text = text_of(&child).unwrap_or_default(),
            "syllabic" => syllabic = text_of(&child),
            _ => {}
        }
    }
    (!text.is_empty()).then_some(Lyric {
        number,
        text,
        syllabic,
    })
}

// ─── Helpers ─────────────────────────────────────────────────────────

fn text_of(node: &Node) -> Option<String> {
    node.text()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

fn parse_i32(node: &Node) -> Option<i32> {
    node.text()?.trim().parse().ok()
}

fn parse_f64(node: &Node) -> Option<f64> {
    node.text()?.trim().parse().ok()
}
