//! Reference engraving engine.
//!
//! Measures are packed greedily into systems (beats-weighted widths, extra
//! room for key/time changes and lyrics), systems are stacked onto pages, and
//! the leftover height of every page is spread between its systems as
//! stretch, capped per gap so sparse pages don't balloon.

use std::collections::HashMap;
use std::ops::Range;

use super::constants::*;
use super::{Element, ElementKind, Engraver, Page, PageFormat, Rect, System};
use crate::model::*;

/// Line-breaking engraver used by default.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemEngraver;

impl Engraver for SystemEngraver {
    fn engrave(&self, score: &Score, format: &PageFormat, spatium: f64) -> Vec<Page> {
        let sp = spatium.max(f64::EPSILON);
        let plan = MeasurePlan::new(score);
        let tracks: Vec<PartTrack> = score
            .parts
            .iter()
            .enumerate()
            .filter(|(_, p)| p.show)
            .map(|(idx, p)| PartTrack::new(idx, p, plan.len()))
            .collect();

        let mut built = Vec::new();
        if !tracks.is_empty() && plan.len() > 0 {
            let names = InstrumentNames::new(score, &tracks);
            let content_width = format.to_px(format.printable_width) / sp;
            for (sys_idx, (range, page_break)) in
                break_systems(score, &plan, &tracks, &names, content_width)
                    .into_iter()
                    .enumerate()
            {
                let system = build_system(
                    score,
                    &plan,
                    &tracks,
                    &names,
                    SystemFrame {
                        index: sys_idx,
                        measures: range,
                        content_width,
                        sp,
                    },
                );
                built.push((system, page_break));
            }
        }

        paginate(score, format, sp, built)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Per-measure state
// ═══════════════════════════════════════════════════════════════════════

/// Time signature and width of every measure (taken from the first part).
struct MeasurePlan {
    times: Vec<TimeSignature>,
    time_changed: Vec<bool>,
    /// Length in quarter notes used for horizontal spacing
    beats: Vec<f64>,
    new_system: Vec<bool>,
    new_page: Vec<bool>,
}

impl MeasurePlan {
    fn new(score: &Score) -> Self {
        let mut plan = Self {
            times: Vec::new(),
            time_changed: Vec::new(),
            beats: Vec::new(),
            new_system: Vec::new(),
            new_page: Vec::new(),
        };
        let Some(part) = score.parts.first() else {
            return plan;
        };
        let mut current: Option<TimeSignature> = None;
        for measure in &part.measures {
            let mut changed = false;
            if let Some(ts) = measure.attributes.as_ref().and_then(|a| a.time.as_ref()) {
                changed = current.as_ref().is_some_and(|c| c != ts);
                current = Some(ts.clone());
            }
            let ts = current
                .clone()
                .unwrap_or(TimeSignature { beats: 4, beat_type: 4 });
            let quarters = ts.beats as f64 * 4.0 / ts.beat_type.max(1) as f64;
            plan.beats.push(if measure.implicit {
                (quarters * 0.5).max(1.0)
            } else {
                quarters
            });
            plan.times.push(ts);
            plan.time_changed.push(changed);
            plan.new_system.push(measure.new_system);
            plan.new_page.push(measure.new_page);
        }
        plan
    }

    fn len(&self) -> usize {
        self.times.len()
    }
}

#[derive(Clone)]
struct TrackState {
    fifths: i32,
    key_changed: bool,
    /// Clef per staff (index 0 = staff 1)
    clefs: Vec<Clef>,
    divisions: i32,
}

/// One visible part with its running attributes per measure.
struct PartTrack {
    part_idx: usize,
    num_staves: usize,
    states: Vec<TrackState>,
}

impl PartTrack {
    fn new(part_idx: usize, part: &Part, measure_count: usize) -> Self {
        let num_staves = detect_staves(part);
        let treble = Clef {
            number: 1,
            sign: "G".into(),
            line: 2,
            octave_change: None,
        };
        let mut state = TrackState {
            fifths: 0,
            key_changed: false,
            clefs: vec![treble; num_staves],
            divisions: 1,
        };
        let mut states = Vec::with_capacity(measure_count);
        for (mi, measure) in part.measures.iter().take(measure_count).enumerate() {
            state.key_changed = false;
            if let Some(ref attrs) = measure.attributes {
                if let Some(ref key) = attrs.key {
                    state.key_changed = mi > 0 && key.fifths != state.fifths;
                    state.fifths = key.fifths;
                }
                for clef in &attrs.clefs {
                    let idx = (clef.number.max(1) - 1) as usize;
                    if idx < state.clefs.len() {
                        state.clefs[idx] = clef.clone();
                    }
                }
                if let Some(d) = attrs.divisions {
                    state.divisions = d.max(1);
                }
            }
            states.push(state.clone());
        }
        // Parts shorter than the first part keep their last state.
        while states.len() < measure_count {
            states.push(state.clone());
        }
        Self {
            part_idx,
            num_staves,
            states,
        }
    }
}

/// Detect the number of staves in a part.
fn detect_staves(part: &Part) -> usize {
    let mut max_staff = 1usize;
    for measure in &part.measures {
        if let Some(ref attrs) = measure.attributes {
            if let Some(s) = attrs.staves {
                max_staff = max_staff.max(s.max(1) as usize);
            }
            for clef in &attrs.clefs {
                max_staff = max_staff.max(clef.number.max(1) as usize);
            }
        }
        for note in &measure.notes {
            if let Some(s) = note.staff {
                max_staff = max_staff.max(s.max(1) as usize);
            }
        }
    }
    max_staff
}

fn key_sig_width(fifths: i32) -> f64 {
    fifths.unsigned_abs() as f64 * KEY_ACCIDENTAL_WIDTH
}

fn text_width(text: &str) -> f64 {
    text.chars().count() as f64 * CHAR_WIDTH
}

/// Names printed at the left of each system, and the indent they need.
struct InstrumentNames {
    shown: bool,
    first_indent: f64,
    later_indent: f64,
}

impl InstrumentNames {
    fn new(score: &Score, tracks: &[PartTrack]) -> Self {
        let style = &score.style;
        let shown = style.show_instrument_names
            && !(style.hide_instrument_name_if_one_instrument && tracks.len() == 1);
        if !shown {
            return Self {
                shown,
                first_indent: 0.0,
                later_indent: 0.0,
            };
        }
        let longest = |f: fn(&Part) -> Option<&str>| {
            tracks
                .iter()
                .filter_map(|t| f(&score.parts[t.part_idx]))
                .map(text_width)
                .fold(0.0f64, f64::max)
        };
        let first = longest(|p| Some(p.name.as_str()).filter(|n| !n.is_empty()));
        let later = longest(|p| p.abbreviation.as_deref());
        let indent = |w: f64| if w > 0.0 { w + INSTRUMENT_NAME_GAP } else { 0.0 };
        Self {
            shown,
            first_indent: indent(first),
            later_indent: indent(later),
        }
    }

    fn indent(&self, system_index: usize) -> f64 {
        if system_index == 0 {
            self.first_indent
        } else {
            self.later_indent
        }
    }

    fn label<'a>(&self, part: &'a Part, system_index: usize) -> Option<&'a str> {
        if !self.shown {
            return None;
        }
        let label = if system_index == 0 {
            Some(part.name.as_str())
        } else {
            part.abbreviation.as_deref()
        };
        label.filter(|l| !l.is_empty())
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Line breaking
// ═══════════════════════════════════════════════════════════════════════

fn prefix_width(plan: &MeasurePlan, tracks: &[PartTrack], mi: usize, first_system: bool) -> f64 {
    let key = tracks
        .iter()
        .map(|t| key_sig_width(t.states[mi].fifths))
        .fold(0.0f64, f64::max);
    let time = if first_system || plan.time_changed[mi] {
        TIME_SIG_WIDTH
    } else {
        0.0
    };
    CLEF_WIDTH + key + time + PREFIX_PADDING
}

/// Extra room at the start of a measure for mid-system key/time changes.
fn change_inset(plan: &MeasurePlan, tracks: &[PartTrack], mi: usize) -> f64 {
    let key = tracks
        .iter()
        .filter(|t| t.states[mi].key_changed)
        .map(|t| key_sig_width(t.states[mi].fifths).max(KEY_ACCIDENTAL_WIDTH))
        .fold(0.0f64, f64::max);
    let time = if plan.time_changed[mi] {
        TIME_SIG_WIDTH
    } else {
        0.0
    };
    key + time
}

/// Width needed to set the first verse of every part without collisions.
fn lyrics_width(score: &Score, tracks: &[PartTrack], mi: usize) -> f64 {
    tracks
        .iter()
        .filter_map(|t| score.parts[t.part_idx].measures.get(mi))
        .map(|m| {
            m.notes
                .iter()
                .filter_map(|n| n.lyrics.iter().find(|l| l.number <= 1))
                .map(|l| text_width(&l.text) + LYRICS_MIN_GAP)
                .sum::<f64>()
        })
        .fold(0.0f64, f64::max)
}

fn min_measure_width(score: &Score, plan: &MeasurePlan, tracks: &[PartTrack], mi: usize) -> f64 {
    let w = (plan.beats[mi] * PER_BEAT_MIN_WIDTH).max(MIN_MEASURE_WIDTH)
        + change_inset(plan, tracks, mi);
    w.max(lyrics_width(score, tracks, mi) + MEASURE_LEFT_INSET + MEASURE_RIGHT_INSET)
}

/// Group measures into systems. Returns each system's measure range and
/// whether it was forced onto a new page.
fn break_systems(
    score: &Score,
    plan: &MeasurePlan,
    tracks: &[PartTrack],
    names: &InstrumentNames,
    content_width: f64,
) -> Vec<(Range<usize>, bool)> {
    let mut systems = Vec::new();
    let mut start = 0usize;
    let mut width = 0.0;
    let mut page_break = false;
    let mut available =
        content_width - names.indent(0) - prefix_width(plan, tracks, 0, true);

    for mi in 0..plan.len() {
        let min_w = min_measure_width(score, plan, tracks, mi);
        let forced = mi > start && (plan.new_system[mi] || plan.new_page[mi]);
        if mi > start && (forced || width + min_w > available) {
            systems.push((start..mi, page_break));
            start = mi;
            width = 0.0;
            page_break = plan.new_page[mi];
            available = content_width
                - names.indent(systems.len())
                - prefix_width(plan, tracks, mi, false);
        }
        width += min_w;
    }
    if start < plan.len() {
        systems.push((start..plan.len(), page_break));
    }
    systems
}

// ═══════════════════════════════════════════════════════════════════════
// System construction
// ═══════════════════════════════════════════════════════════════════════

struct SystemFrame {
    index: usize,
    measures: Range<usize>,
    /// Available width in staff spaces
    content_width: f64,
    sp: f64,
}

/// Vertical placement of one part inside a system (in staff spaces).
struct PartRows {
    staff_tops: Vec<f64>,
    lyrics_top: f64,
}

fn build_system(
    score: &Score,
    plan: &MeasurePlan,
    tracks: &[PartTrack],
    names: &InstrumentNames,
    frame: SystemFrame,
) -> System {
    let sp = frame.sp;
    let first_mi = frame.measures.start;
    let show_time = frame.index == 0 || plan.time_changed[first_mi];
    let indent = names.indent(frame.index);
    let mut elements = Vec::new();

    // ── Vertical rows ──
    let mut rows = Vec::with_capacity(tracks.len());
    let mut y = 0.0;
    for (i, track) in tracks.iter().enumerate() {
        if i > 0 {
            y += PART_DISTANCE;
        }
        let mut staff_tops = Vec::with_capacity(track.num_staves);
        for s in 0..track.num_staves {
            if s > 0 {
                y += STAFF_DISTANCE;
            }
            staff_tops.push(y);
            y += STAFF_HEIGHT;
        }
        let verses = frame
            .measures
            .clone()
            .filter_map(|mi| score.parts[track.part_idx].measures.get(mi))
            .flat_map(|m| m.notes.iter())
            .flat_map(|n| n.lyrics.iter())
            .map(|l| l.number.max(1))
            .max()
            .unwrap_or(0);
        let lyrics_top = y + LYRICS_OFFSET - TEXT_HEIGHT;
        if verses > 0 {
            y += LYRICS_OFFSET + (verses - 1) as f64 * LYRICS_LINE_HEIGHT;
        }
        rows.push(PartRows {
            staff_tops,
            lyrics_top,
        });
    }
    let height = y;
    let x_end = frame.content_width;

    // ── Staves, bracket, names, system prefix ──
    let total_staves: usize = tracks.iter().map(|t| t.num_staves).sum();
    if total_staves > 1 {
        elements.push(Element::new(
            ElementKind::Bracket,
            px_rect(indent - BRACKET_WIDTH, 0.0, BRACKET_WIDTH, height_of_staves(&rows), sp),
        ));
    }
    let prefix = prefix_width(plan, tracks, first_mi, frame.index == 0);
    for (track, row) in tracks.iter().zip(&rows) {
        let part = &score.parts[track.part_idx];
        let state = &track.states[first_mi];

        if let Some(label) = names.label(part, frame.index) {
            let top = row.staff_tops[0];
            let bottom = row.staff_tops[row.staff_tops.len() - 1] + STAFF_HEIGHT;
            let mid = (top + bottom) / 2.0 - TEXT_HEIGHT / 2.0;
            elements.push(
                Element::new(
                    ElementKind::InstrumentName,
                    px_rect(0.0, mid, text_width(label), TEXT_HEIGHT, sp),
                )
                .with_text(label)
                .for_part(track.part_idx),
            );
        }

        for (s, &top) in row.staff_tops.iter().enumerate() {
            elements.push(
                Element::new(
                    ElementKind::StaffLines,
                    px_rect(indent, top, x_end - indent, STAFF_HEIGHT, sp),
                )
                .for_part(track.part_idx),
            );
            let clef = &state.clefs[s];
            elements.push(
                Element::new(
                    ElementKind::Clef,
                    px_rect(indent + 0.5, top - 1.0, CLEF_WIDTH - 0.5, STAFF_HEIGHT + 2.0, sp),
                )
                .with_text(clef.sign.clone())
                .for_part(track.part_idx),
            );
            let mut x = indent + CLEF_WIDTH;
            if state.fifths != 0 {
                elements.push(key_signature(x, top, state.fifths, track.part_idx, sp));
                x += key_sig_width(state.fifths);
            }
            if show_time {
                elements.push(time_signature(x, top, &plan.times[first_mi], track.part_idx, sp));
            }
        }
    }

    // ── Measures ──
    let x_start = indent + prefix;
    let weights: Vec<f64> = frame
        .measures
        .clone()
        .map(|mi| min_measure_width(score, plan, tracks, mi))
        .collect();
    let total_weight: f64 = weights.iter().sum();
    let scale = if total_weight > 0.0 {
        (x_end - x_start).max(0.0) / total_weight
    } else {
        1.0
    };

    let mut x = x_start;
    for (j, mi) in frame.measures.clone().enumerate() {
        let w = weights[j] * scale;
        let mid_system_change = j > 0;
        for (track, row) in tracks.iter().zip(&rows) {
            let state = &track.states[mi];
            let mut left = MEASURE_LEFT_INSET;
            if mid_system_change {
                for &top in &row.staff_tops {
                    let mut cx = x + 0.25;
                    if state.key_changed {
                        elements.push(key_signature(cx, top, state.fifths, track.part_idx, sp));
                        cx += key_sig_width(state.fifths).max(KEY_ACCIDENTAL_WIDTH);
                    }
                    if plan.time_changed[mi] {
                        elements.push(time_signature(cx, top, &plan.times[mi], track.part_idx, sp));
                    }
                }
                left += change_inset(plan, tracks, mi);
            }

            let top = row.staff_tops[0];
            let bottom = row.staff_tops[row.staff_tops.len() - 1] + STAFF_HEIGHT;
            elements.push(
                Element::new(
                    ElementKind::Barline,
                    px_rect(x + w - BARLINE_WIDTH, top, BARLINE_WIDTH, bottom - top, sp),
                )
                .for_part(track.part_idx),
            );

            if let Some(measure) = score.parts[track.part_idx].measures.get(mi) {
                let slot = MeasureSlot {
                    x: x + left,
                    width: (w - left - MEASURE_RIGHT_INSET).max(0.0),
                    quarters: plan.times[mi].beats as f64 * 4.0
                        / plan.times[mi].beat_type.max(1) as f64,
                };
                engrave_notes(
                    &mut elements,
                    score,
                    measure,
                    track,
                    state,
                    row,
                    &slot,
                    sp,
                );
            }
        }
        x += w;
    }

    System::new(frame.measures, height * sp, elements)
}

fn height_of_staves(rows: &[PartRows]) -> f64 {
    rows.last()
        .and_then(|r| r.staff_tops.last())
        .map_or(STAFF_HEIGHT, |top| top + STAFF_HEIGHT)
}

fn px_rect(x: f64, y: f64, w: f64, h: f64, sp: f64) -> Rect {
    Rect::new(x * sp, y * sp, w * sp, h * sp)
}

fn key_signature(x: f64, top: f64, fifths: i32, part_idx: usize, sp: f64) -> Element {
    let glyph = if fifths > 0 { "♯" } else { "♭" };
    Element::new(
        ElementKind::KeySignature,
        px_rect(x, top, key_sig_width(fifths).max(KEY_ACCIDENTAL_WIDTH), STAFF_HEIGHT, sp),
    )
    .with_text(glyph.repeat(fifths.unsigned_abs() as usize))
    .for_part(part_idx)
}

fn time_signature(x: f64, top: f64, ts: &TimeSignature, part_idx: usize, sp: f64) -> Element {
    Element::new(
        ElementKind::TimeSignature,
        px_rect(x, top, TIME_SIG_WIDTH, STAFF_HEIGHT, sp),
    )
    .with_text(format!("{}/{}", ts.beats, ts.beat_type))
    .for_part(part_idx)
}

/// Horizontal room for the notes of one measure (staff spaces).
struct MeasureSlot {
    x: f64,
    width: f64,
    quarters: f64,
}

/// Diatonic step sitting on the bottom staff line for a clef.
fn bottom_line_step(clef: &Clef) -> i32 {
    let (reference, default_line) = match clef.sign.as_str() {
        "F" => (3 * 7 + 3, 4), // F3
        "C" => (4 * 7, 3),     // C4
        _ => (4 * 7 + 4, 2),   // G4
    };
    let line = if clef.line > 0 { clef.line } else { default_line };
    reference - (line - 1) * 2 + clef.octave_change.unwrap_or(0) * 7
}

#[allow(clippy::too_many_arguments)]
fn engrave_notes(
    elements: &mut Vec<Element>,
    score: &Score,
    measure: &Measure,
    track: &PartTrack,
    state: &TrackState,
    row: &PartRows,
    slot: &MeasureSlot,
    sp: f64,
) {
    let total = (slot.quarters * state.divisions as f64).max(1.0);
    let mut cursors: HashMap<(i32, usize), f64> = HashMap::new();
    let mut last_x = slot.x;

    for note in &measure.notes {
        if !note.print_object && !score.style.show_invisible {
            continue;
        }
        let staff = (note.staff.unwrap_or(1).max(1) as usize - 1).min(track.num_staves - 1);
        let top = row.staff_tops[staff];
        let x = if note.chord {
            last_x
        } else {
            let cursor = cursors.entry((note.voice.unwrap_or(1), staff)).or_insert(0.0);
            let fraction = (*cursor / total).clamp(0.0, 0.999);
            *cursor += note.duration.max(0) as f64;
            slot.x + fraction * slot.width
        };
        last_x = x;

        let mut engraved = Vec::with_capacity(3);
        match note.pitch {
            Some(ref pitch) if !note.rest => {
                let steps = pitch.diatonic_step() - bottom_line_step(&state.clefs[staff]);
                let center = top + STAFF_HEIGHT - steps as f64 * 0.5;
                engraved.push(Element::new(
                    ElementKind::Note,
                    px_rect(x, center - NOTEHEAD_HEIGHT / 2.0, NOTEHEAD_WIDTH, NOTEHEAD_HEIGHT, sp),
                ));
                let stemless = matches!(note.note_type.as_deref(), Some("whole") | Some("breve"));
                if !stemless && !note.chord {
                    let stem = if center > top + STAFF_HEIGHT / 2.0 {
                        px_rect(
                            x + NOTEHEAD_WIDTH - STEM_WIDTH,
                            center - STEM_LENGTH,
                            STEM_WIDTH,
                            STEM_LENGTH,
                            sp,
                        )
                    } else {
                        px_rect(x, center, STEM_WIDTH, STEM_LENGTH, sp)
                    };
                    engraved.push(Element::new(ElementKind::Stem, stem));
                }
            }
            _ => engraved.push(Element::new(
                ElementKind::Rest,
                px_rect(x, top + 1.0, REST_WIDTH, REST_HEIGHT, sp),
            )),
        }

        for lyric in &note.lyrics {
            let w = text_width(&lyric.text);
            let y = row.lyrics_top + (lyric.number.max(1) - 1) as f64 * LYRICS_LINE_HEIGHT;
            engraved.push(
                Element::new(
                    ElementKind::Lyric,
                    px_rect(x + NOTEHEAD_WIDTH / 2.0 - w / 2.0, y, w, TEXT_HEIGHT, sp),
                )
                .with_text(lyric.text.clone()),
            );
        }

        for mut el in engraved {
            el.visible = note.print_object;
            elements.push(el.for_part(track.part_idx));
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Pagination
// ═══════════════════════════════════════════════════════════════════════

/// Vertical room for systems on one page (pixels).
struct PageArea {
    top: f64,
    bottom: f64,
}

fn page_area(score: &Score, format: &PageFormat, index: usize, sp: f64) -> PageArea {
    let style = &score.style;
    let margins = format.margins(index);
    let mut top = format.to_px(margins.top);
    if style.show_header && score.title.is_some() {
        top += HEADER_HEIGHT * sp;
    }
    if index == 0 && style.show_frames && (score.title.is_some() || score.composer.is_some()) {
        top += TITLE_FRAME_HEIGHT * sp;
    }
    let mut bottom = format.height_px() - format.to_px(margins.bottom);
    if (style.show_footer && score.composer.is_some()) || (style.show_page_number && index > 0) {
        bottom -= FOOTER_HEIGHT * sp;
    }
    PageArea { top, bottom }
}

fn paginate(
    score: &Score,
    format: &PageFormat,
    sp: f64,
    systems: Vec<(System, bool)>,
) -> Vec<Page> {
    let mut pages = Vec::new();
    let mut current: Vec<System> = Vec::new();
    let mut area = page_area(score, format, 0, sp);
    let mut y = area.top;

    for (mut system, page_break) in systems {
        if !current.is_empty()
            && (page_break || y + SYSTEM_DISTANCE * sp + system.height > area.bottom)
        {
            let index = pages.len();
            pages.push(finish_page(score, format, sp, index, std::mem::take(&mut current), &area));
            area = page_area(score, format, index + 1, sp);
            y = area.top;
        } else if !current.is_empty() {
            y += SYSTEM_DISTANCE * sp;
        }

        let left = format.to_px(format.margins(pages.len()).left);
        for el in &mut system.elements {
            el.bbox.x += left;
        }
        system.move_by(y);
        y += system.height;
        current.push(system);
    }

    let index = pages.len();
    pages.push(finish_page(score, format, sp, index, current, &area));
    pages
}

fn finish_page(
    score: &Score,
    format: &PageFormat,
    sp: f64,
    index: usize,
    mut systems: Vec<System>,
    area: &PageArea,
) -> Page {
    justify(&mut systems, area, sp);
    Page {
        index,
        bbox: Rect::new(0.0, 0.0, format.width_px(), format.height_px()),
        systems,
        elements: page_furniture(score, format, sp, index),
    }
}

/// Spread leftover height between systems as stretch after each of them.
fn justify(systems: &mut [System], area: &PageArea, sp: f64) {
    let gaps = systems.len().saturating_sub(1);
    let Some(last) = systems.last() else {
        return;
    };
    if gaps == 0 {
        return;
    }
    let leftover = area.bottom - last.bottom();
    let per_gap = (leftover / gaps as f64).min(MAX_STRETCH_PER_GAP * sp);
    if per_gap <= 0.0 {
        return;
    }
    for i in 0..gaps {
        systems[i].add_stretch = true;
        systems[i].set_stretch_distance(per_gap);
        for later in &mut systems[i + 1..] {
            later.move_by(per_gap);
        }
    }
}

fn page_furniture(score: &Score, format: &PageFormat, sp: f64, index: usize) -> Vec<Element> {
    let style = &score.style;
    let margins = format.margins(index);
    let left = format.to_px(margins.left);
    let width = format.to_px(format.printable_width);
    let mut top = format.to_px(margins.top);
    let footer_y = format.height_px() - format.to_px(margins.bottom) - TEXT_HEIGHT * sp;
    let mut elements = Vec::new();

    if style.show_header {
        if let Some(ref title) = score.title {
            elements.push(
                Element::new(
                    ElementKind::Header,
                    Rect::new(left, top, text_width(title) * sp, TEXT_HEIGHT * sp),
                )
                .with_text(title.clone()),
            );
            top += HEADER_HEIGHT * sp;
        }
    }

    if index == 0 && style.show_frames && (score.title.is_some() || score.composer.is_some()) {
        if style.show_unprintable {
            elements.push(Element::new(
                ElementKind::Frame,
                Rect::new(left, top, width, TITLE_FRAME_HEIGHT * sp),
            ));
        }
        if let Some(ref title) = score.title {
            let w = text_width(title) * sp * 1.5;
            elements.push(
                Element::new(
                    ElementKind::Title,
                    Rect::new(left + (width - w) / 2.0, top + sp, w, TEXT_HEIGHT * 1.5 * sp),
                )
                .with_text(title.clone()),
            );
        }
        if let Some(ref composer) = score.composer {
            let w = text_width(composer) * sp;
            elements.push(
                Element::new(
                    ElementKind::Composer,
                    Rect::new(
                        left + width - w,
                        top + (TITLE_FRAME_HEIGHT - TEXT_HEIGHT - 1.0) * sp,
                        w,
                        TEXT_HEIGHT * sp,
                    ),
                )
                .with_text(composer.clone()),
            );
        }
    }

    if style.show_footer {
        if let Some(ref composer) = score.composer {
            elements.push(
                Element::new(
                    ElementKind::Footer,
                    Rect::new(left, footer_y, text_width(composer) * sp, TEXT_HEIGHT * sp),
                )
                .with_text(composer.clone()),
            );
        }
    }

    if style.show_page_number && index > 0 {
        let number = (index + 1).to_string();
        let w = text_width(&number) * sp;
        // Numbers sit on the outer side of the page.
        let x = if index % 2 == 0 { left + width - w } else { left };
        elements.push(
            Element::new(ElementKind::PageNumber, Rect::new(x, footer_y, w, TEXT_HEIGHT * sp))
                .with_text(number),
        );
    }

    elements
}
