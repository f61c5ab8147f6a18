//! Data model for a loaded score and the sub-scores derived from it.
//!
//! A [`Document`] is what the loader hands over: the full [`Score`] plus any
//! pre-built [`Excerpt`]s. Everything the pager lays out is a deep clone of
//! one of those scores, so nothing in here is ever mutated after loading.

use serde::{Deserialize, Serialize};

/// Tick resolution used for measure positions (ticks per quarter note).
pub const TICKS_PER_QUARTER: u32 = 480;

/// The originally loaded document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// File stem the document was loaded from (used when the score has no title)
    pub name: String,
    /// The full score
    pub score: Score,
    /// Pre-built named sub-scores
    pub excerpts: Vec<Excerpt>,
}

/// A musical score: metadata, display style and instrument parts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Score {
    /// Title of the piece
    pub title: Option<String>,
    /// Subtitle
    pub subtitle: Option<String>,
    /// Composer name
    pub composer: Option<String>,
    /// Display style
    #[serde(default)]
    pub style: Style,
    /// Musical parts (instruments)
    pub parts: Vec<Part>,
}

/// Display style flags consulted by the engraving engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Style {
    pub show_header: bool,
    pub show_footer: bool,
    pub show_page_number: bool,
    /// Hide instrument names when only one instrument is visible
    pub hide_instrument_name_if_one_instrument: bool,
    /// Display pitches without instrument transposition
    pub concert_pitch: bool,
    pub show_instrument_names: bool,
    /// Title frames above the first system
    pub show_frames: bool,
    pub show_unprintable: bool,
    pub show_invisible: bool,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            show_header: true,
            show_footer: true,
            show_page_number: true,
            hide_instrument_name_if_one_instrument: false,
            concert_pitch: false,
            show_instrument_names: true,
            show_frames: true,
            show_unprintable: true,
            show_invisible: true,
        }
    }
}

/// A named sub-score bundling one or more instruments of the full score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Excerpt {
    /// Title shown for this excerpt (e.g. "Clarinet in B♭")
    pub title: String,
    /// Indices of the source parts in the full score
    pub parts: Vec<usize>,
    /// Embedded sub-score
    pub score: Score,
}

/// A musical part (one instrument).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part {
    /// Part identifier (e.g., "P1")
    pub id: String,
    /// Part name (e.g., "Clarinet in B♭")
    pub name: String,
    /// Abbreviated name (e.g., "Cl.")
    pub abbreviation: Option<String>,
    /// Whether the instrument is engraved at all
    #[serde(default = "default_true")]
    pub show: bool,
    /// Written → sounding interval for transposing instruments
    pub transpose: Option<Transpose>,
    /// Ordered list of measures
    pub measures: Vec<Measure>,
}

/// Transposition interval (MusicXML convention: written pitch → sounding pitch).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transpose {
    /// Diatonic steps
    pub diatonic: i32,
    /// Semitones
    pub chromatic: i32,
    pub octave_change: Option<i32>,
}

/// A single measure (bar) of music.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Measure {
    /// Measure number
    pub number: i32,
    /// Whether this is an implicit measure (e.g., pickup/anacrusis)
    pub implicit: bool,
    /// Attributes (key, time, clef), only present when they change
    pub attributes: Option<Attributes>,
    /// Notes and rests in this measure
    pub notes: Vec<Note>,
    /// Whether this measure starts a new system (line break)
    pub new_system: bool,
    /// Whether this measure starts a new page
    pub new_page: bool,
}

/// Musical attributes that may change at the start of a measure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Attributes {
    /// Divisions per quarter note
    pub divisions: Option<i32>,
    pub key: Option<Key>,
    pub time: Option<TimeSignature>,
    /// Clef(s), one per staff, tagged with a 1-based staff `number`
    pub clefs: Vec<Clef>,
    /// Number of staves in this part (e.g. 2 for piano grand staff)
    pub staves: Option<i32>,
}

/// Key signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Key {
    /// Number of sharps (positive) or flats (negative)
    pub fifths: i32,
    pub mode: Option<String>,
}

/// Time signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSignature {
    pub beats: i32,
    pub beat_type: i32,
}

/// Clef definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clef {
    /// Staff number this clef belongs to (1-based)
    pub number: i32,
    /// Clef sign: "G", "F" or "C"
    pub sign: String,
    /// Staff line the clef sits on (1 = bottom line)
    pub line: i32,
    pub octave_change: Option<i32>,
}

/// A single note or rest (a chord is a run of notes with `chord` set).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    /// Pitch (None if this is a rest)
    pub pitch: Option<Pitch>,
    /// Duration in divisions
    pub duration: i32,
    pub voice: Option<i32>,
    /// Note type: "whole", "half", "quarter", "eighth", ...
    pub note_type: Option<String>,
    pub rest: bool,
    /// Whether this note is part of a chord with the previous note
    pub chord: bool,
    pub dot: bool,
    /// Staff number (1-based; for multi-staff parts like piano)
    pub staff: Option<i32>,
    /// False for notes marked `print-object="no"`
    #[serde(default = "default_true")]
    pub print_object: bool,
    /// Lyric syllables attached to this note
    pub lyrics: Vec<Lyric>,
}

/// Pitch of a note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pitch {
    /// Note name: A, B, C, D, E, F, G
    pub step: String,
    /// Octave number (middle C = C4)
    pub octave: i32,
    /// Chromatic alteration: -1.0 = flat, 1.0 = sharp
    pub alter: Option<f64>,
}

/// A lyric syllable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lyric {
    /// Verse number (1-based)
    pub number: i32,
    pub text: String,
    /// "single", "begin", "middle" or "end"
    pub syllabic: Option<String>,
}

fn default_true() -> bool {
    true
}

const STEPS: [&str; 7] = ["C", "D", "E", "F", "G", "A", "B"];
const STEP_SEMITONES: [i32; 7] = [0, 2, 4, 5, 7, 9, 11];

impl Document {
    /// Wrap a score loaded from `name` with no excerpts.
    pub fn new(name: impl Into<String>, score: Score) -> Self {
        Self {
            name: name.into(),
            score,
            excerpts: Vec::new(),
        }
    }

    /// Score title, falling back to the file name.
    pub fn title(&self) -> &str {
        match self.score.title.as_deref() {
            Some(t) if !t.is_empty() => t,
            _ => &self.name,
        }
    }

    /// Whether the document was saved in concert pitch.
    pub fn native_concert_pitch(&self) -> bool {
        self.score.style.concert_pitch
    }
}

impl Score {
    /// Create a new empty score.
    pub fn new() -> Self {
        Self {
            title: None,
            subtitle: None,
            composer: None,
            style: Style::default(),
            parts: Vec::new(),
        }
    }

    /// Number of measures (taken from the first part).
    pub fn measure_count(&self) -> usize {
        self.parts.first().map_or(0, |p| p.measures.len())
    }

    /// Start tick of every measure of the first part.
    pub fn measure_ticks(&self) -> Vec<u32> {
        self.parts.first().map(Part::measure_ticks).unwrap_or_default()
    }

    /// Tick at the end of the longest part.
    pub fn last_tick(&self) -> u32 {
        self.parts.iter().map(Part::end_tick).max().unwrap_or(0)
    }
}

impl Default for Score {
    fn default() -> Self {
        Self::new()
    }
}

fn measure_length_ticks(measure: &Measure, divisions: i32, time: &TimeSignature) -> u32 {
    let nominal = (time.beats.max(1) as u32 * 4 * TICKS_PER_QUARTER) / time.beat_type.max(1) as u32;
    if !measure.implicit {
        return nominal;
    }
    // Pickup bars only last as long as the notes of the first voice.
    let actual: i32 = measure
        .notes
        .iter()
        .filter(|n| !n.chord && n.voice.unwrap_or(1) == 1 && n.staff.unwrap_or(1) == 1)
        .map(|n| n.duration)
        .sum();
    if actual <= 0 {
        return nominal;
    }
    actual as u32 * TICKS_PER_QUARTER / divisions as u32
}

impl Part {
    /// Start tick of every measure, followed by the tick the part ends on.
    fn tick_bounds(&self) -> Vec<u32> {
        let mut ticks = Vec::with_capacity(self.measures.len() + 1);
        let mut tick = 0u32;
        let mut divisions = 1;
        let mut time = TimeSignature { beats: 4, beat_type: 4 };
        for measure in &self.measures {
            if let Some(ref attrs) = measure.attributes {
                if let Some(d) = attrs.divisions {
                    divisions = d.max(1);
                }
                if let Some(ref t) = attrs.time {
                    time = t.clone();
                }
            }
            ticks.push(tick);
            tick += measure_length_ticks(measure, divisions, &time);
        }
        ticks.push(tick);
        ticks
    }

    /// Start tick of every measure of this part.
    pub fn measure_ticks(&self) -> Vec<u32> {
        let mut ticks = self.tick_bounds();
        ticks.pop();
        ticks
    }

    pub fn end_tick(&self) -> u32 {
        self.tick_bounds().last().copied().unwrap_or(0)
    }

    /// Name to show for this part when it is selected on its own.
    pub fn display_name(&self) -> &str {
        if !self.name.is_empty() {
            &self.name
        } else if let Some(abbr) = self.abbreviation.as_deref().filter(|a| !a.is_empty()) {
            abbr
        } else {
            &self.id
        }
    }

    /// Whether any note in the part carries a lyric.
    pub fn has_lyrics(&self) -> bool {
        self.measures
            .iter()
            .any(|m| m.notes.iter().any(|n| !n.lyrics.is_empty()))
    }
}

impl Transpose {
    pub fn is_zero(&self) -> bool {
        self.diatonic == 0 && self.chromatic == 0
    }

    /// The same interval in the opposite direction.
    pub fn flipped(&self) -> Self {
        Self {
            diatonic: -self.diatonic,
            chromatic: -self.chromatic,
            octave_change: self.octave_change.map(|o| -o),
        }
    }

    /// Number of steps around the circle of fifths this interval moves a key.
    pub fn key_fifths_shift(&self) -> i32 {
        7 * self.chromatic - 12 * self.diatonic
    }

    /// Full interval in diatonic steps and semitones, octave change included.
    fn total(&self) -> (i32, i32) {
        let octaves = self.octave_change.unwrap_or(0);
        (self.diatonic + 7 * octaves, self.chromatic + 12 * octaves)
    }
}

impl Key {
    /// Key signature moved by `interval`, kept within seven sharps or flats.
    pub fn transposed(&self, interval: &Transpose) -> Self {
        let mut fifths = self.fifths + interval.key_fifths_shift();
        while fifths > 7 {
            fifths -= 12;
        }
        while fifths < -7 {
            fifths += 12;
        }
        Self {
            fifths,
            mode: self.mode.clone(),
        }
    }
}

impl Pitch {
    /// Convert pitch to MIDI note number.
    /// Middle C (C4) = 60.
    pub fn to_midi(&self) -> i32 {
        let alter = self.alter.unwrap_or(0.0).round() as i32;
        (self.octave + 1) * 12 + STEP_SEMITONES[self.step_index()] + alter
    }

    /// Index of the step name within C D E F G A B.
    pub fn step_index(&self) -> usize {
        STEPS.iter().position(|s| *s == self.step).unwrap_or(0)
    }

    /// Position on the diatonic scale, counting from C0.
    pub fn diatonic_step(&self) -> i32 {
        self.octave * 7 + self.step_index() as i32
    }

    /// Respell the pitch `interval` away, keeping the interval's letter distance.
    pub fn transposed(&self, interval: &Transpose) -> Self {
        let (diatonic, chromatic) = interval.total();
        let target_step = self.diatonic_step() + diatonic;
        let octave = target_step.div_euclid(7);
        let step_index = target_step.rem_euclid(7) as usize;
        let natural = (octave + 1) * 12 + STEP_SEMITONES[step_index];
        let alter = self.to_midi() + chromatic - natural;
        Self {
            step: STEPS[step_index].to_string(),
            octave,
            alter: if alter == 0 { None } else { Some(alter as f64) },
        }
    }
}

impl Excerpt {
    /// Build an excerpt holding a copy of the given parts of `score`.
    ///
    /// Out-of-range indices are skipped.
    pub fn from_parts(score: &Score, title: impl Into<String>, parts: &[usize]) -> Self {
        let title = title.into();
        let mut sub = Score {
            title: score.title.clone(),
            subtitle: Some(title.clone()),
            composer: score.composer.clone(),
            style: score.style.clone(),
            parts: Vec::new(),
        };
        let mut kept = Vec::new();
        for &idx in parts {
            if let Some(part) = score.parts.get(idx) {
                sub.parts.push(part.clone());
                kept.push(idx);
            }
        }
        Self {
            title,
            parts: kept,
            score: sub,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pitch(step: &str, octave: i32, alter: Option<f64>) -> Pitch {
        Pitch {
            step: step.into(),
            octave,
            alter,
        }
    }

    const B_FLAT_CLARINET: Transpose = Transpose {
        diatonic: -1,
        chromatic: -2,
        octave_change: None,
    };

    #[test]
    fn key_moves_by_interval() {
        let written = Key { fifths: 2, mode: None };
        assert_eq!(written.transposed(&B_FLAT_CLARINET).fifths, 0);
        assert_eq!(
            Key { fifths: 0, mode: None }
                .transposed(&B_FLAT_CLARINET.flipped())
                .fifths,
            2
        );
    }

    #[test]
    fn key_stays_within_seven_accidentals() {
        let far = Key { fifths: -6, mode: None };
        let horn = Transpose {
            diatonic: -4,
            chromatic: -7,
            octave_change: None,
        };
        let k = far.transposed(&horn);
        assert!((-7..=7).contains(&k.fifths));
        assert_eq!(k.fifths, -7);
    }

    #[test]
    fn pitch_respelled_down_a_major_second() {
        let d = pitch("D", 5, None).transposed(&B_FLAT_CLARINET);
        assert_eq!(d, pitch("C", 5, None));
        let e = pitch("E", 4, None).transposed(&B_FLAT_CLARINET);
        assert_eq!(e, pitch("D", 4, None));
        let c = pitch("C", 4, None).transposed(&B_FLAT_CLARINET);
        assert_eq!(c, pitch("B", 3, Some(-1.0)));
    }

    #[test]
    fn pitch_transposition_honours_octave_change() {
        let tenor_sax = Transpose {
            diatonic: -1,
            chromatic: -2,
            octave_change: Some(-1),
        };
        let p = pitch("D", 5, None).transposed(&tenor_sax);
        assert_eq!(p.to_midi(), pitch("D", 5, None).to_midi() - 14);
    }

    #[test]
    fn measure_ticks_follow_time_signature() {
        let mut part = Part {
            id: "P1".into(),
            name: "Flute".into(),
            abbreviation: None,
            show: true,
            transpose: None,
            measures: Vec::new(),
        };
        for number in 1..=3 {
            part.measures.push(Measure {
                number,
                implicit: false,
                attributes: (number == 1).then(|| Attributes {
                    divisions: Some(2),
                    time: Some(TimeSignature { beats: 3, beat_type: 4 }),
                    ..Attributes::default()
                }),
                notes: Vec::new(),
                new_system: false,
                new_page: false,
            });
        }
        let score = Score {
            parts: vec![part],
            ..Score::new()
        };
        assert_eq!(score.measure_ticks(), vec![0, 1440, 2880]);
        assert_eq!(score.last_tick(), 4320);

        // The end tick comes from the longest part, not the first one.
        let mut score = score;
        let empty = Part {
            measures: Vec::new(),
            ..score.parts[0].clone()
        };
        score.parts.insert(0, empty);
        assert!(score.measure_ticks().is_empty());
        assert_eq!(score.last_tick(), 4320);
    }
}
