//! Engraving constants, in staff spaces (multiples of the spatium).

// ── Staff dimensions ────────────────────────────────────────────────
pub(super) const STAFF_HEIGHT: f64 = 4.0; // 5 lines, 4 spaces
pub(super) const STAFF_DISTANCE: f64 = 6.5; // between staves of one part (grand staff)
pub(super) const PART_DISTANCE: f64 = 7.0; // between different instruments
pub(super) const SYSTEM_DISTANCE: f64 = 8.5; // minimum gap between systems
pub(super) const MAX_STRETCH_PER_GAP: f64 = 10.0; // vertical justification cap
pub(super) const BARLINE_WIDTH: f64 = 0.16;
pub(super) const BRACKET_WIDTH: f64 = 0.5;

// ── Prefix widths ───────────────────────────────────────────────────
pub(super) const CLEF_WIDTH: f64 = 3.5;
pub(super) const KEY_ACCIDENTAL_WIDTH: f64 = 1.0;
pub(super) const TIME_SIG_WIDTH: f64 = 2.5;
pub(super) const PREFIX_PADDING: f64 = 1.0;

// ── Measure packing ─────────────────────────────────────────────────
pub(super) const PER_BEAT_MIN_WIDTH: f64 = 5.0;
pub(super) const MIN_MEASURE_WIDTH: f64 = 4.0;
pub(super) const MEASURE_LEFT_INSET: f64 = 1.5;
pub(super) const MEASURE_RIGHT_INSET: f64 = 1.5;

// ── Notes ───────────────────────────────────────────────────────────
pub(super) const NOTEHEAD_WIDTH: f64 = 1.2;
pub(super) const NOTEHEAD_HEIGHT: f64 = 1.0;
pub(super) const STEM_LENGTH: f64 = 3.5;
pub(super) const STEM_WIDTH: f64 = 0.12;
pub(super) const REST_WIDTH: f64 = 1.0;
pub(super) const REST_HEIGHT: f64 = 2.0;

// ── Text ────────────────────────────────────────────────────────────
pub(super) const CHAR_WIDTH: f64 = 0.9;
pub(super) const TEXT_HEIGHT: f64 = 1.8;
pub(super) const LYRICS_OFFSET: f64 = 3.0; // below the bottom staff line
pub(super) const LYRICS_LINE_HEIGHT: f64 = 2.5;
pub(super) const LYRICS_MIN_GAP: f64 = 1.0;
pub(super) const INSTRUMENT_NAME_GAP: f64 = 1.5;

// ── Page furniture ──────────────────────────────────────────────────
pub(super) const HEADER_HEIGHT: f64 = 3.0;
pub(super) const FOOTER_HEIGHT: f64 = 3.0;
pub(super) const TITLE_FRAME_HEIGHT: f64 = 10.0;
