//! Working-view filters: lyric suppression and concert-pitch transposition.
//!
//! Both mutate a freshly cloned view only. Transposition is relative to the
//! untransposed clone; running it twice on the same view would stack.

use std::ops::Range;

use crate::model::{Part, Score, Transpose};

/// Remove every lyric syllable, walking chords and rests in document order.
/// Returns the number of syllables removed.
pub fn strip_lyrics(score: &mut Score) -> usize {
    let mut removed = 0;
    for part in &mut score.parts {
        for note in part.measures.iter_mut().flat_map(|m| m.notes.iter_mut()) {
            removed += note.lyrics.len();
            note.lyrics.clear();
        }
    }
    if removed > 0 {
        log::debug!("stripped {removed} lyric syllables");
    }
    removed
}

/// Bring a view saved with `native` concert pitch to the `requested` state.
///
/// Every transposing part has its key signatures (and written pitches)
/// moved across the whole score. Returns true if anything was transposed.
pub fn apply_concert_pitch(score: &mut Score, native: bool, requested: bool) -> bool {
    if native == requested {
        return false;
    }
    let range = 0..score.last_tick();
    let mut changed = false;
    for part in &mut score.parts {
        let Some(interval) = part.transpose.filter(|t| !t.is_zero()) else {
            continue;
        };
        // The stored interval goes written → sounding; going back flips it.
        let interval = if requested { interval } else { interval.flipped() };
        transpose_part(part, &interval, range.clone());
        changed = true;
        log::debug!(
            "transposed '{}' by {} semitones for {} pitch",
            part.name,
            interval.chromatic,
            if requested { "concert" } else { "written" }
        );
    }
    changed
}

/// Transpose the keys and notes of every measure of `part` starting inside `range`.
fn transpose_part(part: &mut Part, interval: &Transpose, range: Range<u32>) {
    let ticks = part.measure_ticks();
    for (mi, measure) in part.measures.iter_mut().enumerate() {
        let tick = ticks.get(mi).copied().unwrap_or(u32::MAX);
        if !range.contains(&tick) {
            continue;
        }
        if let Some(key) = measure.attributes.as_mut().and_then(|a| a.key.as_mut()) {
            *key = key.transposed(interval);
        }
        for note in &mut measure.notes {
            if let Some(pitch) = note.pitch.as_mut() {
                *pitch = pitch.transposed(interval);
            }
        }
    }
}
