//! Biased random-walk melody generation.
//!
//! A melody starts on the tonic and wanders the scale by small steps.
//! Past 70% of the requested length, each step has an even chance of
//! being replaced by a single step toward the tonic, so phrases tend to
//! settle near home.

use tracing::debug;

use crate::key::{key_notes, Key};
use crate::pitch::{PitchClass, PitchWithOctave};
use crate::random::RandomSource;

/// Step choices, drawn uniformly. Single steps appear twice, so they are
/// twice as likely as skips or repeats.
pub const INTERVALS: [i32; 7] = [1, 1, -1, -1, 2, -2, 0];

/// Fraction of the melody after which resolution toward the tonic kicks in.
pub const RESOLUTION_START: f64 = 0.7;

/// Probability threshold for the resolution override (a draw above this wins).
pub const RESOLUTION_CHANCE: f64 = 0.5;

/// Octave assigned to the first note of every melody.
pub const START_OCTAVE: i8 = 4;

/// Vocabulary-index gap above which consecutive notes count as an octave wrap.
pub const WRAP_THRESHOLD: usize = 4;

/// Generate `length` pitch classes from `key`, starting on the tonic.
///
/// Non-positive lengths return an empty melody.
pub fn generate_melody(key: Key, length: i32, rng: &mut dyn RandomSource) -> Vec<PitchClass> {
    let notes = key_notes(key);
    if length <= 0 || notes.is_empty() {
        return Vec::new();
    }

    let last = notes.len() as i32 - 1;
    let mut melody = Vec::with_capacity(length as usize);
    melody.push(notes[0]);
    let mut position: i32 = 0;

    for i in 1..length {
        let near_end = i as f64 > length as f64 * RESOLUTION_START;

        let pick = (rng.next_f64() * INTERVALS.len() as f64) as usize;
        let interval = INTERVALS[pick.min(INTERVALS.len() - 1)];
        let mut next = position + interval;

        if near_end && rng.next_f64() > RESOLUTION_CHANCE {
            next = position + if position > 0 { -1 } else { 1 };
        }

        position = next.clamp(0, last);
        melody.push(notes[position as usize]);
    }

    debug!(%key, length, melody = ?melody, "generated melody");
    melody
}

/// Place each note of a melody in an octave.
///
/// This is a heuristic, not a pitch-distance calculation: it compares
/// positions in the 17-entry spelling vocabulary, and treats any jump of
/// more than [`WRAP_THRESHOLD`] entries as crossing an octave boundary
/// (down in the vocabulary means up an octave, and vice versa). Keys whose
/// tables include a flat such as `Bb` shift the spacing, so the result is
/// not always the closest voicing.
pub fn assign_octaves(melody: &[PitchClass]) -> Vec<PitchWithOctave> {
    let mut result = Vec::with_capacity(melody.len());
    let mut octave = START_OCTAVE;

    for (i, &pitch) in melody.iter().enumerate() {
        if i > 0 {
            let prev = melody[i - 1].vocabulary_index();
            let current = pitch.vocabulary_index();
            if prev.abs_diff(current) > WRAP_THRESHOLD {
                if current < prev {
                    octave += 1;
                } else {
                    octave -= 1;
                }
            }
        }
        result.push(PitchWithOctave::new(pitch, octave));
    }

    result
}
