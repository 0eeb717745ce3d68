//! Notes currently held down, plus recent release history.

use std::collections::VecDeque;

use abc::{Duration, PhraseUnit, Sequence, TimedNote};
use serde::Serialize;
use theory::{identify_triads, Chord, PitchClass};

use crate::input::PlayedNote;

/// Most released notes kept in history.
pub const RELEASED_CAPACITY: usize = 1000;

/// A note after it was let go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReleasedNote {
    pub note: PlayedNote,
    pub released_at_ms: u64,
    pub held_ms: u64,
}

#[derive(Debug, Clone, Default)]
pub struct NoteTracker {
    active: Vec<PlayedNote>,
    released: VecDeque<ReleasedNote>,
}

impl NoteTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start holding a note. Pressing an already held number replaces it.
    pub fn press(&mut self, note: PlayedNote) {
        match self.active.binary_search_by_key(&note.number, |n| n.number) {
            Ok(idx) => self.active[idx] = note,
            Err(idx) => self.active.insert(idx, note),
        }
    }

    /// Let go of a note. Unknown numbers are ignored.
    pub fn release(&mut self, number: u8, at_ms: u64) -> Option<ReleasedNote> {
        let idx = self
            .active
            .binary_search_by_key(&number, |n| n.number)
            .ok()?;
        let note = self.active.remove(idx);
        let released = Self::finish(note, at_ms);
        self.remember(released);
        Some(released)
    }

    /// Let go of everything, lowest note first.
    pub fn release_all(&mut self, at_ms: u64) -> Vec<ReleasedNote> {
        let released: Vec<_> = self
            .active
            .drain(..)
            .map(|note| Self::finish(note, at_ms))
            .collect();
        for r in released.iter().rev() {
            self.remember(*r);
        }
        released
    }

    pub fn is_pressed(&self, number: u8) -> bool {
        self.active
            .binary_search_by_key(&number, |n| n.number)
            .is_ok()
    }

    /// Held notes, lowest first.
    pub fn active(&self) -> &[PlayedNote] {
        &self.active
    }

    /// Release history, newest first.
    pub fn released(&self) -> impl Iterator<Item = &ReleasedNote> {
        self.released.iter()
    }

    /// Triads exactly spelled by the held pitch classes, in any octave.
    pub fn held_chords(&self) -> Vec<Chord> {
        let mut pitches: Vec<PitchClass> = self.active.iter().map(|n| n.pitch).collect();
        pitches.sort();
        pitches.dedup();
        identify_triads(&pitches)
    }

    /// Held notes as a single treble unit of quarter notes.
    pub fn active_sequence(&self) -> Sequence {
        let mut seq = Sequence::new();
        let voice = seq.voice_mut("treble");
        if !self.active.is_empty() {
            let notes = self
                .active
                .iter()
                .map(|n| TimedNote::new(n.pitch, n.octave, Duration::QUARTER))
                .collect();
            voice.units.push(PhraseUnit::stack(notes));
        }
        seq
    }

    fn finish(note: PlayedNote, at_ms: u64) -> ReleasedNote {
        ReleasedNote {
            note,
            released_at_ms: at_ms,
            held_ms: at_ms.saturating_sub(note.timestamp_ms),
        }
    }

    fn remember(&mut self, released: ReleasedNote) {
        self.released.push_front(released);
        self.released.truncate(RELEASED_CAPACITY);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::NoteSource;
    use pretty_assertions::assert_eq;
    use theory::ChordQuality;

    fn note(number: u8, at_ms: u64) -> PlayedNote {
        PlayedNote::from_midi(number, 100, NoteSource::Keyboard, at_ms).unwrap()
    }

    fn numbers(tracker: &NoteTracker) -> Vec<u8> {
        tracker.active().iter().map(|n| n.number).collect()
    }

    #[test]
    fn test_active_sorted() {
        let mut tracker = NoteTracker::new();
        tracker.press(note(67, 0));
        tracker.press(note(60, 0));
        tracker.press(note(64, 0));
        assert_eq!(numbers(&tracker), vec![60, 64, 67]);
        assert!(tracker.is_pressed(64));
        assert!(!tracker.is_pressed(65));
    }

    #[test]
    fn test_repeat_press_replaces() {
        let mut tracker = NoteTracker::new();
        tracker.press(note(60, 10));
        tracker.press(note(60, 20));
        assert_eq!(tracker.active().len(), 1);
        assert_eq!(tracker.active()[0].timestamp_ms, 20);
    }

    #[test]
    fn test_release_records_hold_time() {
        let mut tracker = NoteTracker::new();
        tracker.press(note(60, 100));
        let released = tracker.release(60, 350).unwrap();
        assert_eq!(released.held_ms, 250);
        assert!(tracker.active().is_empty());
        assert_eq!(tracker.released().count(), 1);
        assert!(tracker.release(60, 400).is_none());
    }

    #[test]
    fn test_history_newest_first_and_capped() {
        let mut tracker = NoteTracker::new();
        for i in 0..(RELEASED_CAPACITY as u64 + 5) {
            tracker.press(note(60, i));
            tracker.release(60, i + 1);
        }
        assert_eq!(tracker.released().count(), RELEASED_CAPACITY);
        let newest = tracker.released().next().unwrap();
        assert_eq!(newest.released_at_ms, RELEASED_CAPACITY as u64 + 5);
    }

    #[test]
    fn test_release_all() {
        let mut tracker = NoteTracker::new();
        tracker.press(note(64, 0));
        tracker.press(note(60, 0));
        let released = tracker.release_all(50);
        let order: Vec<_> = released.iter().map(|r| r.note.number).collect();
        assert_eq!(order, vec![60, 64]);
        assert!(tracker.active().is_empty());

        let history: Vec<_> = tracker.released().map(|r| r.note.number).collect();
        assert_eq!(history, vec![60, 64]);
    }

    #[test]
    fn test_held_chords() {
        let mut tracker = NoteTracker::new();
        // A minor spread across two octaves, with a doubled A.
        for n in [57, 60, 64, 69] {
            tracker.press(note(n, 0));
        }
        assert_eq!(
            tracker.held_chords(),
            vec![Chord::new(PitchClass::A, ChordQuality::Minor)]
        );

        tracker.release(64, 1);
        assert!(tracker.held_chords().is_empty());
    }

    #[test]
    fn test_active_sequence() {
        let mut tracker = NoteTracker::new();
        assert_eq!(
            abc::encode_sequence(&tracker.active_sequence()),
            "X: 1\nM: 4/4\nL: 1/1\nK: Cmajor\nV:treble clef=treble\n"
        );

        tracker.press(note(61, 0));
        tracker.press(note(48, 0));
        assert!(abc::encode_sequence(&tracker.active_sequence()).ends_with("[C,1/4 ^C1/4]"));
    }
}
