//! Whole-vocabulary checks for the key tables and the generator.

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::SeedableRng;
use theory::{
    assign_octaves, chords_of_quality, generate_melody, key_notes, ChordQuality, Key, PitchClass,
    ScaleEntry,
};

#[test]
fn test_key_notes_are_tonic_first_and_unique() {
    for key in Key::ALL {
        let notes = key_notes(key);
        assert_eq!(notes.len(), 7, "{} should have seven degrees", key);
        assert_eq!(notes[0], key.tonic());

        let unique: HashSet<_> = notes.iter().collect();
        assert_eq!(unique.len(), notes.len(), "{} has duplicate notes", key);

        for p in &notes {
            assert!(key.contains(*p));
        }
    }
}

#[test]
fn test_scale_entry_is_total() {
    for key in Key::ALL {
        let in_key = PitchClass::ALL
            .iter()
            .filter(|p| matches!(key.scale_entry(**p), ScaleEntry::InKey(_)))
            .count();
        let out_of_key = PitchClass::ALL
            .iter()
            .filter(|p| key.scale_entry(**p) == ScaleEntry::OutOfKey)
            .count();
        assert_eq!(in_key, 7);
        assert_eq!(in_key + out_of_key, PitchClass::ALL.len());
    }
}

#[test]
fn test_chord_tones_stay_in_key() {
    for key in Key::ALL {
        let notes = key_notes(key);
        for quality in ChordQuality::ALL {
            for chord in chords_of_quality(key, quality) {
                for tone in chord {
                    assert!(
                        notes.contains(&tone),
                        "{:?} chord {:?} in {} uses out-of-key {}",
                        quality,
                        chord,
                        key,
                        tone
                    );
                }
            }
        }
    }
}

#[test]
fn test_every_degree_yields_one_chord() {
    for key in Key::ALL {
        let total: usize = ChordQuality::ALL
            .iter()
            .map(|q| chords_of_quality(key, *q).len())
            .sum();
        assert_eq!(total, 7);
    }
}

#[test]
fn test_generated_melodies_stay_in_key() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    for key in Key::ALL {
        let notes = key_notes(key);
        for length in 1..40 {
            let melody = generate_melody(key, length, &mut rng);
            assert_eq!(melody.len(), length as usize);
            assert_eq!(melody[0], key.tonic());
            assert!(melody.iter().all(|p| notes.contains(p)));
        }
    }
}

#[test]
fn test_same_seed_same_melody() {
    let mut a = StdRng::seed_from_u64(99);
    let mut b = StdRng::seed_from_u64(99);
    assert_eq!(
        generate_melody(Key::AMinor, 16, &mut a),
        generate_melody(Key::AMinor, 16, &mut b)
    );
}

#[test]
fn test_octaves_follow_melody() {
    let mut rng = StdRng::seed_from_u64(3);
    let melody = generate_melody(Key::CMajor, 12, &mut rng);
    let placed = assign_octaves(&melody);
    assert_eq!(placed.len(), melody.len());
    assert_eq!(placed[0].octave, 4);
    for (placed, pitch) in placed.iter().zip(&melody) {
        assert_eq!(placed.pitch, *pitch);
    }
    for pair in placed.windows(2) {
        assert!((pair[0].octave - pair[1].octave).abs() <= 1);
    }
}
