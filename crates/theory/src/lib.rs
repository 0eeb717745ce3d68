//! Music theory for Notanica.
//!
//! Spelled pitch classes, the supported keys with their scale tables,
//! triad spellings, and a random-walk melody generator.
//!
//! # Example
//!
//! ```
//! use rand::SeedableRng;
//! use theory::{assign_octaves, generate_melody, key_notes, Key};
//!
//! let mut rng = rand::rngs::StdRng::seed_from_u64(42);
//! let melody = generate_melody(Key::FMajor, 8, &mut rng);
//! assert_eq!(melody[0], Key::FMajor.tonic());
//! assert!(melody.iter().all(|p| key_notes(Key::FMajor).contains(p)));
//!
//! let placed = assign_octaves(&melody);
//! assert_eq!(placed[0].octave, 4);
//! ```

pub mod chord;
pub mod key;
pub mod melody;
pub mod pitch;
pub mod random;

pub use chord::{chord_tones, identify_triads, Chord, ChordQuality};
pub use key::{chords_of_quality, key_notes, Key, Mode, ParseKeyError, ScaleEntry};
pub use melody::{assign_octaves, generate_melody};
pub use pitch::{Accidental, Letter, ParsePitchError, PitchClass, PitchWithOctave};
pub use random::{RandomSource, ScriptedSource};
