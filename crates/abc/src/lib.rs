//! ABC notation writer.
//!
//! Builds multi-voice phrase sequences and renders them as ABC text for
//! a notation renderer.
//!
//! # Example
//!
//! ```
//! use abc::{encode_sequence, Duration, PhraseUnit, Sequence, TimedNote};
//! use theory::{Key, PitchClass};
//!
//! let mut seq = Sequence::new().with_key(Key::FMajor);
//! seq.push("treble", PhraseUnit::single(TimedNote::new(PitchClass::BFlat, 4, Duration::QUARTER)));
//! seq.push("bass", PhraseUnit::single(TimedNote::new(PitchClass::F, 2, Duration::HALF)));
//!
//! let doc = encode_sequence(&seq);
//! assert!(doc.contains("K: Fmajor"));
//! assert!(doc.contains("[_B1/4]"));
//! assert!(doc.ends_with("[F,,1/2]"));
//! ```

pub mod sequence;
pub mod writer;

pub use sequence::{
    Duration, DurationError, PhraseUnit, Sequence, TimeSignature, TimedNote, UnitMeta, Voice,
};
pub use writer::{encode_note, encode_sequence, encode_unit, pitch_token};
