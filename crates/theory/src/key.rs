//! Supported keys and their scale tables.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::chord::{chord_tones, ChordQuality};
use crate::pitch::PitchClass;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Major,
    Minor,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Major => "major",
            Mode::Minor => "minor",
        }
    }
}

/// The keys the practice engine can generate in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Key {
    #[default]
    CMajor,
    AMinor,
    FMajor,
}

/// What a pitch class means inside a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaleEntry {
    /// In the key; the triad built on it has this quality.
    InKey(ChordQuality),
    OutOfKey,
}

use ChordQuality::{Diminished, Major, Minor};
use PitchClass as P;

const C_MAJOR: [(PitchClass, ChordQuality); 7] = [
    (P::C, Major),
    (P::D, Minor),
    (P::E, Minor),
    (P::F, Major),
    (P::G, Major),
    (P::A, Minor),
    (P::B, Diminished),
];

const A_MINOR: [(PitchClass, ChordQuality); 7] = [
    (P::A, Minor),
    (P::B, Diminished),
    (P::C, Major),
    (P::D, Minor),
    (P::E, Minor),
    (P::F, Major),
    (P::G, Major),
];

const F_MAJOR: [(PitchClass, ChordQuality); 7] = [
    (P::F, Major),
    (P::G, Minor),
    (P::A, Minor),
    (P::BFlat, Major),
    (P::C, Major),
    (P::D, Minor),
    (P::E, Diminished),
];

impl Key {
    pub const ALL: [Key; 3] = [Key::CMajor, Key::AMinor, Key::FMajor];

    /// In-key degrees in scale order, tonic first, with the quality of the
    /// triad built on each.
    pub fn degrees(self) -> &'static [(PitchClass, ChordQuality)] {
        match self {
            Key::CMajor => &C_MAJOR,
            Key::AMinor => &A_MINOR,
            Key::FMajor => &F_MAJOR,
        }
    }

    pub fn tonic(self) -> PitchClass {
        match self {
            Key::CMajor => PitchClass::C,
            Key::AMinor => PitchClass::A,
            Key::FMajor => PitchClass::F,
        }
    }

    pub fn mode(self) -> Mode {
        match self {
            Key::CMajor | Key::FMajor => Mode::Major,
            Key::AMinor => Mode::Minor,
        }
    }

    /// Look up any spelling. Total: pitch classes not listed in the
    /// key's degrees are [`ScaleEntry::OutOfKey`].
    pub fn scale_entry(self, pitch: PitchClass) -> ScaleEntry {
        self.degrees()
            .iter()
            .find(|(p, _)| *p == pitch)
            .map(|(_, quality)| ScaleEntry::InKey(*quality))
            .unwrap_or(ScaleEntry::OutOfKey)
    }

    pub fn contains(self, pitch: PitchClass) -> bool {
        matches!(self.scale_entry(pitch), ScaleEntry::InKey(_))
    }
}

/// Pitch classes of a key, tonic first, in scale order.
pub fn key_notes(key: Key) -> Vec<PitchClass> {
    key.degrees().iter().map(|(p, _)| *p).collect()
}

/// Every triad of `quality` rooted on a degree of `key`, in scale order.
pub fn chords_of_quality(key: Key, quality: ChordQuality) -> Vec<[PitchClass; 3]> {
    key.degrees()
        .iter()
        .filter(|(_, q)| *q == quality)
        .map(|(root, q)| chord_tones(*root, *q))
        .collect()
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mode = match self.mode() {
            Mode::Major => "Major",
            Mode::Minor => "Minor",
        };
        write!(f, "{} {}", self.tonic(), mode)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported key {0:?} (expected one of: C Major, A Minor, F Major)")]
pub struct ParseKeyError(pub String);

impl FromStr for Key {
    type Err = ParseKeyError;

    /// Accepts `C Major`, `c major`, `Cmajor`, `Cmaj`, `C`, `Am`, `a minor`, ...
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let compact: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
            .collect::<String>()
            .to_lowercase();

        match compact.as_str() {
            "c" | "cmaj" | "cmajor" => Ok(Key::CMajor),
            "am" | "amin" | "aminor" => Ok(Key::AMinor),
            "f" | "fmaj" | "fmajor" => Ok(Key::FMajor),
            _ => Err(ParseKeyError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_key_notes_c_major() {
        assert_eq!(
            key_notes(Key::CMajor),
            vec![P::C, P::D, P::E, P::F, P::G, P::A, P::B]
        );
    }

    #[test]
    fn test_key_notes_f_major() {
        assert_eq!(
            key_notes(Key::FMajor),
            vec![P::F, P::G, P::A, P::BFlat, P::C, P::D, P::E]
        );
    }

    #[test]
    fn test_key_notes_a_minor() {
        assert_eq!(
            key_notes(Key::AMinor),
            vec![P::A, P::B, P::C, P::D, P::E, P::F, P::G]
        );
    }

    #[test]
    fn test_major_chords_in_c() {
        assert_eq!(
            chords_of_quality(Key::CMajor, Major),
            vec![[P::C, P::E, P::G], [P::F, P::A, P::C], [P::G, P::B, P::D]]
        );
    }

    #[test]
    fn test_minor_chords_in_c() {
        assert_eq!(
            chords_of_quality(Key::CMajor, Minor),
            vec![[P::D, P::F, P::A], [P::E, P::G, P::B], [P::A, P::C, P::E]]
        );
    }

    #[test]
    fn test_diminished_chords_in_c() {
        assert_eq!(
            chords_of_quality(Key::CMajor, Diminished),
            vec![[P::B, P::D, P::F]]
        );
    }

    #[test]
    fn test_major_chords_in_f() {
        assert_eq!(
            chords_of_quality(Key::FMajor, Major),
            vec![[P::F, P::A, P::C], [P::BFlat, P::D, P::F], [P::C, P::E, P::G]]
        );
    }

    #[test]
    fn test_scale_entry() {
        assert_eq!(Key::FMajor.scale_entry(P::BFlat), ScaleEntry::InKey(Major));
        assert_eq!(Key::FMajor.scale_entry(P::ASharp), ScaleEntry::OutOfKey);
        assert_eq!(Key::FMajor.scale_entry(P::B), ScaleEntry::OutOfKey);
        assert_eq!(Key::CMajor.scale_entry(P::B), ScaleEntry::InKey(Diminished));
    }

    #[test]
    fn test_parse_key() {
        assert_eq!("C Major".parse::<Key>(), Ok(Key::CMajor));
        assert_eq!("a minor".parse::<Key>(), Ok(Key::AMinor));
        assert_eq!("Am".parse::<Key>(), Ok(Key::AMinor));
        assert_eq!("Fmaj".parse::<Key>(), Ok(Key::FMajor));
        assert!("G Major".parse::<Key>().is_err());
    }

    #[test]
    fn test_display_parses_back() {
        for key in Key::ALL {
            assert_eq!(key.to_string().parse::<Key>(), Ok(key));
        }
        assert_eq!(Key::AMinor.to_string(), "A Minor");
    }
}
