//! Pitch vocabulary.
//!
//! Pitch classes keep the spelling they were written with. `C#` and `Db`
//! sound the same but are distinct values here, because the spelling
//! decides which key table they belong to and how they are notated.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The seven natural note letters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Letter {
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

impl Letter {
    /// Semitone offset of the natural letter from C (0-11)
    pub fn to_semitone(self) -> u8 {
        match self {
            Letter::C => 0,
            Letter::D => 2,
            Letter::E => 4,
            Letter::F => 5,
            Letter::G => 7,
            Letter::A => 9,
            Letter::B => 11,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Letter::C => 'C',
            Letter::D => 'D',
            Letter::E => 'E',
            Letter::F => 'F',
            Letter::G => 'G',
            Letter::A => 'A',
            Letter::B => 'B',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Accidental {
    Sharp,
    Flat,
}

impl Accidental {
    pub fn to_semitone_offset(self) -> i8 {
        match self {
            Accidental::Sharp => 1,
            Accidental::Flat => -1,
        }
    }
}

/// A chromatic pitch class with its spelling preserved.
///
/// Variants are declared in vocabulary order; [`PitchClass::vocabulary_index`]
/// depends on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PitchClass {
    #[serde(rename = "C")]
    C,
    #[serde(rename = "C#")]
    CSharp,
    #[serde(rename = "Db")]
    DFlat,
    #[serde(rename = "D")]
    D,
    #[serde(rename = "D#")]
    DSharp,
    #[serde(rename = "Eb")]
    EFlat,
    #[serde(rename = "E")]
    E,
    #[serde(rename = "F")]
    F,
    #[serde(rename = "F#")]
    FSharp,
    #[serde(rename = "Gb")]
    GFlat,
    #[serde(rename = "G")]
    G,
    #[serde(rename = "G#")]
    GSharp,
    #[serde(rename = "Ab")]
    AFlat,
    #[serde(rename = "A")]
    A,
    #[serde(rename = "A#")]
    ASharp,
    #[serde(rename = "Bb")]
    BFlat,
    #[serde(rename = "B")]
    B,
}

/// Sharp spellings indexed by semitone, as reported by note-number input.
const SHARP_NAMES: [PitchClass; 12] = [
    PitchClass::C,
    PitchClass::CSharp,
    PitchClass::D,
    PitchClass::DSharp,
    PitchClass::E,
    PitchClass::F,
    PitchClass::FSharp,
    PitchClass::G,
    PitchClass::GSharp,
    PitchClass::A,
    PitchClass::ASharp,
    PitchClass::B,
];

impl PitchClass {
    /// The full enharmonic vocabulary in its fixed order.
    pub const ALL: [PitchClass; 17] = [
        PitchClass::C,
        PitchClass::CSharp,
        PitchClass::DFlat,
        PitchClass::D,
        PitchClass::DSharp,
        PitchClass::EFlat,
        PitchClass::E,
        PitchClass::F,
        PitchClass::FSharp,
        PitchClass::GFlat,
        PitchClass::G,
        PitchClass::GSharp,
        PitchClass::AFlat,
        PitchClass::A,
        PitchClass::ASharp,
        PitchClass::BFlat,
        PitchClass::B,
    ];

    /// Position of this spelling in [`PitchClass::ALL`].
    pub fn vocabulary_index(self) -> usize {
        self as usize
    }

    pub fn letter(self) -> Letter {
        match self {
            PitchClass::C | PitchClass::CSharp => Letter::C,
            PitchClass::DFlat | PitchClass::D | PitchClass::DSharp => Letter::D,
            PitchClass::EFlat | PitchClass::E => Letter::E,
            PitchClass::F | PitchClass::FSharp => Letter::F,
            PitchClass::GFlat | PitchClass::G | PitchClass::GSharp => Letter::G,
            PitchClass::AFlat | PitchClass::A | PitchClass::ASharp => Letter::A,
            PitchClass::BFlat | PitchClass::B => Letter::B,
        }
    }

    pub fn accidental(self) -> Option<Accidental> {
        match self {
            PitchClass::CSharp
            | PitchClass::DSharp
            | PitchClass::FSharp
            | PitchClass::GSharp
            | PitchClass::ASharp => Some(Accidental::Sharp),
            PitchClass::DFlat
            | PitchClass::EFlat
            | PitchClass::GFlat
            | PitchClass::AFlat
            | PitchClass::BFlat => Some(Accidental::Flat),
            _ => None,
        }
    }

    /// Semitone above C (0-11), ignoring spelling.
    pub fn semitone(self) -> u8 {
        let offset = self.accidental().map(|a| a.to_semitone_offset()).unwrap_or(0);
        (self.letter().to_semitone() as i8 + offset).rem_euclid(12) as u8
    }

    /// True if both spellings sound the same.
    pub fn is_enharmonic(self, other: PitchClass) -> bool {
        self.semitone() == other.semitone()
    }

    /// Sharp-preferring spelling for a semitone (taken modulo 12).
    pub fn from_semitone(semitone: u8) -> PitchClass {
        SHARP_NAMES[(semitone % 12) as usize]
    }

    pub fn name(self) -> &'static str {
        match self {
            PitchClass::C => "C",
            PitchClass::CSharp => "C#",
            PitchClass::DFlat => "Db",
            PitchClass::D => "D",
            PitchClass::DSharp => "D#",
            PitchClass::EFlat => "Eb",
            PitchClass::E => "E",
            PitchClass::F => "F",
            PitchClass::FSharp => "F#",
            PitchClass::GFlat => "Gb",
            PitchClass::G => "G",
            PitchClass::GSharp => "G#",
            PitchClass::AFlat => "Ab",
            PitchClass::A => "A",
            PitchClass::ASharp => "A#",
            PitchClass::BFlat => "Bb",
            PitchClass::B => "B",
        }
    }
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown pitch class {0:?}")]
pub struct ParsePitchError(pub String);

impl FromStr for PitchClass {
    type Err = ParsePitchError;

    /// Accepts `C`, `c#`, `Db`, and the ABC-style `^C` / `_D` prefixes.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let normalized = if let Some(rest) = trimmed.strip_prefix('^') {
            format!("{}#", rest)
        } else if let Some(rest) = trimmed.strip_prefix('_') {
            format!("{}b", rest)
        } else {
            trimmed.to_string()
        };

        let mut chars = normalized.chars();
        let letter = chars.next().map(|c| c.to_ascii_uppercase());
        let rest: String = chars.collect();
        let canonical = match letter {
            Some(l) => format!("{}{}", l, rest),
            None => return Err(ParsePitchError(s.to_string())),
        };

        PitchClass::ALL
            .iter()
            .copied()
            .find(|p| p.name() == canonical)
            .ok_or_else(|| ParsePitchError(s.to_string()))
    }
}

/// A pitch class placed in a specific octave (scientific pitch notation, C4 = middle C).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PitchWithOctave {
    pub pitch: PitchClass,
    pub octave: i8,
}

impl PitchWithOctave {
    pub fn new(pitch: PitchClass, octave: i8) -> Self {
        PitchWithOctave { pitch, octave }
    }

    /// Convert a MIDI note number: `octave = n / 12 - 1`, sharp spelling.
    pub fn from_midi(number: u8) -> Self {
        PitchWithOctave {
            pitch: PitchClass::from_semitone(number % 12),
            octave: (number / 12) as i8 - 1,
        }
    }

    /// MIDI note number, or `None` when the pitch falls outside 0-127.
    pub fn to_midi(self) -> Option<u8> {
        let n = (self.octave as i16 + 1) * 12 + self.pitch.semitone() as i16;
        u8::try_from(n).ok().filter(|n| *n <= 127)
    }
}

impl fmt::Display for PitchWithOctave {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.pitch, self.octave)
    }
}
