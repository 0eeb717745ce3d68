//! Triad spellings and identification.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::pitch::PitchClass;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChordQuality {
    Major,
    Minor,
    Diminished,
}

impl ChordQuality {
    pub const ALL: [ChordQuality; 3] = [
        ChordQuality::Major,
        ChordQuality::Minor,
        ChordQuality::Diminished,
    ];

    /// Suffix for chord symbol display
    pub fn suffix(self) -> &'static str {
        match self {
            ChordQuality::Major => "",
            ChordQuality::Minor => "m",
            ChordQuality::Diminished => "dim",
        }
    }

    /// Semitone intervals above the root, as a bitmask over the 12 classes.
    fn template(self) -> u16 {
        match self {
            ChordQuality::Major => (1 << 0) | (1 << 4) | (1 << 7),
            ChordQuality::Minor => (1 << 0) | (1 << 3) | (1 << 7),
            ChordQuality::Diminished => (1 << 0) | (1 << 3) | (1 << 6),
        }
    }

    pub fn parse(s: &str) -> Option<ChordQuality> {
        match s.to_lowercase().as_str() {
            "major" | "maj" | "" => Some(ChordQuality::Major),
            "minor" | "min" | "m" => Some(ChordQuality::Minor),
            "diminished" | "dim" => Some(ChordQuality::Diminished),
            _ => None,
        }
    }
}

/// A named triad. Carried as provenance on generated phrase units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Chord {
    pub root: PitchClass,
    pub quality: ChordQuality,
}

impl Chord {
    pub fn new(root: PitchClass, quality: ChordQuality) -> Self {
        Chord { root, quality }
    }

    pub fn tones(self) -> [PitchClass; 3] {
        chord_tones(self.root, self.quality)
    }

    /// Chord symbol, e.g. `Bb`, `Dm`, `Bdim`.
    pub fn symbol(self) -> String {
        format!("{}{}", self.root, self.quality.suffix())
    }
}

impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.symbol())
    }
}

/// Spelled triad tones for every root in the vocabulary.
///
/// The table is written out rather than computed so each root keeps the
/// spelling its key tables expect (e.g. `F` diminished is `F Ab B`).
pub fn chord_tones(root: PitchClass, quality: ChordQuality) -> [PitchClass; 3] {
    use ChordQuality::{Diminished as Dim, Major as Maj, Minor as Min};
    use PitchClass as P;

    match (root, quality) {
        (P::C, Maj) => [P::C, P::E, P::G],
        (P::C, Min) => [P::C, P::EFlat, P::G],
        (P::C, Dim) => [P::C, P::EFlat, P::GFlat],

        (P::CSharp, Maj) => [P::CSharp, P::F, P::GSharp],
        (P::CSharp, Min) => [P::CSharp, P::E, P::GSharp],
        (P::CSharp, Dim) => [P::CSharp, P::E, P::G],

        (P::DFlat, Maj) => [P::DFlat, P::F, P::AFlat],
        (P::DFlat, Min) => [P::DFlat, P::E, P::AFlat],
        (P::DFlat, Dim) => [P::DFlat, P::E, P::G],

        (P::D, Maj) => [P::D, P::FSharp, P::A],
        (P::D, Min) => [P::D, P::F, P::A],
        (P::D, Dim) => [P::D, P::F, P::AFlat],

        (P::DSharp, Maj) => [P::DSharp, P::G, P::ASharp],
        (P::DSharp, Min) => [P::DSharp, P::FSharp, P::ASharp],
        (P::DSharp, Dim) => [P::DSharp, P::FSharp, P::A],

        (P::EFlat, Maj) => [P::EFlat, P::G, P::BFlat],
        (P::EFlat, Min) => [P::EFlat, P::GFlat, P::BFlat],
        (P::EFlat, Dim) => [P::EFlat, P::GFlat, P::A],

        (P::E, Maj) => [P::E, P::GSharp, P::B],
        (P::E, Min) => [P::E, P::G, P::B],
        (P::E, Dim) => [P::E, P::G, P::BFlat],

        (P::F, Maj) => [P::F, P::A, P::C],
        (P::F, Min) => [P::F, P::AFlat, P::C],
        (P::F, Dim) => [P::F, P::AFlat, P::B],

        (P::FSharp, Maj) => [P::FSharp, P::ASharp, P::CSharp],
        (P::FSharp, Min) => [P::FSharp, P::A, P::CSharp],
        (P::FSharp, Dim) => [P::FSharp, P::A, P::C],

        (P::GFlat, Maj) => [P::GFlat, P::BFlat, P::DFlat],
        (P::GFlat, Min) => [P::GFlat, P::A, P::DFlat],
        (P::GFlat, Dim) => [P::GFlat, P::A, P::C],

        (P::G, Maj) => [P::G, P::B, P::D],
        (P::G, Min) => [P::G, P::BFlat, P::D],
        (P::G, Dim) => [P::G, P::BFlat, P::DFlat],

        (P::GSharp, Maj) => [P::GSharp, P::C, P::DSharp],
        (P::GSharp, Min) => [P::GSharp, P::B, P::DSharp],
        (P::GSharp, Dim) => [P::GSharp, P::B, P::D],

        (P::AFlat, Maj) => [P::AFlat, P::C, P::EFlat],
        (P::AFlat, Min) => [P::AFlat, P::B, P::EFlat],
        (P::AFlat, Dim) => [P::AFlat, P::B, P::D],

        (P::A, Maj) => [P::A, P::CSharp, P::E],
        (P::A, Min) => [P::A, P::C, P::E],
        (P::A, Dim) => [P::A, P::C, P::EFlat],

        (P::ASharp, Maj) => [P::ASharp, P::D, P::F],
        (P::ASharp, Min) => [P::ASharp, P::CSharp, P::F],
        (P::ASharp, Dim) => [P::ASharp, P::CSharp, P::E],

        (P::BFlat, Maj) => [P::BFlat, P::D, P::F],
        (P::BFlat, Min) => [P::BFlat, P::DFlat, P::F],
        (P::BFlat, Dim) => [P::BFlat, P::DFlat, P::E],

        (P::B, Maj) => [P::B, P::DSharp, P::FSharp],
        (P::B, Min) => [P::B, P::D, P::FSharp],
        (P::B, Dim) => [P::B, P::D, P::F],
    }
}

fn to_interval_mask(pitches: &[PitchClass], root: u8) -> u16 {
    let mut mask = 0u16;
    for p in pitches {
        let interval = (p.semitone() + 12 - root) % 12;
        mask |= 1 << interval;
    }
    mask
}

/// Name every triad whose tones are exactly the held pitch classes.
///
/// Octaves and doublings are ignored. Roots are tried over the whole
/// vocabulary, so enharmonic spellings of the same chord (`C#` and `Db`)
/// both appear, in vocabulary order.
pub fn identify_triads(pitches: &[PitchClass]) -> Vec<Chord> {
    if pitches.is_empty() {
        return Vec::new();
    }

    let mut found = Vec::new();
    for root in PitchClass::ALL {
        if !pitches.iter().any(|p| p.is_enharmonic(root)) {
            continue;
        }
        let mask = to_interval_mask(pitches, root.semitone());
        for quality in ChordQuality::ALL {
            if mask == quality.template() {
                found.push(Chord::new(root, quality));
            }
        }
    }
    found
}
