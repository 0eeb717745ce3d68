//! Phrase sequences: the input to the ABC writer.
//!
//! A [`Sequence`] is a set of named voices, each an ordered list of
//! [`PhraseUnit`]s. Durations are exact fractions of a whole note and are
//! written out exactly as stored.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use theory::{Chord, Key, PitchClass, PitchWithOctave};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DurationError {
    #[error("duration denominator must be non-zero")]
    ZeroDenominator,

    #[error("duration numerator must be non-zero")]
    ZeroNumerator,

    #[error("unrecognized duration {0:?}")]
    Unrecognized(String),
}

/// Note duration as a fraction of a whole note.
///
/// Stored as given: `2/8` stays `2/8`. Only [`Duration::from_shorthand`]
/// reduces, because it builds the fraction itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawDuration")]
pub struct Duration {
    numerator: u32,
    denominator: u32,
}

/// Unchecked wire form; deserialized values go through [`Duration::new`].
#[derive(Deserialize)]
struct RawDuration {
    numerator: u32,
    denominator: u32,
}

impl TryFrom<RawDuration> for Duration {
    type Error = DurationError;

    fn try_from(raw: RawDuration) -> Result<Self, Self::Error> {
        Duration::new(raw.numerator, raw.denominator)
    }
}

impl Duration {
    pub const WHOLE: Duration = Duration::from_parts(1, 1);
    pub const HALF: Duration = Duration::from_parts(1, 2);
    pub const QUARTER: Duration = Duration::from_parts(1, 4);
    pub const EIGHTH: Duration = Duration::from_parts(1, 8);
    pub const SIXTEENTH: Duration = Duration::from_parts(1, 16);

    const fn from_parts(numerator: u32, denominator: u32) -> Self {
        Duration {
            numerator,
            denominator,
        }
    }

    pub fn new(numerator: u32, denominator: u32) -> Result<Self, DurationError> {
        if denominator == 0 {
            return Err(DurationError::ZeroDenominator);
        }
        if numerator == 0 {
            return Err(DurationError::ZeroNumerator);
        }
        Ok(Duration::from_parts(numerator, denominator))
    }

    pub fn numerator(&self) -> u32 {
        self.numerator
    }

    pub fn denominator(&self) -> u32 {
        self.denominator
    }

    /// Parse a duration shorthand: a base name plus up to three dots.
    ///
    /// | name | value |     | name | value |
    /// |------|-------|-----|------|-------|
    /// | `dl` | 8/1   |     | `e`  | 1/8   |
    /// | `l`  | 4/1   |     | `s`  | 1/16  |
    /// | `d`  | 2/1   |     | `t`  | 1/32  |
    /// | `w`  | 1/1   |     | `sf` | 1/64  |
    /// | `h`  | 1/2   |     | `th` | 1/256 |
    /// | `q`  | 1/4   |     |      |       |
    ///
    /// Each dot adds half of the previous addition: `q.` is 3/8, `q..` is 7/16.
    pub fn from_shorthand(s: &str) -> Result<Self, DurationError> {
        let trimmed = s.trim();
        let base = trimmed.trim_end_matches('.');
        let dots = (trimmed.len() - base.len()) as u32;
        if dots > 3 {
            return Err(DurationError::Unrecognized(s.to_string()));
        }

        let (num, den): (u32, u32) = match base {
            "dl" => (8, 1),
            "l" => (4, 1),
            "d" => (2, 1),
            "w" => (1, 1),
            "h" => (1, 2),
            "q" => (1, 4),
            "e" => (1, 8),
            "s" => (1, 16),
            "t" => (1, 32),
            "sf" => (1, 64),
            "th" => (1, 256),
            _ => return Err(DurationError::Unrecognized(s.to_string())),
        };

        // n dots: value * (2^(n+1) - 1) / 2^n
        let num = num * ((1 << (dots + 1)) - 1);
        let den = den * (1 << dots);
        let g = gcd(num, den);
        Ok(Duration::from_parts(num / g, den / g))
    }
}

fn gcd(a: u32, b: u32) -> u32 {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}

impl Default for Duration {
    fn default() -> Self {
        Duration::QUARTER
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

impl FromStr for Duration {
    type Err = DurationError;

    /// Accepts `n/d` fractions or the shorthand names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().split_once('/') {
            Some((n, d)) => {
                let n = n
                    .trim()
                    .parse()
                    .map_err(|_| DurationError::Unrecognized(s.to_string()))?;
                let d = d
                    .trim()
                    .parse()
                    .map_err(|_| DurationError::Unrecognized(s.to_string()))?;
                Duration::new(n, d)
            }
            None => Duration::from_shorthand(s),
        }
    }
}

/// Time signature (M: field)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSignature {
    pub numerator: u8,
    pub denominator: u8,
}

impl Default for TimeSignature {
    fn default() -> Self {
        TimeSignature {
            numerator: 4,
            denominator: 4,
        }
    }
}

/// A pitch with a duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimedNote {
    pub pitch: PitchWithOctave,
    pub duration: Duration,
}

impl TimedNote {
    pub fn new(pitch: PitchClass, octave: i8, duration: Duration) -> Self {
        TimedNote {
            pitch: PitchWithOctave::new(pitch, octave),
            duration,
        }
    }
}

/// Where a phrase unit came from. Carried along, never read by the writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UnitMeta {
    pub chord: Option<Chord>,
    pub tonic: Option<PitchClass>,
}

/// One or more notes that start together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhraseUnit {
    pub notes: Vec<TimedNote>,
    #[serde(default)]
    pub meta: UnitMeta,
}

impl PhraseUnit {
    pub fn single(note: TimedNote) -> Self {
        PhraseUnit {
            notes: vec![note],
            meta: UnitMeta::default(),
        }
    }

    pub fn stack(notes: Vec<TimedNote>) -> Self {
        PhraseUnit {
            notes,
            meta: UnitMeta::default(),
        }
    }

    /// Stack the tones of `chord` in one octave, tagging the unit with it.
    pub fn chord(chord: Chord, octave: i8, duration: Duration) -> Self {
        let notes = chord
            .tones()
            .iter()
            .map(|p| TimedNote::new(*p, octave, duration))
            .collect();
        PhraseUnit {
            notes,
            meta: UnitMeta {
                chord: Some(chord),
                tonic: None,
            },
        }
    }

    pub fn with_meta(mut self, meta: UnitMeta) -> Self {
        self.meta = meta;
        self
    }
}

/// A named voice. The name doubles as the clef identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Voice {
    pub name: String,
    pub units: Vec<PhraseUnit>,
}

impl Voice {
    pub fn new(name: impl Into<String>) -> Self {
        Voice {
            name: name.into(),
            units: Vec::new(),
        }
    }
}

/// A multi-voice phrase ready for notation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sequence {
    /// X: reference number
    pub reference: u32,
    /// Voices in the order they were first added
    pub voices: Vec<Voice>,
    /// Defaults to C major when absent
    pub key: Option<Key>,
    /// Defaults to 4/4 when absent
    pub time_signature: Option<TimeSignature>,
}

impl Default for Sequence {
    fn default() -> Self {
        Sequence {
            reference: 1,
            voices: Vec::new(),
            key: None,
            time_signature: None,
        }
    }
}

impl Sequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_key(mut self, key: Key) -> Self {
        self.key = Some(key);
        self
    }

    pub fn with_time_signature(mut self, numerator: u8, denominator: u8) -> Self {
        self.time_signature = Some(TimeSignature {
            numerator,
            denominator,
        });
        self
    }

    /// Get a voice by name, appending an empty one if it doesn't exist yet.
    pub fn voice_mut(&mut self, name: &str) -> &mut Voice {
        let idx = match self.voices.iter().position(|v| v.name == name) {
            Some(idx) => idx,
            None => {
                self.voices.push(Voice::new(name));
                self.voices.len() - 1
            }
        };
        &mut self.voices[idx]
    }

    pub fn voice(&self, name: &str) -> Option<&Voice> {
        self.voices.iter().find(|v| v.name == name)
    }

    /// Append a unit to the named voice.
    pub fn push(&mut self, voice: &str, unit: PhraseUnit) {
        self.voice_mut(voice).units.push(unit);
    }

    /// Builder form of [`Sequence::push`] for a whole voice.
    pub fn with_voice(mut self, voice: &str, units: impl IntoIterator<Item = PhraseUnit>) -> Self {
        self.voice_mut(voice).units.extend(units);
        self
    }
}
