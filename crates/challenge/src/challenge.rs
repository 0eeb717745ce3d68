//! The challenge record: an expected note sequence plus progress.

use std::fmt;

use abc::{Duration, PhraseUnit, Sequence, TimedNote};
use serde::{Deserialize, Serialize};
use theory::{Key, PitchWithOctave};
use uuid::Uuid;

/// Unique identifier for a challenge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChallengeId(pub Uuid);

impl ChallengeId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// First four characters of the hyphenated form.
    pub fn short(&self) -> String {
        self.0.to_string().chars().take(4).collect()
    }
}

impl Default for ChallengeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ChallengeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A note sequence the player has to reproduce in order.
///
/// `current_index` is the number of notes already matched, so it always
/// lies in `0..=notes.len()`. A challenge at `notes.len()` is complete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Challenge {
    pub id: ChallengeId,
    pub notes: Vec<PitchWithOctave>,
    pub current_index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Challenge {
    pub fn is_complete(&self) -> bool {
        self.current_index >= self.notes.len()
    }

    /// The next note to play, or `None` once complete.
    pub fn expected(&self) -> Option<PitchWithOctave> {
        self.notes.get(self.current_index).copied()
    }

    pub fn display_name(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!("Challenge {}", self.id.short()),
        }
    }

    /// Expected notes as a treble voice of quarter notes.
    pub fn to_sequence(&self, key: Key) -> Sequence {
        let units = self
            .notes
            .iter()
            .map(|n| PhraseUnit::single(TimedNote::new(n.pitch, n.octave, Duration::QUARTER)));
        Sequence::new().with_key(key).with_voice("treble", units)
    }
}
