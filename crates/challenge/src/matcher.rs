//! Matching played notes against live challenges.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use theory::PitchWithOctave;
use thiserror::Error;
use tracing::{debug, info};

use crate::challenge::ChallengeId;
use crate::input::PlayedNote;
use crate::registry::Registry;

/// How a played pitch is compared with the expected one. Octaves must
/// always be equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchRule {
    /// Spelling must match: a played `A#` does not satisfy `Bb`.
    #[default]
    Exact,
    /// Sounding pitch must match: `A#` satisfies `Bb`.
    Enharmonic,
}

impl MatchRule {
    pub fn matches(self, expected: PitchWithOctave, played: PitchWithOctave) -> bool {
        if expected.octave != played.octave {
            return false;
        }
        match self {
            MatchRule::Exact => expected.pitch == played.pitch,
            MatchRule::Enharmonic => expected.pitch.is_enharmonic(played.pitch),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MatchRule::Exact => "exact",
            MatchRule::Enharmonic => "enharmonic",
        }
    }
}

impl fmt::Display for MatchRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown match rule {0:?} (expected \"exact\" or \"enharmonic\")")]
pub struct ParseMatchRuleError(pub String);

impl FromStr for MatchRule {
    type Err = ParseMatchRuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "exact" => Ok(MatchRule::Exact),
            "enharmonic" => Ok(MatchRule::Enharmonic),
            _ => Err(ParseMatchRuleError(s.to_string())),
        }
    }
}

/// Outcome of one played note, ids in registry order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MatchReport {
    /// Challenges whose expected note was played.
    pub advanced: Vec<ChallengeId>,
    /// Challenges that lost progress, by mismatch or by another completing.
    /// Each id appears once, at the point it first lost progress.
    pub reset: Vec<ChallengeId>,
    /// Challenges finished by this note; already removed from the registry.
    pub completed: Vec<ChallengeId>,
}

impl MatchReport {
    pub fn is_empty(&self) -> bool {
        self.advanced.is_empty() && self.reset.is_empty() && self.completed.is_empty()
    }

    fn push_reset(&mut self, id: ChallengeId) {
        if !self.reset.contains(&id) {
            self.reset.push(id);
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Matcher {
    rule: MatchRule,
}

impl Matcher {
    pub fn new(rule: MatchRule) -> Self {
        Matcher { rule }
    }

    pub fn rule(&self) -> MatchRule {
        self.rule
    }

    /// Apply one played note to every live challenge, in insertion order.
    ///
    /// A challenge that completes is removed on the spot and every other
    /// challenge is reset before the pass moves on. Later challenges are
    /// judged on that post-reset state, so a challenge an earlier completion
    /// wiped out cannot finish on its old progress. Ids removed mid-pass are
    /// skipped.
    pub fn on_played_note(&self, registry: &mut Registry, note: &PlayedNote) -> MatchReport {
        let played = note.pitch_with_octave();
        let order: Vec<ChallengeId> = registry.list().iter().map(|c| c.id).collect();
        let mut report = MatchReport::default();

        for id in order {
            let Some(challenge) = registry.get(id) else {
                continue;
            };
            let Some(expected) = challenge.expected() else {
                continue;
            };
            let had_progress = challenge.current_index > 0;

            if !self.rule.matches(expected, played) {
                if registry.reset_progress(id).is_some() && had_progress {
                    report.push_reset(id);
                }
                continue;
            }

            let Some(updated) = registry.advance(id) else {
                continue;
            };
            report.advanced.push(id);
            if !updated.is_complete() {
                continue;
            }

            report.completed.push(id);
            if let Some(done) = registry.remove(id) {
                info!("Challenge complete: {}", done.display_name());
            }
            for other in registry.list().iter() {
                if other.current_index > 0 {
                    report.push_reset(other.id);
                }
            }
            registry.reset_all();
        }

        debug!(
            "{} -> {} advanced, {} reset, {} completed",
            played,
            report.advanced.len(),
            report.reset.len(),
            report.completed.len()
        );
        report
    }
}
