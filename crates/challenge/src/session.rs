//! Spawning challenges and running a practice session.

use theory::{assign_octaves, generate_melody, Key, RandomSource};
use tracing::{debug, warn};

use crate::challenge::ChallengeId;
use crate::input::{InputError, InputEvent, NoteSource, PlayedNote};
use crate::matcher::{MatchReport, Matcher};
use crate::registry::{Registry, RegistryError};
use crate::tracker::{NoteTracker, ReleasedNote};

/// Generate a melody in `key`, place it in octaves and register it.
///
/// Returns `Ok(None)` when the generator produced nothing (length ≤ 0).
pub fn spawn_challenge(
    registry: &mut Registry,
    key: Key,
    length: i32,
    rng: &mut dyn RandomSource,
    name: Option<String>,
) -> Result<Option<ChallengeId>, RegistryError> {
    let melody = generate_melody(key, length, rng);
    if melody.is_empty() {
        debug!("Not spawning: empty melody for {} length {}", key, length);
        return Ok(None);
    }

    let notes = assign_octaves(&melody);
    registry.create(notes, name).map(Some)
}

/// What a single input event did.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionOutcome {
    Pressed { note: PlayedNote, report: MatchReport },
    Released(Option<ReleasedNote>),
}

/// Registry, matcher and held-note tracker driven by one input stream.
#[derive(Debug, Default)]
pub struct PracticeSession {
    registry: Registry,
    matcher: Matcher,
    tracker: NoteTracker,
}

impl PracticeSession {
    pub fn new(registry: Registry, matcher: Matcher) -> Self {
        PracticeSession {
            registry,
            matcher,
            tracker: NoteTracker::new(),
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    pub fn tracker(&self) -> &NoteTracker {
        &self.tracker
    }

    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    pub fn spawn(
        &mut self,
        key: Key,
        length: i32,
        rng: &mut dyn RandomSource,
        name: Option<String>,
    ) -> Result<Option<ChallengeId>, RegistryError> {
        spawn_challenge(&mut self.registry, key, length, rng, name)
    }

    /// Hold a note down and match it against the live challenges.
    pub fn press(&mut self, note: PlayedNote) -> MatchReport {
        self.tracker.press(note);
        self.matcher.on_played_note(&mut self.registry, &note)
    }

    pub fn release(&mut self, number: u8, at_ms: u64) -> Option<ReleasedNote> {
        self.tracker.release(number, at_ms)
    }

    pub fn release_all(&mut self, at_ms: u64) -> Vec<ReleasedNote> {
        self.tracker.release_all(at_ms)
    }

    /// Feed a decoded input event.
    pub fn handle(
        &mut self,
        event: InputEvent,
        source: NoteSource,
        at_ms: u64,
    ) -> Result<SessionOutcome, InputError> {
        match event {
            InputEvent::Press { number, velocity } => {
                let note = PlayedNote::from_midi(number, velocity, source, at_ms)
                    .inspect_err(|e| warn!("Rejected {} input: {}", source.as_str(), e))?;
                let report = self.press(note);
                Ok(SessionOutcome::Pressed { note, report })
            }
            InputEvent::Release { number } => {
                Ok(SessionOutcome::Released(self.release(number, at_ms)))
            }
        }
    }
}
