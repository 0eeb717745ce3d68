//! The challenge registry.
//!
//! The registry owns every live challenge. Each mutation builds a new
//! collection and swaps it in, so a [`Snapshot`] handed out earlier keeps
//! showing the state it was taken from. Observers are told about every
//! change, in order, with the snapshot that change produced.

use std::collections::HashSet;
use std::sync::Arc;

use theory::PitchWithOctave;
use thiserror::Error;
use tracing::{debug, info};

use crate::challenge::{Challenge, ChallengeId};

/// Immutable view of the registry at one point in time, in insertion order.
pub type Snapshot = Arc<[Challenge]>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("a challenge needs at least one note")]
    EmptyChallenge,
}

/// What changed in the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryEvent {
    Created(ChallengeId),
    Removed(ChallengeId),
    Advanced { id: ChallengeId, current_index: usize },
    ProgressReset(ChallengeId),
    AllReset,
}

/// Receives registry changes.
///
/// Implement this to redraw a display or forward progress elsewhere.
pub trait RegistryObserver {
    fn on_change(&self, event: &RegistryEvent, snapshot: &Snapshot);
}

/// Observer that logs every change.
///
/// Nothing is attached by default; add it with [`Registry::with_observer`].
pub struct LoggingObserver;

impl RegistryObserver for LoggingObserver {
    fn on_change(&self, event: &RegistryEvent, snapshot: &Snapshot) {
        match event {
            RegistryEvent::Created(id) => {
                info!("Challenge created: {} ({} live)", id, snapshot.len())
            }
            RegistryEvent::Removed(id) => {
                info!("Challenge removed: {} ({} live)", id, snapshot.len())
            }
            RegistryEvent::Advanced { id, current_index } => {
                debug!("Challenge {} advanced to {}", id, current_index)
            }
            RegistryEvent::ProgressReset(id) => debug!("Challenge {} reset", id),
            RegistryEvent::AllReset => debug!("All challenges reset"),
        }
    }
}

pub struct Registry {
    challenges: Snapshot,
    /// Every id handed out, including removed ones, so none is reused.
    issued: HashSet<ChallengeId>,
    observers: Vec<Box<dyn RegistryObserver>>,
}

impl Default for Registry {
    fn default() -> Self {
        Self {
            challenges: Arc::from(Vec::new()),
            issued: HashSet::new(),
            observers: Vec::new(),
        }
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("challenges", &self.challenges)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_observer(mut self, observer: Box<dyn RegistryObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn add_observer(&mut self, observer: Box<dyn RegistryObserver>) {
        self.observers.push(observer);
    }

    /// Add a challenge with progress 0 and return its new id.
    ///
    /// Ids are never reused for the lifetime of the registry, even after
    /// the challenge that held one is removed.
    pub fn create(
        &mut self,
        notes: Vec<PitchWithOctave>,
        name: Option<String>,
    ) -> Result<ChallengeId, RegistryError> {
        self.create_with(notes, name, ChallengeId::new)
    }

    fn create_with(
        &mut self,
        notes: Vec<PitchWithOctave>,
        name: Option<String>,
        mut mint: impl FnMut() -> ChallengeId,
    ) -> Result<ChallengeId, RegistryError> {
        if notes.is_empty() {
            return Err(RegistryError::EmptyChallenge);
        }

        let mut id = mint();
        while !self.issued.insert(id) {
            debug!("Re-rolling reused challenge id {}", id);
            id = mint();
        }

        let mut next = self.challenges.to_vec();
        next.push(Challenge {
            id,
            notes,
            current_index: 0,
            name,
        });
        self.commit(next, RegistryEvent::Created(id));
        Ok(id)
    }

    /// Remove a challenge. Unknown ids are a no-op.
    pub fn remove(&mut self, id: ChallengeId) -> Option<Challenge> {
        let idx = self.position(id)?;
        let mut next = self.challenges.to_vec();
        let removed = next.remove(idx);
        self.commit(next, RegistryEvent::Removed(id));
        Some(removed)
    }

    /// Current snapshot. Cheap: clones the `Arc`.
    pub fn list(&self) -> Snapshot {
        Arc::clone(&self.challenges)
    }

    pub fn get(&self, id: ChallengeId) -> Option<&Challenge> {
        self.challenges.iter().find(|c| c.id == id)
    }

    pub fn len(&self) -> usize {
        self.challenges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.challenges.is_empty()
    }

    /// Move a challenge one note forward, clamped at its length.
    pub fn advance(&mut self, id: ChallengeId) -> Option<Challenge> {
        let idx = self.position(id)?;
        let mut next = self.challenges.to_vec();
        let challenge = &mut next[idx];
        challenge.current_index = (challenge.current_index + 1).min(challenge.notes.len());
        let updated = challenge.clone();
        self.commit(
            next,
            RegistryEvent::Advanced {
                id,
                current_index: updated.current_index,
            },
        );
        Some(updated)
    }

    /// Put a challenge back at its first note.
    ///
    /// A challenge already at 0 is returned as-is without a new snapshot.
    pub fn reset_progress(&mut self, id: ChallengeId) -> Option<Challenge> {
        let idx = self.position(id)?;
        if self.challenges[idx].current_index == 0 {
            return Some(self.challenges[idx].clone());
        }

        let mut next = self.challenges.to_vec();
        next[idx].current_index = 0;
        let updated = next[idx].clone();
        self.commit(next, RegistryEvent::ProgressReset(id));
        Some(updated)
    }

    pub fn reset_all(&mut self) {
        if self.challenges.iter().all(|c| c.current_index == 0) {
            return;
        }

        let next = self
            .challenges
            .iter()
            .cloned()
            .map(|mut c| {
                c.current_index = 0;
                c
            })
            .collect();
        self.commit(next, RegistryEvent::AllReset);
    }

    fn position(&self, id: ChallengeId) -> Option<usize> {
        self.challenges.iter().position(|c| c.id == id)
    }

    fn commit(&mut self, next: Vec<Challenge>, event: RegistryEvent) {
        self.challenges = next.into();
        for observer in &self.observers {
            observer.on_change(&event, &self.challenges);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::rc::Rc;
    use theory::PitchClass as P;

    fn notes(list: &[(P, i8)]) -> Vec<PitchWithOctave> {
        list.iter()
            .map(|(p, o)| PitchWithOctave::new(*p, *o))
            .collect()
    }

    struct Recorder(Rc<RefCell<Vec<(RegistryEvent, usize)>>>);

    impl RegistryObserver for Recorder {
        fn on_change(&self, event: &RegistryEvent, snapshot: &Snapshot) {
            self.0.borrow_mut().push((event.clone(), snapshot.len()));
        }
    }

    #[test]
    fn test_create_and_list() {
        let mut registry = Registry::new();
        let a = registry
            .create(notes(&[(P::C, 4), (P::D, 4)]), Some("a".into()))
            .unwrap();
        let b = registry.create(notes(&[(P::E, 4)]), None).unwrap();
        assert_ne!(a, b);

        let snapshot = registry.list();
        let ids: Vec<_> = snapshot.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![a, b]);
        assert_eq!(snapshot[0].current_index, 0);
        assert_eq!(snapshot[0].name.as_deref(), Some("a"));
    }

    #[test]
    fn test_removed_ids_are_never_reissued() {
        let mut registry = Registry::new();
        let first = registry.create(notes(&[(P::C, 4)]), None).unwrap();
        registry.remove(first).unwrap();

        let fresh = ChallengeId::new();
        let mut minted = vec![fresh, first];
        let id = registry
            .create_with(notes(&[(P::D, 4)]), None, || minted.pop().unwrap())
            .unwrap();

        assert_eq!(id, fresh);
        assert!(minted.is_empty());
    }

    #[test]
    fn test_no_observer_by_default() {
        assert!(Registry::default().observers.is_empty());
        let registry = Registry::new().with_observer(Box::new(LoggingObserver));
        assert_eq!(registry.observers.len(), 1);
    }

    #[test]
    fn test_empty_notes_rejected() {
        let mut registry = Registry::new();
        assert_eq!(
            registry.create(Vec::new(), None),
            Err(RegistryError::EmptyChallenge)
        );
        assert!(registry.is_empty());
    }

    #[test]
    fn test_snapshots_do_not_change() {
        let mut registry = Registry::new();
        let id = registry.create(notes(&[(P::C, 4), (P::D, 4)]), None).unwrap();
        let before = registry.list();

        registry.advance(id);
        registry.create(notes(&[(P::G, 4)]), None).unwrap();

        assert_eq!(before.len(), 1);
        assert_eq!(before[0].current_index, 0);
        assert_eq!(registry.list().len(), 2);
        assert_eq!(registry.get(id).map(|c| c.current_index), Some(1));
    }

    #[test]
    fn test_advance_clamps() {
        let mut registry = Registry::new();
        let id = registry.create(notes(&[(P::C, 4)]), None).unwrap();
        assert_eq!(registry.advance(id).map(|c| c.current_index), Some(1));
        assert_eq!(registry.advance(id).map(|c| c.current_index), Some(1));
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut registry = Registry::new();
        let id = registry.create(notes(&[(P::C, 4), (P::D, 4)]), None).unwrap();
        assert_eq!(registry.reset_progress(id).map(|c| c.current_index), Some(0));

        registry.advance(id);
        assert_eq!(registry.reset_progress(id).map(|c| c.current_index), Some(0));
        assert_eq!(registry.reset_progress(id).map(|c| c.current_index), Some(0));
    }

    #[test]
    fn test_unknown_id_is_none() {
        let mut registry = Registry::new();
        let stranger = ChallengeId::new();
        assert!(registry.advance(stranger).is_none());
        assert!(registry.reset_progress(stranger).is_none());
        assert!(registry.remove(stranger).is_none());
        assert!(registry.get(stranger).is_none());
    }

    #[test]
    fn test_remove_returns_challenge() {
        let mut registry = Registry::new();
        let a = registry.create(notes(&[(P::C, 4)]), None).unwrap();
        let b = registry.create(notes(&[(P::D, 4)]), None).unwrap();

        let removed = registry.remove(a).unwrap();
        assert_eq!(removed.id, a);
        let ids: Vec<_> = registry.list().iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![b]);
    }

    #[test]
    fn test_reset_all() {
        let mut registry = Registry::new();
        let a = registry.create(notes(&[(P::C, 4), (P::D, 4)]), None).unwrap();
        let b = registry.create(notes(&[(P::E, 4), (P::F, 4)]), None).unwrap();
        registry.advance(a);
        registry.advance(b);

        registry.reset_all();
        assert!(registry.list().iter().all(|c| c.current_index == 0));
    }

    #[test]
    fn test_observers_see_every_change_in_order() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let mut registry = Registry::new().with_observer(Box::new(Recorder(events.clone())));

        let id = registry.create(notes(&[(P::C, 4), (P::D, 4)]), None).unwrap();
        registry.advance(id);
        registry.reset_progress(id);
        registry.reset_progress(id);
        registry.reset_all();
        registry.remove(id);

        assert_eq!(
            *events.borrow(),
            vec![
                (RegistryEvent::Created(id), 1),
                (
                    RegistryEvent::Advanced {
                        id,
                        current_index: 1
                    },
                    1
                ),
                (RegistryEvent::ProgressReset(id), 1),
                (RegistryEvent::Removed(id), 0),
            ]
        );
    }
}
