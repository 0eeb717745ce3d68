//! Ear-training challenges.
//!
//! A [`Registry`] holds challenges: generated melodies the player must
//! reproduce note by note. The [`Matcher`] applies each played note to
//! every live challenge, and [`PracticeSession`] wires both to a held-note
//! tracker fed from MIDI messages or a computer keyboard.
//!
//! # Example
//!
//! ```
//! use challenge::{NoteSource, PlayedNote, PracticeSession};
//! use theory::{PitchClass, PitchWithOctave};
//!
//! let mut session = PracticeSession::default();
//! let id = session
//!     .registry_mut()
//!     .create(
//!         vec![PitchWithOctave::new(PitchClass::C, 4), PitchWithOctave::new(PitchClass::D, 4)],
//!         None,
//!     )
//!     .unwrap();
//!
//! for number in [60, 62] {
//!     let note = PlayedNote::from_midi(number, 100, NoteSource::Midi, 0).unwrap();
//!     let report = session.press(note);
//!     if number == 62 {
//!         assert_eq!(report.completed, vec![id]);
//!     }
//! }
//! assert!(session.registry().is_empty());
//! ```

pub mod challenge;
pub mod input;
pub mod keyboard;
pub mod matcher;
pub mod registry;
pub mod session;
pub mod tracker;

pub use challenge::{Challenge, ChallengeId};
pub use input::{decode_midi_message, InputError, InputEvent, NoteSource, PlayedNote};
pub use keyboard::KeyboardLayout;
pub use matcher::{MatchReport, MatchRule, Matcher, ParseMatchRuleError};
pub use registry::{LoggingObserver, Registry, RegistryError, RegistryEvent, RegistryObserver, Snapshot};
pub use session::{spawn_challenge, PracticeSession, SessionOutcome};
pub use tracker::{NoteTracker, ReleasedNote};
