//! Played-note input: MIDI note numbers and raw MIDI messages.

use serde::{Deserialize, Serialize};
use theory::{PitchClass, PitchWithOctave};
use thiserror::Error;
use tracing::debug;

/// Highest valid MIDI note number and velocity.
pub const MIDI_MAX: u8 = 127;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("MIDI note number {0} is out of range (0-127)")]
    NoteOutOfRange(u8),

    #[error("velocity {0} is out of range (0-127)")]
    VelocityOutOfRange(u8),
}

/// What produced a played note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteSource {
    Midi,
    Keyboard,
    Text,
}

impl NoteSource {
    pub fn as_str(self) -> &'static str {
        match self {
            NoteSource::Midi => "midi",
            NoteSource::Keyboard => "keyboard",
            NoteSource::Text => "text",
        }
    }
}

/// A note event from a player.
///
/// Pitch class and octave are derived from the MIDI number, so the
/// spelling is always the sharp one (`A#`, never `Bb`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayedNote {
    pub number: u8,
    pub pitch: PitchClass,
    pub octave: i8,
    pub velocity: u8,
    pub timestamp_ms: u64,
    pub source: NoteSource,
}

impl PlayedNote {
    pub fn from_midi(
        number: u8,
        velocity: u8,
        source: NoteSource,
        timestamp_ms: u64,
    ) -> Result<Self, InputError> {
        if number > MIDI_MAX {
            return Err(InputError::NoteOutOfRange(number));
        }
        if velocity > MIDI_MAX {
            return Err(InputError::VelocityOutOfRange(velocity));
        }

        let placed = PitchWithOctave::from_midi(number);
        Ok(PlayedNote {
            number,
            pitch: placed.pitch,
            octave: placed.octave,
            velocity,
            timestamp_ms,
            source,
        })
    }

    pub fn pitch_with_octave(&self) -> PitchWithOctave {
        PitchWithOctave::new(self.pitch, self.octave)
    }
}

/// A key going down or coming up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Press { number: u8, velocity: u8 },
    Release { number: u8 },
}

/// Decode a raw MIDI message into a press or release.
///
/// Note On with velocity 0 counts as a release. The channel is ignored.
/// Everything other than note on/off yields `None`.
pub fn decode_midi_message(data: &[u8]) -> Option<InputEvent> {
    if data.len() < 3 {
        return None;
    }

    let status = data[0];
    let number = data[1];
    if number > MIDI_MAX {
        return None;
    }

    match status & 0xF0 {
        0x90 if data[2] == 0 => Some(InputEvent::Release { number }),
        0x90 => Some(InputEvent::Press {
            number,
            velocity: data[2],
        }),
        0x80 => Some(InputEvent::Release { number }),
        _ => {
            debug!("Ignoring MIDI message type: {:02X}", status);
            None
        }
    }
}
