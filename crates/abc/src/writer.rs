//! ABC text output.
//!
//! The unit length is fixed at `L: 1/1`, so every note carries its
//! duration as an explicit fraction of a whole note and no arithmetic is
//! needed to render it.

use theory::{Accidental, Key, PitchWithOctave};
use tracing::debug;

use crate::sequence::{PhraseUnit, Sequence, TimedNote};

/// Render a sequence as an ABC document.
///
/// ```
/// use abc::{encode_sequence, Duration, PhraseUnit, Sequence, TimedNote};
/// use theory::PitchClass;
///
/// let seq = Sequence::new().with_voice(
///     "treble",
///     [PhraseUnit::single(TimedNote::new(PitchClass::C, 4, Duration::QUARTER))],
/// );
/// assert_eq!(
///     encode_sequence(&seq),
///     "X: 1\nM: 4/4\nL: 1/1\nK: Cmajor\nV:treble clef=treble\n[C1/4]"
/// );
/// ```
pub fn encode_sequence(seq: &Sequence) -> String {
    let key = seq.key.unwrap_or_default();
    let meter = seq.time_signature.unwrap_or_default();

    let mut lines = vec![
        format!("X: {}", seq.reference),
        format!("M: {}/{}", meter.numerator, meter.denominator),
        "L: 1/1".to_string(),
        format!("K: {}", key_field(key)),
    ];

    for voice in &seq.voices {
        lines.push(format!("V:{} clef={}", voice.name, voice.name));
        let units: Vec<String> = voice.units.iter().map(encode_unit).collect();
        lines.push(units.join(" "));
    }

    let document = lines.join("\n");
    debug!(
        voices = seq.voices.len(),
        bytes = document.len(),
        "encoded ABC document"
    );
    document
}

/// `Cmajor`, `Aminor`, `Fmajor`
fn key_field(key: Key) -> String {
    format!("{}{}", key.tonic(), key.mode().as_str())
}

/// Bracket the notes of one unit so they sound together.
pub fn encode_unit(unit: &PhraseUnit) -> String {
    let notes: Vec<String> = unit.notes.iter().map(encode_note).collect();
    format!("[{}]", notes.join(" "))
}

pub fn encode_note(note: &TimedNote) -> String {
    format!(
        "{}{}/{}",
        pitch_token(note.pitch),
        note.duration.numerator(),
        note.duration.denominator()
    )
}

/// The pitch part of a note token, e.g. `^F`, `_B`, `c'`, `C,,`.
///
/// Octaves 4 and below use the uppercase letter, 5 and above lowercase.
/// Each octave above 5 adds `'`; each octave below 4 adds `,`.
pub fn pitch_token(pitch: PitchWithOctave) -> String {
    let mut out = String::new();

    match pitch.pitch.accidental() {
        Some(Accidental::Sharp) => out.push('^'),
        Some(Accidental::Flat) => out.push('_'),
        None => {}
    }

    let letter = pitch.pitch.letter().as_char();
    let octave = pitch.octave;
    if octave >= 5 {
        out.push(letter.to_ascii_lowercase());
    } else {
        out.push(letter.to_ascii_uppercase());
    }

    if octave > 5 {
        out.extend(std::iter::repeat('\'').take((octave - 5) as usize));
    } else if octave < 4 {
        out.extend(std::iter::repeat(',').take((4 - octave as i16) as usize));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequence::Duration;
    use pretty_assertions::assert_eq;
    use theory::PitchClass as P;

    fn note(pitch: P, octave: i8, duration: Duration) -> String {
        encode_unit(&PhraseUnit::single(TimedNote::new(pitch, octave, duration)))
    }

    #[test]
    fn test_single_notes() {
        assert_eq!(note(P::C, 4, Duration::QUARTER), "[C1/4]");
        assert_eq!(note(P::D, 4, Duration::HALF), "[D1/2]");
        assert_eq!(note(P::FSharp, 4, Duration::QUARTER), "[^F1/4]");
        assert_eq!(note(P::BFlat, 4, Duration::QUARTER), "[_B1/4]");
    }

    #[test]
    fn test_registers() {
        assert_eq!(note(P::C, 5, Duration::QUARTER), "[c1/4]");
        assert_eq!(note(P::C, 6, Duration::QUARTER), "[c'1/4]");
        assert_eq!(note(P::E, 7, Duration::QUARTER), "[e''1/4]");
        assert_eq!(note(P::C, 3, Duration::QUARTER), "[C,1/4]");
        assert_eq!(note(P::C, 2, Duration::QUARTER), "[C,,1/4]");
        assert_eq!(note(P::A, -1, Duration::QUARTER), "[A,,,,,1/4]");
    }

    #[test]
    fn test_duration_written_verbatim() {
        let dotted = Duration::from_shorthand("q.").unwrap();
        assert_eq!(note(P::G, 4, dotted), "[G3/8]");
        assert_eq!(note(P::G, 4, Duration::new(2, 8).unwrap()), "[G2/8]");
    }

    #[test]
    fn test_stacked_unit() {
        let unit = PhraseUnit::stack(vec![
            TimedNote::new(P::C, 4, Duration::HALF),
            TimedNote::new(P::E, 4, Duration::HALF),
            TimedNote::new(P::G, 4, Duration::HALF),
        ]);
        assert_eq!(encode_unit(&unit), "[C1/2 E1/2 G1/2]");
    }

    #[test]
    fn test_pitch_token_has_no_duration() {
        assert_eq!(pitch_token(PitchWithOctave::new(P::EFlat, 5)), "_e");
        assert_eq!(pitch_token(PitchWithOctave::new(P::GSharp, 3)), "^G,");
    }

    #[test]
    fn test_header_defaults() {
        let doc = encode_sequence(&Sequence::new());
        assert_eq!(doc, "X: 1\nM: 4/4\nL: 1/1\nK: Cmajor");
    }

    #[test]
    fn test_key_fields() {
        for (key, field) in [
            (Key::CMajor, "Cmajor"),
            (Key::AMinor, "Aminor"),
            (Key::FMajor, "Fmajor"),
        ] {
            let doc = encode_sequence(&Sequence::new().with_key(key));
            assert!(doc.ends_with(&format!("K: {}", field)), "{}", doc);
        }
    }

    #[test]
    fn test_empty_voice_keeps_its_lines() {
        let mut seq = Sequence::new();
        seq.voice_mut("treble");
        assert_eq!(
            encode_sequence(&seq),
            "X: 1\nM: 4/4\nL: 1/1\nK: Cmajor\nV:treble clef=treble\n"
        );
    }

    #[test]
    fn test_encoding_logs_document_size() {
        use std::io::Write;
        use std::sync::{Arc, Mutex};

        #[derive(Clone, Default)]
        struct Logs(Arc<Mutex<Vec<u8>>>);

        impl Write for Logs {
            fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
                self.0.lock().unwrap().extend_from_slice(buf);
                Ok(buf.len())
            }

            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let logs = Logs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        let document = tracing::subscriber::with_default(subscriber, || {
            encode_sequence(&Sequence::new().with_voice("bass", Vec::<PhraseUnit>::new()))
        });

        let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("encoded ABC document"), "{}", output);
        assert!(output.contains(&format!("bytes={}", document.len())), "{}", output);
    }
}
