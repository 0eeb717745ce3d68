//! One-shot command implementations

use anyhow::Result;
use rand::rngs::StdRng;
use rand::SeedableRng;
use theory::{assign_octaves, chords_of_quality, generate_melody, key_notes, Chord, ChordQuality, Key};

use abc::{encode_sequence, Duration, PhraseUnit, Sequence, TimedNote, UnitMeta};
use notaconf::{ConfigSources, NotaConfig};

use crate::output::Style;

/// Print the notes of a key on one line
pub fn scale(key: Key) -> Result<()> {
    let names: Vec<&str> = key_notes(key).iter().map(|p| p.name()).collect();
    println!("{}", names.join(" "));
    Ok(())
}

/// Print triads grouped by quality, one quality per line
pub fn chords(key: Key, only: Option<ChordQuality>, style: &Style) -> Result<()> {
    let qualities: Vec<ChordQuality> = match only {
        Some(q) => vec![q],
        None => ChordQuality::ALL.to_vec(),
    };

    println!("{}", style.heading(&key.to_string()));
    for quality in qualities {
        let chords: Vec<String> = chords_of_quality(key, quality)
            .into_iter()
            .map(|tones| {
                let symbol = Chord::new(tones[0], quality).symbol();
                format!("{} ({} {} {})", symbol, tones[0], tones[1], tones[2])
            })
            .collect();
        println!("{:<11}{}", format!("{}:", quality_name(quality)), chords.join("  "));
    }
    Ok(())
}

fn quality_name(quality: ChordQuality) -> &'static str {
    match quality {
        ChordQuality::Major => "major",
        ChordQuality::Minor => "minor",
        ChordQuality::Diminished => "diminished",
    }
}

/// Build the single-voice sequence for a generated melody.
pub fn melody_sequence(key: Key, length: i32, rng: &mut StdRng, duration: Duration) -> Sequence {
    let melody = generate_melody(key, length, rng);
    let units = assign_octaves(&melody).into_iter().map(|placed| {
        PhraseUnit::single(TimedNote {
            pitch: placed,
            duration,
        })
        .with_meta(UnitMeta {
            chord: None,
            tonic: Some(key.tonic()),
        })
    });
    Sequence::new().with_key(key).with_voice("treble", units)
}

/// Print a generated melody as an ABC document
pub fn melody(key: Key, length: i32, seed: Option<u64>, duration: Duration) -> Result<()> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let seq = melody_sequence(key, length, &mut rng, duration);
    println!("{}", encode_sequence(&seq));
    Ok(())
}

/// Print the effective config, optionally preceded by where it came from
pub fn config(config: &NotaConfig, sources: Option<&ConfigSources>) {
    if let Some(sources) = sources {
        if sources.files.is_empty() {
            println!("# Files: (none, using defaults)");
        }
        for file in &sources.files {
            println!("# File: {}", file.display());
        }
        for var in &sources.env_overrides {
            println!("# Env: {}", var);
        }
        println!();
    }
    print!("{}", config.to_toml());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_melody_sequence_is_seeded() {
        let a = melody_sequence(Key::AMinor, 6, &mut StdRng::seed_from_u64(5), Duration::QUARTER);
        let b = melody_sequence(Key::AMinor, 6, &mut StdRng::seed_from_u64(5), Duration::QUARTER);
        assert_eq!(encode_sequence(&a), encode_sequence(&b));
        assert_eq!(a.voice("treble").map(|v| v.units.len()), Some(6));
    }

    #[test]
    fn test_melody_sequence_empty_for_zero_length() {
        let seq = melody_sequence(Key::CMajor, 0, &mut StdRng::seed_from_u64(1), Duration::HALF);
        assert_eq!(seq.voice("treble").map(|v| v.units.len()), Some(0));
    }
}
