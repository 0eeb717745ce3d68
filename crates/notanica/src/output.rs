//! Terminal formatting.

use challenge::Challenge;
use owo_colors::OwoColorize;

/// Colours output unless disabled with `--no-color`.
#[derive(Debug, Clone, Copy)]
pub struct Style {
    color: bool,
}

impl Style {
    pub fn new(color: bool) -> Self {
        Style { color }
    }

    pub fn plain() -> Self {
        Style { color: false }
    }

    pub fn good(&self, text: &str) -> String {
        if self.color {
            text.bright_green().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn warn(&self, text: &str) -> String {
        if self.color {
            text.bright_yellow().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn bad(&self, text: &str) -> String {
        if self.color {
            text.bright_red().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn heading(&self, text: &str) -> String {
        if self.color {
            text.bright_cyan().bold().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn dim(&self, text: &str) -> String {
        if self.color {
            text.dimmed().to_string()
        } else {
            text.to_string()
        }
    }
}

/// One status line: name, matched notes, then the rest with the next one marked.
///
/// `Warmup  C4 D4 >E4 F4  (2/4)`
pub fn challenge_line(challenge: &Challenge, style: &Style) -> String {
    let notes: Vec<String> = challenge
        .notes
        .iter()
        .enumerate()
        .map(|(i, note)| {
            let text = note.to_string();
            if i < challenge.current_index {
                style.good(&text)
            } else if i == challenge.current_index {
                format!(">{}", text)
            } else {
                style.dim(&text)
            }
        })
        .collect();

    format!(
        "{}  {}  ({}/{})",
        challenge.display_name(),
        notes.join(" "),
        challenge.current_index,
        challenge.notes.len()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use challenge::ChallengeId;
    use theory::{PitchClass as P, PitchWithOctave};

    #[test]
    fn test_plain_challenge_line() {
        let challenge = Challenge {
            id: ChallengeId::new(),
            notes: vec![
                PitchWithOctave::new(P::C, 4),
                PitchWithOctave::new(P::D, 4),
                PitchWithOctave::new(P::E, 4),
            ],
            current_index: 1,
            name: Some("Warmup".into()),
        };
        assert_eq!(
            challenge_line(&challenge, &Style::plain()),
            "Warmup  C4 >D4 E4  (1/3)"
        );
    }

    #[test]
    fn test_plain_style_passes_text_through() {
        let style = Style::plain();
        assert_eq!(style.good("ok"), "ok");
        assert_eq!(style.heading("Title"), "Title");
    }
}
