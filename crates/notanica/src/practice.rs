//! Line-oriented practice loop.
//!
//! Every input line is either a command (`:spawn`, `:list`, ...) or a set of
//! notes pressed together. A one-character token is a computer-keyboard key;
//! anything longer must be a MIDI note number. The notes of one line stay
//! held until the next line of notes, so `:held` can name the chord.

use std::io::{self, BufRead, Write};
use std::time::Instant;

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::json;
use tracing::{debug, info, warn};

use abc::encode_sequence;
use challenge::{
    ChallengeId, KeyboardLayout, LoggingObserver, MatchReport, Matcher, NoteSource, PlayedNote,
    PracticeSession, Registry, Snapshot,
};
use notaconf::PracticeConfig;

use crate::output::{challenge_line, Style};

/// Velocity given to notes typed on stdin.
const TYPED_VELOCITY: u8 = 100;

const HELP: &str = "\
Type notes to play them together, one chord per line:
  e r t        keyboard keys (e = C4, lower row z..'/' from A2)
  60 64 67     MIDI note numbers
Commands:
  :spawn       add another challenge
  :list        show challenges
  :abc         print challenges as ABC
  :held        show held notes and chords
  :reset       reset all progress
  :help        this text
  :quit        stop";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Spawn,
    List,
    Abc,
    Held,
    Reset,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Line {
    Blank,
    Command(Command),
    Notes(Vec<(u8, NoteSource)>),
}

fn parse_line(line: &str, layout: &KeyboardLayout) -> Result<Line, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(Line::Blank);
    }

    if let Some(name) = line.strip_prefix(':') {
        let command = match name.trim().to_lowercase().as_str() {
            "spawn" | "s" => Command::Spawn,
            "list" | "l" => Command::List,
            "abc" => Command::Abc,
            "held" => Command::Held,
            "reset" => Command::Reset,
            "help" | "h" | "?" => Command::Help,
            "quit" | "q" | "exit" => Command::Quit,
            other => return Err(format!("unknown command ':{}'", other)),
        };
        return Ok(Line::Command(command));
    }

    let mut notes = Vec::new();
    for token in line.split_whitespace() {
        if let Some(number) = layout.note_for_str(token) {
            notes.push((number, NoteSource::Keyboard));
        } else if token.chars().all(|c| c.is_ascii_digit()) {
            let number = token
                .parse::<u8>()
                .map_err(|_| format!("'{}' is not a MIDI note number", token))?;
            notes.push((number, NoteSource::Text));
        } else {
            return Err(format!("unrecognized input '{}'", token));
        }
    }
    Ok(Line::Notes(notes))
}

struct Practice<'a> {
    settings: &'a PracticeConfig,
    session: PracticeSession,
    layout: KeyboardLayout,
    rng: StdRng,
    spawned: usize,
    completed: Vec<String>,
    json: bool,
    style: Style,
    started: Instant,
}

impl<'a> Practice<'a> {
    fn new(settings: &'a PracticeConfig, json: bool, style: Style) -> Self {
        let rng = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let registry = Registry::new().with_observer(Box::new(LoggingObserver));

        Practice {
            settings,
            session: PracticeSession::new(registry, Matcher::new(settings.match_rule)),
            layout: KeyboardLayout::new(),
            rng,
            spawned: 0,
            completed: Vec::new(),
            json,
            style,
            started: Instant::now(),
        }
    }

    fn now_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }

    fn spawn(&mut self) -> Result<Option<String>> {
        let name = format!("Melody {}", self.spawned + 1);
        let id = self
            .session
            .spawn(
                self.settings.key,
                self.settings.melody_length,
                &mut self.rng,
                Some(name.clone()),
            )
            .context("Failed to spawn challenge")?;
        if id.is_some() {
            self.spawned += 1;
            Ok(Some(name))
        } else {
            Ok(None)
        }
    }

    fn print_status<W: Write>(&self, out: &mut W) -> Result<()> {
        let snapshot = self.session.registry().list();
        if self.json {
            writeln!(out, "{}", json!({ "challenges": &snapshot[..] }))?;
            return Ok(());
        }
        if snapshot.is_empty() {
            writeln!(out, "{}", self.style.dim("No challenges. :spawn for another."))?;
        }
        for challenge in snapshot.iter() {
            writeln!(out, "  {}", challenge_line(challenge, &self.style))?;
        }
        Ok(())
    }

    fn play<W: Write>(&mut self, notes: Vec<(u8, NoteSource)>, out: &mut W) -> Result<()> {
        let now = self.now_ms();
        self.session.release_all(now);

        let mut played = Vec::new();
        let mut reports = Vec::new();
        for (number, source) in notes {
            let note = match PlayedNote::from_midi(number, TYPED_VELOCITY, source, now) {
                Ok(note) => note,
                Err(e) => {
                    warn!("Skipping typed note: {}", e);
                    self.message(out, &e.to_string(), true)?;
                    continue;
                }
            };
            let before = self.session.registry().list();
            let report = self.session.press(note);
            for id in &report.completed {
                self.completed.push(name_in(&before, *id));
            }
            if !self.json {
                self.describe(&note, &report, &before, out)?;
            }
            played.push(note);
            reports.push(report);
        }

        let chords: Vec<String> = self
            .session
            .tracker()
            .held_chords()
            .iter()
            .map(|c| c.symbol())
            .collect();

        if self.json {
            let snapshot = self.session.registry().list();
            writeln!(
                out,
                "{}",
                json!({
                    "played": played,
                    "reports": reports,
                    "chords": chords,
                    "challenges": &snapshot[..],
                })
            )?;
            return Ok(());
        }

        if !chords.is_empty() {
            writeln!(out, "{} {}", self.style.heading("chord"), chords.join(" "))?;
        }
        self.print_status(out)
    }

    fn describe<W: Write>(
        &self,
        note: &PlayedNote,
        report: &MatchReport,
        before: &Snapshot,
        out: &mut W,
    ) -> Result<()> {
        let mut parts = vec![note.pitch_with_octave().to_string()];
        for id in &report.completed {
            parts.push(self.style.good(&format!("completed {}", name_in(before, *id))));
        }
        if !report.advanced.is_empty() {
            parts.push(self.style.good(&format!("+{}", report.advanced.len())));
        }
        for id in &report.reset {
            parts.push(self.style.warn(&format!("reset {}", name_in(before, *id))));
        }
        writeln!(out, "{}", parts.join("  "))?;
        Ok(())
    }

    fn message<W: Write>(&self, out: &mut W, text: &str, error: bool) -> Result<()> {
        if self.json {
            let line = if error {
                json!({ "error": text })
            } else {
                json!({ "message": text })
            };
            writeln!(out, "{}", line)?;
        } else if error {
            writeln!(out, "{}", self.style.bad(text))?;
        } else {
            writeln!(out, "{}", text)?;
        }
        Ok(())
    }

    /// Returns false when the loop should stop.
    fn command<W: Write>(&mut self, command: Command, out: &mut W) -> Result<bool> {
        match command {
            Command::Spawn => match self.spawn()? {
                Some(name) => {
                    self.message(out, &format!("spawned {}", name), false)?;
                    self.print_status(out)?;
                }
                None => self.message(out, "melody length is 0, nothing to spawn", true)?,
            },
            Command::List => self.print_status(out)?,
            Command::Abc => {
                let snapshot = self.session.registry().list();
                let documents: Vec<String> = snapshot
                    .iter()
                    .map(|c| encode_sequence(&c.to_sequence(self.settings.key)))
                    .collect();
                if self.json {
                    writeln!(out, "{}", json!({ "abc": documents }))?;
                } else {
                    for (challenge, document) in snapshot.iter().zip(&documents) {
                        writeln!(out, "{}", self.style.heading(&challenge.display_name()))?;
                        writeln!(out, "{}", document)?;
                    }
                }
            }
            Command::Held => {
                let tracker = self.session.tracker();
                let held: Vec<String> = tracker
                    .active()
                    .iter()
                    .map(|n| n.pitch_with_octave().to_string())
                    .collect();
                let chords: Vec<String> =
                    tracker.held_chords().iter().map(|c| c.symbol()).collect();
                if self.json {
                    writeln!(out, "{}", json!({ "held": held, "chords": chords }))?;
                } else if held.is_empty() {
                    writeln!(out, "{}", self.style.dim("nothing held"))?;
                } else {
                    writeln!(out, "held {}", held.join(" "))?;
                    if !chords.is_empty() {
                        writeln!(out, "{} {}", self.style.heading("chord"), chords.join(" "))?;
                    }
                    writeln!(out, "{}", encode_sequence(&tracker.active_sequence()))?;
                }
            }
            Command::Reset => {
                self.session.registry_mut().reset_all();
                self.print_status(out)?;
            }
            Command::Help => {
                if self.json {
                    self.message(out, HELP, false)?;
                } else {
                    writeln!(out, "{}", HELP)?;
                }
            }
            Command::Quit => return Ok(false),
        }
        Ok(true)
    }

    fn summary<W: Write>(&self, out: &mut W) -> Result<()> {
        info!(
            completed = self.completed.len(),
            remaining = self.session.registry().len(),
            "practice finished"
        );
        if self.json {
            writeln!(
                out,
                "{}",
                json!({
                    "completed": self.completed,
                    "remaining": self.session.registry().len(),
                })
            )?;
        } else {
            writeln!(
                out,
                "{} {} completed, {} remaining",
                self.style.heading("done:"),
                self.completed.len(),
                self.session.registry().len()
            )?;
        }
        Ok(())
    }
}

fn name_in(snapshot: &Snapshot, id: ChallengeId) -> String {
    snapshot
        .iter()
        .find(|c| c.id == id)
        .map(|c| c.display_name())
        .unwrap_or_else(|| id.to_string())
}

/// Run the practice loop over any line source, writing to `out`.
pub fn run<R: BufRead, W: Write>(
    input: R,
    out: &mut W,
    settings: &PracticeConfig,
    json: bool,
    style: Style,
) -> Result<()> {
    let mut practice = Practice::new(settings, json, style);

    for _ in 0..settings.challenges {
        if practice.spawn()?.is_none() {
            break;
        }
    }
    debug!(spawned = practice.spawned, key = %settings.key, "practice started");

    if !json {
        writeln!(
            out,
            "{} in {} ({} matching). :help for commands.",
            style.heading("Practice"),
            settings.key,
            settings.match_rule
        )?;
    }
    practice.print_status(out)?;

    for line in input.lines() {
        let line = line.context("Failed to read input")?;
        match parse_line(&line, &practice.layout) {
            Ok(Line::Blank) => {}
            Ok(Line::Command(command)) => {
                if !practice.command(command, out)? {
                    break;
                }
            }
            Ok(Line::Notes(notes)) => practice.play(notes, out)?,
            Err(e) => practice.message(out, &e, true)?,
        }
        out.flush()?;
    }

    let now = practice.now_ms();
    practice.session.release_all(now);
    practice.summary(out)
}

pub fn run_stdin(settings: &PracticeConfig, json: bool, style: &Style) -> Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    run(stdin.lock(), &mut out, settings, json, *style)
}
