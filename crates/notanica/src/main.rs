//! notanica - ear-training from the terminal
//!
//! Subcommands:
//! - `notanica scale <key>` - Notes of a key
//! - `notanica chords <key>` - Triads of a key, grouped by quality
//! - `notanica melody <key>` - Generate a melody and print it as ABC
//! - `notanica practice` - Play generated challenges from stdin
//! - `notanica config` - Show the effective configuration

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use theory::{ChordQuality, Key};

mod commands;
mod output;
mod practice;

#[derive(Parser)]
#[command(name = "notanica")]
#[command(about = "Ear-training CLI: scales, chords, melodies and practice challenges")]
#[command(version)]
struct Cli {
    /// Config file (replaces ./notanica.toml)
    #[arg(long, global = true, env = "NOTANICA_CONFIG")]
    config: Option<PathBuf>,

    /// Disable coloured output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the notes of a key, tonic first
    Scale {
        /// Key (e.g. "C major", "Am", "fmaj")
        key: Key,
    },

    /// Print the triads of a key
    Chords {
        key: Key,

        /// Only this quality (major, minor, dim)
        #[arg(short, long, value_parser = parse_quality)]
        quality: Option<ChordQuality>,
    },

    /// Generate a melody and print it as an ABC document
    Melody {
        key: Key,

        /// Number of notes (defaults to the configured melody length)
        #[arg(short, long, allow_negative_numbers = true)]
        length: Option<i32>,

        /// RNG seed for a repeatable melody
        #[arg(short, long)]
        seed: Option<u64>,

        /// Note duration: a fraction like 1/8 or a name like q, h, e.
        #[arg(short, long, default_value = "q")]
        duration: abc::Duration,
    },

    /// Practice: play the spawned challenges by typing notes on stdin
    ///
    /// Each line holds one or more keyboard keys (`e`, `t`) or MIDI numbers
    /// (`60`), played together, or a command: `:spawn`, `:list`, `:abc`,
    /// `:held`, `:reset`, `:help`, `:quit`.
    Practice {
        /// Key for generated challenges
        #[arg(short, long)]
        key: Option<Key>,

        /// Challenges spawned at start
        #[arg(short, long)]
        challenges: Option<usize>,

        /// Notes per challenge
        #[arg(short, long)]
        length: Option<i32>,

        /// RNG seed for repeatable challenges
        #[arg(short, long)]
        seed: Option<u64>,

        /// Compare pitches by sound rather than spelling
        #[arg(long)]
        enharmonic: bool,

        /// Emit one JSON object per input line instead of text
        #[arg(long)]
        json: bool,
    },

    /// Show the effective configuration as TOML
    Config {
        /// Also list the files and environment variables it came from
        #[arg(long)]
        sources: bool,
    },
}

fn parse_quality(s: &str) -> Result<ChordQuality, String> {
    ChordQuality::parse(s).ok_or_else(|| format!("unknown chord quality '{}'", s))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let (config, sources) = notaconf::NotaConfig::load_with_sources_from(cli.config.as_deref())
        .context("Failed to load configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_new(&config.telemetry.log_level)
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("Config files: {:?}", sources.files);

    let style = output::Style::new(!cli.no_color);

    match cli.command {
        Commands::Scale { key } => commands::scale(key),
        Commands::Chords { key, quality } => commands::chords(key, quality, &style),
        Commands::Melody {
            key,
            length,
            seed,
            duration,
        } => commands::melody(
            key,
            length.unwrap_or(config.practice.melody_length),
            seed,
            duration,
        ),
        Commands::Practice {
            key,
            challenges,
            length,
            seed,
            enharmonic,
            json,
        } => {
            let mut settings = config.practice.clone();
            if let Some(key) = key {
                settings.key = key;
            }
            if let Some(n) = challenges {
                settings.challenges = n;
            }
            if let Some(n) = length {
                settings.melody_length = n;
            }
            if seed.is_some() {
                settings.seed = seed;
            }
            if enharmonic {
                settings.match_rule = challenge::MatchRule::Enharmonic;
            }
            practice::run_stdin(&settings, json, &style)
        }
        Commands::Config { sources: show } => {
            commands::config(&config, show.then_some(&sources));
            Ok(())
        }
    }
}
