//! Configuration sections.

use challenge::MatchRule;
use serde::{Deserialize, Serialize};
use theory::Key;

/// Practice session defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PracticeConfig {
    /// Key challenges are generated in.
    /// Default: C major
    #[serde(default)]
    pub key: Key,

    /// Notes per generated melody.
    /// Default: 8
    #[serde(default = "PracticeConfig::default_melody_length")]
    pub melody_length: i32,

    /// Challenges spawned when a practice session starts.
    /// Default: 3
    #[serde(default = "PracticeConfig::default_challenges")]
    pub challenges: usize,

    /// Fixed RNG seed. Unset means a fresh seed every run.
    #[serde(default)]
    pub seed: Option<u64>,

    /// How played notes are compared with expected ones.
    /// Default: exact
    #[serde(default)]
    pub match_rule: MatchRule,
}

impl PracticeConfig {
    fn default_melody_length() -> i32 {
        8
    }

    fn default_challenges() -> usize {
        3
    }
}

impl Default for PracticeConfig {
    fn default() -> Self {
        Self {
            key: Key::default(),
            melody_length: Self::default_melody_length(),
            challenges: Self::default_challenges(),
            seed: None,
            match_rule: MatchRule::default(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Log filter (trace, debug, info, warn, error, or an `EnvFilter` directive).
    /// Default: warn
    #[serde(default = "TelemetryConfig::default_log_level")]
    pub log_level: String,
}

impl TelemetryConfig {
    fn default_log_level() -> String {
        "warn".to_string()
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: Self::default_log_level(),
        }
    }
}
