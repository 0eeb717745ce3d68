//! Configuration loading for Notanica.
//!
//! # Usage
//!
//! ```rust,no_run
//! use notaconf::NotaConfig;
//!
//! let config = NotaConfig::load().expect("Failed to load config");
//! println!("Key: {}", config.practice.key);
//! println!("Melody length: {}", config.practice.melody_length);
//! ```
//!
//! # Config File Locations
//!
//! Files are loaded in order (later wins):
//! 1. `/etc/notanica/config.toml` (system)
//! 2. `~/.config/notanica/config.toml` (user)
//! 3. `./notanica.toml` (local override, or the `--config` path)
//! 4. Environment variables (`NOTANICA_*`, `RUST_LOG`)
//!
//! # Example Config
//!
//! ```toml
//! [practice]
//! key = "A minor"
//! melody_length = 8
//! challenges = 3
//! seed = 42
//! match_rule = "enharmonic"
//!
//! [telemetry]
//! log_level = "info"
//! ```

pub mod loader;
pub mod settings;

pub use loader::{discover_config_files_with_override, ConfigLayer, ConfigSources};
pub use settings::{PracticeConfig, TelemetryConfig};

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Invalid value in environment variable {var}: {message}")]
    Env { var: String, message: String },
}

/// Complete Notanica configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct NotaConfig {
    #[serde(default)]
    pub practice: PracticeConfig,

    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl NotaConfig {
    /// Load configuration from all sources.
    ///
    /// Load order (later wins):
    /// 1. Compiled defaults
    /// 2. `/etc/notanica/config.toml`
    /// 3. `~/.config/notanica/config.toml`
    /// 4. `./notanica.toml`
    /// 5. Environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let (config, _sources) = Self::load_with_sources_from(None)?;
        Ok(config)
    }

    /// Load configuration from a specific file path, then apply env overrides.
    ///
    /// If `config_path` is provided, it takes precedence over the local
    /// `./notanica.toml` override. System and user configs still load first.
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let (config, _sources) = Self::load_with_sources_from(config_path)?;
        Ok(config)
    }

    /// Load configuration from optional path and return information about sources.
    pub fn load_with_sources_from(
        config_path: Option<&Path>,
    ) -> Result<(Self, ConfigSources), ConfigError> {
        let mut sources = ConfigSources::default();
        let mut config = NotaConfig::default();

        for path in loader::discover_config_files_with_override(config_path) {
            loader::load_from_file(&path)?.apply_to(&mut config);
            sources.files.push(path);
        }

        loader::apply_env_overrides(&mut config, &mut sources)?;

        Ok((config, sources))
    }

    /// Serialize config to TOML string.
    pub fn to_toml(&self) -> String {
        // Built by hand so the key reads "C Major" rather than the enum name
        let mut output = String::new();

        output.push_str("# Notanica Configuration\n\n");

        output.push_str("[practice]\n");
        output.push_str(&format!("key = \"{}\"\n", self.practice.key));
        output.push_str(&format!(
            "melody_length = {}\n",
            self.practice.melody_length
        ));
        output.push_str(&format!("challenges = {}\n", self.practice.challenges));
        match self.practice.seed {
            Some(seed) => output.push_str(&format!("seed = {}\n", seed)),
            None => output.push_str("# seed = 42\n"),
        }
        output.push_str(&format!(
            "match_rule = \"{}\"\n",
            self.practice.match_rule
        ));

        output.push_str("\n[telemetry]\n");
        output.push_str(&format!(
            "log_level = \"{}\"\n",
            self.telemetry.log_level
        ));

        output
    }
}
