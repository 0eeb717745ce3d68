//! Config file discovery, loading, and environment variable overlay.

use crate::{ConfigError, NotaConfig};
use std::env;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

/// Information about where config values came from.
#[derive(Debug, Clone, Default)]
pub struct ConfigSources {
    /// Config files that were loaded (in order)
    pub files: Vec<PathBuf>,
    /// Environment variables that overrode config values
    pub env_overrides: Vec<String>,
}

/// Values set by one config file. Unset fields leave the layer below alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigLayer {
    pub key: Option<theory::Key>,
    pub melody_length: Option<i32>,
    pub challenges: Option<usize>,
    pub seed: Option<u64>,
    pub match_rule: Option<challenge::MatchRule>,
    pub log_level: Option<String>,
}

impl ConfigLayer {
    /// Write every set value onto `config`.
    pub fn apply_to(self, config: &mut NotaConfig) {
        if let Some(v) = self.key {
            config.practice.key = v;
        }
        if let Some(v) = self.melody_length {
            config.practice.melody_length = v;
        }
        if let Some(v) = self.challenges {
            config.practice.challenges = v;
        }
        if let Some(v) = self.seed {
            config.practice.seed = Some(v);
        }
        if let Some(v) = self.match_rule {
            config.practice.match_rule = v;
        }
        if let Some(v) = self.log_level {
            config.telemetry.log_level = v;
        }
    }
}

/// Discover config files in standard locations.
///
/// Returns paths in load order (system, user, local).
/// Only returns files that exist.
pub fn discover_config_files() -> Vec<PathBuf> {
    discover_config_files_with_override(None)
}

/// Discover config files, optionally with a CLI override path.
///
/// If `cli_path` is provided and exists, it replaces the local override.
/// Returns paths in load order (system, user, local/cli).
pub fn discover_config_files_with_override(cli_path: Option<&Path>) -> Vec<PathBuf> {
    let mut files = Vec::new();

    // System config
    let system = PathBuf::from("/etc/notanica/config.toml");
    if system.exists() {
        files.push(system);
    }

    // User config (XDG_CONFIG_HOME or ~/.config)
    if let Some(config_dir) = directories::BaseDirs::new().map(|d| d.config_dir().to_path_buf()) {
        let user = config_dir.join("notanica/config.toml");
        if user.exists() {
            files.push(user);
        }
    }

    // CLI override takes precedence over local
    if let Some(path) = cli_path {
        if path.exists() {
            files.push(path.to_path_buf());
            return files;
        }
        debug!("Config path {} does not exist, skipping", path.display());
    }

    // Local override (current directory)
    let local = PathBuf::from("notanica.toml");
    if local.exists() {
        files.push(local);
    }

    files
}

/// Load one config layer from a TOML file.
pub fn load_from_file(path: &Path) -> Result<ConfigLayer, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    let layer = parse_toml(&contents, path)?;
    debug!("Loaded config file {}", path.display());
    Ok(layer)
}

/// Parse a config layer from a TOML string.
pub fn parse_toml(contents: &str, path: &Path) -> Result<ConfigLayer, ConfigError> {
    let parse_error = |message: String| ConfigError::Parse {
        path: path.to_path_buf(),
        message,
    };

    let table: toml::Table = contents
        .parse()
        .map_err(|e: toml::de::Error| parse_error(e.to_string()))?;

    let mut layer = ConfigLayer::default();

    if let Some(practice) = table.get("practice").and_then(|v| v.as_table()) {
        if let Some(v) = practice.get("key") {
            let s = v
                .as_str()
                .ok_or_else(|| parse_error("practice.key must be a string".into()))?;
            layer.key = Some(parse_value(s, "practice.key", path)?);
        }
        if let Some(v) = practice.get("melody_length") {
            let n = v
                .as_integer()
                .and_then(|n| i32::try_from(n).ok())
                .ok_or_else(|| parse_error("practice.melody_length must be an integer".into()))?;
            layer.melody_length = Some(n);
        }
        if let Some(v) = practice.get("challenges") {
            let n = v
                .as_integer()
                .and_then(|n| usize::try_from(n).ok())
                .ok_or_else(|| {
                    parse_error("practice.challenges must be a non-negative integer".into())
                })?;
            layer.challenges = Some(n);
        }
        if let Some(v) = practice.get("seed") {
            let n = v
                .as_integer()
                .and_then(|n| u64::try_from(n).ok())
                .ok_or_else(|| parse_error("practice.seed must be a non-negative integer".into()))?;
            layer.seed = Some(n);
        }
        if let Some(v) = practice.get("match_rule") {
            let s = v
                .as_str()
                .ok_or_else(|| parse_error("practice.match_rule must be a string".into()))?;
            layer.match_rule = Some(parse_value(s, "practice.match_rule", path)?);
        }
    }

    if let Some(telemetry) = table.get("telemetry").and_then(|v| v.as_table()) {
        if let Some(v) = telemetry.get("log_level").and_then(|v| v.as_str()) {
            layer.log_level = Some(v.to_string());
        }
    }

    Ok(layer)
}

fn parse_value<T>(s: &str, field: &str, path: &Path) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    s.parse().map_err(|e: T::Err| ConfigError::Parse {
        path: path.to_path_buf(),
        message: format!("{}: {}", field, e),
    })
}

/// Apply environment variable overrides to config.
pub fn apply_env_overrides(
    config: &mut NotaConfig,
    sources: &mut ConfigSources,
) -> Result<(), ConfigError> {
    apply_overrides_from(config, sources, |name| env::var(name).ok())
}

/// Apply overrides from any variable lookup (the process environment in practice).
pub fn apply_overrides_from<F>(
    config: &mut NotaConfig,
    sources: &mut ConfigSources,
    lookup: F,
) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(v) = lookup("NOTANICA_KEY") {
        config.practice.key = parse_env(&v, "NOTANICA_KEY")?;
        sources.env_overrides.push("NOTANICA_KEY".to_string());
    }
    if let Some(v) = lookup("NOTANICA_MELODY_LENGTH") {
        config.practice.melody_length = parse_env(&v, "NOTANICA_MELODY_LENGTH")?;
        sources.env_overrides.push("NOTANICA_MELODY_LENGTH".to_string());
    }
    if let Some(v) = lookup("NOTANICA_CHALLENGES") {
        config.practice.challenges = parse_env(&v, "NOTANICA_CHALLENGES")?;
        sources.env_overrides.push("NOTANICA_CHALLENGES".to_string());
    }
    if let Some(v) = lookup("NOTANICA_SEED") {
        config.practice.seed = Some(parse_env(&v, "NOTANICA_SEED")?);
        sources.env_overrides.push("NOTANICA_SEED".to_string());
    }
    if let Some(v) = lookup("NOTANICA_MATCH_RULE") {
        config.practice.match_rule = parse_env(&v, "NOTANICA_MATCH_RULE")?;
        sources.env_overrides.push("NOTANICA_MATCH_RULE".to_string());
    }

    // Telemetry
    if let Some(v) = lookup("NOTANICA_LOG_LEVEL") {
        config.telemetry.log_level = v;
        sources.env_overrides.push("NOTANICA_LOG_LEVEL".to_string());
    }
    // Also support RUST_LOG
    if let Some(v) = lookup("RUST_LOG") {
        config.telemetry.log_level = v;
        sources.env_overrides.push("RUST_LOG".to_string());
    }

    if !sources.env_overrides.is_empty() {
        debug!("Env overrides: {}", sources.env_overrides.join(", "));
    }
    Ok(())
}

fn parse_env<T>(value: &str, var: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::Env {
        var: var.to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use challenge::MatchRule;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use theory::Key;

    #[test]
    fn test_discover_config_files() {
        // Just verify it doesn't panic
        let _files = discover_config_files();
    }

    #[test]
    fn test_parse_empty_toml() {
        let layer = parse_toml("", Path::new("test.toml")).unwrap();
        assert_eq!(layer, ConfigLayer::default());
    }

    #[test]
    fn test_parse_minimal_toml() {
        let toml = r#"
[practice]
key = "A minor"
"#;
        let layer = parse_toml(toml, Path::new("test.toml")).unwrap();
        assert_eq!(layer.key, Some(Key::AMinor));
        assert_eq!(layer.melody_length, None);

        let mut config = NotaConfig::default();
        layer.apply_to(&mut config);
        assert_eq!(config.practice.key, Key::AMinor);
        // Other values should be defaults
        assert_eq!(config.practice.melody_length, 8);
    }

    #[test]
    fn test_parse_full_toml() {
        let toml = r#"
[practice]
key = "Fmaj"
melody_length = 12
challenges = 5
seed = 42
match_rule = "enharmonic"

[telemetry]
log_level = "debug"
"#;
        let layer = parse_toml(toml, Path::new("test.toml")).unwrap();
        assert_eq!(
            layer,
            ConfigLayer {
                key: Some(Key::FMajor),
                melody_length: Some(12),
                challenges: Some(5),
                seed: Some(42),
                match_rule: Some(MatchRule::Enharmonic),
                log_level: Some("debug".to_string()),
            }
        );
    }

    #[test]
    fn test_parse_rejects_bad_values() {
        let bad_key = parse_toml("[practice]\nkey = \"H major\"\n", Path::new("k.toml"));
        assert!(matches!(bad_key, Err(ConfigError::Parse { .. })));

        let bad_count = parse_toml("[practice]\nchallenges = -1\n", Path::new("c.toml"));
        assert!(matches!(bad_count, Err(ConfigError::Parse { .. })));

        let bad_toml = parse_toml("[practice\n", Path::new("t.toml"));
        assert!(matches!(bad_toml, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_layer_keeps_values_it_does_not_set() {
        let mut config = NotaConfig::default();
        ConfigLayer {
            melody_length: Some(4),
            ..Default::default()
        }
        .apply_to(&mut config);
        ConfigLayer {
            challenges: Some(1),
            ..Default::default()
        }
        .apply_to(&mut config);

        assert_eq!(config.practice.melody_length, 4);
        assert_eq!(config.practice.challenges, 1);
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("NOTANICA_KEY", "f major"),
            ("NOTANICA_SEED", "7"),
            ("NOTANICA_LOG_LEVEL", "info"),
            ("RUST_LOG", "challenge=debug"),
        ]
        .into_iter()
        .collect();

        let mut config = NotaConfig::default();
        let mut sources = ConfigSources::default();
        apply_overrides_from(&mut config, &mut sources, |name| {
            vars.get(name).map(|v| v.to_string())
        })
        .unwrap();

        assert_eq!(config.practice.key, Key::FMajor);
        assert_eq!(config.practice.seed, Some(7));
        assert_eq!(config.telemetry.log_level, "challenge=debug");
        assert_eq!(
            sources.env_overrides,
            vec!["NOTANICA_KEY", "NOTANICA_SEED", "NOTANICA_LOG_LEVEL", "RUST_LOG"]
        );
    }

    #[test]
    fn test_env_rejects_bad_values() {
        let mut config = NotaConfig::default();
        let mut sources = ConfigSources::default();
        let err = apply_overrides_from(&mut config, &mut sources, |name| {
            (name == "NOTANICA_MELODY_LENGTH").then(|| "lots".to_string())
        })
        .unwrap_err();

        match err {
            ConfigError::Env { var, .. } => assert_eq!(var, "NOTANICA_MELODY_LENGTH"),
            other => panic!("expected env error, got {:?}", other),
        }
    }
}
