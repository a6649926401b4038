//! Application configuration.

use derive_getters::Getters;
use derive_more::{Display, Error};
use noughts_core::GameMode;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// Default config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "noughts.toml";

/// Settings for the terminal game.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct AppConfig {
    /// Who plays whom.
    #[serde(default)]
    mode: GameMode,

    /// Save file; without one, saving and loading are unavailable.
    #[serde(default)]
    save_path: Option<PathBuf>,

    /// Whether the first click on an idle board starts the game.
    #[serde(default = "default_implicit_start")]
    implicit_start: bool,

    /// Tracing filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    log_filter: String,
}

#[instrument]
fn default_implicit_start() -> bool {
    true
}

#[instrument]
fn default_log_filter() -> String {
    "warn".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            mode: GameMode::default(),
            save_path: None,
            implicit_start: default_implicit_start(),
            log_filter: default_log_filter(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(mode = %config.mode, "Config loaded successfully");
        Ok(config)
    }

    /// Loads `path` if it exists, otherwise returns defaults.
    ///
    /// An explicitly named file that is missing is an error; the default
    /// file may be absent.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => Self::from_file(DEFAULT_CONFIG_FILE),
            None => Ok(Self::default()),
        }
    }

    /// Applies command-line overrides.
    pub fn with_overrides(mut self, mode: Option<GameMode>, save_path: Option<PathBuf>) -> Self {
        if let Some(mode) = mode {
            self.mode = mode;
        }
        if save_path.is_some() {
            self.save_path = save_path;
        }
        self
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new config error with caller location tracking.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_gives_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert!(*config.implicit_start());
        assert_eq!(config.log_filter(), "warn");
    }

    #[test]
    fn test_parses_all_fields() {
        let config: AppConfig = toml::from_str(
            r#"
            mode = "heuristic-first-vs-human"
            save_path = "game.json"
            implicit_start = false
            log_filter = "debug"
            "#,
        )
        .unwrap();
        assert_eq!(*config.mode(), GameMode::HeuristicFirstVsHuman);
        assert_eq!(config.save_path().as_deref(), Some(Path::new("game.json")));
        assert!(!*config.implicit_start());
    }

    #[test]
    fn test_overrides_replace_file_values() {
        let config = AppConfig::default()
            .with_overrides(Some(GameMode::HumanFirstVsHeuristic), Some(PathBuf::from("a.json")));
        assert_eq!(*config.mode(), GameMode::HumanFirstVsHeuristic);
        assert_eq!(config.save_path().as_deref(), Some(Path::new("a.json")));

        let config = config.with_overrides(None, None);
        assert_eq!(*config.mode(), GameMode::HumanFirstVsHeuristic);
    }

    #[test]
    fn test_unknown_mode_rejected() {
        assert!(toml::from_str::<AppConfig>(r#"mode = "minimax""#).is_err());
    }
}
